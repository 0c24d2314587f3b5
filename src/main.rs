use clap::Parser;
use anyhow::Result;
use tracing::{info, error};

use edgar_sheets::cli::Cli;
use edgar_sheets::config::Config;
use edgar_sheets::edgar::EdgarClient;
use edgar_sheets::models::{ExportRequest, FilingId};
use edgar_sheets::{EdgarError, ExportOutcome, Exporter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to both console and file
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("edgar_sheets=info"));
    let file_appender = tracing_appender::rolling::never(".", "edgar-sheets.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter())
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(filter())
        )
        .init();

    let cli = Cli::parse();

    // Every handled failure ends in a message and a normal exit
    if let Err(e) = run(&cli).await {
        match e.downcast_ref::<EdgarError>() {
            Some(edgar) if edgar.is_http() => println!("HTTP Error: {}", edgar),
            _ => println!("Error: {:#}", e),
        }
        error!("Export failed: {:#}", e);
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.into();
    }

    let stdin = std::io::stdin();
    let inputs = cli.collect_inputs(&mut stdin.lock(), &mut std::io::stdout())?;

    let request = ExportRequest::new(
        FilingId::new(inputs.cik, inputs.accession),
        inputs.company_name,
    );
    info!(
        "Exporting filing {} for CIK {}",
        request.filing.accession_number(),
        request.filing.padded_cik()
    );

    let client = EdgarClient::new(&config.http)?;
    let exporter = Exporter::new(&client, &config)?;

    match exporter.run(&request).await? {
        ExportOutcome::NoReports => {
            println!("No reports to save for {}.", request.company_name);
        }
        ExportOutcome::Saved(summary) => {
            for name in &summary.skipped {
                println!("Skipping empty table for sheet: {}", name);
            }
            println!("\nSaved to {}", summary.path.display());
        }
    }

    Ok(())
}
