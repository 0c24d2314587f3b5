use std::io::{self, BufRead, Write};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "edgar-sheets")]
#[command(about = "Export the income statement, balance sheet and cash flow tables of an SEC EDGAR filing to Excel")]
#[command(version)]
pub struct Cli {
    /// Company CIK (numbers only); prompted for when omitted
    #[arg(long)]
    pub cik: Option<String>,

    /// Accession number (xxxxxxxxxx-xx-xxxxxx); prompted for when omitted
    #[arg(long)]
    pub accession: Option<String>,

    /// Short company name used in the output filename; prompted for when omitted
    #[arg(long)]
    pub name: Option<String>,

    /// Directory the workbook is written into
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

/// The three values a run needs, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub cik: String,
    pub accession: String,
    pub company_name: String,
}

/// Print `label` and read one trimmed line. End of input reads as an empty string.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<String> {
    write!(output, "{}", label)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

impl Cli {
    /// Take each value from its flag, or ask for it.
    pub fn collect_inputs<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<Inputs> {
        let needs_prompt = self.cik.is_none() || self.accession.is_none() || self.name.is_none();
        if needs_prompt {
            writeln!(output, "Enter company details to download financial reports from SEC EDGAR:")?;
        }

        let cik = match &self.cik {
            Some(v) => v.trim().to_string(),
            None => prompt(input, output, "Enter the company's CIK (numbers only): ")?,
        };
        let accession = match &self.accession {
            Some(v) => v.trim().to_string(),
            None => prompt(input, output, "Enter the accession number (format: xxxxxxxxxx-xx-xxxxxx): ")?,
        };
        let company_name = match &self.name {
            Some(v) => v.trim().to_string(),
            None => prompt(input, output, "Enter a short name for the company (used in output filename): ")?,
        };

        Ok(Inputs { cik, accession, company_name })
    }
}
