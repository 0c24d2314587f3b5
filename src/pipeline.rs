//! resolve → scrape each report → write workbook

use std::path::PathBuf;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::info;

use crate::config::Config;
use crate::edgar::{
    fetch_report_table, resolve_reports, CssTableSelector, Fetch, GridSelectors, KeywordMatcher,
    TableSelector, TitleMatcher,
};
use crate::errors::EdgarError;
use crate::models::{ExportRequest, ReportTable};
use crate::workbook::{write_reports, WorkbookSummary};

/// How a run ended when nothing went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The filing summary listed no matching reports; nothing was written
    NoReports,
    Saved(WorkbookSummary),
}

pub struct Exporter<'a> {
    fetcher: &'a dyn Fetch,
    matcher: Box<dyn TitleMatcher + 'a>,
    tables: Box<dyn TableSelector + 'a>,
    grid: GridSelectors,
    archive_root: String,
    output_dir: PathBuf,
    concurrency: usize,
}

impl<'a> Exporter<'a> {
    /// Exporter using the keyword matcher and first-table selector from `config`.
    pub fn new(fetcher: &'a dyn Fetch, config: &Config) -> Result<Self, EdgarError> {
        Ok(Self {
            fetcher,
            matcher: Box::new(KeywordMatcher::new(&config.report_keywords)),
            tables: Box::new(CssTableSelector::first_table()?),
            grid: GridSelectors::new()?,
            archive_root: config.archive_root.clone(),
            output_dir: config.output_dir.clone(),
            concurrency: config.concurrency.max(1),
        })
    }

    pub fn with_matcher(mut self, matcher: impl TitleMatcher + 'a) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn with_table_selector(mut self, tables: impl TableSelector + 'a) -> Self {
        self.tables = Box::new(tables);
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub async fn run(&self, request: &ExportRequest) -> Result<ExportOutcome, EdgarError> {
        let reports = resolve_reports(
            self.fetcher,
            &request.filing,
            &self.archive_root,
            self.matcher.as_ref(),
        )
        .await?;

        if reports.is_empty() {
            return Ok(ExportOutcome::NoReports);
        }

        // buffered() keeps index order regardless of completion order
        let tables: Vec<(String, ReportTable)> = stream::iter(reports)
            .map(|report| async move {
                let table = fetch_report_table(
                    self.fetcher,
                    &report.url,
                    self.tables.as_ref(),
                    &self.grid,
                )
                .await?;
                Ok::<_, EdgarError>((report.name, table))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let file_name = request.output_file_name();
        info!("Writing {} reports to {}", tables.len(), file_name);
        let summary = write_reports(&self.output_dir, &file_name, &tables)?;

        Ok(ExportOutcome::Saved(summary))
    }
}
