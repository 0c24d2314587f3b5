//! FilingSummary.xml lookup and financial statement selection

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, info, warn};

use crate::edgar::client::Fetch;
use crate::errors::EdgarError;
use crate::models::{FilingId, ReportReference};

pub const FILING_SUMMARY: &str = "FilingSummary.xml";

/// Decides which reports of a filing are worth exporting, by short name.
pub trait TitleMatcher {
    fn matches(&self, short_name: &str) -> bool;
}

/// Case-insensitive substring match against a fixed keyword list
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
}

impl KeywordMatcher {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_REPORT_KEYWORDS)
    }
}

impl TitleMatcher for KeywordMatcher {
    fn matches(&self, short_name: &str) -> bool {
        let title = short_name.to_lowercase();
        self.keywords.iter().any(|k| title.contains(k.as_str()))
    }
}

/// One `<Report>` element of the filing summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryEntry {
    pub short_name: String,
    pub html_file_name: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    ShortName,
    HtmlFileName,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        if tag.eq_ignore_ascii_case(b"shortname") {
            Some(Field::ShortName)
        } else if tag.eq_ignore_ascii_case(b"htmlfilename") {
            Some(Field::HtmlFileName)
        } else {
            None
        }
    }
}

impl SummaryEntry {
    fn append(&mut self, field: Field, text: &str) {
        match field {
            Field::ShortName => self.short_name.push_str(text),
            Field::HtmlFileName => self
                .html_file_name
                .get_or_insert_with(String::new)
                .push_str(text),
        }
    }
}

/// Scan every `<Report>` element for its short name and html file name.
pub fn parse_filing_summary(xml: &str) -> Result<Vec<SummaryEntry>, EdgarError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    reader.check_end_names(false);

    let mut entries = Vec::new();
    let mut current: Option<SummaryEntry> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                if name.as_ref().eq_ignore_ascii_case(b"report") {
                    current = Some(SummaryEntry::default());
                    field = None;
                } else if current.is_some() {
                    field = Field::from_tag(name.as_ref());
                }
            }
            Event::Text(t) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    match t.unescape() {
                        Ok(text) => entry.append(f, &text),
                        Err(e) => {
                            // Bare '&' and similar; keep the raw text
                            warn!("Unescaped text in {}: {}", FILING_SUMMARY, e);
                            entry.append(f, &String::from_utf8_lossy(&t));
                        }
                    }
                }
            }
            Event::CData(c) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    entry.append(f, &String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref().eq_ignore_ascii_case(b"report") {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Tolerate a summary truncated inside its last report
    if let Some(entry) = current.take() {
        entries.push(entry);
    }

    Ok(entries)
}

/// Turn matching summary entries into absolute report references.
///
/// A repeated display name keeps its first position but takes the later URL.
pub fn select_reports(
    entries: &[SummaryEntry],
    base_url: &str,
    matcher: &dyn TitleMatcher,
) -> Vec<ReportReference> {
    let mut reports: Vec<ReportReference> = Vec::new();

    for entry in entries {
        if !matcher.matches(&entry.short_name) {
            debug!("Skipping report: {}", entry.short_name.trim());
            continue;
        }

        let file_name = match entry.html_file_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => {
                warn!("Report '{}' has no HtmlFileName, skipping", entry.short_name.trim());
                continue;
            }
        };

        let name = entry.short_name.trim().to_string();
        let url = format!("{}{}", base_url, file_name);

        match reports.iter_mut().find(|r| r.name == name) {
            Some(existing) => existing.url = url,
            None => reports.push(ReportReference { name, url }),
        }
    }

    reports
}

/// Fetch the filing summary and return the financial statement reports it lists.
///
/// An empty result is not an error; the caller decides how to report it.
pub async fn resolve_reports(
    fetcher: &dyn Fetch,
    filing: &FilingId,
    archive_root: &str,
    matcher: &dyn TitleMatcher,
) -> Result<Vec<ReportReference>, EdgarError> {
    let base_url = filing.archive_base_url(archive_root);
    let summary_url = format!("{}{}", base_url, FILING_SUMMARY);

    info!("Fetching {} from {}", FILING_SUMMARY, summary_url);
    let body = fetcher.get_text(&summary_url).await?;

    let entries = parse_filing_summary(&body)?;
    debug!("{} lists {} reports", FILING_SUMMARY, entries.len());

    let reports = select_reports(&entries, &base_url, matcher);
    if reports.is_empty() {
        info!("No main financial reports found in {}", FILING_SUMMARY);
    } else {
        info!("Found {} financial reports", reports.len());
    }

    Ok(reports)
}
