//! SEC EDGAR archive access
//!
//! Resolves a filing's financial statement reports from its FilingSummary.xml
//! and scrapes the table out of each report page.

pub mod client;
pub mod summary;
pub mod report;

pub use client::{EdgarClient, Fetch};
pub use summary::{resolve_reports, KeywordMatcher, TitleMatcher};
pub use report::{fetch_report_table, CssTableSelector, GridSelectors, TableSelector};
