//! Export the financial statement tables of an SEC EDGAR filing to Excel.

pub mod cli;
pub mod config;
pub mod edgar;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod workbook;

pub use errors::EdgarError;
pub use pipeline::{ExportOutcome, Exporter};
