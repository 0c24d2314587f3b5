//! Error types for the EDGAR export pipeline

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("{status} for url: {url}")]
    HttpStatus {
        url: String,
        status: StatusCode,
    },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse FilingSummary.xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid table selector '{0}'")]
    Selector(String),

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EdgarError {
    /// True when the upstream server answered with a non-success status.
    pub fn is_http(&self) -> bool {
        matches!(self, EdgarError::HttpStatus { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_is_labelled_http() {
        let err = EdgarError::HttpStatus {
            url: "https://www.sec.gov/x".to_string(),
            status: StatusCode::NOT_FOUND,
        };
        assert!(err.is_http());
        assert_eq!(err.to_string(), "404 Not Found for url: https://www.sec.gov/x");
    }

    #[test]
    fn test_other_errors_are_not_http() {
        let err = EdgarError::Selector("tbl[".to_string());
        assert!(!err.is_http());

        let io = EdgarError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(!io.is_http());
        assert_eq!(io.to_string(), "IO error: disk full");
    }
}
