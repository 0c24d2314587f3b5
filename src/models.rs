/// A single filing on EDGAR, addressed by company CIK and accession number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingId {
    cik: String,
    accession_number: String,
}

impl FilingId {
    pub fn new(cik: impl Into<String>, accession_number: impl Into<String>) -> Self {
        Self {
            cik: cik.into().trim().to_string(),
            accession_number: accession_number.into().trim().to_string(),
        }
    }

    pub fn accession_number(&self) -> &str {
        &self.accession_number
    }

    /// CIK left-padded with zeros to 10 characters
    pub fn padded_cik(&self) -> String {
        format!("{:0>10}", self.cik)
    }

    /// Accession number with dashes removed, as used in archive paths
    pub fn accession_folder(&self) -> String {
        self.accession_number.replace('-', "")
    }

    /// Directory URL of the filing under `archive_root`, with a trailing slash.
    pub fn archive_base_url(&self, archive_root: &str) -> String {
        format!(
            "{}/{}/{}/",
            archive_root.trim_end_matches('/'),
            self.padded_cik(),
            self.accession_folder()
        )
    }
}

/// A financial statement sub-report discovered in FilingSummary.xml
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportReference {
    pub name: String,
    pub url: String,
}

/// Text grid scraped from one HTML table. Rows may differ in length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }
}

/// Everything the driver collects from the user for one run
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub filing: FilingId,
    pub company_name: String,
}

impl ExportRequest {
    pub fn new(filing: FilingId, company_name: impl Into<String>) -> Self {
        Self {
            filing,
            company_name: company_name.into().trim().to_string(),
        }
    }

    pub fn output_file_name(&self) -> String {
        format!(
            "{}_{}_report.xlsx",
            self.company_name,
            self.filing.accession_folder()
        )
    }
}
