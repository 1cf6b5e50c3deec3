//! Parser for the investor CSV.
//!
//! The file has one header row. Only the columns in [`REQUIRED_COLUMNS`] are
//! read; training-only columns such as `Funding Required`, `Industry` and
//! `Stage` are ignored. Every cell is read as text first and cleaned in
//! [`RawInvestorRow::into_record`].

use crate::error::{DataLoadError, Result};
use crate::normalize::normalize_opt;
use crate::types::InvestorRecord;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Headers the ranker cannot work without
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Firm",
    "Investor Name",
    "Investor Stage",
    "Investor Industry",
    "Check Size",
    "Previous Investments",
    "Success Rate",
    "Relevance",
];

/// One CSV row exactly as read, every cell optional text.
///
/// The csv crate yields `None` for empty cells of `Option` fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInvestorRow {
    #[serde(rename = "Firm")]
    pub firm: Option<String>,
    #[serde(rename = "Investor Name")]
    pub investor_name: Option<String>,
    #[serde(rename = "Investor Stage")]
    pub investor_stage: Option<String>,
    #[serde(rename = "Investor Industry")]
    pub investor_industry: Option<String>,
    #[serde(rename = "Check Size")]
    pub check_size: Option<String>,
    #[serde(rename = "Previous Investments")]
    pub previous_investments: Option<String>,
    #[serde(rename = "Success Rate")]
    pub success_rate: Option<String>,
    #[serde(rename = "Relevance")]
    pub relevance: Option<String>,
}

impl RawInvestorRow {
    /// Clean a raw row.
    ///
    /// - Firm / Investor Stage / Investor Industry: missing -> `""`
    /// - Check Size / Success Rate: numeric normalization, malformed -> `0.0`
    /// - Relevance: plain float parse, anything else -> absent
    pub fn into_record(self) -> InvestorRecord {
        InvestorRecord {
            firm: self.firm.unwrap_or_default(),
            investor_name: self.investor_name,
            investor_stage: self.investor_stage.unwrap_or_default(),
            investor_industry: self.investor_industry.unwrap_or_default(),
            check_size: normalize_opt(self.check_size.as_deref()),
            previous_investments: self.previous_investments,
            success_rate: normalize_opt(self.success_rate.as_deref()),
            relevance: self.relevance.as_deref().and_then(parse_label),
        }
    }
}

/// Relevance labels are plain numbers; no currency stripping here
fn parse_label(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse raw rows from any reader producing CSV text
pub fn parse_investors<R: Read>(reader: R) -> Result<Vec<RawInvestorRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataLoadError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize::<RawInvestorRow>().enumerate() {
        // +2: header is line 1, rows start on line 2
        let row = result.map_err(|e| DataLoadError::ParseError {
            row: idx + 2,
            reason: e.to_string(),
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Parse the investor CSV at `path`
pub fn parse_investor_file(path: &Path) -> Result<Vec<RawInvestorRow>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    parse_investors(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Firm,Investor Name,Investor Stage,Investor Industry,Check Size,Previous Investments,Success Rate,Relevance,Funding Required";

    #[test]
    fn test_parse_row_with_formatted_numbers() {
        let csv = format!(
            "{HEADER}\nAcme Ventures,Jane Doe,Seed,Fintech Solutions,\"$500,000\",12,85%,3,\"$1,000,000\"\n"
        );
        let rows = parse_investors(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);

        let record = rows[0].clone().into_record();
        assert_eq!(record.firm, "Acme Ventures");
        assert_eq!(record.investor_name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.check_size, 500_000.0);
        assert_eq!(record.success_rate, 85.0);
        assert_eq!(record.previous_investments.as_deref(), Some("12"));
        assert_eq!(record.relevance, Some(3.0));
    }

    #[test]
    fn test_empty_cells_default() {
        let csv = format!("{HEADER}\n,,,,,,,,\n");
        let rows = parse_investors(csv.as_bytes()).unwrap();
        let record = rows[0].clone().into_record();

        assert_eq!(record.firm, "");
        assert_eq!(record.investor_stage, "");
        assert_eq!(record.investor_industry, "");
        assert!(record.investor_name.is_none());
        assert!(record.previous_investments.is_none());
        assert_eq!(record.check_size, 0.0);
        assert_eq!(record.success_rate, 0.0);
        assert!(record.relevance.is_none());
    }

    #[test]
    fn test_unparseable_relevance_is_absent() {
        let csv = format!("{HEADER}\nA,B,Seed,AI,1,,1,high,\n");
        let rows = parse_investors(csv.as_bytes()).unwrap();
        assert!(rows[0].clone().into_record().relevance.is_none());
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let csv = "Firm,Investor Name\nA,B\n";
        let err = parse_investors(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingColumn { ref column } if column == "Investor Stage"
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_investor_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
