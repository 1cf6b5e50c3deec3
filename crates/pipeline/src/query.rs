//! The startup query a ranking request is made for.

use crate::error::ValidationError;
use data_loader::normalize;
use serde_json::Value;

pub const FUNDING_REQUIRED: &str = "Funding Required";
pub const INDUSTRY: &str = "Industry";
pub const STAGE: &str = "Stage";

/// Checked in this order; the first absent one is reported
pub const REQUIRED_FIELDS: [&str; 3] = [FUNDING_REQUIRED, INDUSTRY, STAGE];

/// A validated ranking query.
///
/// Funding Required is kept twice: the raw text (normalized again for the
/// model feature) and its strict float parse (used by the check-size
/// heuristic).
#[derive(Debug, Clone, PartialEq)]
pub struct StartupQuery {
    pub funding_required_raw: String,
    pub funding_required: f64,
    pub industry: String,
    pub stage: String,
}

impl StartupQuery {
    /// Build a query from plain values, validating the funding amount.
    pub fn new(
        funding_required: impl Into<String>,
        industry: impl Into<String>,
        stage: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let raw = funding_required.into();
        let funding = parse_funding(&raw)?;
        Ok(Self {
            funding_required_raw: raw,
            funding_required: funding,
            industry: industry.into(),
            stage: stage.into(),
        })
    }

    /// Validate a request body.
    ///
    /// Funding Required may be a JSON number or a numeric string. Industry
    /// and Stage must be strings.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

        for field in REQUIRED_FIELDS {
            if !obj.contains_key(field) {
                return Err(ValidationError::MissingField(field));
            }
        }

        let funding = match &obj[FUNDING_REQUIRED] {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            other => {
                return Err(ValidationError::InvalidField {
                    field: FUNDING_REQUIRED,
                    reason: format!("expected a number, got {}", other),
                });
            }
        };

        Self::new(
            funding,
            string_field(obj, INDUSTRY)?,
            string_field(obj, STAGE)?,
        )
    }

    /// Funding Required as the model sees it (digits and dots only)
    pub fn normalized_funding(&self) -> f64 {
        normalize(&self.funding_required_raw)
    }

    /// Trimmed, case-insensitive stage equality
    pub fn stage_matches(&self, investor_stage: &str) -> bool {
        investor_stage.trim().to_lowercase() == self.stage.trim().to_lowercase()
    }
}

fn string_field(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match &obj[field] {
        Value::String(s) => Ok(s.clone()),
        other => Err(ValidationError::InvalidField {
            field,
            reason: format!("expected a string, got {}", other),
        }),
    }
}

fn parse_funding(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::InvalidField {
            field: FUNDING_REQUIRED,
            reason: format!("{:?} is not a number", raw),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_query_from_json() {
        let q = StartupQuery::from_json(&json!({
            "Funding Required": "500000",
            "Industry": "Fintech",
            "Stage": "seed"
        }))
        .unwrap();
        assert_eq!(q.funding_required, 500_000.0);
        assert_eq!(q.normalized_funding(), 500_000.0);
        assert_eq!(q.industry, "Fintech");
    }

    #[test]
    fn test_numeric_funding_accepted() {
        let q = StartupQuery::from_json(&json!({
            "Funding Required": 750000,
            "Industry": "AI",
            "Stage": "Seed"
        }))
        .unwrap();
        assert_eq!(q.funding_required, 750_000.0);
        assert_eq!(q.funding_required_raw, "750000");
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let err = StartupQuery::from_json(&json!({"Industry": "AI"})).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("Funding Required"));

        let err = StartupQuery::from_json(&json!({"Funding Required": 1, "Industry": "AI"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: Stage");
    }

    #[test]
    fn test_non_numeric_funding_rejected() {
        let err = StartupQuery::from_json(&json!({
            "Funding Required": "$1,200,000",
            "Industry": "AI",
            "Stage": "Seed"
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field: "Funding Required", .. }));

        assert!(StartupQuery::new("NaN", "AI", "Seed").is_err());
        assert!(StartupQuery::new("", "AI", "Seed").is_err());
    }

    #[test]
    fn test_wrong_types_rejected() {
        assert_eq!(
            StartupQuery::from_json(&json!([1, 2])).unwrap_err(),
            ValidationError::NotAnObject
        );
        let err = StartupQuery::from_json(&json!({
            "Funding Required": 1,
            "Industry": null,
            "Stage": "Seed"
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field: "Industry", .. }));
    }

    #[test]
    fn test_stage_match_is_trimmed_and_case_insensitive() {
        let q = StartupQuery::new("1", "AI", " seed ").unwrap();
        assert!(q.stage_matches("Seed"));
        assert!(q.stage_matches("  SEED"));
        assert!(!q.stage_matches("Pre-Seed"));
    }
}
