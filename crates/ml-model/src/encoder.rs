//! Categorical encoders with unknown-category fallback.
//!
//! Each categorical column has a closed vocabulary of labels. A label's code
//! is its position in the vocabulary and position 0 is the fallback: empty
//! or unseen input encodes to 0 instead of failing, so every code that
//! reaches the model is inside the vocabulary.
//!
//! Decoding goes the other way and reports [`UNKNOWN_LABEL`] for codes the
//! vocabulary doesn't have.

use crate::error::{ModelError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Label reported when a code can't be decoded
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The columns that are label-encoded before scoring.
///
/// `Industry` / `Stage` carry the query's values, the `Investor*` columns and
/// `Firm` carry the candidate's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalColumn {
    Industry,
    Stage,
    InvestorIndustry,
    InvestorStage,
    Firm,
}

impl CategoricalColumn {
    pub const COUNT: usize = 5;

    pub const ALL: [CategoricalColumn; Self::COUNT] = [
        CategoricalColumn::Industry,
        CategoricalColumn::Stage,
        CategoricalColumn::InvestorIndustry,
        CategoricalColumn::InvestorStage,
        CategoricalColumn::Firm,
    ];

    /// Column name as it appears in the dataset and the encoder artifact
    pub const fn name(self) -> &'static str {
        match self {
            CategoricalColumn::Industry => "Industry",
            CategoricalColumn::Stage => "Stage",
            CategoricalColumn::InvestorIndustry => "Investor Industry",
            CategoricalColumn::InvestorStage => "Investor Stage",
            CategoricalColumn::Firm => "Firm",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed label <-> code table for one column.
#[derive(Debug, Clone)]
pub struct CategoricalEncoder {
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl CategoricalEncoder {
    /// Build from the ordered class list. The first class is the fallback.
    ///
    /// Fails if the list is empty, since there would be no fallback.
    pub fn from_classes(column: CategoricalColumn, classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(ModelError::EmptyVocabulary(column.name().to_string()));
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            // duplicates keep their first position
            codes.entry(label.clone()).or_insert(code as u32);
        }

        Ok(Self { classes, codes })
    }

    /// Ordered known labels, index 0 is the fallback
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn fallback(&self) -> &str {
        &self.classes[0]
    }

    /// Exact lookup, `None` for labels outside the vocabulary
    pub fn transform(&self, label: &str) -> Option<u32> {
        self.codes.get(label).copied()
    }

    /// Exact reverse lookup, `None` for codes outside the vocabulary
    pub fn inverse_transform(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// Encode with fallback: empty or unseen labels map to code 0.
    pub fn encode(&self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }
        self.transform(value).unwrap_or(0)
    }

    /// Decode with fallback: unknown codes become [`UNKNOWN_LABEL`].
    pub fn decode(&self, code: u32) -> String {
        self.inverse_transform(code)
            .unwrap_or(UNKNOWN_LABEL)
            .to_string()
    }
}

/// Encoder artifact entry: either a bare class list or `{"classes": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EncoderTable {
    Classes(Vec<String>),
    Object { classes: Vec<String> },
}

impl EncoderTable {
    fn into_classes(self) -> Vec<String> {
        match self {
            EncoderTable::Classes(classes) => classes,
            EncoderTable::Object { classes } => classes,
        }
    }
}

/// One encoder per [`CategoricalColumn`], indexed by the enum.
#[derive(Debug, Clone)]
pub struct EncoderSet {
    encoders: [CategoricalEncoder; CategoricalColumn::COUNT],
}

impl EncoderSet {
    /// Build from column name -> ordered classes.
    ///
    /// Every column in [`CategoricalColumn::ALL`] must be present. Extra
    /// tables are ignored.
    pub fn from_tables(mut tables: HashMap<String, Vec<String>>) -> Result<Self> {
        let mut built = Vec::with_capacity(CategoricalColumn::COUNT);
        for column in CategoricalColumn::ALL {
            let classes = tables
                .remove(column.name())
                .ok_or_else(|| ModelError::MissingEncoder(column.name().to_string()))?;
            debug!("Encoder for {} has {} classes", column, classes.len());
            built.push(CategoricalEncoder::from_classes(column, classes)?);
        }

        let encoders: [CategoricalEncoder; CategoricalColumn::COUNT] = built
            .try_into()
            .map_err(|_| ModelError::InvalidModel("encoder table count".to_string()))?;
        Ok(Self { encoders })
    }

    /// Parse the JSON encoder artifact
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, EncoderTable> =
            serde_json::from_str(json).map_err(|source| ModelError::Json {
                what: "encoder tables".to_string(),
                source,
            })?;
        let tables = raw
            .into_iter()
            .map(|(column, table)| (column, table.into_classes()))
            .collect();
        Self::from_tables(tables)
    }

    /// Load the JSON encoder artifact from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let set = Self::from_json_str(&json)?;
        info!("Loaded encoders for {} columns from {:?}", CategoricalColumn::COUNT, path);
        Ok(set)
    }

    pub fn get(&self, column: CategoricalColumn) -> &CategoricalEncoder {
        &self.encoders[column.index()]
    }

    pub fn encode(&self, column: CategoricalColumn, value: &str) -> u32 {
        self.get(column).encode(value)
    }

    pub fn decode(&self, column: CategoricalColumn, code: u32) -> String {
        self.get(column).decode(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_encoder() -> CategoricalEncoder {
        CategoricalEncoder::from_classes(
            CategoricalColumn::Stage,
            vec!["Seed".into(), "Series A".into(), "Series B".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_known_labels_encode_to_position() {
        let enc = stage_encoder();
        assert_eq!(enc.encode("Seed"), 0);
        assert_eq!(enc.encode("Series B"), 2);
    }

    #[test]
    fn test_unseen_and_empty_fall_back_to_zero() {
        let enc = stage_encoder();
        assert_eq!(enc.encode("pre-seed"), 0);
        assert_eq!(enc.encode(""), 0);
        // lookup is exact, no case folding
        assert_eq!(enc.encode("series a"), 0);
        assert_eq!(enc.fallback(), "Seed");
    }

    #[test]
    fn test_codes_stay_inside_vocabulary() {
        let enc = stage_encoder();
        for value in ["Seed", "x", "", "Series A", "Series C", " Seed "] {
            assert!((enc.encode(value) as usize) < enc.classes().len());
        }
    }

    #[test]
    fn test_decode_out_of_range_is_unknown() {
        let enc = stage_encoder();
        assert_eq!(enc.decode(1), "Series A");
        assert_eq!(enc.decode(3), UNKNOWN_LABEL);
        assert_eq!(enc.decode(u32::MAX), UNKNOWN_LABEL);
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        let err = CategoricalEncoder::from_classes(CategoricalColumn::Firm, vec![]).unwrap_err();
        assert!(matches!(err, ModelError::EmptyVocabulary(ref c) if c == "Firm"));
    }

    #[test]
    fn test_encoder_set_from_json_accepts_both_shapes() {
        let json = r#"{
            "Industry": ["Fintech", "Health"],
            "Stage": {"classes": ["Seed", "Series A"]},
            "Investor Industry": ["Fintech Solutions"],
            "Investor Stage": ["Seed"],
            "Firm": ["Acme"],
            "Unused": ["x"]
        }"#;
        let set = EncoderSet::from_json_str(json).unwrap();
        assert_eq!(set.encode(CategoricalColumn::Industry, "Health"), 1);
        assert_eq!(set.encode(CategoricalColumn::Stage, "Series A"), 1);
        assert_eq!(set.decode(CategoricalColumn::InvestorStage, 0), "Seed");
        assert_eq!(set.decode(CategoricalColumn::InvestorStage, 7), UNKNOWN_LABEL);
    }

    #[test]
    fn test_encoder_set_requires_every_column() {
        let json = r#"{"Industry": ["a"], "Stage": ["b"], "Investor Industry": ["c"], "Investor Stage": ["d"]}"#;
        let err = EncoderSet::from_json_str(json).unwrap_err();
        assert!(matches!(err, ModelError::MissingEncoder(ref c) if c == "Firm"));
    }
}
