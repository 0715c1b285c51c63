use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub input: Option<InputConfig>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub output: Option<OutputConfig>,
}

impl Config {
    /// Configuration with every section filled in, as written by `init`.
    pub fn full_default() -> Self {
        Self {
            input: Some(InputConfig::default()),
            scoring: Some(ScoringConfig::default()),
            output: Some(OutputConfig::default()),
        }
    }
}

/// Column layout of the raw counter table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub id_column: String,
    pub cohort_column: String,
    pub tenure_column: String,
    /// Optional display name column, carried through to the output
    pub name_column: Option<String>,
    pub delimiter: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            id_column: "legislator_id".to_string(),
            cohort_column: "cohort".to_string(),
            tenure_column: "months_served".to_string(),
            name_column: Some("name".to_string()),
            delimiter: ",".to_string(),
        }
    }
}

/// Presentation of the scored table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Multiplier applied to every score column before rounding (10 gives a 0-10 scale)
    pub display_scale: f64,
    /// Only emit this cohort (legislature number)
    pub cohort: Option<u32>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            display_scale: 10.0,
            cohort: None,
        }
    }
}
