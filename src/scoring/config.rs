use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_EPSILON: f64 = 1e-5;
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_RANK_THRESHOLDS: [u32; 4] = [50, 125, 225, 375];
pub const DEFAULT_TOP_TIER_FLOOR: f64 = 7.5;

/// Main scoring configuration.
///
/// Every field is optional; absent fields fall back to the published index
/// defaults through the accessor methods.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   log_epsilon: 0.00001
///   stars:
///     policy: interval
///   indicators:
///     - { name: cargos, tenure_adjusted: true, log: true, axis: mob }
///     - { name: align.voto, log: true, axis: part }
///   axes:
///     - { name: mob, label: Mobilization }
///     - { name: part, label: Party alignment, log_variant: false }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Offset added before `ln` so zero counts stay finite (default: 1e-5)
    #[serde(default)]
    pub log_epsilon: Option<f64>,

    /// Tukey fence multiplier for outlier trimming (default: 1.5)
    #[serde(default)]
    pub iqr_multiplier: Option<f64>,

    #[serde(default)]
    pub stars: Option<StarConfig>,

    #[serde(default)]
    pub indicators: Option<Vec<IndicatorDefinition>>,

    #[serde(default)]
    pub axes: Option<Vec<AxisDefinition>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            log_epsilon: Some(DEFAULT_LOG_EPSILON),
            iqr_multiplier: Some(DEFAULT_IQR_MULTIPLIER),
            stars: Some(StarConfig::default()),
            indicators: Some(default_indicators()),
            axes: Some(default_axes()),
        }
    }
}

impl ScoringConfig {
    pub fn log_epsilon(&self) -> f64 {
        self.log_epsilon.unwrap_or(DEFAULT_LOG_EPSILON)
    }

    pub fn iqr_multiplier(&self) -> f64 {
        self.iqr_multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER)
    }

    pub fn stars(&self) -> StarConfig {
        self.stars.clone().unwrap_or_default()
    }

    pub fn indicators(&self) -> Vec<IndicatorDefinition> {
        self.indicators.clone().unwrap_or_else(default_indicators)
    }

    pub fn axes(&self) -> Vec<AxisDefinition> {
        self.axes.clone().unwrap_or_else(default_axes)
    }

    pub fn indicator_names(&self) -> Vec<String> {
        self.indicators().into_iter().map(|d| d.name).collect()
    }
}

/// Metadata for one raw indicator column.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IndicatorDefinition {
    pub name: String,

    /// Divide by (months served / 12) before any other transform
    #[serde(default)]
    pub tenure_adjusted: bool,

    /// Also produce a `ln(v + epsilon)` variant
    #[serde(default)]
    pub log: bool,

    /// Lower raw values are better (e.g. a misalignment rate)
    #[serde(default)]
    pub reverse: bool,

    /// Axis this indicator contributes to, if any
    #[serde(default)]
    pub axis: Option<String>,

    /// Weight within the axis (default: 1.0)
    #[serde(default)]
    pub weight: Option<f64>,
}

impl IndicatorDefinition {
    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

/// One dimension of performance, built from its member indicators.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AxisDefinition {
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Whether a log-scale axis score is computed (default: true)
    #[serde(default = "default_true")]
    pub log_variant: bool,
}

impl AxisDefinition {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

fn default_true() -> bool {
    true
}

/// How the final score maps to stars.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StarPolicy {
    /// Global rank thresholds with a score floor on the top tier
    #[default]
    Rank,
    /// Five equal-width buckets over the trimmed score range
    Interval,
}

/// Which composite drives the stars.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBasis {
    #[default]
    Log,
    Linear,
}

/// Star assignment settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StarConfig {
    #[serde(default)]
    pub policy: Option<StarPolicy>,

    #[serde(default)]
    pub basis: Option<ScoreBasis>,

    /// Upper rank bound for 5, 4, 3 and 2 stars, ascending
    #[serde(default)]
    pub rank_thresholds: Option<Vec<u32>>,

    /// 5-star legislators scoring below this on the 0-10 scale drop to 4
    #[serde(default)]
    pub top_tier_floor: Option<f64>,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            policy: Some(StarPolicy::Rank),
            basis: Some(ScoreBasis::Log),
            rank_thresholds: Some(DEFAULT_RANK_THRESHOLDS.to_vec()),
            top_tier_floor: Some(DEFAULT_TOP_TIER_FLOOR),
        }
    }
}

impl StarConfig {
    pub fn policy(&self) -> StarPolicy {
        self.policy.unwrap_or_default()
    }

    pub fn basis(&self) -> ScoreBasis {
        self.basis.unwrap_or_default()
    }

    pub fn rank_thresholds(&self) -> Vec<u32> {
        self.rank_thresholds
            .clone()
            .unwrap_or_else(|| DEFAULT_RANK_THRESHOLDS.to_vec())
    }

    pub fn top_tier_floor(&self) -> f64 {
        self.top_tier_floor.unwrap_or(DEFAULT_TOP_TIER_FLOOR)
    }
}

fn counter(name: &str, axis: Option<&str>, weight: Option<f64>) -> IndicatorDefinition {
    IndicatorDefinition {
        name: name.to_string(),
        tenure_adjusted: true,
        log: true,
        reverse: false,
        axis: axis.map(str::to_string),
        weight,
    }
}

/// Indicators of the published chamber index, in publication order.
pub fn default_indicators() -> Vec<IndicatorDefinition> {
    vec![
        counter("proj.relev.prot", Some("legis"), Some(2.0)),
        counter("proj.n.relev.prot", Some("legis"), None),
        counter("proj.relev.n.prot", Some("legis"), None),
        counter("proj.n.relev.n.prot", None, None),
        counter("voto.separado", Some("legis"), None),
        counter("substitutivos", Some("legis"), None),
        counter("relatorias", None, None),
        counter("pres.plenario", Some("legis"), None),
        counter("emendas.plenario", Some("legis"), None),
        counter("emendas.mp", Some("legis"), None),
        counter("emendas.loa", Some("legis"), None),
        counter("proj.especial", Some("mob"), None),
        counter("cargos", Some("mob"), None),
        counter("aud.publ", Some("mob"), None),
        counter("event.tecnico", Some("mob"), None),
        counter("req.fisc", Some("fisc"), None),
        counter("req.conv", Some("fisc"), None),
        counter("req.cpi", Some("fisc"), None),
        IndicatorDefinition {
            name: "align.voto".to_string(),
            tenure_adjusted: false,
            log: true,
            reverse: false,
            axis: Some("part".to_string()),
            weight: None,
        },
        IndicatorDefinition {
            name: "desv.voto".to_string(),
            tenure_adjusted: false,
            log: true,
            reverse: true,
            axis: None,
            weight: None,
        },
    ]
}

pub fn default_axes() -> Vec<AxisDefinition> {
    vec![
        AxisDefinition {
            name: "legis".to_string(),
            label: Some("Legislative production".to_string()),
            log_variant: true,
        },
        AxisDefinition {
            name: "mob".to_string(),
            label: Some("Mobilization".to_string()),
            log_variant: true,
        },
        AxisDefinition {
            name: "fisc".to_string(),
            label: Some("Fiscal oversight".to_string()),
            log_variant: true,
        },
        AxisDefinition {
            name: "part".to_string(),
            label: Some("Party alignment".to_string()),
            log_variant: false,
        },
    ]
}
