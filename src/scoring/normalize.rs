use std::collections::BTreeMap;

use super::config::IndicatorDefinition;

/// Per-cohort min-max scores for one indicator, aligned with table rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumn {
    pub linear: Vec<f64>,
    /// Present when the indicator has a log variant
    pub log: Option<Vec<f64>>,
}

/// Annualize counts: `v / (months / 12)`.
pub fn tenure_adjust(values: &[f64], months_served: &[f64]) -> Vec<f64> {
    values
        .iter()
        .zip(months_served)
        .map(|(v, m)| v / (m / 12.0))
        .collect()
}

/// `ln(v + epsilon)`.
pub fn log_transform(values: &[f64], epsilon: f64) -> Vec<f64> {
    values.iter().map(|v| (v + epsilon).ln()).collect()
}

/// Rescale to [0, 1]. A constant column maps to all zeros.
pub fn min_max(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|v| {
            let scaled = (v - min) / range;
            if scaled.is_finite() {
                scaled
            } else {
                0.0
            }
        })
        .collect()
}

/// Min-max within each cohort group; bounds never cross cohorts.
pub fn min_max_by_cohort(values: &[f64], groups: &BTreeMap<u32, Vec<usize>>) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    for rows in groups.values() {
        let slice: Vec<f64> = rows.iter().map(|&i| values[i]).collect();
        for (&i, scaled) in rows.iter().zip(min_max(&slice)) {
            out[i] = scaled;
        }
    }
    out
}

/// Tenure adjustment, optional log transform, then per-cohort min-max.
pub fn normalize_indicator(
    raw: &[f64],
    months_served: &[f64],
    def: &IndicatorDefinition,
    epsilon: f64,
    groups: &BTreeMap<u32, Vec<usize>>,
) -> NormalizedColumn {
    let adjusted = if def.tenure_adjusted {
        tenure_adjust(raw, months_served)
    } else {
        raw.to_vec()
    };

    let log = def
        .log
        .then(|| min_max_by_cohort(&log_transform(&adjusted, epsilon), groups));

    NormalizedColumn {
        linear: min_max_by_cohort(&adjusted, groups),
        log,
    }
}
