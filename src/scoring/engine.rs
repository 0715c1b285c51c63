use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;

use super::axes;
use super::binning;
use super::config::{ScoreBasis, ScoringConfig, StarPolicy};
use super::error::ScoreError;
use super::normalize::{self, NormalizedColumn};
use super::outliers;
use super::stars;
use super::validation::validate_scoring;
use crate::table::IndicatorTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorScore {
    pub name: String,
    pub class_score: f64, // Rank-class position in [0, 1]
    pub linear: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisScore {
    pub name: String,
    pub linear: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<f64>,
}

/// Everything computed for one (legislator, cohort) row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub legislator_id: String,
    pub name: Option<String>,
    pub cohort: u32,
    pub months_served: f64,
    pub indicators: Vec<IndicatorScore>,
    pub axes: Vec<AxisScore>,
    pub final_score: f64,
    pub final_score_log: f64,
    pub stars: u8,
}

impl ScoreRecord {
    /// The composite that drove the star rating.
    pub fn score(&self, basis: ScoreBasis) -> f64 {
        match basis {
            ScoreBasis::Log => self.final_score_log,
            ScoreBasis::Linear => self.final_score,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.legislator_id)
    }
}

/// Scored rows, sorted by cohort then months served, both descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub records: Vec<ScoreRecord>,
    pub policy: StarPolicy,
    pub basis: ScoreBasis,
}

impl ScoreReport {
    /// Keep only rows of one cohort. Every stage is per cohort, so
    /// filtering after scoring matches scoring the cohort alone.
    pub fn retain_cohort(&mut self, cohort: u32) {
        self.records.retain(|r| r.cohort == cohort);
    }

    pub fn cohorts(&self) -> Vec<u32> {
        let mut cohorts: Vec<u32> = self.records.iter().map(|r| r.cohort).collect();
        cohorts.dedup();
        cohorts
    }
}

/// Run the full pipeline: class binning, normalization, axes and stars.
///
/// Indicators configured but absent from the table score as all-zero
/// columns. Returns an error if `config` fails [`validate_scoring`] or the
/// table breaks the ingestion contract (negative or non-finite counts,
/// non-positive tenure).
pub fn score_table(
    table: &IndicatorTable,
    config: &ScoringConfig,
) -> Result<ScoreReport, ScoreError> {
    validate_scoring(config).map_err(ScoreError::Config)?;
    table.validate()?;

    let n = table.len();
    let groups = table.cohort_groups();
    let months = table.months_served();
    let epsilon = config.log_epsilon();
    let k = config.iqr_multiplier();
    let definitions = config.indicators();
    let axis_definitions = config.axes();
    let star_config = config.stars();

    debug!(
        "scoring {} rows across {} cohorts, {} indicators",
        n,
        groups.len(),
        definitions.len()
    );

    let mut class_columns = Vec::with_capacity(definitions.len());
    let mut normalized: Vec<NormalizedColumn> = Vec::with_capacity(definitions.len());
    for def in &definitions {
        let raw = table.column_by_name(&def.name).unwrap_or_else(|| {
            warn!("indicator '{}' not in table, scoring it as 0", def.name);
            vec![0.0; n]
        });

        class_columns.push(class_scores_by_cohort(&raw, &groups, k, def.reverse, &def.name));
        normalized.push(normalize::normalize_indicator(
            &raw, &months, def, epsilon, &groups,
        ));
    }
    debug!("binned and normalized {} indicators", definitions.len());

    let aggregate = axes::aggregate(&definitions, &normalized, &axis_definitions, n);
    debug!("aggregated {} axes", aggregate.axes.len());

    let basis = star_config.basis();
    let star_input = match basis {
        ScoreBasis::Log => &aggregate.final_log,
        ScoreBasis::Linear => &aggregate.final_linear,
    };
    let mut star_column = vec![0u8; n];
    for (cohort, rows) in &groups {
        let slice: Vec<f64> = rows.iter().map(|&i| star_input[i]).collect();
        let assigned = stars::classify(&slice, &star_config, k);
        for (&i, s) in rows.iter().zip(assigned) {
            star_column[i] = s;
        }
        debug!("cohort {}: assigned stars to {} rows", cohort, rows.len());
    }

    let mut records: Vec<ScoreRecord> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| ScoreRecord {
            legislator_id: row.legislator_id.clone(),
            name: row.name.clone(),
            cohort: row.cohort,
            months_served: row.months_served,
            indicators: definitions
                .iter()
                .zip(&class_columns)
                .zip(&normalized)
                .map(|((def, class), col)| IndicatorScore {
                    name: def.name.clone(),
                    class_score: class[i],
                    linear: col.linear[i],
                    log: col.log.as_ref().map(|l| l[i]),
                })
                .collect(),
            axes: aggregate
                .axes
                .iter()
                .map(|a| AxisScore {
                    name: a.name.clone(),
                    linear: a.linear[i],
                    log: a.log.as_ref().map(|l| l[i]),
                })
                .collect(),
            final_score: aggregate.final_linear[i],
            final_score_log: aggregate.final_log[i],
            stars: star_column[i],
        })
        .collect();

    // Stable: ties keep table order
    records.sort_by(|a, b| {
        b.cohort.cmp(&a.cohort).then(
            b.months_served
                .partial_cmp(&a.months_served)
                .unwrap_or(Ordering::Equal),
        )
    });

    Ok(ScoreReport {
        records,
        policy: star_config.policy(),
        basis,
    })
}

/// Class scores with bins calibrated inside each cohort.
fn class_scores_by_cohort(
    raw: &[f64],
    groups: &BTreeMap<u32, Vec<usize>>,
    k: f64,
    reverse: bool,
    name: &str,
) -> Vec<f64> {
    let mut out = vec![0.0; raw.len()];
    for (cohort, rows) in groups {
        let slice: Vec<f64> = rows.iter().map(|&i| raw[i]).collect();
        let trimmed = outliers::trim(&slice, k);
        if trimmed.iter().all(|v| *v == 0.0) && slice.iter().any(|v| *v > 0.0) {
            warn!(
                "indicator '{}' in cohort {} has no activity outside outliers, using binary classes",
                name, cohort
            );
        }
        for (&i, s) in rows.iter().zip(binning::bin_column(&slice, &trimmed, reverse)) {
            out[i] = s;
        }
    }
    out
}
