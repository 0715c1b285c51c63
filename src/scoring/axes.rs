use super::config::{AxisDefinition, IndicatorDefinition};
use super::normalize::NormalizedColumn;

/// Per-row scores for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisScores {
    pub name: String,
    pub linear: Vec<f64>,
    /// None for axes scored on the linear scale only
    pub log: Option<Vec<f64>>,
}

impl AxisScores {
    /// Score that enters the log composite: the log variant when the axis has one.
    fn log_or_linear(&self, row: usize) -> f64 {
        match self.log {
            Some(ref log) => log[row],
            None => self.linear[row],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub axes: Vec<AxisScores>,
    pub final_linear: Vec<f64>,
    pub final_log: Vec<f64>,
}

/// Weighted axis scores and the unweighted composite across axes.
///
/// `indicators` and `columns` are parallel. Indicators without an axis are
/// ignored; a member column shorter than `rows` contributes 0 for the
/// missing rows.
pub fn aggregate(
    indicators: &[IndicatorDefinition],
    columns: &[NormalizedColumn],
    axes: &[AxisDefinition],
    rows: usize,
) -> Aggregate {
    let axis_scores: Vec<AxisScores> = axes
        .iter()
        .map(|axis| {
            let members: Vec<(&IndicatorDefinition, &NormalizedColumn)> = indicators
                .iter()
                .zip(columns)
                .filter(|(def, _)| def.axis.as_deref() == Some(axis.name.as_str()))
                .collect();

            let linear = (0..rows)
                .map(|r| {
                    weighted_mean(members.iter().map(|(def, col)| {
                        (def.weight(), col.linear.get(r).copied().unwrap_or(0.0))
                    }))
                })
                .collect();

            let log = axis.log_variant.then(|| {
                (0..rows)
                    .map(|r| {
                        weighted_mean(members.iter().map(|(def, col)| {
                            let v = col.log.as_ref().and_then(|l| l.get(r)).copied();
                            (def.weight(), v.unwrap_or(0.0))
                        }))
                    })
                    .collect()
            });

            AxisScores {
                name: axis.name.clone(),
                linear,
                log,
            }
        })
        .collect();

    let final_linear = (0..rows)
        .map(|r| mean(axis_scores.iter().map(|a| a.linear[r])))
        .collect();
    let final_log = (0..rows)
        .map(|r| mean(axis_scores.iter().map(|a| a.log_or_linear(r))))
        .collect();

    Aggregate {
        axes: axis_scores,
        final_linear,
        final_log,
    }
}

/// Σ(w·x) / Σw over `(weight, value)` pairs; 0 when the weights sum to 0.
pub fn weighted_mean<I>(parts: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (num, den) = parts
        .into_iter()
        .fold((0.0, 0.0), |(n, d), (w, x)| (n + w * x, d + w));
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

fn mean<I: Iterator<Item = f64>>(values: I) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}
