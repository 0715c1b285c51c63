//! Rank-class scoring with Sturges' rule.
//!
//! Bin edges are calibrated on the outlier-trimmed subset of a column and
//! then every value of the full column, outliers and zeros included, is
//! placed in a bin. Outliers land in the open-ended top bin.

use super::outliers;

/// Slope in Sturges' rule, `1 + 3.332 * log10(n)` (3.322 rounded as published).
pub const STURGES_FACTOR: f64 = 3.332;

/// Score a zero gets under `reverse` when it would otherwise be 0.
pub const REVERSE_ZERO_SCORE: f64 = 0.1;

/// Sturges class count for `positive_count` non-zero observations.
pub fn class_count(positive_count: usize) -> usize {
    if positive_count == 0 {
        return 0;
    }
    (1.0 + STURGES_FACTOR * (positive_count as f64).log10()).ceil() as usize
}

/// Trim `column` with IQR multiplier `k` and score it.
pub fn class_scores(column: &[f64], k: f64, reverse: bool) -> Vec<f64> {
    let trimmed = outliers::trim(column, k);
    bin_column(column, &trimmed, reverse)
}

/// Score every value of `column` in [0, 1] against bins built from `trimmed`.
///
/// With no positive values in `trimmed` the result is binary: 0 for values
/// present in the trimmed set, 1 for outliers.
pub fn bin_column(column: &[f64], trimmed: &[f64], reverse: bool) -> Vec<f64> {
    let positive_count = trimmed.iter().filter(|v| **v > 0.0).count();
    let classes = class_count(positive_count);

    if classes == 0 {
        return column
            .iter()
            .map(|v| if trimmed.contains(v) { 0.0 } else { 1.0 })
            .collect();
    }

    let edges = bin_edges(trimmed, classes, reverse);

    column
        .iter()
        .map(|&v| {
            let position = bin_index(&edges, v) as f64 / classes as f64;
            let score = if v == 0.0 {
                if !reverse {
                    0.0
                } else if position == 0.0 {
                    REVERSE_ZERO_SCORE
                } else {
                    position
                }
            } else {
                position
            };
            round2(score)
        })
        .collect()
}

/// `classes + 1` boundaries: -inf, then `classes` evenly spaced points from
/// the low to the high end of the trimmed set with the last one opened to +inf.
///
/// Zeros are ignored for the low end unless `reverse`, so a column dominated
/// by inactivity still spreads its active members across the bins.
fn bin_edges(trimmed: &[f64], classes: usize, reverse: bool) -> Vec<f64> {
    let hi = trimmed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lo = trimmed
        .iter()
        .copied()
        .filter(|v| reverse || *v != 0.0)
        .fold(f64::INFINITY, f64::min);

    let mut edges = Vec::with_capacity(classes + 1);
    edges.push(f64::NEG_INFINITY);
    edges.extend(linspace(lo, hi, classes));
    if let Some(last) = edges.last_mut() {
        *last = f64::INFINITY;
    }
    edges
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Right-inclusive bin: the `i` with `edges[i-1] < v <= edges[i]`.
fn bin_index(edges: &[f64], v: f64) -> usize {
    edges.iter().filter(|e| **e < v).count()
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
