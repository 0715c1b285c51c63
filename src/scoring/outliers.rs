//! IQR outlier trimming with Tukey fences.
//!
//! The trimmed set only calibrates binning and star ranges. It never drops
//! rows from the scored output.

/// Inclusive bounds `[Q1 - k*IQR, Q3 + k*IQR]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fences {
    pub lower: f64,
    pub upper: f64,
}

impl Fences {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// First and third quartiles as Tukey hinges, or None for an empty column.
///
/// Q1 is the median of the lower half of the sorted column and Q3 the
/// median of the upper half. For odd lengths the middle element belongs to
/// neither half. A single value is its own Q1 and Q3.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    if n == 1 {
        return Some((sorted[0], sorted[0]));
    }
    let half = n / 2;
    Some((median(&sorted[..half]), median(&sorted[n - half..])))
}

/// Tukey fences for `values` with IQR multiplier `k`.
pub fn fences(values: &[f64], k: f64) -> Option<Fences> {
    let (q1, q3) = quartiles(values)?;
    let iqr = q3 - q1;
    Some(Fences {
        lower: q1 - k * iqr,
        upper: q3 + k * iqr,
    })
}

/// Values inside the fences, in their original order.
pub fn trim(values: &[f64], k: f64) -> Vec<f64> {
    match fences(values, k) {
        Some(f) => values.iter().copied().filter(|v| f.contains(*v)).collect(),
        None => Vec::new(),
    }
}

/// Median of a sorted, non-empty slice.
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
