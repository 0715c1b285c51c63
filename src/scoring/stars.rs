use super::binning::round2;
use super::config::{StarConfig, StarPolicy};
use super::outliers;

/// The top-tier floor is expressed on this scale.
pub const TEN_POINT_SCALE: f64 = 10.0;

/// Assign stars to one population of final scores in [0, 1].
///
/// Scores are compared as published, on the 0-10 scale rounded to two
/// decimals, so legislators who display the same score get the same rank.
pub fn classify(scores: &[f64], config: &StarConfig, iqr_multiplier: f64) -> Vec<u8> {
    let display: Vec<f64> = scores.iter().map(|s| round2(s * TEN_POINT_SCALE)).collect();
    match config.policy() {
        StarPolicy::Rank => rank_stars(&display, &config.rank_thresholds(), config.top_tier_floor()),
        StarPolicy::Interval => interval_stars(&display, iqr_multiplier),
    }
}

/// 1-based competition ranks, highest score first. Ties share the lower rank
/// number and the next distinct score skips ahead ("1224" ranking).
pub fn competition_ranks(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0; scores.len()];
    for (pos, &i) in order.iter().enumerate() {
        ranks[i] = match pos {
            0 => 1,
            _ if scores[i] == scores[order[pos - 1]] => ranks[order[pos - 1]],
            _ => pos + 1,
        };
    }
    ranks
}

/// Stars by rank tier, then demote 5-star scores below `floor` to 4.
///
/// `thresholds` are the inclusive rank bounds for 5, 4, 3 and 2 stars.
pub fn rank_stars(scores: &[f64], thresholds: &[u32], floor: f64) -> Vec<u8> {
    let top = thresholds.len() as u8 + 1;
    competition_ranks(scores)
        .into_iter()
        .zip(scores)
        .map(|(rank, &score)| {
            let stars = thresholds
                .iter()
                .position(|&t| rank <= t as usize)
                .map_or(1, |tier| top - tier as u8);
            if stars == top && score < floor {
                top - 1
            } else {
                stars
            }
        })
        .collect()
}

/// Five equal-width buckets from 0 to the largest non-outlier score.
///
/// When that maximum is 0 there is no spread to rate and every row gets 0.
pub fn interval_stars(scores: &[f64], iqr_multiplier: f64) -> Vec<u8> {
    let trimmed = outliers::trim(scores, iqr_multiplier);
    let max = trimmed.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return vec![0; scores.len()];
    }

    let interval = max / 5.0;
    scores
        .iter()
        .map(|&s| 1 + (1..5).filter(|&k| s > k as f64 * interval).count() as u8)
        .collect()
}
