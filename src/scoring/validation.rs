use std::collections::HashSet;

use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(eps) = config.log_epsilon {
        if !(eps.is_finite() && eps > 0.0) {
            errors.push("scoring.log_epsilon: must be a positive number".to_string());
        }
    }

    if let Some(k) = config.iqr_multiplier {
        if !(k.is_finite() && k > 0.0) {
            errors.push("scoring.iqr_multiplier: must be a positive number".to_string());
        }
    }

    if let Some(ref stars) = config.stars {
        if let Some(ref thresholds) = stars.rank_thresholds {
            if thresholds.len() != 4 {
                errors.push(format!(
                    "scoring.stars.rank_thresholds: expected 4 bounds (5, 4, 3 and 2 stars), got {}",
                    thresholds.len()
                ));
            }
            if thresholds.first() == Some(&0) {
                errors.push("scoring.stars.rank_thresholds[0]: must be at least 1".to_string());
            }
            for (i, pair) in thresholds.windows(2).enumerate() {
                if pair[1] <= pair[0] {
                    errors.push(format!(
                        "scoring.stars.rank_thresholds[{}]: {} must be greater than {}",
                        i + 1,
                        pair[1],
                        pair[0]
                    ));
                }
            }
        }
        if let Some(floor) = stars.top_tier_floor {
            if !floor.is_finite() {
                errors.push("scoring.stars.top_tier_floor: must be a finite number".to_string());
            }
        }
    }

    let axes = config.axes();
    if axes.is_empty() {
        errors.push("scoring.axes: at least one axis is required".to_string());
    }
    let mut axis_names = HashSet::new();
    for (i, axis) in axes.iter().enumerate() {
        if axis.name.trim().is_empty() {
            errors.push(format!("scoring.axes[{}].name: must not be empty", i));
        } else if !axis_names.insert(axis.name.as_str()) {
            errors.push(format!("scoring.axes[{}].name: duplicate axis '{}'", i, axis.name));
        }
    }

    let indicators = config.indicators();
    if indicators.is_empty() {
        errors.push("scoring.indicators: at least one indicator is required".to_string());
    }
    let mut indicator_names = HashSet::new();
    for (i, def) in indicators.iter().enumerate() {
        if def.name.trim().is_empty() {
            errors.push(format!("scoring.indicators[{}].name: must not be empty", i));
        } else if !indicator_names.insert(def.name.as_str()) {
            errors.push(format!(
                "scoring.indicators[{}].name: duplicate indicator '{}'",
                i, def.name
            ));
        }

        if let Some(w) = def.weight {
            if !(w.is_finite() && w >= 0.0) {
                errors.push(format!(
                    "scoring.indicators[{}].weight: must be a non-negative number",
                    i
                ));
            }
        }

        match def.axis {
            Some(ref axis_name) => match axes.iter().find(|a| &a.name == axis_name) {
                None => errors.push(format!(
                    "scoring.indicators[{}].axis: unknown axis '{}'",
                    i, axis_name
                )),
                Some(axis) if axis.log_variant && !def.log => errors.push(format!(
                    "scoring.indicators[{}].log: '{}' feeds log-scale axis '{}' and must be log-transformed",
                    i, def.name, axis.name
                )),
                Some(_) => {}
            },
            None => {
                if def.weight.is_some() {
                    errors.push(format!(
                        "scoring.indicators[{}].weight: '{}' has a weight but no axis",
                        i, def.name
                    ));
                }
            }
        }
    }

    for (i, axis) in axes.iter().enumerate() {
        let total: f64 = indicators
            .iter()
            .filter(|d| d.axis.as_deref() == Some(axis.name.as_str()))
            .map(|d| d.weight())
            .sum();
        if total <= 0.0 {
            errors.push(format!(
                "scoring.axes[{}]: axis '{}' has no weighted indicators",
                i, axis.name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
