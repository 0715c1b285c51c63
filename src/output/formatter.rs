use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::scoring::binning::round2;
use crate::scoring::{ScoreBasis, ScoreRecord, ScoringConfig};

const MAX_STARS: u8 = 5;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Score on the published scale, two decimals: 0.8312 -> "8.31"
pub fn format_score(score: f64, display_scale: f64) -> String {
    format!("{:.2}", round2(score * display_scale))
}

/// Filled and empty stars, always five glyphs wide
pub fn format_stars(stars: u8) -> String {
    let filled = stars.min(MAX_STARS) as usize;
    format!(
        "{}{}",
        "★".repeat(filled),
        "☆".repeat(MAX_STARS as usize - filled)
    )
}

/// Records ordered for display: cohort descending, then best score first.
/// Equal scores keep their report order.
pub fn ranked(records: &[ScoreRecord], basis: ScoreBasis) -> Vec<&ScoreRecord> {
    let mut view: Vec<&ScoreRecord> = records.iter().collect();
    view.sort_by(|a, b| {
        b.cohort.cmp(&a.cohort).then(
            b.score(basis)
                .partial_cmp(&a.score(basis))
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    view
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Ranked table, one block per cohort.
///
/// Each block starts with a cohort header; the index restarts at 1 and
/// `limit` caps the rows shown per cohort.
/// Columns: index, stars, score, name
pub fn format_score_table(
    records: &[ScoreRecord],
    basis: ScoreBasis,
    display_scale: f64,
    limit: Option<usize>,
    use_colors: bool,
) -> String {
    if records.is_empty() {
        return "No legislators scored.".to_string();
    }

    let term_width = get_terminal_width();

    // Index: 4 chars + space, stars: 5 + 2 spaces, score: 6 + 2 spaces
    let score_width = 6;
    let separator = "  ";
    let fixed_width = 5 + MAX_STARS as usize + separator.len() * 2 + score_width;

    let mut lines = Vec::new();
    let mut current_cohort = None;
    let mut index = 0;

    for record in ranked(records, basis) {
        if current_cohort != Some(record.cohort) {
            current_cohort = Some(record.cohort);
            index = 0;
            if !lines.is_empty() {
                lines.push(String::new());
            }
            let header = format!("Cohort {}", record.cohort);
            lines.push(if use_colors {
                header.bold().cyan().to_string()
            } else {
                header
            });
        }

        index += 1;
        if limit.is_some_and(|l| index > l) {
            continue;
        }

        let index_str = format!("{:>3}.", index);
        let stars = format_stars(record.stars);
        let score = format!(
            "{:>width$}",
            format_score(record.score(basis), display_scale),
            width = score_width
        );

        let name = match term_width {
            Some(width) if width > fixed_width + 10 => {
                truncate_name(record.display_name(), width - fixed_width)
            }
            // Very narrow terminal, show truncated
            Some(_) => truncate_name(record.display_name(), 20),
            // No terminal (pipe), don't truncate
            None => record.display_name().to_string(),
        };

        if use_colors {
            lines.push(format!(
                "{} {}{}{}{}{}",
                index_str.dimmed(),
                stars.yellow(),
                separator,
                score.bold(),
                separator,
                name
            ));
        } else {
            lines.push(format!(
                "{} {}{}{}{}{}",
                index_str, stars, separator, score, separator, name
            ));
        }
    }

    lines.join("\n")
}

/// Tab-separated values for scripting, in ranked order.
/// Columns: cohort, score, stars, id, name (no headers, no colors)
pub fn format_tsv(records: &[ScoreRecord], basis: ScoreBasis, display_scale: f64) -> String {
    ranked(records, basis)
        .into_iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                r.cohort,
                format_score(r.score(basis), display_scale),
                r.stars,
                r.legislator_id,
                r.name.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indicator definitions grouped under their axes
pub fn format_indicators(config: &ScoringConfig, use_colors: bool) -> String {
    let indicators = config.indicators();
    let mut lines = Vec::new();

    for axis in config.axes() {
        let scale = if axis.log_variant { "linear+log" } else { "linear" };
        let header = format!("{} ({}) [{}]", axis.label(), axis.name, scale);
        lines.push(if use_colors {
            header.bold().to_string()
        } else {
            header
        });
        for def in indicators
            .iter()
            .filter(|d| d.axis.as_deref() == Some(axis.name.as_str()))
        {
            lines.push(format!("  {}", describe(def)));
        }
    }

    let unassigned: Vec<String> = indicators
        .iter()
        .filter(|d| d.axis.is_none())
        .map(|d| format!("  {}", describe(d)))
        .collect();
    if !unassigned.is_empty() {
        let header = "(no axis)".to_string();
        lines.push(if use_colors {
            header.dimmed().to_string()
        } else {
            header
        });
        lines.extend(unassigned);
    }

    lines.join("\n")
}

fn describe(def: &crate::scoring::IndicatorDefinition) -> String {
    let mut flags = Vec::new();
    if def.tenure_adjusted {
        flags.push("per-year");
    }
    if def.log {
        flags.push("log");
    }
    if def.reverse {
        flags.push("reverse");
    }
    let weight = if def.weight() != 1.0 {
        format!(" x{}", def.weight())
    } else {
        String::new()
    };
    if flags.is_empty() {
        format!("{}{}", def.name, weight)
    } else {
        format!("{}{} [{}]", def.name, weight, flags.join(", "))
    }
}
