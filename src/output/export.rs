//! File export of scored tables as CSV or JSON.
//!
//! Scores are written on the published scale (multiplied by the display
//! scale and rounded to two decimals). Months served and stars are left as is.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDate;

use crate::scoring::binning::round2;
use crate::scoring::{ScoreRecord, ScoreReport, ScoringConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess from a file extension; anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// `indicador-<cohort|all>-<YYYY-MM-DD>.<ext>`
pub fn default_output_name(cohort: Option<u32>, date: NaiveDate, format: ExportFormat) -> String {
    let scope = cohort.map_or_else(|| "all".to_string(), |c| c.to_string());
    format!(
        "indicador-{}-{}.{}",
        scope,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Column names in output order for the given configuration.
pub fn csv_header(config: &ScoringConfig) -> Vec<String> {
    let mut header = vec![
        "legislator_id".to_string(),
        "name".to_string(),
        "cohort".to_string(),
        "months_served".to_string(),
    ];
    for def in config.indicators() {
        header.push(format!("{}.class", def.name));
        header.push(def.name.clone());
        if def.log {
            header.push(format!("{}.log", def.name));
        }
    }
    for axis in config.axes() {
        header.push(format!("axis.{}", axis.name));
        if axis.log_variant {
            header.push(format!("axis.{}.log", axis.name));
        }
    }
    header.extend(["score_final", "score_final.log", "stars"].map(String::from));
    header
}

fn csv_row(record: &ScoreRecord, scale: f64) -> Vec<String> {
    let fmt = |v: f64| round2(v * scale).to_string();

    let mut row = vec![
        record.legislator_id.clone(),
        record.name.clone().unwrap_or_default(),
        record.cohort.to_string(),
        record.months_served.to_string(),
    ];
    for ind in &record.indicators {
        row.push(fmt(ind.class_score));
        row.push(fmt(ind.linear));
        if let Some(log) = ind.log {
            row.push(fmt(log));
        }
    }
    for axis in &record.axes {
        row.push(fmt(axis.linear));
        if let Some(log) = axis.log {
            row.push(fmt(log));
        }
    }
    row.push(fmt(record.final_score));
    row.push(fmt(record.final_score_log));
    row.push(record.stars.to_string());
    row
}

/// Write a header row and one row per record.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[ScoreRecord],
    config: &ScoringConfig,
    display_scale: f64,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(csv_header(config))?;
    for record in records {
        wtr.write_record(csv_row(record, display_scale))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Copy of `report` with every score on the published scale.
pub fn scaled_report(report: &ScoreReport, display_scale: f64) -> ScoreReport {
    let scale = |v: f64| round2(v * display_scale);
    let mut scaled = report.clone();
    for record in &mut scaled.records {
        for ind in &mut record.indicators {
            ind.class_score = scale(ind.class_score);
            ind.linear = scale(ind.linear);
            ind.log = ind.log.map(scale);
        }
        for axis in &mut record.axes {
            axis.linear = scale(axis.linear);
            axis.log = axis.log.map(scale);
        }
        record.final_score = scale(record.final_score);
        record.final_score_log = scale(record.final_score_log);
    }
    scaled
}

pub fn write_json<W: Write>(
    writer: W,
    report: &ScoreReport,
    display_scale: f64,
) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, &scaled_report(report, display_scale))
}

/// Export `report` to `path`, replacing any existing file atomically.
pub fn export_report(
    path: &Path,
    report: &ScoreReport,
    config: &ScoringConfig,
    display_scale: f64,
    format: ExportFormat,
) -> Result<()> {
    let mut buffer = Vec::new();
    match format {
        ExportFormat::Csv => write_csv(&mut buffer, &report.records, config, display_scale)
            .context("Failed to encode CSV")?,
        ExportFormat::Json => {
            write_json(&mut buffer, report, display_scale).context("Failed to encode JSON")?
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(&buffer)
        .with_context(|| format!("Failed to write output to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save output to {}", path.display()))?;

    log::debug!(
        "Wrote {} rows to {}",
        report.records.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::{AxisDefinition, IndicatorDefinition, ScoreBasis, StarPolicy};
    use crate::scoring::{AxisScore, IndicatorScore};

    fn small_config() -> ScoringConfig {
        ScoringConfig {
            indicators: Some(vec![
                IndicatorDefinition {
                    name: "cargos".to_string(),
                    tenure_adjusted: true,
                    log: true,
                    reverse: false,
                    axis: Some("mob".to_string()),
                    weight: None,
                },
                IndicatorDefinition {
                    name: "align.voto".to_string(),
                    tenure_adjusted: false,
                    log: false,
                    reverse: false,
                    axis: Some("part".to_string()),
                    weight: None,
                },
            ]),
            axes: Some(vec![
                AxisDefinition {
                    name: "mob".to_string(),
                    label: None,
                    log_variant: true,
                },
                AxisDefinition {
                    name: "part".to_string(),
                    label: None,
                    log_variant: false,
                },
            ]),
            ..ScoringConfig::default()
        }
    }

    fn sample_report() -> ScoreReport {
        ScoreReport {
            records: vec![ScoreRecord {
                legislator_id: "204554".to_string(),
                name: Some("Ana Souza".to_string()),
                cohort: 57,
                months_served: 48.0,
                indicators: vec![
                    IndicatorScore {
                        name: "cargos".to_string(),
                        class_score: 0.67,
                        linear: 0.5,
                        log: Some(0.91234),
                    },
                    IndicatorScore {
                        name: "align.voto".to_string(),
                        class_score: 1.0,
                        linear: 0.25,
                        log: None,
                    },
                ],
                axes: vec![
                    AxisScore {
                        name: "mob".to_string(),
                        linear: 0.5,
                        log: Some(0.91234),
                    },
                    AxisScore {
                        name: "part".to_string(),
                        linear: 0.25,
                        log: None,
                    },
                ],
                final_score: 0.375,
                final_score_log: 0.58117,
                stars: 3,
            }],
            policy: StarPolicy::Rank,
            basis: ScoreBasis::Log,
        }
    }

    #[test]
    fn test_csv_header_order() {
        assert_eq!(
            csv_header(&small_config()),
            vec![
                "legislator_id",
                "name",
                "cohort",
                "months_served",
                "cargos.class",
                "cargos",
                "cargos.log",
                "align.voto.class",
                "align.voto",
                "axis.mob",
                "axis.mob.log",
                "axis.part",
                "score_final",
                "score_final.log",
                "stars",
            ]
        );
    }

    #[test]
    fn test_write_csv_scales_scores() {
        let mut out = Vec::new();
        write_csv(&mut out, &sample_report().records, &small_config(), 10.0).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "204554,Ana Souza,57,48,6.7,5,9.12,10,2.5,5,9.12,2.5,3.75,5.81,3"
        );
        // Row width matches the header
        assert_eq!(
            lines[0].split(',').count(),
            lines[1].split(',').count()
        );
    }

    #[test]
    fn test_json_export_scales_scores() {
        let mut out = Vec::new();
        write_json(&mut out, &sample_report(), 10.0).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let record = &value["records"][0];
        assert_eq!(record["final_score"], 3.75);
        assert_eq!(record["stars"], 3);
        assert_eq!(record["indicators"][0]["log"], 9.12);
        assert!(record["indicators"][1].get("log").is_none());
        assert_eq!(value["policy"], "rank");
    }

    #[test]
    fn test_default_output_name() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 7).unwrap();
        assert_eq!(
            default_output_name(Some(57), date, ExportFormat::Csv),
            "indicador-57-2023-11-07.csv"
        );
        assert_eq!(
            default_output_name(None, date, ExportFormat::Json),
            "indicador-all-2023-11-07.json"
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out")), ExportFormat::Csv);
    }

    #[test]
    fn test_export_report_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("indicador.csv");
        export_report(&path, &sample_report(), &small_config(), 10.0, ExportFormat::Csv).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("legislator_id,name,cohort"));
        assert!(text.contains("Ana Souza"));
    }
}
