use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::TableError;
use super::types::{IndicatorTable, LegislatorRow};
use crate::config::InputConfig;

/// Read a raw counter table from CSV.
///
/// The identifier, cohort and tenure columns are required. Indicator columns
/// absent from the header are filled with 0, as are empty cells. Every count
/// is validated here so the statistical stages never see a negative or
/// non-numeric value.
pub fn read_table<R: Read>(
    reader: R,
    input: &InputConfig,
    indicators: &[String],
) -> Result<IndicatorTable, TableError> {
    let delimiter = parse_delimiter(&input.delimiter)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h == name);
    let require = |name: &str| find(name).ok_or_else(|| TableError::MissingColumn(name.to_string()));

    let id_idx = require(&input.id_column)?;
    let cohort_idx = require(&input.cohort_column)?;
    let tenure_idx = require(&input.tenure_column)?;
    let name_idx = input.name_column.as_deref().and_then(find);

    let indicator_idx: Vec<Option<usize>> = indicators.iter().map(|n| find(n)).collect();
    for (name, idx) in indicators.iter().zip(&indicator_idx) {
        if idx.is_none() {
            log::warn!("Indicator column '{}' not found in input, treating as 0", name);
        }
    }

    let mut table =
        IndicatorTable::new(indicators.to_vec()).with_tenure_column(input.tenure_column.as_str());

    for (i, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row_no = i + 1;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let cohort = parse_cohort(field(cohort_idx), &input.cohort_column, row_no)?;
        let months_served = parse_tenure(field(tenure_idx), &input.tenure_column, row_no)?;
        let name = name_idx
            .map(|idx| field(idx).to_string())
            .filter(|n| !n.is_empty());

        let values = indicators
            .iter()
            .zip(&indicator_idx)
            .map(|(column, idx)| match idx {
                Some(idx) => parse_count(field(*idx), column, row_no),
                None => Ok(0.0),
            })
            .collect::<Result<Vec<_>, _>>()?;

        table.rows.push(LegislatorRow {
            legislator_id: field(id_idx).to_string(),
            name,
            cohort,
            months_served,
            values,
        });
    }

    log::debug!(
        "Read {} rows across {} cohorts",
        table.len(),
        table.cohort_groups().len()
    );

    Ok(table)
}

/// Read a raw counter table from a CSV file on disk.
pub fn read_table_from_path(
    path: &Path,
    input: &InputConfig,
    indicators: &[String],
) -> Result<IndicatorTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input table at {}", path.display()))?;
    read_table(file, input, indicators)
        .with_context(|| format!("Invalid input table {}", path.display()))
}

fn parse_delimiter(s: &str) -> Result<u8, TableError> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(TableError::Delimiter(s.to_string())),
    }
}

/// Parse a non-negative count. Empty cells are a missing join and read as 0.
fn parse_count(raw: &str, column: &str, row: usize) -> Result<f64, TableError> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = raw.parse().map_err(|_| TableError::NonNumeric {
        column: column.to_string(),
        row,
        raw: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(TableError::NonFinite {
            column: column.to_string(),
            row,
        });
    }
    if value < 0.0 {
        return Err(TableError::Negative {
            column: column.to_string(),
            row,
            value,
        });
    }
    Ok(value)
}

fn parse_cohort(raw: &str, column: &str, row: usize) -> Result<u32, TableError> {
    raw.parse().map_err(|_| TableError::NonNumeric {
        column: column.to_string(),
        row,
        raw: raw.to_string(),
    })
}

fn parse_tenure(raw: &str, column: &str, row: usize) -> Result<f64, TableError> {
    let value: f64 = raw.parse().map_err(|_| TableError::NonNumeric {
        column: column.to_string(),
        row,
        raw: raw.to_string(),
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(TableError::InvalidTenure {
            column: column.to_string(),
            row,
            value,
        });
    }
    Ok(value)
}
