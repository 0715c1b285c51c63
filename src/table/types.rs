use std::collections::BTreeMap;

use super::error::TableError;

/// One legislator's record for one legislative term.
#[derive(Debug, Clone, PartialEq)]
pub struct LegislatorRow {
    pub legislator_id: String,
    pub name: Option<String>,
    pub cohort: u32,        // Legislature number
    pub months_served: f64, // Tenure within the cohort
    pub values: Vec<f64>,   // One per indicator, same order as IndicatorTable::indicators
}

/// Tenure column name assumed for tables built in memory.
pub const DEFAULT_TENURE_COLUMN: &str = "months_served";

/// Raw counters, one row per (legislator, cohort), one column per indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    pub indicators: Vec<String>,
    pub rows: Vec<LegislatorRow>,
    /// Source column of `months_served`, named in tenure errors
    pub tenure_column: String,
}

impl Default for IndicatorTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl IndicatorTable {
    pub fn new(indicators: Vec<String>) -> Self {
        Self {
            indicators,
            rows: Vec::new(),
            tenure_column: DEFAULT_TENURE_COLUMN.to_string(),
        }
    }

    pub fn with_tenure_column(mut self, column: impl Into<String>) -> Self {
        self.tenure_column = column.into();
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn indicator_index(&self, name: &str) -> Option<usize> {
        self.indicators.iter().position(|n| n == name)
    }

    /// Extract one indicator as a column. Short rows read as 0.
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.values.get(index).copied().unwrap_or(0.0))
            .collect()
    }

    /// Column by indicator name, or None when the table does not carry it.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<f64>> {
        self.indicator_index(name).map(|i| self.column(i))
    }

    pub fn months_served(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.months_served).collect()
    }

    /// Row indices grouped by cohort. Within a group, indices keep table order.
    pub fn cohort_groups(&self) -> BTreeMap<u32, Vec<usize>> {
        let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (i, row) in self.rows.iter().enumerate() {
            groups.entry(row.cohort).or_default().push(i);
        }
        groups
    }

    /// Check the ingestion contract on a table built in memory.
    ///
    /// Rejects negative or non-finite counts, non-positive tenure and rows
    /// whose width exceeds the indicator list. Returns the first violation.
    pub fn validate(&self) -> Result<(), TableError> {
        let expected = self.indicators.len();
        for (i, row) in self.rows.iter().enumerate() {
            let row_no = i + 1;
            if row.values.len() > expected {
                return Err(TableError::RowWidth {
                    row: row_no,
                    expected,
                    found: row.values.len(),
                });
            }
            if !row.months_served.is_finite() || row.months_served <= 0.0 {
                return Err(TableError::InvalidTenure {
                    column: self.tenure_column.clone(),
                    row: row_no,
                    value: row.months_served,
                });
            }
            for (name, &value) in self.indicators.iter().zip(&row.values) {
                if !value.is_finite() {
                    return Err(TableError::NonFinite {
                        column: name.clone(),
                        row: row_no,
                    });
                }
                if value < 0.0 {
                    return Err(TableError::Negative {
                        column: name.clone(),
                        row: row_no,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, cohort: u32, months: f64, values: Vec<f64>) -> LegislatorRow {
        LegislatorRow {
            legislator_id: id.to_string(),
            name: None,
            cohort,
            months_served: months,
            values,
        }
    }

    fn sample_table() -> IndicatorTable {
        let mut table = IndicatorTable::new(vec!["a".to_string(), "b".to_string()]);
        table.rows.push(row("1", 57, 12.0, vec![1.0, 2.0]));
        table.rows.push(row("2", 56, 48.0, vec![3.0]));
        table.rows.push(row("3", 57, 24.0, vec![5.0, 6.0]));
        table
    }

    #[test]
    fn test_column_fills_short_rows_with_zero() {
        let table = sample_table();
        assert_eq!(table.column(1), vec![2.0, 0.0, 6.0]);
        assert_eq!(table.column_by_name("a"), Some(vec![1.0, 3.0, 5.0]));
        assert!(table.column_by_name("missing").is_none());
    }

    #[test]
    fn test_cohort_groups_keep_row_order() {
        let table = sample_table();
        let groups = table.cohort_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&57], vec![0, 2]);
        assert_eq!(groups[&56], vec![1]);
    }

    #[test]
    fn test_validate_accepts_clean_table() {
        assert!(sample_table().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_count() {
        let mut table = sample_table();
        table.rows[2].values[1] = -1.0;
        let err = table.validate().unwrap_err();
        match err {
            TableError::Negative { column, row, .. } => {
                assert_eq!(column, "b");
                assert_eq!(row, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_zero_tenure() {
        let mut table = sample_table().with_tenure_column("meses");
        table.rows[0].months_served = 0.0;
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("'meses'"));

        table.tenure_column = DEFAULT_TENURE_COLUMN.to_string();
        assert!(table.validate().unwrap_err().to_string().contains("'months_served'"));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut table = sample_table();
        table.rows[1].values[0] = f64::NAN;
        assert!(matches!(
            table.validate(),
            Err(TableError::NonFinite { .. })
        ));
    }
}
