use thiserror::Error;

use crate::table::TableError;

/// Why a table could not be scored.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Every problem found in the scoring configuration, with dotted paths
    #[error("invalid scoring config: {}", .0.join("; "))]
    Config(Vec<String>),

    #[error(transparent)]
    Table(#[from] TableError),
}

impl ScoreError {
    pub fn is_config(&self) -> bool {
        matches!(self, ScoreError::Config(_))
    }
}
