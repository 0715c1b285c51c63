pub mod axes;
pub mod binning;
pub mod config;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod outliers;
pub mod stars;
pub mod validation;

pub use config::*;
pub use engine::{score_table, AxisScore, IndicatorScore, ScoreRecord, ScoreReport};
pub use error::ScoreError;
pub use validation::validate_scoring;
