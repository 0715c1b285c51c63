pub mod error;
pub mod ingest;
pub mod types;

pub use error::TableError;
pub use ingest::{read_table, read_table_from_path};
pub use types::{IndicatorTable, LegislatorRow};
