pub mod export;
pub mod formatter;

pub use export::{default_output_name, export_report, ExportFormat};
pub use formatter::{
    format_indicators, format_score, format_score_table, format_stars, format_tsv, ranked,
    should_use_colors,
};
