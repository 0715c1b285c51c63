use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use legis_score::output::ExportFormat;
use legis_score::scoring::StarPolicy;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_OUTPUT: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Ranked table per cohort
    Table,
    /// Tab-separated ranking for scripts
    Tsv,
    /// Full score table as CSV
    Csv,
    /// Full score table as JSON
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Policy {
    Rank,
    Interval,
}

impl From<Policy> for StarPolicy {
    fn from(p: Policy) -> Self {
        match p {
            Policy::Rank => StarPolicy::Rank,
            Policy::Interval => StarPolicy::Interval,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a raw counter table
    Score {
        /// CSV with one row per legislator and legislative term
        input: PathBuf,

        /// Write the full score table here (format from extension unless --format is csv/json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,

        /// Only report this cohort (legislature number)
        #[arg(long)]
        cohort: Option<u32>,

        /// Override the configured star policy
        #[arg(long, value_enum)]
        policy: Option<Policy>,

        /// Rows per cohort in the terminal table
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show indicator definitions grouped by axis
    Indicators,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "legis-score")]
#[command(about = "Legislator performance scoring per legislative term", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/legis-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if let Commands::Init { force } = cli.command {
        let path = match cli.config.clone().map_or_else(legis_score::config::get_config_path, Ok) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = legis_score::config::write_default_config(&path, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match legis_score::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let mut scoring = config.scoring.clone().unwrap_or_default();
    if let Commands::Score {
        policy: Some(policy),
        ..
    } = cli.command
    {
        let mut stars = scoring.stars();
        stars.policy = Some(policy.into());
        scoring.stars = Some(stars);
    }

    // Validate scoring config at startup
    if let Err(errors) = legis_score::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match cli.command {
        Commands::Indicators => {
            let use_colors = legis_score::output::should_use_colors();
            println!(
                "{}",
                legis_score::output::format_indicators(&scoring, use_colors)
            );
        }
        Commands::Score {
            input,
            output,
            format,
            cohort,
            limit,
            ..
        } => {
            let start_time = Instant::now();
            let input_config = config.input.clone().unwrap_or_default();
            let output_config = config.output.clone().unwrap_or_default();

            let table = match legis_score::table::read_table_from_path(
                &input,
                &input_config,
                &scoring.indicator_names(),
            ) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            if cli.verbose {
                eprintln!(
                    "Read {} rows, {} indicator columns from {}",
                    table.len(),
                    table.indicators.len(),
                    input.display()
                );
            }

            let mut report = match legis_score::scoring::score_table(&table, &scoring) {
                Ok(r) => r,
                Err(e) if e.is_config() => {
                    eprintln!("Config error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
                Err(e) => {
                    eprintln!("Input error: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let cohort = cohort.or(output_config.cohort);
            if let Some(c) = cohort {
                report.retain_cohort(c);
                if report.records.is_empty() {
                    eprintln!("No rows for cohort {} in {}", c, input.display());
                }
            }

            let scale = output_config.display_scale;
            let export = match (format, output) {
                (Format::Csv, path) => Some((ExportFormat::Csv, path)),
                (Format::Json, path) => Some((ExportFormat::Json, path)),
                (_, Some(path)) => Some((ExportFormat::from_path(&path), Some(path))),
                (_, None) => None,
            };

            match export {
                Some((export_format, path)) => {
                    let path = path.unwrap_or_else(|| {
                        PathBuf::from(legis_score::output::default_output_name(
                            cohort,
                            chrono::Local::now().date_naive(),
                            export_format,
                        ))
                    });
                    if let Err(e) = legis_score::output::export_report(
                        &path,
                        &report,
                        &scoring,
                        scale,
                        export_format,
                    ) {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_OUTPUT);
                    }
                    eprintln!("Wrote {} rows to {}", report.records.len(), path.display());
                }
                None if format == Format::Tsv => {
                    println!(
                        "{}",
                        legis_score::output::format_tsv(&report.records, report.basis, scale)
                    );
                }
                None => {
                    let use_colors = legis_score::output::should_use_colors();
                    println!(
                        "{}",
                        legis_score::output::format_score_table(
                            &report.records,
                            report.basis,
                            scale,
                            limit,
                            use_colors,
                        )
                    );
                }
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Total: {} rows in {} cohorts in {:?}",
                    report.records.len(),
                    report.cohorts().len(),
                    start_time.elapsed()
                );
            }
        }
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
