#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line for the screening map toolchain.
//!
//! Lists collection periods and runs the period analysis without the web
//! server: prints the site summary table, the period average, and the
//! Moran's I result, and can export the site features as `GeoJSON`.

mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use screening_map_analytics::pipeline;
use screening_map_map::MapDataBuilder;
use screening_map_map_models::MapConfig;
use screening_map_source::{DEFAULT_DATA_DIR, DEFAULT_PERIOD_COUNT, PeriodSource, SourceConfig};

#[derive(Parser)]
#[command(name = "screening_map_cli", about = "Screening period analysis tool")]
struct Cli {
    /// Directory containing `Period<N>.csv` files
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Number of collection periods
    #[arg(long, global = true, default_value_t = DEFAULT_PERIOD_COUNT)]
    period_count: u32,

    /// Map configuration TOML (defaults to the built-in view)
    #[arg(long, global = true)]
    map_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List periods and whether their data has been collected
    Periods,
    /// Analyze one period
    Analyze {
        /// Period name, e.g. `Period1`
        period: String,

        /// Write the site features to this `GeoJSON` file
        #[arg(long)]
        geojson: Option<PathBuf>,

        /// Print the full analysis as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let source = PeriodSource::new(SourceConfig {
        data_dir: cli.data_dir,
        period_count: cli.period_count,
    });

    match cli.command {
        Commands::Periods => {
            for availability in source.available_periods() {
                let status = if availability.available {
                    "available"
                } else {
                    "not yet collected"
                };
                println!("{:<10} {status}", availability.period.to_string());
            }
        }
        Commands::Analyze {
            period,
            geojson,
            json,
        } => {
            let map_config = MapConfig::load(cli.map_config.as_deref())?;
            let builder = MapDataBuilder::new(&map_config)?;

            let period = source.resolve(&period)?;
            let records = source.load(period)?;
            let analysis = pipeline::analyze_period(records, &builder)?;

            if let Some(path) = geojson {
                std::fs::write(&path, serde_json::to_string_pretty(&analysis.features)?)?;
                log::info!("Wrote site features to {}", path.display());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print!("{}", report::render(&period.to_string(), &analysis));
            }
        }
    }

    Ok(())
}
