use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use stats_importer::config::ImporterConfig;
use stats_importer::dc_client::DataCommonsClient;
use stats_importer::importer::StatsImporter;
use stats_importer::logging;

#[derive(Parser)]
#[command(name = "stats_importer")]
#[command(about = "CSV importer for statistical observations with entity resolution")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the import pipeline over a CSV file or a directory of CSVs
    Import {
        /// Input CSV file or directory of CSV files
        #[arg(long)]
        input: PathBuf,
        /// Output directory (created if absent)
        #[arg(long)]
        output: PathBuf,
        /// Entity type passed to the resolve API, e.g. Country or City
        #[arg(long)]
        entity_type: String,
        /// Input columns to drop before processing (comma-separated)
        #[arg(long)]
        ignore_columns: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            input,
            output,
            entity_type,
            ignore_columns,
        } => {
            let ignore_columns = ignore_columns
                .map(|list| list.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default();

            println!("🔄 Importing observations from {}...", input.display());
            info!("Starting import");

            let resolver = DataCommonsClient::from_env();
            let importer = StatsImporter::new(
                &input,
                &output,
                &entity_type,
                ignore_columns,
                ImporterConfig::default(),
                &resolver,
            );

            match importer.run() {
                Ok(report) => {
                    info!("Import finished");
                    println!("\n📊 Import results:");
                    println!("   Rows read: {}", report.rows_read);
                    println!("   Rows written: {}", report.rows_written);
                    println!("   Resolved entities: {}", report.resolved_entities);
                    println!("   Pre-resolved entities: {}", report.pre_resolved_entities);
                    println!("   Unresolved entities: {}", report.unresolved_entities);
                    println!("   Observations file: {}", report.observations_file);
                    println!("   Debug resolve file: {}", report.debug_resolve_file);
                }
                Err(e) => {
                    error!("Import failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
