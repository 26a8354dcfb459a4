#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the Vitibrasil toolchain.
//!
//! Runs the API server, or fetches and extracts a single report for
//! inspection without going through HTTP.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use vitibrasil_report_models::{ReportCategory, ReportRequest, SubCategory};
use vitibrasil_server::ServerConfig;
use vitibrasil_source::VitibrasilClient;

#[derive(Parser)]
#[command(name = "vitibrasil", about = "Vitibrasil viticulture statistics toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server.
    ///
    /// Reads `BIND_ADDR`, `PORT`, `VITIBRASIL_BASE_URL`,
    /// `VITIBRASIL_TIMEOUT_SECS`, `FALLBACK_PATH` and `FALLBACK_POLICY`;
    /// flags override the environment.
    Serve {
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,
        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
        /// Fallback snapshot file
        #[arg(long)]
        fallback: Option<PathBuf>,
    },
    /// Fetch one report from the portal and print it as JSON
    Fetch {
        /// Report category (`producao`, `processamento`, `comercializacao`,
        /// `importacao`, `exportacao`)
        category: ReportCategory,
        /// Report year
        #[arg(long)]
        year: String,
        /// Sub-tab slug (e.g. `viniferas`), required for processing,
        /// import and export
        #[arg(long)]
        sub: Option<String>,
        /// Portal entry point (overrides `VITIBRASIL_BASE_URL`)
        #[arg(long)]
        base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Extract a report from a saved portal page and print it as JSON
    Extract {
        /// Report category of the saved page
        category: ReportCategory,
        /// Path to the saved HTML page
        #[arg(long)]
        file: PathBuf,
    },
    /// List the report categories, their sub-tabs and year ranges
    Categories,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            port,
            fallback,
        } => {
            let mut config = ServerConfig::from_env();
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(fallback) = fallback {
                config.fallback_path = fallback;
            }

            // The server uses actix-web's runtime, so it runs in a blocking
            // task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(vitibrasil_server::serve(config))
            })
            .await??;
        }
        Commands::Fetch {
            category,
            year,
            sub,
            base_url,
            timeout,
        } => {
            let env = ServerConfig::from_env();
            let request = ReportRequest::from_path(category, sub.as_deref(), &year)?;
            let client = VitibrasilClient::new(
                base_url.as_deref().unwrap_or(&env.base_url),
                timeout.map_or(env.timeout, Duration::from_secs),
            )?;

            log::info!("Fetching {}", client.report_url(&request));
            let report = client.fetch_report(&request).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Extract { category, file } => {
            let html = std::fs::read_to_string(&file)?;
            let report = vitibrasil_scraper::extract(category, &html)?;
            log::info!(
                "Extracted {} {category} records from {}",
                report.len(),
                file.display()
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Categories => {
            for category in ReportCategory::all() {
                let years = category.year_range();
                println!(
                    "{category} (opt_{:02}, {}-{})",
                    category.option_code(),
                    years.start(),
                    years.end()
                );
                for sub in SubCategory::for_category(*category) {
                    println!("  {sub} (subopt_{:02})", sub.code());
                }
            }
        }
    }

    Ok(())
}
