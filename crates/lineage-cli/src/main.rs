use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use lineage::export::{self, ExportFormat};
use lineage::scraper::WebScraper;
use lineage::types::ScholarId;
use lineage::utils::{CrawlConfig, DEFAULT_END_DEPTH, LineageStats};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(about = "A Mathematics Genealogy Project advisor lineage tracer", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        short = 'q',
        long,
        global = true,
        help = "Only log errors (overrides --log-level)"
    )]
    quiet: bool,

    #[arg(
        long,
        env = "LINEAGE_BASE_URL",
        global = true,
        help = "Base URL of the genealogy site or a mirror of it"
    )]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl advisors breadth-first from a starting record and export what was found
    Trace {
        #[arg(
            long,
            help = "ID of the record to start from",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        start_id: ScholarId,

        #[arg(
            long,
            help = "Stop once this record's generation has been collected",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        end_id: Option<ScholarId>,

        #[arg(
            long,
            default_value_t = DEFAULT_END_DEPTH,
            help = "Deepest generation to visit when the end record is not found",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        end_depth: u32,

        #[arg(
            long,
            value_name = "SECONDS",
            default_value = "2.5",
            help = "Pause between requests in seconds",
            value_parser = parse_wait
        )]
        wait_sec: Duration,

        #[arg(
            short = 'o',
            long,
            default_value = "math_genealogy.xlsx",
            help = "Output file"
        )]
        output: PathBuf,

        #[arg(
            long,
            value_parser = parse_export_format,
            help = "Output file format (xlsx, csv or json); inferred from the output extension by default"
        )]
        format: Option<ExportFormat>,
    },
    /// Fetch and print a single record
    Show {
        #[arg(
            help = "ID of the record to fetch",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        id: ScholarId,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn parse_wait(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("Invalid number '{s}'"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("Wait must be a non-negative number, got '{s}'"))
}

fn parse_export_format(s: &str) -> Result<ExportFormat, String> {
    s.parse::<ExportFormat>().map_err(|e| e.to_string())
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Error
    } else {
        cli.log_level.clone().into()
    };
    env_logger::Builder::new().filter_level(level).init();

    let scraper = match &cli.base_url {
        Some(base_url) => WebScraper::with_base_url(base_url),
        None => WebScraper::new(),
    }
    .unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    match cli.command {
        Commands::Trace {
            start_id,
            end_id,
            end_depth,
            wait_sec,
            output,
            format,
        } => {
            let format = format
                .map_or_else(|| ExportFormat::from_path(&output), Ok)
                .unwrap_or_else(|e| {
                    log::error!("Invalid args: {e}");
                    process::exit(1);
                });

            let config = CrawlConfig {
                start_id,
                end_id,
                end_depth,
                wait: wait_sec,
            }
            .validate()
            .unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let lineage = scraper.trace_lineage(&config).await.unwrap_or_else(|e| {
                log::error!("Error tracing lineage: {}", e);
                process::exit(1);
            });

            export::export(&lineage.scholars, &output, format).unwrap_or_else(|e| {
                log::error!("Error saving {}: {}", output.display(), e);
                process::exit(1);
            });

            if lineage.scholars.is_empty() {
                println!("No records collected.");
            } else {
                print!("{}", lineage);
                print!("{}", LineageStats::from_scholars(&lineage.scholars));
            }
        }

        Commands::Show { id, format } => {
            let scholar = scraper.fetch_scholar(id, 1).await.unwrap_or_else(|e| {
                log::error!("Error fetching record {}: {}", id, e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&scholar),
                OutputFormat::Text => println!("{}", scholar),
            }
        }
    }
}
