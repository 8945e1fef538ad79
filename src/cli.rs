use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::export::ExportFormat;
use crate::normalizer::EmptyRowStage;

/// Command-line interface for scraping a paginated product catalog.
/// Exit codes: 0=success, 2=invalid arguments, 1=runtime failure
#[derive(Parser, Debug)]
#[command(name = "catalog_scraper")]
#[command(about = "Scrape a paginated product catalog into clean tabular data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// When blank rows are dropped relative to dirty-value filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmptyRows {
    Before,
    After,
    Keep,
}

impl From<EmptyRows> for EmptyRowStage {
    fn from(value: EmptyRows) -> Self {
        match value {
            EmptyRows::Before => EmptyRowStage::BeforeDirtyFilter,
            EmptyRows::After => EmptyRowStage::AfterDirtyFilter,
            EmptyRows::Keep => EmptyRowStage::Keep,
        }
    }
}

/// Options shared by every command that normalizes and writes records
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    #[arg(short, long, default_value = "products.csv", help = "Output file")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Csv, help = "Output format")]
    pub format: ExportFormat,

    #[arg(long, help = "JSON file with dirty sentinel values per field")]
    pub dirty_patterns: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        default_value_t = EmptyRows::After,
        help = "When blank rows are dropped relative to dirty filtering"
    )]
    pub empty_rows: EmptyRows,

    #[arg(long, help = "Also write rotating log files into this directory")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch catalog pages concurrently, normalize the products, and export them.
    Scrape {
        #[arg(short, long, help = "Catalog base URL; page 1 is the base itself")]
        base_url: String,

        #[arg(long, default_value_t = 1, help = "First page to fetch")]
        first_page: u32,

        #[arg(long, help = "Last page to fetch (inclusive)")]
        last_page: u32,

        #[arg(
            short,
            long,
            help = "Maximum concurrent requests (default: every page at once)"
        )]
        concurrency: Option<usize>,

        #[arg(short, long, default_value = Config::USER_AGENT, help = "User agent string for requests")]
        user_agent: String,

        #[arg(short, long, default_value_t = Config::REQUEST_TIMEOUT_SECS, help = "Request timeout in seconds")]
        timeout: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Parse saved catalog HTML files instead of fetching them.
    Parse {
        #[arg(required = true, help = "HTML files, processed in the given order")]
        files: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

impl Cli {
    /// Parse CLI arguments; on error clap prints usage and exits with code 2.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_command_minimal() {
        let cli = Cli::try_parse_from([
            "catalog_scraper",
            "scrape",
            "--base-url",
            "https://fashion-studio.dicoding.dev",
            "--last-page",
            "50",
        ])
        .unwrap();
        match cli.command {
            Commands::Scrape {
                base_url,
                first_page,
                last_page,
                concurrency,
                timeout,
                output,
                ..
            } => {
                assert_eq!(base_url, "https://fashion-studio.dicoding.dev");
                assert_eq!(first_page, 1);
                assert_eq!(last_page, 50);
                assert_eq!(concurrency, None);
                assert_eq!(timeout, Config::REQUEST_TIMEOUT_SECS);
                assert_eq!(output.output, PathBuf::from("products.csv"));
                assert_eq!(output.format, ExportFormat::Csv);
                assert_eq!(output.empty_rows, EmptyRows::After);
            }
            _ => panic!("Expected Scrape command"),
        }
    }

    #[test]
    fn test_scrape_command_with_options() {
        let cli = Cli::try_parse_from([
            "catalog_scraper",
            "scrape",
            "-b",
            "https://example.com",
            "--first-page",
            "2",
            "--last-page",
            "4",
            "--concurrency",
            "8",
            "--format",
            "jsonl",
            "--output",
            "/tmp/out.jsonl",
            "--empty-rows",
            "before",
            "--dirty-patterns",
            "dirty.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Scrape {
                first_page,
                concurrency,
                output,
                ..
            } => {
                assert_eq!(first_page, 2);
                assert_eq!(concurrency, Some(8));
                assert_eq!(output.format, ExportFormat::Jsonl);
                assert_eq!(output.output, PathBuf::from("/tmp/out.jsonl"));
                assert_eq!(
                    EmptyRowStage::from(output.empty_rows),
                    EmptyRowStage::BeforeDirtyFilter
                );
                assert_eq!(output.dirty_patterns, Some(PathBuf::from("dirty.json")));
            }
            _ => panic!("Expected Scrape command"),
        }
    }

    #[test]
    fn test_parse_command() {
        let cli = Cli::try_parse_from(["catalog_scraper", "parse", "a.html", "b.html"]).unwrap();
        match cli.command {
            Commands::Parse { files, .. } => {
                assert_eq!(files, vec![PathBuf::from("a.html"), PathBuf::from("b.html")]);
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_missing_required_arg() {
        let err = Cli::try_parse_from(["catalog_scraper", "scrape", "--base-url", "https://example.com"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_parse_requires_files() {
        assert!(Cli::try_parse_from(["catalog_scraper", "parse"]).is_err());
    }

    #[test]
    fn test_help_does_not_panic() {
        let err = Cli::try_parse_from(["catalog_scraper", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
