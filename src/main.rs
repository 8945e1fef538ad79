use catalog_scraper::cli::{Cli, Commands, OutputArgs};
use catalog_scraper::config::{page_urls, CatalogLayout, ConfigError, ScraperConfig};
use catalog_scraper::crawler::{CatalogCrawler, CrawlerError};
use catalog_scraper::export::{export_to_file, ExportError};
use catalog_scraper::logging;
use catalog_scraper::models::RawRecord;
use catalog_scraper::normalizer::{DirtyPatternTable, NormalizeError, Normalizer, NormalizerOptions};
use catalog_scraper::parser::{CardParser, ParseError};
use catalog_scraper::pipeline::Pipeline;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MainError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Setup error: {0}")]
    Setup(#[from] CrawlerError),

    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging error: {0}")]
    Logging(String),
}

fn build_normalizer(output: &OutputArgs) -> Result<Normalizer, MainError> {
    let table = match &output.dirty_patterns {
        Some(path) => DirtyPatternTable::from_json_file(path)?,
        None => DirtyPatternTable::default(),
    };
    Ok(Normalizer::new(
        table,
        NormalizerOptions {
            empty_rows: output.empty_rows.into(),
        },
    ))
}

async fn run_scrape_command(
    base_url: String,
    first_page: u32,
    last_page: u32,
    concurrency: Option<usize>,
    user_agent: String,
    timeout: u64,
    output: OutputArgs,
) -> Result<(), MainError> {
    let urls = page_urls(&base_url, first_page, last_page)?;
    println!(
        "Scraping {} pages from {} ({} concurrent requests, {}s timeout)",
        urls.len(),
        base_url,
        concurrency.map_or_else(|| "all".to_string(), |n| n.to_string()),
        timeout
    );

    let config = ScraperConfig {
        user_agent,
        timeout_secs: timeout,
        max_concurrency: concurrency,
        layout: CatalogLayout::default(),
    };
    let crawler = CatalogCrawler::new(&config)?;
    let pipeline = Pipeline::new(crawler, build_normalizer(&output)?);

    let result = pipeline.run(&urls).await?;
    for (url, reason) in &result.failures {
        eprintln!("Skipped {}: {}", url, reason);
    }

    let count = export_to_file(&result.records, &output.output, output.format)?;
    println!(
        "{}; exported {} clean records to {}",
        result.summary,
        count,
        output.output.display()
    );
    Ok(())
}

fn run_parse_command(files: Vec<PathBuf>, output: OutputArgs) -> Result<(), MainError> {
    let parser = CardParser::new(&CatalogLayout::default()).map_err(CrawlerError::from)?;

    let mut raw: Vec<RawRecord> = Vec::new();
    for file in &files {
        let html = std::fs::read_to_string(file)?;
        match parser.parse(&html) {
            Ok(records) => raw.extend(records),
            Err(e @ (ParseError::MissingContainer | ParseError::NoCards)) => {
                eprintln!("Skipped {}: {}", file.display(), e);
            }
            Err(e) => return Err(CrawlerError::from(e).into()),
        }
    }

    let parsed = raw.len();
    let records = build_normalizer(&output)?.clean(raw)?;
    let count = export_to_file(&records, &output.output, output.format)?;
    println!(
        "Parsed {} records from {} files; exported {} clean records to {}",
        parsed,
        files.len(),
        count,
        output.output.display()
    );
    Ok(())
}

fn init_logging(output: &OutputArgs) -> Result<Option<logging::LogGuard>, MainError> {
    match &output.log_dir {
        Some(dir) => logging::init_logging(dir)
            .map(Some)
            .map_err(|e| MainError::Logging(e.to_string())),
        None => logging::init_stdout_logging()
            .map(|_| None)
            .map_err(|e| MainError::Logging(e.to_string())),
    }
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Scrape {
            base_url,
            first_page,
            last_page,
            concurrency,
            user_agent,
            timeout,
            output,
        } => {
            let _guard = init_logging(&output)?;
            run_scrape_command(
                base_url,
                first_page,
                last_page,
                concurrency,
                user_agent,
                timeout,
                output,
            )
            .await?;
        }

        Commands::Parse { files, output } => {
            let _guard = init_logging(&output)?;
            run_parse_command(files, output)?;
        }
    }

    Ok(())
}
