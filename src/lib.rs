pub mod cleaner;
pub mod cli;
pub mod config;
pub mod crawler;
pub mod export;
pub mod logging;
pub mod models;
pub mod network;
pub mod normalizer;
pub mod parser;
pub mod pipeline;

// Re-export main types for library usage
pub use config::{page_urls, CatalogLayout, Config, ConfigError, ScraperConfig};
pub use crawler::{CatalogCrawler, CrawlSummary, PageError, PageReport};
pub use export::{export_to_csv, export_to_file, export_to_jsonl, ExportError, ExportFormat};
pub use models::{CleanRecord, Field, RawProduct, RawRecord};
pub use network::{FetchError, FetchResult, HttpClient};
pub use normalizer::{DirtyPatternTable, EmptyRowStage, NormalizeError, Normalizer, NormalizerOptions, Sentinel};
pub use parser::{CardError, CardParser, ParseError};
pub use pipeline::{Pipeline, PipelineOutput};
