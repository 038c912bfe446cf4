//! Subcommands and the helpers they share.

pub mod config;
pub mod pages;
pub mod parse;
pub mod render;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tracing::debug;

use finparse_core::models::FinparseConfig;
use finparse_core::parsing::Document;
use finparse_core::pdf::{PageOperation, PageOptions};

/// Document product to parse the input as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum DocumentKind {
    /// Invoice or receipt, with reconstructed totals
    Financial,
    /// Expense receipt
    Receipt,
    /// US bank check
    BankCheck,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

/// Page selection flags shared by `parse` and `pages`.
#[derive(Args, Debug, Default)]
pub struct PageArgs {
    /// Keep only these pages (zero-based, negative counts from the end)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, conflicts_with = "remove")]
    keep: Vec<i64>,

    /// Remove these pages (zero-based, negative counts from the end)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    remove: Vec<i64>,

    /// Leave documents with fewer pages than this untouched
    #[arg(long)]
    min_pages: Option<u32>,
}

impl PageArgs {
    /// Options built from the flags, or `None` when no indices were given.
    pub fn to_options(&self) -> Option<PageOptions> {
        let options = if !self.keep.is_empty() {
            PageOptions::new(self.keep.clone(), PageOperation::KeepOnly)
        } else if !self.remove.is_empty() {
            PageOptions::new(self.remove.clone(), PageOperation::Remove)
        } else {
            return None;
        };
        Some(options.with_min_pages(self.min_pages.unwrap_or(0)))
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("finparse")
        .join("config.json")
}

/// Config from `--config`, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FinparseConfig> {
    if let Some(path) = config_path {
        return Ok(FinparseConfig::from_file(Path::new(path))?);
    }
    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(FinparseConfig::from_file(&path)?)
    } else {
        Ok(FinparseConfig::default())
    }
}

pub fn format_document<P>(document: &Document<P>, format: OutputFormat) -> anyhow::Result<String>
where
    P: Serialize + Display,
{
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(document)?,
        OutputFormat::Text => document.to_string(),
    })
}

/// Write to `output` or print to stdout.
pub fn emit(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            eprintln!(
                "{} Output written to {}",
                console::style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
