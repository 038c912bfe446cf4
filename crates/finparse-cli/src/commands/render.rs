//! Render command - print a saved API response.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use tracing::info;

use finparse_core::models::{BankCheckV1, FinancialDocumentV1, ReceiptV4};
use finparse_core::parsing::Document;

use super::{emit, format_document, DocumentKind, OutputFormat};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// JSON file holding a full API response
    #[arg(required = true)]
    response: PathBuf,

    /// Document product the response belongs to
    #[arg(short, long, value_enum, default_value = "financial")]
    kind: DocumentKind,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.response).map_err(|e| {
        anyhow::anyhow!("Could not read {}: {}", args.response.display(), e)
    })?;
    let response: Value = serde_json::from_str(&content)?;
    info!("Rendering {} as {:?}", args.response.display(), args.kind);

    let output = match args.kind {
        DocumentKind::Financial => {
            format_document(&Document::<FinancialDocumentV1>::from_response(&response)?, args.format)?
        }
        DocumentKind::Receipt => {
            format_document(&Document::<ReceiptV4>::from_response(&response)?, args.format)?
        }
        DocumentKind::BankCheck => {
            format_document(&Document::<BankCheckV1>::from_response(&response)?, args.format)?
        }
    };

    emit(args.output.as_deref(), &output)
}
