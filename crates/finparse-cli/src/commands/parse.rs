//! Parse command - send a document to the API.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use finparse_core::input::InputSource;
use finparse_core::models::{BankCheckV1, FinancialDocumentV1, ReceiptV4};
use finparse_core::{Client, ParseOptions};

use super::{emit, format_document, load_config, DocumentKind, OutputFormat, PageArgs};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Document product
    #[arg(short, long, value_enum, default_value = "financial")]
    kind: DocumentKind,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Return the full OCR word list
    #[arg(long)]
    include_words: bool,

    /// Detect and crop multiple documents on one image
    #[arg(long)]
    cropper: bool,

    #[command(flatten)]
    pages: PageArgs,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut options = ParseOptions::from_config(&config);
    options.request.include_words |= args.include_words;
    options.request.cropper |= args.cropper;
    if let Some(page_options) = args.pages.to_options() {
        options.page_options = Some(page_options);
    }

    let client = Client::new(&config)?;
    let input = InputSource::from_path(&args.input)?;
    info!(
        "Parsing {} ({}) as {:?}",
        args.input.display(),
        input.mime_type().as_str(),
        args.kind
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Uploading {}...", input.filename()));

    let result = match args.kind {
        DocumentKind::Financial => client
            .parse::<FinancialDocumentV1>(input, &options)
            .await
            .map(|doc| format_document(&doc, args.format)),
        DocumentKind::Receipt => client
            .parse::<ReceiptV4>(input, &options)
            .await
            .map(|doc| format_document(&doc, args.format)),
        DocumentKind::BankCheck => client
            .parse::<BankCheckV1>(input, &options)
            .await
            .map(|doc| format_document(&doc, args.format)),
    };
    spinner.finish_and_clear();

    let output = result??;
    emit(args.output.as_deref(), &output)?;

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}
