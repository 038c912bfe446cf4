//! Pages command - cut pages out of a local PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use finparse_core::input::InputSource;

use super::{load_config, PageArgs};

/// Arguments for the pages command.
#[derive(Args)]
pub struct PagesArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output PDF
    #[arg(short, long, required = true)]
    output: PathBuf,

    #[command(flatten)]
    pages: PageArgs,
}

pub fn run(args: PagesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let options = match args.pages.to_options() {
        Some(options) => options,
        None => load_config(config_path)?.pages.options,
    };

    let mut input = InputSource::from_path(&args.input)?;
    if !input.is_pdf() {
        anyhow::bail!("Not a PDF: {}", args.input.display());
    }

    let before = input.page_count()?;
    let changed = input.apply_page_options(&options)?;
    let after = input.page_count()?;
    info!("{} pages before, {} after", before, after);

    fs::write(&args.output, input.into_bytes())?;

    if changed {
        println!(
            "{} Wrote {} of {} pages to {}",
            style("✓").green(),
            after,
            before,
            args.output.display()
        );
    } else {
        println!(
            "{} Document has {} pages (minimum {}), copied unchanged to {}",
            style("ℹ").blue(),
            before,
            options.on_min_pages,
            args.output.display()
        );
    }

    Ok(())
}
