//! One-shot rundown exporter.
//!
//! # Responsibility
//! - Render a dataset file to a Markdown document.
//! - Stay read-only: the source file is never migrated or rewritten.

use anyhow::Context;
use clap::Parser;
use log::info;
use rundown_core::{default_log_level, init_logging, read_dataset, render_markdown};
use std::path::PathBuf;

/// Export a rundown dataset as Markdown.
#[derive(Parser, Debug)]
#[command(name = "rundown-export", version)]
struct Args {
    /// Dataset JSON file to read.
    source: PathBuf,

    /// Markdown file to create or overwrite.
    destination: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "RUNDOWN_LOG_LEVEL", default_value_t = default_log_level().to_string())]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, None).map_err(anyhow::Error::msg)?;

    let dataset = read_dataset(&args.source)
        .with_context(|| format!("can't open the source file `{}`", args.source.display()))?;
    let document = render_markdown(&dataset.episodes);
    std::fs::write(&args.destination, document).with_context(|| {
        format!(
            "can't write the output file `{}`",
            args.destination.display()
        )
    })?;

    info!(
        "event=export module=cli status=ok episodes={} destination={}",
        dataset.episodes.len(),
        args.destination.display()
    );
    Ok(())
}
