//! lrpscope - side-by-side LRP attribution comparison
//!
//! Loads precomputed LRP attribution records for a baseline and an
//! augmented machine-translation model, scores both hypotheses with
//! sentence BLEU against reference translations, and renders the
//! attribution matrices as heatmaps in the terminal or as PNG files.

mod bleu;
mod cli;
mod config;
mod data;
mod models;
mod render;
mod text;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging on stderr so the TUI owns stdout; RUST_LOG wins
    // over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
