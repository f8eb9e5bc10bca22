//! CLI command definitions and handlers

mod check;
mod export;
mod init;
mod list;
mod show;
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{Config, Settings};
use crate::data;
use crate::models::ComparisonSet;

/// lrpscope - side-by-side LRP attribution comparison
#[derive(Parser, Debug)]
#[command(name = "lrpscope")]
#[command(
    version,
    about = "Compare LRP attribution maps between two MT model variants, sentence by sentence",
    long_about = "lrpscope loads precomputed LRP attribution records for a baseline and an \
augmented translation model plus reference translations, scores both hypotheses with \
sentence BLEU, and renders the attribution matrices as side-by-side heatmaps.\n\n\
Run without a subcommand to open the interactive dashboard.",
    after_help = "\
Examples:
  lrpscope                              Open the dashboard with paths from lrpscope.toml
  lrpscope show 12                      Print the comparison for sentence 12
  lrpscope show 12 --json               Same, as JSON
  lrpscope list --page 2                Browse source sentences
  lrpscope export 12 -o out/            Write PNG heatmaps + JSON report for sentence 12
  lrpscope export --all -o out/         Export every sentence
  lrpscope check                        Validate the data files
  lrpscope init                         Write an example lrpscope.toml"
)]
pub struct Cli {
    /// Baseline attribution pickle (overrides config)
    #[arg(long, global = true)]
    pub baseline: Option<PathBuf>,

    /// Augmented attribution pickle (overrides config)
    #[arg(long, global = true)]
    pub augmented: Option<PathBuf>,

    /// Reference translations, one tokenized sentence per line (overrides config)
    #[arg(long, global = true)]
    pub refs: Option<PathBuf>,

    /// Config file path (default: ./lrpscope.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive dashboard (default)
    View,

    /// Print the comparison for one sentence id
    Show {
        /// Sentence id (row index from `list`)
        id: usize,

        /// Emit the comparison as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List source sentences
    List {
        /// Page number (1-indexed)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Sentences per page (0 = all)
        #[arg(long, default_value = "20")]
        per_page: usize,
    },

    /// Write PNG heatmaps and a JSON report for one or all sentences
    Export {
        /// Sentence id to export
        id: Option<usize>,

        /// Export every sentence
        #[arg(long, conflicts_with = "id")]
        all: bool,

        /// Output directory
        #[arg(long, short = 'o', default_value = "lrpscope-out")]
        out_dir: PathBuf,
    },

    /// Validate the data files and report inconsistencies
    Check,

    /// Write an example lrpscope.toml
    Init,
}

pub fn run(cli: Cli) -> Result<()> {
    // Init writes the config; don't require one to exist first
    if matches!(cli.command, Some(Commands::Init)) {
        return init::run();
    }

    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(config, cli.baseline, cli.augmented, cli.refs);

    match cli.command {
        Some(Commands::Init) => unreachable!("handled above"),
        Some(Commands::Check) => check::run(&settings),
        Some(Commands::List { page, per_page }) => {
            let set = load_set(&settings)?;
            list::run(&set, page, per_page)
        }
        Some(Commands::Show { id, json }) => {
            let set = load_set(&settings)?;
            show::run(&set, &settings, id, json)
        }
        Some(Commands::Export { id, all, out_dir }) => {
            let set = load_set(&settings)?;
            export::run(&set, &settings, id, all, &out_dir)
        }
        Some(Commands::View) | None => {
            let set = load_set(&settings)?;
            tui::run(set, &settings)
        }
    }
}

fn load_set(settings: &Settings) -> Result<ComparisonSet> {
    data::load_comparison_set(&settings.baseline, &settings.augmented, &settings.references)
}
