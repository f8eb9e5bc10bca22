//! Export command - PNG heatmaps and JSON reports

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::config::Settings;
use crate::models::{ComparisonReport, ComparisonSet};
use crate::render::png;

pub fn run(
    set: &ComparisonSet,
    settings: &Settings,
    id: Option<usize>,
    all: bool,
    out_dir: &Path,
) -> Result<()> {
    let ids: Vec<usize> = if all {
        (0..set.len()).collect()
    } else if let Some(id) = id {
        if id >= set.len() {
            anyhow::bail!("invalid sentence id: {}. Valid range: 0-{}", id, set.len() - 1);
        }
        vec![id]
    } else {
        anyhow::bail!("pass a sentence id or --all");
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let progress = if ids.len() > 1 {
        let bar = ProgressBar::new(ids.len() as u64);
        bar.set_style(ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} sentences",
        )?);
        Some(bar)
    } else {
        None
    };

    ids.par_iter().try_for_each(|&id| -> Result<()> {
        export_sentence(set, settings, id, out_dir)?;
        if let Some(bar) = &progress {
            bar.inc(1);
        }
        Ok(())
    })?;

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }
    println!("Exported {} sentence(s) to {}", ids.len(), out_dir.display());
    Ok(())
}

fn export_sentence(
    set: &ComparisonSet,
    settings: &Settings,
    id: usize,
    out_dir: &Path,
) -> Result<()> {
    let pair = set.pair(id).context("sentence id out of range")?;

    // The JSON report lands first so a failed rasterization leaves the
    // scores behind
    let report_path = out_dir.join(format!("sentence-{id}.json"));
    let report = ComparisonReport::from_pair(&pair);
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    for (variant, record) in [("baseline", pair.baseline), ("augmented", pair.augmented)] {
        let path = out_dir.join(format!("sentence-{id}-{variant}.png"));
        let title = format!("Sentence {id} {variant} inp_lrp");
        png::render_heatmap_png(record, settings.colormap, &settings.eos_label, &title, &path)?;
    }
    Ok(())
}
