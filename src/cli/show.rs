//! Show command - print one sentence comparison

use anyhow::Result;
use console::style;

use crate::config::Settings;
use crate::models::{ComparisonReport, ComparisonSet};
use crate::render::terminal;

pub fn run(set: &ComparisonSet, settings: &Settings, id: usize, json: bool) -> Result<()> {
    let Some(pair) = set.pair(id) else {
        anyhow::bail!("invalid sentence id: {}. Valid range: 0-{}", id, set.len() - 1);
    };

    if json {
        let report = ComparisonReport::from_pair(&pair);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("{} Sentence #{}", style("🔬").bold(), pair.id);
    println!();
    println!(
        "   {} {}",
        style("Source:").bold(),
        pair.baseline.src_display()
    );
    println!("   {} {}", style("Reference:").bold(), pair.reference);
    println!();
    println!(
        "   {} ({}) {}",
        style("Baseline:").bold(),
        style(format!("{:0.4}", pair.baseline_bleu.score)).yellow(),
        pair.baseline.dst_display()
    );
    println!(
        "   {} ({}) {}",
        style("Augmented:").bold(),
        style(format!("{:0.4}", pair.augmented_bleu.score)).green(),
        pair.augmented.dst_display()
    );

    for (title, record) in [
        ("Baseline inp_lrp", pair.baseline),
        ("Augmented inp_lrp", pair.augmented),
    ] {
        println!();
        println!("{}", style(title).bold());
        let rendered = if console::colors_enabled() {
            terminal::ansi_heatmap(record, settings.colormap, &settings.eos_label)
        } else {
            terminal::shade_heatmap(record, &settings.eos_label)
        };
        print!("{rendered}");
    }

    Ok(())
}
