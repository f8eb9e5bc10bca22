//! Check command - validate the data files
//!
//! Attribution records come out of an upstream pipeline that is easy to
//! misconfigure; this surfaces the usual mistakes (shape drift, mismatched
//! eval sets) before anyone stares at a nonsensical heatmap.

use anyhow::Result;
use console::style;

use crate::config::Settings;
use crate::data;
use crate::text;

pub fn run(settings: &Settings) -> Result<()> {
    println!("{}", style("lrpscope check").bold());
    println!();

    let baseline = data::load_records(&settings.baseline)?;
    println!(
        "{} baseline: {} records ({})",
        style("✓").green(),
        baseline.len(),
        settings.baseline.display()
    );
    let augmented = data::load_records(&settings.augmented)?;
    println!(
        "{} augmented: {} records ({})",
        style("✓").green(),
        augmented.len(),
        settings.augmented.display()
    );
    let references = data::load_references(&settings.references)?;
    println!(
        "{} references: {} sentences ({})",
        style("✓").green(),
        references.len(),
        settings.references.display()
    );

    let usable = baseline.len().min(augmented.len()).min(references.len());
    if baseline.len() != augmented.len() || baseline.len() != references.len() {
        println!(
            "{} input lengths differ; only the first {} sentences are usable",
            style("⚠").yellow(),
            usable
        );
    }

    let mut shape_errors = 0usize;
    let mut source_mismatches = 0usize;

    for (list_name, records) in [("baseline", &baseline), ("augmented", &augmented)] {
        for (id, record) in records.iter().enumerate() {
            if !record.shape_matches_tokens() {
                shape_errors += 1;
                println!(
                    "{} {} record {}: matrix is {}x{} but tokens want {}x{}",
                    style("✗").red(),
                    list_name,
                    id,
                    record.attribution.rows(),
                    record.attribution.cols(),
                    text::subword_tokens(&record.dst).len() + 1,
                    text::subword_tokens(&record.src).len() + 1,
                );
            }
        }
    }

    for id in 0..usable {
        if baseline[id].src != augmented[id].src {
            source_mismatches += 1;
            println!(
                "{} sentence {}: baseline and augmented source sentences differ",
                style("✗").red(),
                id
            );
        }
    }

    if shape_errors == 0 && source_mismatches == 0 {
        println!();
        println!(
            "{} {} sentences usable",
            style("✓ All checks passed.").green(),
            usable
        );
        return Ok(());
    }

    anyhow::bail!(
        "{} shape error(s), {} source mismatch(es)",
        shape_errors,
        source_mismatches
    )
}
