//! Init command - write an example config

use anyhow::{Context, Result};
use console::style;

use crate::config::CONFIG_FILE;

const EXAMPLE_CONFIG: &str = r#"# lrpscope configuration

[data]
# Pickled list of attribution records for each model variant
baseline = "lrp_results/baseline"
augmented = "lrp_results/yolov5"
# Reference translations, one subword-tokenized sentence per line
references = "ref/test.spm.trim50.pt"

[display]
# hot | viridis | grayscale
colormap = "hot"
# Label for the extra EOS row/column on heatmap axes
eos_label = "<EOS>"
"#;

pub fn run() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);
    if path.exists() {
        println!(
            "{} {} already exists, leaving it alone",
            style("✓").green(),
            CONFIG_FILE
        );
        return Ok(());
    }
    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("failed to write {CONFIG_FILE}"))?;
    println!("{} Wrote {}", style("✓").green(), style(CONFIG_FILE).cyan());
    println!(
        "  Edit the [data] paths, then run {}",
        style("lrpscope").cyan()
    );
    Ok(())
}
