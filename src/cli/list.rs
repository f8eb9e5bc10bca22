//! List command - browse source sentences

use anyhow::Result;
use console::style;

use crate::models::ComparisonSet;

pub fn run(set: &ComparisonSet, page: usize, per_page: usize) -> Result<()> {
    let sentences = set.source_sentences();
    let total = sentences.len();

    // Pagination (per_page = 0 means all)
    let (start, end, current_page, total_pages) = if per_page > 0 {
        let total_pages = total.div_ceil(per_page);
        let current_page = page.max(1).min(total_pages.max(1));
        let start = (current_page - 1) * per_page;
        let end = (start + per_page).min(total);
        (start, end, current_page, total_pages)
    } else {
        (0, total, 1, 1)
    };

    println!("{}", style("Source sentences").bold());
    println!();
    for s in &sentences[start..end] {
        println!("{:>5}  {}", style(s.id).dim(), s.src);
    }

    if per_page > 0 && total_pages > 1 {
        println!();
        println!(
            "Showing page {} of {} ({} per page, {} total)",
            style(current_page).cyan(),
            style(total_pages).cyan(),
            per_page,
            style(total).cyan(),
        );
        if current_page < total_pages {
            println!(
                "   Use {} to see more",
                style(format!("--page {}", current_page + 1)).yellow()
            );
        }
    }

    println!();
    println!(
        "Run {} for a comparison, or {} for the dashboard",
        style("lrpscope show <id>").cyan(),
        style("lrpscope").cyan()
    );

    Ok(())
}
