//! Terminal heatmap rendering
//!
//! Two flavors: ANSI background-colored cells for color terminals and a
//! monochrome shade-block fallback. Rows are labeled with the dst tokens;
//! src tokens print as an indexed legend below the grid, since terminal
//! text cannot rotate the way the PNG axis labels do.

use console::Style;

use crate::models::SentenceRecord;
use crate::render::{self, Colormap};

const SHADES: [char; 4] = ['░', '▒', '▓', '█'];

/// Row labels wider than this get an ellipsis
const MAX_LABEL: usize = 12;

/// Monochrome shade-block heatmap for plain output
pub fn shade_heatmap(record: &SentenceRecord, eos: &str) -> String {
    heatmap(record, eos, |t| {
        let idx = ((t * 3.0).round() as usize).min(3);
        let c = SHADES[idx];
        format!("{c}{c}")
    })
}

/// Background-colored heatmap for color terminals
pub fn ansi_heatmap(record: &SentenceRecord, colormap: Colormap, eos: &str) -> String {
    heatmap(record, eos, |t| {
        let (r, g, b) = colormap.color(t);
        Style::new()
            .on_color256(xterm256(r, g, b))
            .apply_to("  ")
            .to_string()
    })
}

fn heatmap(record: &SentenceRecord, eos: &str, cell: impl Fn(f64) -> String) -> String {
    let matrix = &record.attribution;
    let values = render::normalized(matrix);
    let dst_labels = record.dst_axis_labels(eos);
    let src_labels = record.src_axis_labels(eos);
    let width = dst_labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL);

    let mut out = String::new();

    // Column index header, one slot per 2-char cell
    out.push_str(&format!("{:>width$} ", "", width = width));
    for c in 0..matrix.cols() {
        out.push_str(&format!("{:<2}", c % 10));
    }
    out.push('\n');

    for r in 0..matrix.rows() {
        // Labels can disagree with the matrix when the upstream pipeline
        // miscounted tokens; render "?" rather than bailing
        let label = dst_labels.get(r).map(String::as_str).unwrap_or("?");
        out.push_str(&format!(
            "{:>width$} ",
            render::truncate_label(label, MAX_LABEL),
            width = width
        ));
        for c in 0..matrix.cols() {
            out.push_str(&cell(values[r * matrix.cols() + c]));
        }
        out.push('\n');
    }

    let legend = src_labels
        .iter()
        .enumerate()
        .map(|(i, l)| format!("{i}={l}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push('\n');
    out.push_str(&format!("src: {legend}\n"));
    out
}

/// Nearest entry in the xterm 6x6x6 color cube (indices 16-231)
fn xterm256(r: u8, g: u8, b: u8) -> u8 {
    let q = |v: u8| -> u8 { (v as u16 * 5 / 255) as u8 };
    16 + 36 * q(r) + 6 * q(g) + q(b)
}
