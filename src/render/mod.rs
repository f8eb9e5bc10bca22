//! Heatmap rendering
//!
//! Colormaps and normalization shared by the terminal and PNG backends.
//! Matrices are min/max-normalized per sentence before colormapping,
//! nearest-neighbor style: one colored cell per matrix entry, no
//! interpolation.

pub mod png;
pub mod terminal;

use std::fmt;
use std::str::FromStr;

use crate::models::AttributionMatrix;

/// Value-to-color mapping for heatmap cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Black through red and yellow to white
    #[default]
    Hot,
    Viridis,
    Grayscale,
}

impl Colormap {
    /// Map a normalized value in [0, 1] to RGB
    pub fn color(self, t: f64) -> (u8, u8, u8) {
        let t = t.clamp(0.0, 1.0);
        match self {
            Colormap::Hot => {
                // Piecewise ramps: red saturates first, then green, then blue
                let r = t / 0.365;
                let g = (t - 0.365) / 0.381;
                let b = (t - 0.746) / 0.254;
                (channel(r), channel(g), channel(b))
            }
            Colormap::Viridis => {
                // Quadratic approximation of the matplotlib colormap
                let r = 0.267 + t * (0.329 - 0.267 + t * (0.984 - 0.329));
                let g = 0.005 + t * (0.569 - 0.005 + t * (0.906 - 0.569));
                let b = 0.329 + t * (0.758 - 0.329 - t * (0.758 - 0.121));
                (channel(r), channel(g), channel(b))
            }
            Colormap::Grayscale => {
                let v = channel(t);
                (v, v, v)
            }
        }
    }

    /// Next colormap in the cycle, for the dashboard toggle
    pub fn next(self) -> Self {
        match self {
            Colormap::Hot => Colormap::Viridis,
            Colormap::Viridis => Colormap::Grayscale,
            Colormap::Grayscale => Colormap::Hot,
        }
    }
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colormap::Hot => write!(f, "hot"),
            Colormap::Viridis => write!(f, "viridis"),
            Colormap::Grayscale => write!(f, "grayscale"),
        }
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hot" => Ok(Colormap::Hot),
            "viridis" => Ok(Colormap::Viridis),
            "grayscale" | "gray" | "grey" => Ok(Colormap::Grayscale),
            other => Err(format!("unknown colormap '{other}'")),
        }
    }
}

/// Per-cell normalized values in [0, 1], row-major. A flat matrix maps to
/// 0.5 everywhere so it still renders visibly.
pub fn normalized(matrix: &AttributionMatrix) -> Vec<f64> {
    let (min, max) = matrix.min_max();
    let range = max - min;
    let mut out = Vec::with_capacity(matrix.rows() * matrix.cols());
    for r in 0..matrix.rows() {
        for c in 0..matrix.cols() {
            let t = if range > 0.0 {
                ((matrix.get(r, c) - min) / range).clamp(0.0, 1.0)
            } else {
                0.5
            };
            out.push(t);
        }
    }
    out
}

/// Truncate an axis label to `max` characters with a trailing ellipsis
pub fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let mut out: String = label.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_endpoints() {
        assert_eq!(Colormap::Hot.color(0.0), (0, 0, 0));
        assert_eq!(Colormap::Hot.color(1.0), (255, 255, 255));
        // Mid-range is saturated red with some green, no blue yet
        let (r, _, b) = Colormap::Hot.color(0.5);
        assert_eq!(r, 255);
        assert_eq!(b, 0);
    }

    #[test]
    fn test_viridis_endpoints_match_reference() {
        assert_eq!(Colormap::Viridis.color(0.0), (68, 1, 84));
        let (r, g, b) = Colormap::Viridis.color(1.0);
        assert_eq!((r, g, b), (251, 231, 31));
    }

    #[test]
    fn test_grayscale_is_uniform() {
        let (r, g, b) = Colormap::Grayscale.color(0.5);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_color_clamps_out_of_range_input() {
        assert_eq!(Colormap::Hot.color(-1.0), Colormap::Hot.color(0.0));
        assert_eq!(Colormap::Hot.color(2.0), Colormap::Hot.color(1.0));
    }

    #[test]
    fn test_colormap_parse_and_cycle() {
        assert_eq!("hot".parse::<Colormap>().unwrap(), Colormap::Hot);
        assert_eq!("Viridis".parse::<Colormap>().unwrap(), Colormap::Viridis);
        assert_eq!("gray".parse::<Colormap>().unwrap(), Colormap::Grayscale);
        assert!("plasma".parse::<Colormap>().is_err());
        assert_eq!(Colormap::Hot.next().next().next(), Colormap::Hot);
    }

    #[test]
    fn test_normalized_spans_unit_interval() {
        let m = crate::models::AttributionMatrix::from_rows(vec![
            vec![1.0, 2.0],
            vec![3.0, 5.0],
        ])
        .expect("valid matrix");
        let values = normalized(&m);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[3], 1.0);
        assert!(values.iter().all(|t| (0.0..=1.0).contains(t)));
    }

    #[test]
    fn test_normalized_flat_matrix_is_midpoint() {
        let m = crate::models::AttributionMatrix::from_rows(vec![vec![2.0; 3]; 2])
            .expect("valid matrix");
        assert!(normalized(&m).iter().all(|&t| t == 0.5));
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("averylongtoken", 6), "avery…");
    }
}
