use serde::{Deserialize, Serialize};

use crate::fractal::{Fractal, FractalKind};

/// Minimum bar gap between the two fractals of a stroke.
pub const DEFAULT_MIN_STROKE_BARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeDirection {
    Up,
    Down,
}

/// A directional price leg connecting two alternating-kind fractals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    pub start: Fractal,
    pub end: Fractal,
    pub direction: StrokeDirection,
    /// |price delta| relative to the start fractal's price
    pub strength: f64,
}

impl Stroke {
    pub fn bar_span(&self) -> usize {
        self.end.index - self.start.index
    }
}

/// Link alternating fractals into strokes.
///
/// One anchor fractal is held at a time, starting from the first. A candidate
/// completes a stroke when its kind differs from the anchor's and the index
/// gap is at least `min_bars`; it then becomes the new anchor. Candidates of
/// the anchor's own kind, or candidates too close, are skipped without
/// advancing the anchor, so a multi-fractal run can discard its most extreme
/// point.
pub fn build_strokes(fractals: &[Fractal], min_bars: usize) -> Vec<Stroke> {
    if fractals.len() < 2 {
        return Vec::new();
    }

    let mut strokes = Vec::new();
    let mut anchor = &fractals[0];

    for candidate in &fractals[1..] {
        if candidate.kind == anchor.kind || candidate.index - anchor.index < min_bars {
            continue;
        }

        let direction = match anchor.kind {
            FractalKind::Bottom => StrokeDirection::Up,
            FractalKind::Top => StrokeDirection::Down,
        };
        let strength = (candidate.price - anchor.price).abs() / anchor.price;

        strokes.push(Stroke {
            start: anchor.clone(),
            end: candidate.clone(),
            direction,
            strength,
        });
        anchor = candidate;
    }

    strokes
}
