use crate::geom::Vec2;

use super::{Color32, MAX_STOPS};

/// A single gradient stop.
///
/// `t` is expected in `[0, 1]`; stops are stored in insertion order and the
/// caller's contract is to supply them monotonically in `t`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientStop {
    pub color: Color32,
    pub t: f32,
}

/// Kind of gradient being accumulated.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GradientKind {
    Linear,
    Radial,
}

/// In-flight gradient description, open between `linear_gradient`/
/// `radial_gradient` and `complete_gradient` on the owning paint.
///
/// Stops beyond [`MAX_STOPS`] are dropped with a one-time debug message; the
/// paint stays drawable with the stops that fit.
#[derive(Debug, Clone)]
pub struct GradientBuilder {
    pub kind: GradientKind,
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<GradientStop>,
    warned_overflow: bool,
}

impl GradientBuilder {
    pub fn new(kind: GradientKind, start: Vec2, end: Vec2) -> Self {
        Self {
            kind,
            start,
            end,
            stops: Vec::with_capacity(4),
            warned_overflow: false,
        }
    }

    pub fn push_stop(&mut self, color: Color32, t: f32) {
        if self.stops.len() >= MAX_STOPS {
            if !self.warned_overflow {
                log::debug!("gradient stop limit ({MAX_STOPS}) reached; extra stops dropped");
                self.warned_overflow = true;
            }
            return;
        }
        self.stops.push(GradientStop { color, t });
    }
}
