use crate::geom::Vec2;

/// One retained path command. The command list is the canonical source of a
/// path's geometry; contours and meshes are derived from it on demand.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathCommand {
    /// Repositions the pen without drawing.
    Move(Vec2),
    Line(Vec2),
    /// Cubic Bézier to `to`, leaving the pen via `out_ctl` and arriving via
    /// `in_ctl`.
    Cubic {
        out_ctl: Vec2,
        in_ctl: Vec2,
        to: Vec2,
    },
    /// Returns the pen to the start of the current contour run and seals it.
    Close,
}

/// Winding rule used when filling the path.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}
