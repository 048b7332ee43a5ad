use crate::geom::Mat2D;
use crate::paint::PaintId;
use crate::path::PathId;

/// Discriminant of a [`DrawEvent`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawEventKind {
    /// Latch this event's paint uniforms before subsequent draws.
    SetPaint,
    /// Tessellation-mode fill: one indexed triangle-mesh draw.
    Draw,
    /// Stencil pass of stencil-to-cover: winding accumulation, no color.
    DrawStencil,
    /// Cover pass of stencil-to-cover: bounding quad, stencil-tested.
    DrawCover,
    /// Non-indexed triangle strip over `offset_start..offset_end`.
    DrawStroke,
    /// Events until the matching `ClippingEnd` (re)build the clip mask.
    ClippingBegin,
    /// Mask complete; `applied_clip_count` clips are now active.
    ClippingEnd,
    /// Clipping is off from here on.
    ClippingDisable,
}

/// One entry of the per-frame draw stream.
///
/// A flat record rather than a payload-per-variant enum: every consumer walks
/// the same fields and unused ones stay at their zero values, which keeps the
/// queue copyable and the backend translation table-driven.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawEvent {
    pub kind: DrawEventKind,
    pub path: Option<PathId>,
    pub paint: Option<PaintId>,
    pub transform_world: Mat2D,
    pub transform_local: Mat2D,
    /// Sub-path index threaded through composite recursion; drives the
    /// even-odd winding flip.
    pub idx: u32,
    /// Number of clip paths active for this draw (stencil reference depth).
    pub applied_clip_count: u8,
    pub is_even_odd: bool,
    pub is_clipping: bool,
    /// Stroke vertex range into the path's vertex buffer.
    pub offset_start: u32,
    pub offset_end: u32,
}

impl DrawEvent {
    pub(crate) fn new(kind: DrawEventKind) -> Self {
        Self {
            kind,
            path: None,
            paint: None,
            transform_world: Mat2D::IDENTITY,
            transform_local: Mat2D::IDENTITY,
            idx: 0,
            applied_clip_count: 0,
            is_even_odd: false,
            is_clipping: false,
            offset_start: 0,
            offset_end: 0,
        }
    }
}
