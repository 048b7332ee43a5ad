//! Retained paths and the meshes derived from them.
//!
//! Responsibilities:
//! - the command list and composite children ([`RenderPath`])
//! - contour flattening shared by both render modes ([`contour`])
//! - fill-rule-aware triangle meshes for tessellation mode
//! - fan/cover meshes for stencil-to-cover mode

pub mod contour;

mod cmd;
#[allow(clippy::module_inception)]
mod path;
mod stencil;
mod tessellation;

use bytemuck::{Pod, Zeroable};

/// Contour scratch capacity per path. Overflow truncates the contour and sets
/// [`crate::error::PathStatus::truncated`].
pub const MAX_CONTOUR_VERTICES: usize = 2048;

/// Recursion guard for composite paths; a handle cycle or an absurdly deep
/// nest stops here instead of overflowing the stack.
pub(crate) const MAX_COMPOSITE_DEPTH: u8 = 32;

/// Stroke width used while the paint-side `thickness` knob stays reserved.
pub(crate) const HAIRLINE_WIDTH: f32 = 1.0;

/// Handle to a [`RenderPath`] owned by a [`crate::core::Context`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PathId(pub(crate) u32);

impl PathId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// GPU vertex: one position in path units.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct PathVertex {
    pub pos: [f32; 2],
}

impl From<crate::geom::Vec2> for PathVertex {
    #[inline]
    fn from(v: crate::geom::Vec2) -> Self {
        Self { pos: [v.x, v.y] }
    }
}

pub use cmd::{FillRule, PathCommand};
pub use contour::{Contour, ContourRun};
pub use path::{PathChild, RenderPath};

pub(crate) use path::{PathMesh, StencilMesh, TessMesh};
pub(crate) use stencil::{build_fan_indices, cover_quad, COVER_INDICES};
pub(crate) use tessellation::{alternates_winding, tessellate_fill, PolyRun};
