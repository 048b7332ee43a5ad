//! Paint descriptions and their shader-facing flat form.
//!
//! Responsibilities:
//! - packed color handling ([`Color32`])
//! - gradient accumulation between `linear_gradient`/`radial_gradient` and
//!   `complete_gradient` ([`GradientBuilder`])
//! - the retained paint object ([`RenderPaint`]) and its flattened
//!   per-draw uniform record ([`PaintUniform`])

mod color;
mod gradient;
#[allow(clippy::module_inception)]
mod paint;
mod uniform;

/// Upper bound on gradient stops carried by a paint.
pub const MAX_STOPS: usize = 16;

/// Handle to a [`RenderPaint`] owned by a [`crate::core::Context`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PaintId(pub(crate) u32);

impl PaintId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

pub use color::Color32;
pub use gradient::{GradientBuilder, GradientKind, GradientStop};
pub use paint::{FillType, PaintStyle, RenderPaint};
pub use uniform::PaintUniform;
