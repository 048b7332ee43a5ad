//! Small geometry types shared across the engine.
//!
//! Responsibilities:
//! - 2D points/vectors and affine transforms in path units
//! - running AABB accumulation for contour bounds
//! - adaptive cubic Bézier flattening driven by the contour error

mod bezier;
mod bounds;
mod mat2d;
mod vec2;

pub use bezier::segment_cubic;
pub use bounds::Bounds;
pub use mat2d::Mat2D;
pub use vec2::Vec2;
