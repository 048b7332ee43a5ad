//! Engine context: global settings, object tables, factories.
//!
//! Responsibilities:
//! - own every path and paint behind copyable handles
//! - hold process-wide configuration (render mode, contour error, buffer
//!   callbacks) explicitly instead of in singletons
//! - refresh path meshes and GPU buffers lazily at draw time

mod context;

pub use context::{Context, RenderMode};
