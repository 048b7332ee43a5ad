//! Renderer state machine and the per-frame draw-event stream.
//!
//! Responsibilities:
//! - consume `save`/`restore`/`transform`/`clip_path`/`draw_path` scene calls
//! - diff pending against applied clips and bracket mask rebuilds
//! - coalesce paint changes and keep events in emission order
//! - describe the stencil pipelines backends must run, as plain data

mod clip;
mod event;
pub mod pipeline;
#[allow(clippy::module_inception)]
mod renderer;

pub use clip::{ClipDescriptor, MAX_CLIP_PATHS};
pub use event::{DrawEvent, DrawEventKind};
pub use renderer::Renderer;
