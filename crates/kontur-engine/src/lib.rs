//! Core vector-graphics engine: retained 2D paths in, an ordered stream of
//! GPU draw events out.
//!
//! Scenes record paths (move/line/cubic/close command lists, optionally
//! composed from child paths under affine transforms) and paints (solid
//! colors, linear/radial gradients). Each frame, a [`Renderer`] walks the
//! scene's `save`/`restore`/`transform`/`clip_path`/`draw_path` calls and
//! appends [`DrawEvent`]s; a backend then translates events into draw calls
//! against the buffers the engine maintains through two embedder-supplied
//! callbacks (see [`buffer`]).
//!
//! Two rasterization strategies are selectable on the [`Context`]:
//!
//! - **Tessellation** — contours are flattened on the CPU (adaptive cubic
//!   subdivision under a quality-controlled error bound) and triangulated
//!   with fill-rule awareness; one indexed draw per path.
//! - **Stencil-to-cover** — contours become a triangle fan that accumulates
//!   winding counts in the stencil buffer, then a bounding-box quad draws the
//!   covered pixels and clears the stencil behind itself.
//!
//! Both share contour generation, paint handling, and the clip-path
//! protocol. The engine never blocks, never talks to a GPU API directly, and
//! prefers a degraded frame over a failed one.
//!
//! ```no_run
//! use kontur_engine::{Color32, Context, RenderMode};
//!
//! let mut ctx = Context::new();
//! ctx.set_render_mode(RenderMode::StencilToCover);
//!
//! let path = ctx.create_path();
//! let p = ctx.path_mut(path).unwrap();
//! p.move_to(0.0, 0.0);
//! p.line_to(100.0, 0.0);
//! p.line_to(100.0, 100.0);
//! p.close();
//!
//! let paint = ctx.create_paint();
//! ctx.paint_mut(paint).unwrap().color(Color32::from_rgb(255, 64, 0));
//!
//! let mut renderer = ctx.create_renderer();
//! renderer.new_frame();
//! renderer.draw_path(&mut ctx, path, paint);
//! for event in renderer.events() {
//!     // translate to the GPU backend of your choice
//!     let _ = event;
//! }
//! ```

pub mod buffer;
pub mod core;
pub mod error;
pub mod geom;
pub mod logging;
pub mod paint;
pub mod path;
pub mod renderer;

pub use crate::buffer::{BufferHandle, BufferKind, DrawBuffers};
pub use crate::core::{Context, RenderMode};
pub use crate::error::{PaintError, PathStatus};
pub use crate::geom::{Bounds, Mat2D, Vec2};
pub use crate::paint::{Color32, FillType, PaintId, PaintStyle, PaintUniform, RenderPaint};
pub use crate::path::{FillRule, PathCommand, PathId, RenderPath};
pub use crate::renderer::{DrawEvent, DrawEventKind, Renderer};
