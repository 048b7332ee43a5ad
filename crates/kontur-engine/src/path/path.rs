use crate::buffer::DrawBuffers;
use crate::error::PathStatus;
use crate::geom::{Bounds, Mat2D, Vec2};

use super::cmd::{FillRule, PathCommand};
use super::contour::{compute_contour, run_signed_area, Contour};
use super::{PathId, PathVertex, MAX_CONTOUR_VERTICES};

/// Reference to a sub-path drawn under a local transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathChild {
    pub path: PathId,
    pub transform: Mat2D,
}

/// Tessellation-mode mesh: lyon fill triangles followed by stroke strip
/// vertices in one vertex stream.
#[derive(Debug, Clone, Default)]
pub(crate) struct TessMesh {
    pub vertices: Vec<PathVertex>,
    pub indices: Vec<u32>,
    /// `[start, end)` vertex ranges of the per-run stroke strips.
    pub stroke_runs: Vec<(u32, u32)>,
    /// Whether stroke strips were baked into the vertex stream. Built lazily
    /// the first time a stroke paint draws the path.
    pub has_stroke: bool,
}

/// Stencil-to-cover mesh: fan indices over the contour scratch, the
/// four-vertex cover quad, and stroke strips appended after the fan vertices.
#[derive(Debug, Clone, Default)]
pub(crate) struct StencilMesh {
    pub fan_indices: Vec<u32>,
    pub cover_vertices: [PathVertex; 4],
    pub stroke_runs: Vec<(u32, u32)>,
    /// Vertex count of the whole upload (apex + contour + strips).
    pub upload_len: u32,
    /// Whether stroke strips were baked into the vertex stream. Built lazily
    /// the first time a stroke paint draws the path.
    pub has_stroke: bool,
}

/// Mode-specific derived geometry. Rebuilt when the variant no longer matches
/// the context's render mode.
#[derive(Debug, Clone, Default)]
pub(crate) enum PathMesh {
    #[default]
    None,
    Tessellation(TessMesh),
    StencilCover(StencilMesh),
}

/// Retained path: a command list or a list of child paths, never both drawn
/// at once (children win).
///
/// Derived data (contour scratch, mode-specific mesh, GPU buffer handles) is
/// cached here and refreshed lazily at draw time; see the dirty-flag notes on
/// the fields.
#[derive(Debug, Default)]
pub struct RenderPath {
    pub(crate) commands: Vec<PathCommand>,
    pub(crate) children: Vec<PathChild>,
    pub(crate) fill_rule: FillRule,

    /// Own geometry changed; cleared when the contour is recomputed.
    pub(crate) dirty: bool,
    /// Composite shape changed; cleared when a tessellation bake consumes
    /// this node. Own mutations set both flags.
    pub(crate) shape_dirty: bool,
    /// Contour error the current mesh was built with.
    pub(crate) mesh_error_used: f32,

    pub(crate) contour: Contour,
    pub(crate) mesh: PathMesh,
    pub(crate) buffers: DrawBuffers,

    pub(crate) status: PathStatus,
    warned_truncated: bool,
    pub(crate) warned_even_odd: bool,
}

impl RenderPath {
    pub fn new() -> Self {
        Self {
            dirty: true,
            shape_dirty: true,
            ..Self::default()
        }
    }

    /// Clears commands, children, and derived meshes. GPU buffer handles are
    /// preserved so the next rebuild updates them in place.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.children.clear();
        self.contour.clear();
        self.mesh = PathMesh::None;
        self.status = PathStatus::default();
        self.warned_truncated = false;
        self.warned_even_odd = false;
        self.mark_dirty();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::Move(Vec2::new(x, y)));
        self.mark_dirty();
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::Line(Vec2::new(x, y)));
        self.mark_dirty();
    }

    pub fn cubic_to(&mut self, ox: f32, oy: f32, ix: f32, iy: f32, x: f32, y: f32) {
        self.commands.push(PathCommand::Cubic {
            out_ctl: Vec2::new(ox, oy),
            in_ctl: Vec2::new(ix, iy),
            to: Vec2::new(x, y),
        });
        self.mark_dirty();
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
        self.mark_dirty();
    }

    /// Appends a child path drawn under `transform`. While any child exists,
    /// the command list is ignored at draw time.
    pub fn add_path(&mut self, path: PathId, transform: Mat2D) {
        self.children.push(PathChild { path, transform });
        self.mark_dirty();
    }

    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.fill_rule = rule;
        self.mark_dirty();
    }

    #[inline]
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    #[inline]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[inline]
    pub fn children(&self) -> &[PathChild] {
        &self.children
    }

    /// Bounds of the last computed contour; empty until first drawn.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.contour.bounds
    }

    /// Sticky degradation flags, cleared by [`reset`](Self::reset).
    #[inline]
    pub fn status(&self) -> PathStatus {
        self.status
    }

    /// Summed signed area of the computed contour runs; the sign tells the
    /// dominant winding direction.
    pub(crate) fn contour_signed_area(&self) -> f32 {
        self.contour.run_views().map(|(pts, _)| run_signed_area(pts)).sum()
    }

    #[inline]
    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.shape_dirty = true;
    }

    /// Recomputes the contour scratch when the commands, the contour error,
    /// or the requested layout (fan apex or not) changed.
    pub(crate) fn ensure_contour(&mut self, error: f32, with_apex: bool) {
        let stale =
            self.dirty || self.contour.error_used != error || self.contour.has_apex != with_apex;
        if !stale {
            return;
        }

        compute_contour(&self.commands, error, with_apex, &mut self.contour);
        self.dirty = false;

        if self.contour.truncated && !self.warned_truncated {
            log::warn!("path contour truncated at {MAX_CONTOUR_VERTICES} vertices; rendering degraded");
            self.warned_truncated = true;
        }
        if self.contour.missing_move && !self.status.missing_move {
            log::debug!("path draws before any move_to; contour starts at the origin");
        }
        self.status.truncated |= self.contour.truncated;
        self.status.missing_move |= self.contour.missing_move;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> RenderPath {
        let mut p = RenderPath::new();
        p.move_to(0.0, 0.0);
        p.line_to(10.0, 0.0);
        p.line_to(10.0, 10.0);
        p.line_to(0.0, 10.0);
        p.close();
        p
    }

    #[test]
    fn mutation_sets_both_dirty_flags() {
        let mut p = rect();
        p.ensure_contour(1.0, false);
        assert!(!p.dirty);
        p.line_to(5.0, 5.0);
        assert!(p.dirty && p.shape_dirty);
    }

    #[test]
    fn ensure_contour_is_idempotent() {
        let mut p = rect();
        p.ensure_contour(1.0, false);
        let verts = p.contour.verts.clone();
        p.ensure_contour(1.0, false);
        assert_eq!(p.contour.verts, verts);
    }

    #[test]
    fn error_change_recomputes() {
        let mut p = RenderPath::new();
        p.move_to(0.0, 0.0);
        p.cubic_to(50.0, 0.0, 50.0, 100.0, 100.0, 100.0);
        p.ensure_contour(8.0, false);
        let coarse = p.contour.verts.len();
        p.ensure_contour(0.5, false);
        assert!(p.contour.verts.len() > coarse);
    }

    #[test]
    fn apex_layout_change_recomputes() {
        let mut p = rect();
        p.ensure_contour(1.0, false);
        assert_eq!(p.contour.verts.len(), 4);
        p.ensure_contour(1.0, true);
        assert_eq!(p.contour.verts.len(), 5);
    }

    #[test]
    fn reset_clears_commands_but_keeps_handles() {
        use crate::buffer::BufferHandle;
        let mut p = rect();
        p.buffers.vertex = BufferHandle::new(9);
        p.reset();
        assert!(p.commands().is_empty());
        assert_eq!(p.buffers.vertex, BufferHandle::new(9));
        assert!(p.dirty);
    }

    #[test]
    fn close_and_manual_line_back_match_vertex_counts() {
        let mut closed = rect();
        closed.ensure_contour(1.0, true);

        let mut manual = RenderPath::new();
        manual.move_to(0.0, 0.0);
        manual.line_to(10.0, 0.0);
        manual.line_to(10.0, 10.0);
        manual.line_to(0.0, 10.0);
        manual.line_to(0.0, 0.0);
        manual.ensure_contour(1.0, true);

        // The explicit closing line adds its own vertex; triangle counts are
        // compared at the mesh level in the stencil tests.
        assert_eq!(closed.contour.runs.len(), manual.contour.runs.len());
    }
}
