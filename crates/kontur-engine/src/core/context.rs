use crate::buffer::{BufferBroker, BufferKind, DestroyBufferFn, DrawBuffers, RequestBufferFn};
use crate::geom::Mat2D;
use crate::paint::{PaintId, PaintUniform, RenderPaint};
use crate::path::contour::build_stroke_strip;
use crate::path::{
    alternates_winding, build_fan_indices, cover_quad, tessellate_fill, FillRule, PathId,
    PathMesh, PathVertex, PolyRun, RenderPath, StencilMesh, TessMesh, COVER_INDICES,
    HAIRLINE_WIDTH, MAX_COMPOSITE_DEPTH,
};
use crate::renderer::Renderer;

/// Path rasterization strategy, selected per context.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum RenderMode {
    /// CPU-triangulated meshes drawn with plain alpha blending.
    #[default]
    Tessellation,
    /// Two-pass winding accumulation in the stencil buffer, then a covering
    /// quad.
    StencilToCover,
}

/// Coarsest contour error, reached at quality 0.
const MAX_CONTOUR_ERROR: f32 = 8.0;
/// Finest contour error, reached at quality 1.
const MIN_CONTOUR_ERROR: f32 = 0.5;
/// Default quality; fine enough for screen-sized curves without nearing the
/// contour scratch capacity.
const DEFAULT_CONTOUR_QUALITY: f32 = 8.0 / 9.0;

/// Minimum contour vertices (fan apex included) for a stencil-to-cover draw.
const MIN_STENCIL_VERTICES: usize = 5;

/// Engine context: global settings, the buffer broker, and the path/paint
/// tables that handles index into.
///
/// Everything a frame needs flows through here explicitly; there are no
/// process-wide singletons. Destroyed path slots are tombstoned rather than
/// reused so a stale handle can never alias a newer object — draws through
/// one are skipped.
pub struct Context {
    mode: RenderMode,
    contour_quality: f32,
    contour_error: f32,
    broker: BufferBroker,
    paths: Vec<Option<RenderPath>>,
    paints: Vec<Option<RenderPaint>>,
}

impl Context {
    pub fn new() -> Self {
        let mut ctx = Self {
            mode: RenderMode::default(),
            contour_quality: 0.0,
            contour_error: 0.0,
            broker: BufferBroker::new(),
            paths: Vec::new(),
            paints: Vec::new(),
        };
        ctx.set_contour_quality(DEFAULT_CONTOUR_QUALITY);
        ctx
    }

    // ── settings ──────────────────────────────────────────────────────────

    /// Installs the GPU buffer callbacks. Must happen before the first draw;
    /// without them geometry uploads are dropped (events still flow).
    pub fn set_buffer_callbacks(&mut self, request: RequestBufferFn, destroy: DestroyBufferFn) {
        self.broker.set_callbacks(request, destroy);
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    #[inline]
    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }

    /// Maps quality in `[0, 1]` onto the contour error: higher quality, finer
    /// segments. Paths rebuilt under a different error recompute lazily.
    pub fn set_contour_quality(&mut self, quality: f32) {
        let q = quality.clamp(0.0, 1.0);
        self.contour_quality = q;
        self.contour_error = MAX_CONTOUR_ERROR + (MIN_CONTOUR_ERROR - MAX_CONTOUR_ERROR) * q;
    }

    #[inline]
    pub fn contour_quality(&self) -> f32 {
        self.contour_quality
    }

    #[inline]
    pub fn contour_error(&self) -> f32 {
        self.contour_error
    }

    // ── factories ─────────────────────────────────────────────────────────

    pub fn create_renderer(&self) -> Renderer {
        Renderer::new()
    }

    pub fn create_path(&mut self) -> PathId {
        let id = PathId(self.paths.len() as u32);
        self.paths.push(Some(RenderPath::new()));
        id
    }

    /// Releases the path's GPU buffers and tombstones its slot.
    pub fn destroy_path(&mut self, id: PathId) {
        if let Some(path) = self.take_path(id) {
            let b = path.buffers;
            self.broker.destroy(b.vertex);
            self.broker.destroy(b.index);
            self.broker.destroy(b.cover_vertex);
            self.broker.destroy(b.cover_index);
        }
    }

    pub fn create_paint(&mut self) -> PaintId {
        let id = PaintId(self.paints.len() as u32);
        self.paints.push(Some(RenderPaint::new()));
        id
    }

    pub fn destroy_paint(&mut self, id: PaintId) {
        if let Some(slot) = self.paints.get_mut(id.index()) {
            *slot = None;
        }
    }

    // ── lookups ───────────────────────────────────────────────────────────

    pub fn path(&self, id: PathId) -> Option<&RenderPath> {
        self.paths.get(id.index()).and_then(|s| s.as_ref())
    }

    pub fn path_mut(&mut self, id: PathId) -> Option<&mut RenderPath> {
        self.paths.get_mut(id.index()).and_then(|s| s.as_mut())
    }

    pub fn paint(&self, id: PaintId) -> Option<&RenderPaint> {
        self.paints.get(id.index()).and_then(|s| s.as_ref())
    }

    pub fn paint_mut(&mut self, id: PaintId) -> Option<&mut RenderPaint> {
        self.paints.get_mut(id.index()).and_then(|s| s.as_mut())
    }

    /// Current GPU handle bundle for a path (all `None` until first drawn).
    pub fn draw_buffers(&self, id: PathId) -> DrawBuffers {
        self.path(id).map(|p| p.buffers).unwrap_or_default()
    }

    /// Flat shader record for a paint (zeroed for a dead handle).
    pub fn paint_data(&self, id: PaintId) -> PaintUniform {
        self.paint(id).map(|p| p.uniform()).unwrap_or_default()
    }

    // ── mesh preparation ──────────────────────────────────────────────────

    pub(crate) fn take_path(&mut self, id: PathId) -> Option<RenderPath> {
        self.paths.get_mut(id.index()).and_then(|s| s.take())
    }

    pub(crate) fn put_path(&mut self, id: PathId, path: RenderPath) {
        if let Some(slot) = self.paths.get_mut(id.index()) {
            *slot = Some(path);
        }
    }

    /// Refreshes a leaf path's stencil-to-cover mesh and buffers when stale.
    /// Returns whether the path has enough geometry to draw. `want_stroke`
    /// additionally bakes stroke strips into the vertex upload.
    pub(crate) fn prepare_stencil_path(&mut self, id: PathId, want_stroke: bool) -> bool {
        let error = self.contour_error;
        let Some(mut path) = self.take_path(id) else { return false };

        let (variant_ok, has_stroke) = match &path.mesh {
            PathMesh::StencilCover(m) => (true, m.has_stroke),
            _ => (false, false),
        };
        if path.dirty
            || !variant_ok
            || !path.contour.has_apex
            || path.mesh_error_used != error
            || (want_stroke && !has_stroke)
        {
            path.ensure_contour(error, true);

            let fan_indices = build_fan_indices(&path.contour.runs);
            let cover_vertices = cover_quad(path.contour.bounds);
            let with_stroke = want_stroke || has_stroke;

            let base = path.contour.verts.len() as u32;
            let mut upload: Vec<PathVertex> =
                path.contour.verts.iter().map(|&v| PathVertex::from(v)).collect();
            let stroke_runs: Vec<(u32, u32)> = if with_stroke {
                let strip = build_stroke_strip(path.contour.run_views(), HAIRLINE_WIDTH);
                upload.extend(strip.verts.iter().map(|&v| PathVertex::from(v)));
                strip.runs.iter().map(|&(s, e)| (base + s, base + e)).collect()
            } else {
                Vec::new()
            };

            path.buffers.vertex =
                self.broker
                    .request(path.buffers.vertex, BufferKind::Vertex, bytemuck::cast_slice(&upload));
            path.buffers.index = self.broker.request(
                path.buffers.index,
                BufferKind::Index,
                bytemuck::cast_slice(&fan_indices),
            );
            path.buffers.cover_vertex = self.broker.request(
                path.buffers.cover_vertex,
                BufferKind::Vertex,
                bytemuck::cast_slice(&cover_vertices),
            );
            path.buffers.cover_index = self.broker.request(
                path.buffers.cover_index,
                BufferKind::Index,
                bytemuck::cast_slice(&COVER_INDICES),
            );

            path.mesh = PathMesh::StencilCover(StencilMesh {
                fan_indices,
                cover_vertices,
                stroke_runs,
                upload_len: upload.len() as u32,
                has_stroke: with_stroke,
            });
            path.mesh_error_used = error;
        }

        let drawable =
            path.contour.verts.len() >= MIN_STENCIL_VERTICES && path.contour.bounds.is_valid();
        self.put_path(id, path);
        drawable
    }

    /// Refreshes a path's tessellation mesh and buffers when stale; composite
    /// paths bake all descendant contours into one mesh. Returns whether the
    /// path has anything to draw. `want_stroke` additionally bakes stroke
    /// strips into the vertex upload.
    pub(crate) fn prepare_tessellation_path(&mut self, id: PathId, want_stroke: bool) -> bool {
        let error = self.contour_error;
        let needs = match self.path(id) {
            Some(p) => {
                let (variant_ok, has_stroke) = match &p.mesh {
                    PathMesh::Tessellation(m) => (true, m.has_stroke),
                    _ => (false, false),
                };
                !variant_ok
                    || p.mesh_error_used != error
                    || (want_stroke && !has_stroke)
                    || self.is_shape_dirty(id, 0)
            }
            None => return false,
        };

        if needs {
            let mut runs: Vec<PolyRun> = Vec::new();
            self.gather_contours(id, Mat2D::IDENTITY, 0, &mut runs);

            let Some(mut path) = self.take_path(id) else { return false };

            if path.fill_rule == FillRule::EvenOdd
                && runs.len() > 1
                && !alternates_winding(&runs)
                && !path.warned_even_odd
            {
                log::warn!(
                    "even-odd sub-paths do not alternate winding; parity-selected pipelines may misrender"
                );
                path.warned_even_odd = true;
            }

            let with_stroke = want_stroke
                || matches!(&path.mesh, PathMesh::Tessellation(m) if m.has_stroke);

            let (mut vertices, indices) = tessellate_fill(&runs, path.fill_rule);
            let base = vertices.len() as u32;
            let stroke_runs: Vec<(u32, u32)> = if with_stroke {
                let strip = build_stroke_strip(
                    runs.iter().map(|r| (r.points.as_slice(), r.closed)),
                    HAIRLINE_WIDTH,
                );
                vertices.extend(strip.verts.iter().map(|&v| PathVertex::from(v)));
                strip.runs.iter().map(|&(s, e)| (base + s, base + e)).collect()
            } else {
                Vec::new()
            };

            path.buffers.vertex = self.broker.request(
                path.buffers.vertex,
                BufferKind::Vertex,
                bytemuck::cast_slice(&vertices),
            );
            path.buffers.index = self.broker.request(
                path.buffers.index,
                BufferKind::Index,
                bytemuck::cast_slice(&indices),
            );

            path.mesh = PathMesh::Tessellation(TessMesh {
                vertices,
                indices,
                stroke_runs,
                has_stroke: with_stroke,
            });
            path.mesh_error_used = error;
            path.dirty = false;
            path.shape_dirty = false;
            self.put_path(id, path);
        }

        match self.path(id).map(|p| &p.mesh) {
            Some(PathMesh::Tessellation(m)) => !m.indices.is_empty() || !m.stroke_runs.is_empty(),
            _ => false,
        }
    }

    /// True when this path or any composite descendant changed shape since
    /// the last tessellation bake.
    fn is_shape_dirty(&self, id: PathId, depth: u8) -> bool {
        if depth > MAX_COMPOSITE_DEPTH {
            return false;
        }
        match self.path(id) {
            Some(p) => {
                p.shape_dirty
                    || p.children.iter().any(|c| self.is_shape_dirty(c.path, depth + 1))
            }
            None => false,
        }
    }

    /// Collects flattened contour runs of `id` and its descendants, with each
    /// child's transform baked into the points. The visited slot is emptied
    /// during recursion, so handle cycles terminate at the lookup.
    fn gather_contours(&mut self, id: PathId, xf: Mat2D, depth: u8, out: &mut Vec<PolyRun>) {
        if depth > MAX_COMPOSITE_DEPTH {
            log::warn!("composite path nesting exceeds {MAX_COMPOSITE_DEPTH}; deeper paths skipped");
            return;
        }
        let Some(mut path) = self.take_path(id) else { return };

        if path.children.is_empty() {
            path.ensure_contour(self.contour_error, false);
            let identity = xf == Mat2D::IDENTITY;
            for (points, closed) in path.contour.run_views() {
                let points = if identity {
                    points.to_vec()
                } else {
                    points.iter().map(|&p| xf.apply(p)).collect()
                };
                out.push(PolyRun { points, closed });
            }
            path.shape_dirty = false;
            self.put_path(id, path);
        } else {
            let children = path.children.clone();
            path.shape_dirty = false;
            // The slot stays empty while descending, so a handle cycle dies
            // at the lookup instead of recursing forever.
            for child in children {
                self.gather_contours(child.path, xf * child.transform, depth + 1, out);
            }
            self.put_path(id, path);
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        for slot in std::mem::take(&mut self.paths) {
            if let Some(path) = slot {
                let b = path.buffers;
                self.broker.destroy(b.vertex);
                self.broker.destroy(b.index);
                self.broker.destroy(b.cover_vertex);
                self.broker.destroy(b.cover_index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferHandle;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Counting mock that mints sequential handles and follows the
    /// create/update/replace contract.
    #[derive(Default)]
    struct BrokerLog {
        created: u32,
        updated: u32,
        destroyed: u32,
        sizes: std::collections::HashMap<u64, usize>,
    }

    fn install(ctx: &mut Context) -> Rc<RefCell<BrokerLog>> {
        let state = Rc::new(RefCell::new(BrokerLog::default()));
        let next = Rc::new(RefCell::new(1u64));

        let s1 = Rc::clone(&state);
        let n1 = Rc::clone(&next);
        let s2 = Rc::clone(&state);
        ctx.set_buffer_callbacks(
            Box::new(move |handle, _kind, data| {
                let mut log = s1.borrow_mut();
                match handle {
                    Some(h) if log.sizes.get(&h.raw()) == Some(&data.len()) => {
                        log.updated += 1;
                        Some(h)
                    }
                    other => {
                        if other.is_some() {
                            log.destroyed += 1;
                        }
                        let mut n = n1.borrow_mut();
                        let raw = *n;
                        *n += 1;
                        log.created += 1;
                        log.sizes.insert(raw, data.len());
                        BufferHandle::new(raw)
                    }
                }
            }),
            Box::new(move |_| {
                s2.borrow_mut().destroyed += 1;
            }),
        );
        state
    }

    fn rect_path(ctx: &mut Context) -> PathId {
        let id = ctx.create_path();
        let p = ctx.path_mut(id).unwrap();
        p.move_to(0.0, 0.0);
        p.line_to(10.0, 0.0);
        p.line_to(10.0, 10.0);
        p.line_to(0.0, 10.0);
        p.close();
        id
    }

    #[test]
    fn quality_maps_monotonically_to_error() {
        let mut ctx = Context::new();
        ctx.set_contour_quality(0.0);
        let coarse = ctx.contour_error();
        ctx.set_contour_quality(0.5);
        let mid = ctx.contour_error();
        ctx.set_contour_quality(1.0);
        let fine = ctx.contour_error();
        assert!(coarse > mid && mid > fine);
        assert!(fine > 0.0);
    }

    #[test]
    fn tessellation_prepare_builds_rect_mesh_once() {
        let mut ctx = Context::new();
        let log = install(&mut ctx);
        let id = rect_path(&mut ctx);

        assert!(ctx.prepare_tessellation_path(id, false));
        // Vertex + index buffer created, nothing destroyed.
        assert_eq!(log.borrow().created, 2);
        assert_eq!(log.borrow().destroyed, 0);

        // Unchanged path: no further uploads.
        assert!(ctx.prepare_tessellation_path(id, false));
        let l = log.borrow();
        assert_eq!((l.created, l.updated, l.destroyed), (2, 0, 0));
    }

    #[test]
    fn stencil_prepare_builds_all_four_buffers() {
        let mut ctx = Context::new();
        ctx.set_render_mode(RenderMode::StencilToCover);
        let log = install(&mut ctx);
        let id = rect_path(&mut ctx);

        assert!(ctx.prepare_stencil_path(id, false));
        assert_eq!(log.borrow().created, 4);

        let p = ctx.path(id).unwrap();
        assert_eq!(p.contour.verts.len(), 5);
        assert_eq!(p.contour.verts[0], crate::geom::Vec2::new(0.0, 0.0));
        match &p.mesh {
            PathMesh::StencilCover(m) => {
                // Three fan triangles plus the closing one.
                assert_eq!(m.fan_indices.len(), 12);
                assert_eq!(m.cover_vertices[2].pos, [10.0, 10.0]);
                assert_eq!(m.upload_len, 5);
                assert!(!m.has_stroke);
            }
            other => panic!("unexpected mesh {other:?}"),
        }
    }

    #[test]
    fn mutation_triggers_in_place_update() {
        let mut ctx = Context::new();
        let log = install(&mut ctx);
        let id = rect_path(&mut ctx);
        assert!(ctx.prepare_tessellation_path(id, false));

        // Move a corner: same vertex count, so the upload reuses the handle.
        let p = ctx.path_mut(id).unwrap();
        p.reset();
        p.move_to(0.0, 0.0);
        p.line_to(20.0, 0.0);
        p.line_to(20.0, 10.0);
        p.line_to(0.0, 10.0);
        p.close();
        assert!(ctx.prepare_tessellation_path(id, false));

        let l = log.borrow();
        assert_eq!(l.created, 2);
        assert_eq!(l.updated, 2);
        assert_eq!(l.destroyed, 0);
    }

    #[test]
    fn mode_switch_rebuilds_the_mesh_variant() {
        let mut ctx = Context::new();
        install(&mut ctx);
        let id = rect_path(&mut ctx);
        assert!(ctx.prepare_tessellation_path(id, false));
        assert!(matches!(ctx.path(id).unwrap().mesh, PathMesh::Tessellation(_)));

        ctx.set_render_mode(RenderMode::StencilToCover);
        assert!(ctx.prepare_stencil_path(id, false));
        assert!(matches!(ctx.path(id).unwrap().mesh, PathMesh::StencilCover(_)));
    }

    #[test]
    fn composite_bakes_children_and_cycle_lookups_terminate() {
        let mut ctx = Context::new();
        install(&mut ctx);
        let leaf = rect_path(&mut ctx);
        let parent = ctx.create_path();
        ctx.path_mut(parent)
            .unwrap()
            .add_path(leaf, Mat2D::from_translation(100.0, 0.0));
        // A cycle back to the parent: the emptied slot stops the recursion.
        ctx.path_mut(parent).unwrap().add_path(parent, Mat2D::IDENTITY);

        assert!(ctx.prepare_tessellation_path(parent, false));
        match &ctx.path(parent).unwrap().mesh {
            PathMesh::Tessellation(m) => {
                assert_eq!(m.indices.len(), 6);
                // Child transform baked into the vertices.
                assert!(m.vertices.iter().any(|v| v.pos[0] >= 100.0));
            }
            other => panic!("unexpected mesh {other:?}"),
        }
    }

    #[test]
    fn destroyed_path_draws_are_skipped_and_buffers_released() {
        let mut ctx = Context::new();
        let log = install(&mut ctx);
        let id = rect_path(&mut ctx);
        assert!(ctx.prepare_tessellation_path(id, false));

        ctx.destroy_path(id);
        assert_eq!(log.borrow().destroyed, 2);
        assert!(!ctx.prepare_tessellation_path(id, false));
        assert_eq!(ctx.draw_buffers(id), DrawBuffers::default());
    }

    #[test]
    fn triangle_is_too_small_for_stencil_mode() {
        let mut ctx = Context::new();
        install(&mut ctx);
        let id = ctx.create_path();
        let p = ctx.path_mut(id).unwrap();
        p.move_to(0.0, 0.0);
        p.line_to(10.0, 0.0);
        p.line_to(5.0, 10.0);
        p.close();
        // Apex + three vertices falls under the five-vertex floor.
        assert!(!ctx.prepare_stencil_path(id, false));
    }
}
