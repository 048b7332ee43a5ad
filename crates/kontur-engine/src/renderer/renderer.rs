use crate::core::{Context, RenderMode};
use crate::geom::Mat2D;
use crate::paint::{PaintId, PaintStyle};
use crate::path::{FillRule, PathChild, PathId, PathMesh, MAX_COMPOSITE_DEPTH};

use super::clip::{ClipDescriptor, ClipState};
use super::event::{DrawEvent, DrawEventKind};

/// Sub-path bookkeeping threaded through the stencil recursion: the running
/// leaf index and the winding sign of the previous even-odd sibling.
#[derive(Default)]
struct StencilWalk {
    next_idx: u32,
    prev_winding: Option<bool>,
    alternation_violated: bool,
}

/// Scene-facing renderer: consumes `save`/`restore`/`transform`/`clip_path`/
/// `draw_path` calls and emits the frame's ordered [`DrawEvent`] stream.
///
/// The renderer owns the event queue and the clip stack; path meshes and
/// paints live on the [`Context`] handed into each draw call. Multiple
/// renderers may record concurrently as long as they touch disjoint paths.
pub struct Renderer {
    events: Vec<DrawEvent>,
    clip: ClipState,
    transform: Mat2D,
    last_paint: Option<PaintId>,
    is_clipping: bool,
    clipping_supported: bool,
    disable_emitted: bool,
    warned_even_odd: bool,
}

impl Renderer {
    pub(crate) fn new() -> Self {
        Self {
            events: Vec::new(),
            clip: ClipState::new(),
            transform: Mat2D::IDENTITY,
            last_paint: None,
            is_clipping: false,
            clipping_supported: true,
            disable_emitted: false,
            warned_even_odd: false,
        }
    }

    /// Discards the previous frame entirely: event queue, save/restore
    /// stack, clip diff state, latched paint, current transform.
    pub fn new_frame(&mut self) {
        self.events.clear();
        self.clip.reset();
        self.transform = Mat2D::IDENTITY;
        self.last_paint = None;
        self.is_clipping = false;
        self.disable_emitted = false;
    }

    /// Turns the clipping protocol off; draws are emitted unclipped and a
    /// single `ClippingDisable` tells the backend.
    pub fn set_clipping_support(&mut self, enabled: bool) {
        self.clipping_supported = enabled;
    }

    // ── scene calls ───────────────────────────────────────────────────────

    pub fn save(&mut self) {
        self.clip.save(self.transform);
    }

    pub fn restore(&mut self) {
        match self.clip.restore() {
            Some(transform) => self.transform = transform,
            None => log::debug!("restore without matching save ignored"),
        }
    }

    /// Appends `m` to the current transform.
    pub fn transform(&mut self, m: Mat2D) {
        self.transform = self.transform * m;
    }

    #[inline]
    pub fn current_transform(&self) -> Mat2D {
        self.transform
    }

    /// Adds `path` (under the current transform) to the clip set in effect
    /// until the enclosing `restore`.
    pub fn clip_path(&mut self, path: PathId) {
        self.clip.push_clip(path, self.transform);
    }

    pub fn draw_path(&mut self, ctx: &mut Context, path: PathId, paint: PaintId) {
        let (style, visible) = match ctx.paint(paint) {
            Some(p) => (p.style(), p.is_visible()),
            None => return,
        };
        if !visible || ctx.path(path).is_none() {
            return;
        }

        self.apply_clipping(ctx);
        self.set_paint(paint);

        let world = self.transform;
        match (ctx.render_mode(), style) {
            (RenderMode::Tessellation, PaintStyle::Fill) => {
                self.emit_tessellation_fill(ctx, path, Some(paint), world, false);
            }
            (RenderMode::Tessellation, PaintStyle::Stroke) => {
                self.emit_tessellation_stroke(ctx, path, paint, world);
            }
            (RenderMode::StencilToCover, PaintStyle::Fill) => {
                let even_odd = ctx
                    .path(path)
                    .map(|p| p.fill_rule() == FillRule::EvenOdd)
                    .unwrap_or(false);
                let mut walk = StencilWalk::default();
                self.emit_stencil(ctx, path, Some(paint), world, &mut walk, even_odd, false, 0);
                if even_odd && walk.alternation_violated && !self.warned_even_odd {
                    log::warn!(
                        "even-odd sub-paths do not alternate winding; parity-selected pipelines may misrender"
                    );
                    self.warned_even_odd = true;
                }
                self.emit_cover(ctx, path, Some(paint), world, Mat2D::IDENTITY, false, 0);
            }
            (RenderMode::StencilToCover, PaintStyle::Stroke) => {
                self.emit_stroke_stencil_mode(ctx, path, paint, world, 0);
            }
        }
    }

    // ── event consumption ─────────────────────────────────────────────────

    #[inline]
    pub fn events(&self) -> &[DrawEvent] {
        &self.events
    }

    #[inline]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn event(&self, index: usize) -> Option<&DrawEvent> {
        self.events.get(index)
    }

    // ── paint latching ────────────────────────────────────────────────────

    fn set_paint(&mut self, paint: PaintId) {
        if self.last_paint == Some(paint) {
            return;
        }
        self.last_paint = Some(paint);
        let mut e = DrawEvent::new(DrawEventKind::SetPaint);
        e.paint = Some(paint);
        self.events.push(e);
    }

    // ── clipping protocol ─────────────────────────────────────────────────

    /// Reconciles the pending clip set with what the stencil holds. See the
    /// diff rules on [`ClipState`]; mask (re)builds are bracketed by
    /// `ClippingBegin`/`ClippingEnd` and an empty pending set while clipped
    /// emits `ClippingDisable`.
    fn apply_clipping(&mut self, ctx: &mut Context) {
        if !self.clipping_supported {
            if !self.disable_emitted {
                self.events.push(DrawEvent::new(DrawEventKind::ClippingDisable));
                self.disable_emitted = true;
            }
            self.is_clipping = false;
            return;
        }

        if !self.clip.is_dirty() {
            return;
        }
        self.clip.clear_dirty();

        if self.clip.pending().is_empty() {
            if self.is_clipping {
                self.events.push(DrawEvent::new(DrawEventKind::ClippingDisable));
                self.is_clipping = false;
                self.clip.clear_applied();
            }
            return;
        }

        if self.clip.pending_matches_applied() {
            self.is_clipping = true;
            return;
        }

        self.events.push(DrawEvent::new(DrawEventKind::ClippingBegin));
        self.is_clipping = true;

        let pending: Vec<ClipDescriptor> = self.clip.pending().to_vec();
        for clip in &pending {
            match ctx.render_mode() {
                RenderMode::StencilToCover => {
                    let even_odd = ctx
                        .path(clip.path)
                        .map(|p| p.fill_rule() == FillRule::EvenOdd)
                        .unwrap_or(false);
                    let mut walk = StencilWalk::default();
                    self.emit_stencil(
                        ctx,
                        clip.path,
                        None,
                        clip.transform,
                        &mut walk,
                        even_odd,
                        true,
                        0,
                    );
                    self.emit_cover(ctx, clip.path, None, clip.transform, Mat2D::IDENTITY, true, 0);
                }
                RenderMode::Tessellation => {
                    self.emit_tessellation_fill(ctx, clip.path, None, clip.transform, true);
                }
            }
        }

        let mut end = DrawEvent::new(DrawEventKind::ClippingEnd);
        end.applied_clip_count = pending.len() as u8;
        end.is_clipping = true;
        self.events.push(end);
        self.clip.mark_applied();
    }

    #[inline]
    fn draw_flags(&self, clipping_mask: bool) -> (bool, u8) {
        if clipping_mask {
            (true, 0)
        } else {
            (self.is_clipping, self.clip.applied_count())
        }
    }

    // ── stencil-to-cover emission ─────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn emit_stencil(
        &mut self,
        ctx: &mut Context,
        id: PathId,
        paint: Option<PaintId>,
        xf: Mat2D,
        walk: &mut StencilWalk,
        even_odd: bool,
        clipping_mask: bool,
        depth: u8,
    ) {
        if depth > MAX_COMPOSITE_DEPTH {
            return;
        }
        let children: Vec<PathChild> = match ctx.path(id) {
            Some(p) => p.children().to_vec(),
            None => return,
        };
        if !children.is_empty() {
            for child in children {
                self.emit_stencil(
                    ctx,
                    child.path,
                    paint,
                    xf * child.transform,
                    walk,
                    even_odd,
                    clipping_mask,
                    depth + 1,
                );
            }
            return;
        }

        if !ctx.prepare_stencil_path(id, false) {
            return;
        }

        if even_odd {
            if let Some(p) = ctx.path(id) {
                let area = p.contour_signed_area();
                if area != 0.0 {
                    let sign = area > 0.0;
                    if walk.prev_winding == Some(sign) {
                        walk.alternation_violated = true;
                    }
                    walk.prev_winding = Some(sign);
                }
            }
        }

        let idx = walk.next_idx;
        walk.next_idx += 1;

        let (is_clipping, applied_clip_count) = self.draw_flags(clipping_mask);
        let mut e = DrawEvent::new(DrawEventKind::DrawStencil);
        e.path = Some(id);
        e.paint = paint;
        e.transform_world = xf;
        e.idx = idx;
        e.is_even_odd = even_odd;
        e.is_clipping = is_clipping;
        e.applied_clip_count = applied_clip_count;
        self.events.push(e);
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_cover(
        &mut self,
        ctx: &mut Context,
        id: PathId,
        paint: Option<PaintId>,
        xf: Mat2D,
        local: Mat2D,
        clipping_mask: bool,
        depth: u8,
    ) {
        if depth > MAX_COMPOSITE_DEPTH {
            return;
        }
        let children: Vec<PathChild> = match ctx.path(id) {
            Some(p) => p.children().to_vec(),
            None => return,
        };
        if !children.is_empty() {
            for child in children {
                self.emit_cover(
                    ctx,
                    child.path,
                    paint,
                    xf * child.transform,
                    child.transform,
                    clipping_mask,
                    depth + 1,
                );
            }
            return;
        }

        if !ctx.prepare_stencil_path(id, false) {
            return;
        }

        let (is_clipping, applied_clip_count) = self.draw_flags(clipping_mask);
        let mut e = DrawEvent::new(DrawEventKind::DrawCover);
        e.path = Some(id);
        e.paint = paint;
        e.transform_world = xf;
        e.transform_local = local;
        e.is_clipping = is_clipping;
        e.applied_clip_count = applied_clip_count;
        self.events.push(e);
    }

    fn emit_stroke_stencil_mode(
        &mut self,
        ctx: &mut Context,
        id: PathId,
        paint: PaintId,
        xf: Mat2D,
        depth: u8,
    ) {
        if depth > MAX_COMPOSITE_DEPTH {
            return;
        }
        let children: Vec<PathChild> = match ctx.path(id) {
            Some(p) => p.children().to_vec(),
            None => return,
        };
        if !children.is_empty() {
            for child in children {
                self.emit_stroke_stencil_mode(ctx, child.path, paint, xf * child.transform, depth + 1);
            }
            return;
        }

        // The fill-side vertex floor does not apply to strokes; the prepare
        // still refreshes the shared vertex upload.
        let _ = ctx.prepare_stencil_path(id, true);
        let runs: Vec<(u32, u32)> = match ctx.path(id).map(|p| &p.mesh) {
            Some(PathMesh::StencilCover(m)) => m.stroke_runs.clone(),
            _ => return,
        };
        self.emit_stroke_runs(id, paint, xf, &runs);
    }

    // ── tessellation emission ─────────────────────────────────────────────

    fn emit_tessellation_fill(
        &mut self,
        ctx: &mut Context,
        id: PathId,
        paint: Option<PaintId>,
        xf: Mat2D,
        clipping_mask: bool,
    ) {
        if !ctx.prepare_tessellation_path(id, false) {
            return;
        }
        let has_fill = matches!(
            ctx.path(id).map(|p| &p.mesh),
            Some(PathMesh::Tessellation(m)) if !m.indices.is_empty()
        );
        if !has_fill {
            return;
        }

        let (is_clipping, applied_clip_count) = self.draw_flags(clipping_mask);
        let mut e = DrawEvent::new(DrawEventKind::Draw);
        e.path = Some(id);
        e.paint = paint;
        e.transform_world = xf;
        e.is_clipping = is_clipping;
        e.applied_clip_count = applied_clip_count;
        self.events.push(e);
    }

    fn emit_tessellation_stroke(&mut self, ctx: &mut Context, id: PathId, paint: PaintId, xf: Mat2D) {
        if !ctx.prepare_tessellation_path(id, true) {
            return;
        }
        let runs: Vec<(u32, u32)> = match ctx.path(id).map(|p| &p.mesh) {
            Some(PathMesh::Tessellation(m)) => m.stroke_runs.clone(),
            _ => return,
        };
        self.emit_stroke_runs(id, paint, xf, &runs);
    }

    fn emit_stroke_runs(&mut self, id: PathId, paint: PaintId, xf: Mat2D, runs: &[(u32, u32)]) {
        let (is_clipping, applied_clip_count) = self.draw_flags(false);
        for &(start, end) in runs {
            let mut e = DrawEvent::new(DrawEventKind::DrawStroke);
            e.path = Some(id);
            e.paint = Some(paint);
            e.transform_world = xf;
            e.offset_start = start;
            e.offset_end = end;
            e.is_clipping = is_clipping;
            e.applied_clip_count = applied_clip_count;
            self.events.push(e);
        }
    }
}
