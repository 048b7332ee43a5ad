use lyon::math::point;
use lyon::path::Path as LyonPath;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule as LyonFillRule, FillTessellator, FillVertex,
    VertexBuffers,
};

use crate::geom::Vec2;

use super::cmd::FillRule;
use super::contour::run_signed_area;
use super::PathVertex;

/// One flattened polygon run gathered from a path (or its composite
/// descendants), already in the drawn path's local space.
#[derive(Debug, Clone)]
pub(crate) struct PolyRun {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

/// Triangulates the gathered runs under the path's fill rule.
///
/// The runs are pure polylines (cubics were flattened by the contour walker),
/// so lyon's own curve tolerance never kicks in and the contour-quality knob
/// stays the single source of segment density. Tessellation failures log once
/// per call and yield an empty mesh, keeping the frame alive.
pub(crate) fn tessellate_fill(
    runs: &[PolyRun],
    fill_rule: FillRule,
) -> (Vec<PathVertex>, Vec<u32>) {
    let mut builder = LyonPath::builder();
    let mut any = false;
    for run in runs {
        if run.points.len() < 3 {
            continue;
        }
        any = true;
        builder.begin(point(run.points[0].x, run.points[0].y));
        for p in &run.points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(true);
    }
    if !any {
        return (Vec::new(), Vec::new());
    }
    let path = builder.build();

    let rule = match fill_rule {
        FillRule::NonZero => LyonFillRule::NonZero,
        FillRule::EvenOdd => LyonFillRule::EvenOdd,
    };
    let options = FillOptions::default().with_fill_rule(rule);

    let mut geometry: VertexBuffers<PathVertex, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    let result = tessellator.tessellate_path(
        &path,
        &options,
        &mut BuffersBuilder::new(&mut geometry, |vertex: FillVertex| PathVertex {
            pos: vertex.position().to_array(),
        }),
    );

    if let Err(err) = result {
        log::warn!("fill tessellation failed: {err:?}; path rendered empty");
        return (Vec::new(), Vec::new());
    }

    (geometry.vertices, geometry.indices)
}

/// Checks the even-odd composite assumption: consecutive runs must alternate
/// winding direction for parity-based stencil pipelines to see nesting.
pub(crate) fn alternates_winding(runs: &[PolyRun]) -> bool {
    let mut prev_sign: Option<bool> = None;
    for run in runs {
        let area = run_signed_area(&run.points);
        if area == 0.0 {
            continue;
        }
        let sign = area > 0.0;
        if prev_sign == Some(sign) {
            return false;
        }
        prev_sign = Some(sign);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_run(x: f32, y: f32, w: f32, h: f32, ccw: bool) -> PolyRun {
        let mut points = vec![
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ];
        if !ccw {
            points.reverse();
        }
        PolyRun { points, closed: true }
    }

    #[test]
    fn rectangle_fills_with_two_triangles() {
        let (verts, indices) = tessellate_fill(&[rect_run(0.0, 0.0, 10.0, 10.0, true)], FillRule::NonZero);
        assert_eq!(verts.len(), 4);
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn even_odd_ring_leaves_hole() {
        let outer = rect_run(0.0, 0.0, 30.0, 30.0, true);
        let inner = rect_run(10.0, 10.0, 10.0, 10.0, false);
        let (verts, indices) = tessellate_fill(&[outer, inner], FillRule::EvenOdd);
        // A ring triangulates with all eight corners and eight triangles.
        assert_eq!(verts.len(), 8);
        assert_eq!(indices.len(), 24);
    }

    #[test]
    fn explicit_closing_point_keeps_triangle_count() {
        let closed = rect_run(0.0, 0.0, 10.0, 10.0, true);
        let mut manual = closed.clone();
        manual.points.push(manual.points[0]);

        let (_, closed_idx) = tessellate_fill(&[closed], FillRule::NonZero);
        let (_, manual_idx) = tessellate_fill(&[manual], FillRule::NonZero);
        assert_eq!(closed_idx.len(), manual_idx.len());
    }

    #[test]
    fn degenerate_runs_produce_empty_mesh() {
        let line = PolyRun { points: vec![Vec2::zero(), Vec2::new(5.0, 0.0)], closed: false };
        let (verts, indices) = tessellate_fill(&[line], FillRule::NonZero);
        assert!(verts.is_empty() && indices.is_empty());
    }

    #[test]
    fn alternation_check_accepts_nested_ring() {
        let runs = [rect_run(0.0, 0.0, 30.0, 30.0, true), rect_run(10.0, 10.0, 10.0, 10.0, false)];
        assert!(alternates_winding(&runs));
    }

    #[test]
    fn alternation_check_rejects_same_winding_siblings() {
        let runs = [rect_run(0.0, 0.0, 30.0, 30.0, true), rect_run(10.0, 10.0, 10.0, 10.0, true)];
        assert!(!alternates_winding(&runs));
    }
}
