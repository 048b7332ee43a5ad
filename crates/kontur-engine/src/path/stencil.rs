use crate::geom::Bounds;

use super::contour::ContourRun;
use super::PathVertex;

/// Cover quad index order: two triangles over the four bound corners.
pub(crate) const COVER_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Builds the triangle-fan index list for the stencil pass.
///
/// Every contour vertex `k` yields the triangle `(0, k-1, k)` around the apex
/// in slot 0, and each run is sealed with `(0, last, first)` so the winding
/// sum is correct whether or not the commands closed it explicitly.
pub(crate) fn build_fan_indices(runs: &[ContourRun]) -> Vec<u32> {
    let mut indices = Vec::new();
    for run in runs {
        if run.len() < 2 {
            continue;
        }
        for k in run.start + 1..run.end {
            indices.extend_from_slice(&[0, k - 1, k]);
        }
        indices.extend_from_slice(&[0, run.end - 1, run.start]);
    }
    indices
}

/// Corner vertices of the bounding-box cover quad, wound to match
/// [`COVER_INDICES`].
pub(crate) fn cover_quad(bounds: Bounds) -> [PathVertex; 4] {
    [
        PathVertex { pos: [bounds.min.x, bounds.min.y] },
        PathVertex { pos: [bounds.max.x, bounds.min.y] },
        PathVertex { pos: [bounds.max.x, bounds.max.y] },
        PathVertex { pos: [bounds.min.x, bounds.max.y] },
    ]
}
