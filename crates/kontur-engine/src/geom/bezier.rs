use super::Vec2;

/// Parameter span below which a segment is emitted unconditionally. Each split
/// halves the span, so this caps the recursion depth per curve.
const MIN_PARAM_SPAN: f32 = 1.0 / 8192.0;

/// Distance from `p` to the infinite line through `a`..`b`.
///
/// Falls back to the point distance when the chord is degenerate.
#[inline]
fn line_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    (p - a).cross(ab).abs() / len_sq.sqrt()
}

/// Adaptively subdivides the cubic Bézier `(from, from_out, to_in, to)` over
/// the parameter span `t1..t2` and feeds the resulting polyline endpoints to
/// `emit` (the `from` endpoint itself is not emitted).
///
/// A span is split at its parametric midpoint (De Casteljau) while either
/// control point strays farther than `dist_too_far` from the chord, or the
/// squared chord length exceeds `min_segment_length_sq`. Both thresholds come
/// from the engine's contour error: `dist_too_far = error`,
/// `min_segment_length_sq = error²`.
#[allow(clippy::too_many_arguments)]
pub fn segment_cubic<F: FnMut(Vec2)>(
    from: Vec2,
    from_out: Vec2,
    to_in: Vec2,
    to: Vec2,
    t1: f32,
    t2: f32,
    min_segment_length_sq: f32,
    dist_too_far: f32,
    emit: &mut F,
) {
    if t2 - t1 <= MIN_PARAM_SPAN {
        emit(to);
        return;
    }

    let deviation = line_distance(from_out, from, to).max(line_distance(to_in, from, to));
    let chord_sq = (to - from).length_squared();
    if deviation <= dist_too_far && chord_sq <= min_segment_length_sq {
        emit(to);
        return;
    }

    let tm = (t1 + t2) * 0.5;

    let ab = from.midpoint(from_out);
    let bc = from_out.midpoint(to_in);
    let cd = to_in.midpoint(to);
    let abc = ab.midpoint(bc);
    let bcd = bc.midpoint(cd);
    let mid = abc.midpoint(bcd);

    segment_cubic(from, ab, abc, mid, t1, tm, min_segment_length_sq, dist_too_far, emit);
    segment_cubic(mid, bcd, cd, to, tm, t2, min_segment_length_sq, dist_too_far, emit);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(error: f32) -> Vec<Vec2> {
        let mut out = Vec::new();
        segment_cubic(
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(50.0, 100.0),
            Vec2::new(100.0, 100.0),
            0.0,
            1.0,
            error * error,
            error,
            &mut |p| out.push(p),
        );
        out
    }

    #[test]
    fn finer_error_emits_more_points() {
        let coarse = flatten(8.0).len();
        let medium = flatten(2.0).len();
        let fine = flatten(0.5).len();
        assert!(coarse < medium, "{coarse} vs {medium}");
        assert!(medium < fine, "{medium} vs {fine}");
    }

    #[test]
    fn emitted_points_stay_inside_control_hull_bounds() {
        // The hull of this curve is the box (0,0)-(100,100); every flattened
        // point must stay inside it.
        for p in flatten(1.0) {
            assert!(p.x >= -1e-4 && p.x <= 100.0 + 1e-4, "{p:?}");
            assert!(p.y >= -1e-4 && p.y <= 100.0 + 1e-4, "{p:?}");
        }
    }

    #[test]
    fn last_emitted_point_is_the_endpoint() {
        let pts = flatten(4.0);
        assert_eq!(*pts.last().unwrap(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn degenerate_curve_terminates() {
        // All four points coincide; must emit exactly the endpoint.
        let mut out = Vec::new();
        let p = Vec2::new(5.0, 5.0);
        segment_cubic(p, p, p, p, 0.0, 1.0, 0.25, 0.5, &mut |v| out.push(v));
        assert_eq!(out, vec![p]);
    }
}
