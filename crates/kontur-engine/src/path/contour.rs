use crate::geom::{segment_cubic, Bounds, Vec2};

use super::cmd::PathCommand;
use super::MAX_CONTOUR_VERTICES;

/// One polyline run inside a contour: vertex slots `start..end`.
///
/// Runs are separated only by `Close`; a `Move` while the pen is down simply
/// teleports the pen and the run continues with a chord jump, matching fill
/// semantics where every run is closed implicitly anyway. `closed` records
/// whether the run ended in an explicit `Close`, which is what stroke strips
/// key their wrap-around on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ContourRun {
    pub start: u32,
    pub end: u32,
    pub closed: bool,
}

impl ContourRun {
    #[inline]
    pub fn len(self) -> u32 {
        self.end - self.start
    }
}

/// Flattened contour scratch for a path: the polyline vertices, run table,
/// and running bounds.
///
/// When built for stencil-to-cover, slot 0 is reserved for the fan apex and
/// rewritten to the bounds minimum once the walk finishes.
#[derive(Debug, Clone, Default)]
pub struct Contour {
    pub verts: Vec<Vec2>,
    pub runs: Vec<ContourRun>,
    pub bounds: Bounds,
    pub truncated: bool,
    pub missing_move: bool,
    pub has_apex: bool,
    pub error_used: f32,
}

impl Contour {
    /// `(points, closed)` view of each run, as consumed by
    /// [`build_stroke_strip`].
    pub fn run_views(&self) -> impl Iterator<Item = (&[Vec2], bool)> {
        self.runs
            .iter()
            .map(|r| (&self.verts[r.start as usize..r.end as usize], r.closed))
    }

    pub fn clear(&mut self) {
        self.verts.clear();
        self.runs.clear();
        self.bounds = Bounds::EMPTY;
        self.truncated = false;
        self.missing_move = false;
        self.has_apex = false;
        self.error_used = 0.0;
    }
}

struct Walker<'a> {
    out: &'a mut Contour,
    pen: Vec2,
    pen_down: bool,
    pen_down_pos: Vec2,
    run_start: u32,
    seen_move: bool,
}

impl Walker<'_> {
    fn add_vertex(&mut self, p: Vec2) {
        if self.out.verts.len() >= MAX_CONTOUR_VERTICES {
            self.out.truncated = true;
            return;
        }
        self.out.verts.push(p);
        self.out.bounds.add(p);
    }

    fn ensure_pen_down(&mut self) {
        if self.pen_down {
            return;
        }
        self.pen_down = true;
        self.pen_down_pos = self.pen;
        if !self.seen_move {
            self.out.missing_move = true;
        }
        self.run_start = self.out.verts.len() as u32;
        self.add_vertex(self.pen);
    }

    fn end_run(&mut self, closed: bool) {
        let end = self.out.verts.len() as u32;
        if end > self.run_start {
            self.out.runs.push(ContourRun { start: self.run_start, end, closed });
        }
        self.pen_down = false;
    }
}

/// Walks the command list into `out`, flattening cubics with the given
/// contour error. `with_apex` reserves slot 0 for the stencil fan apex.
pub fn compute_contour(commands: &[PathCommand], error: f32, with_apex: bool, out: &mut Contour) {
    out.clear();
    out.has_apex = with_apex;
    out.error_used = error;

    if with_apex {
        out.verts.push(Vec2::zero());
    }

    let min_segment_length_sq = error * error;
    let dist_too_far = error;

    let mut w = Walker {
        out,
        pen: Vec2::zero(),
        pen_down: false,
        pen_down_pos: Vec2::zero(),
        run_start: 0,
        seen_move: false,
    };

    for cmd in commands {
        match *cmd {
            PathCommand::Move(p) => {
                w.pen = p;
                w.seen_move = true;
            }
            PathCommand::Line(p) => {
                w.ensure_pen_down();
                w.add_vertex(p);
                w.pen = p;
            }
            PathCommand::Cubic { out_ctl, in_ctl, to } => {
                w.ensure_pen_down();
                let from = w.pen;
                // The walker owns vertex emission so capacity and bounds
                // tracking stay in one place.
                segment_cubic(
                    from,
                    out_ctl,
                    in_ctl,
                    to,
                    0.0,
                    1.0,
                    min_segment_length_sq,
                    dist_too_far,
                    &mut |p| w.add_vertex(p),
                );
                w.pen = to;
            }
            PathCommand::Close => {
                if w.pen_down {
                    w.pen = w.pen_down_pos;
                    w.end_run(true);
                }
            }
        }
    }

    // An unterminated run still fills as if closed.
    if w.pen_down {
        w.end_run(false);
    }
    let out = w.out;

    if with_apex {
        if out.bounds.is_valid() {
            out.verts[0] = out.bounds.min;
        }
        if out.verts.len() == 1 {
            // Apex only, nothing drawable.
            out.verts.clear();
        }
    }
}

/// Shoelace signed area of one run's polygon. Positive means the run winds
/// counter-clockwise in y-up coordinates.
pub fn run_signed_area(verts: &[Vec2]) -> f32 {
    if verts.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut prev = verts[verts.len() - 1];
    for &v in verts {
        sum += prev.cross(v);
        prev = v;
    }
    sum * 0.5
}

// ── stroke strips ─────────────────────────────────────────────────────────

/// Triangle-strip stroke geometry: two extruded vertices per polyline point,
/// plus a repeated leading pair on closed runs so the loop seals.
#[derive(Debug, Clone, Default)]
pub struct StrokeStrip {
    pub verts: Vec<Vec2>,
    /// Per-run `[start, end)` vertex ranges into `verts`.
    pub runs: Vec<(u32, u32)>,
}

/// Extrudes each polyline run into a strip of `width`-thick quads using
/// averaged edge normals (no joins or caps; those knobs are reserved on the
/// paint). Runs are `(points, closed)` views so both the contour scratch and
/// composite-gathered polygons feed the same builder.
pub fn build_stroke_strip<'a, I>(runs: I, width: f32) -> StrokeStrip
where
    I: IntoIterator<Item = (&'a [Vec2], bool)>,
{
    let hw = width * 0.5;
    let mut strip = StrokeStrip::default();

    for (pts, closed) in runs {
        if pts.len() < 2 {
            continue;
        }

        let start = strip.verts.len() as u32;
        let n = pts.len();
        for i in 0..n {
            let prev = if i > 0 {
                pts[i - 1]
            } else if closed {
                pts[n - 1]
            } else {
                pts[0]
            };
            let next = if i + 1 < n {
                pts[i + 1]
            } else if closed {
                pts[0]
            } else {
                pts[n - 1]
            };

            let dir = ((pts[i] - prev) + (next - pts[i])).normalized_or_zero();
            let normal = if dir == Vec2::zero() {
                Vec2::new(0.0, 1.0)
            } else {
                dir.perp()
            };

            strip.verts.push(pts[i] + normal * hw);
            strip.verts.push(pts[i] - normal * hw);
        }
        if closed {
            let a = strip.verts[start as usize];
            let b = strip.verts[start as usize + 1];
            strip.verts.push(a);
            strip.verts.push(b);
        }

        strip.runs.push((start, strip.verts.len() as u32));
    }

    strip
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_commands() -> Vec<PathCommand> {
        vec![
            PathCommand::Move(Vec2::new(0.0, 0.0)),
            PathCommand::Line(Vec2::new(10.0, 0.0)),
            PathCommand::Line(Vec2::new(10.0, 10.0)),
            PathCommand::Line(Vec2::new(0.0, 10.0)),
            PathCommand::Close,
        ]
    }

    #[test]
    fn rect_walk_produces_four_vertices_one_run() {
        let mut c = Contour::default();
        compute_contour(&rect_commands(), 1.0, false, &mut c);
        assert_eq!(c.verts.len(), 4);
        assert_eq!(c.runs.len(), 1);
        assert_eq!(c.runs[0], ContourRun { start: 0, end: 4, closed: true });
        assert_eq!(c.bounds.min, Vec2::new(0.0, 0.0));
        assert_eq!(c.bounds.max, Vec2::new(10.0, 10.0));
        assert!(!c.truncated);
        assert!(!c.missing_move);
    }

    #[test]
    fn apex_slot_is_rewritten_to_bounds_min() {
        let mut c = Contour::default();
        compute_contour(&rect_commands(), 1.0, true, &mut c);
        assert_eq!(c.verts.len(), 5);
        assert_eq!(c.verts[0], Vec2::new(0.0, 0.0));
        assert_eq!(c.runs[0], ContourRun { start: 1, end: 5, closed: true });
    }

    #[test]
    fn every_vertex_stays_inside_bounds() {
        let cmds = vec![
            PathCommand::Move(Vec2::new(0.0, 0.0)),
            PathCommand::Cubic {
                out_ctl: Vec2::new(50.0, 0.0),
                in_ctl: Vec2::new(50.0, 100.0),
                to: Vec2::new(100.0, 100.0),
            },
        ];
        let mut c = Contour::default();
        compute_contour(&cmds, 1.0, false, &mut c);
        assert!(c.verts.len() > 2);
        for &v in &c.verts {
            assert!(c.bounds.contains(v), "{v:?} outside {:?}", c.bounds);
        }
    }

    #[test]
    fn unterminated_run_is_kept_open() {
        let cmds = vec![
            PathCommand::Move(Vec2::new(0.0, 0.0)),
            PathCommand::Line(Vec2::new(5.0, 0.0)),
        ];
        let mut c = Contour::default();
        compute_contour(&cmds, 1.0, false, &mut c);
        assert_eq!(c.runs.len(), 1);
        assert!(!c.runs[0].closed);
    }

    #[test]
    fn drawing_without_move_is_flagged() {
        let cmds = vec![PathCommand::Line(Vec2::new(5.0, 5.0))];
        let mut c = Contour::default();
        compute_contour(&cmds, 1.0, false, &mut c);
        assert!(c.missing_move);
        // Pen starts at the origin, so the run is (0,0) -> (5,5).
        assert_eq!(c.verts[0], Vec2::zero());
    }

    #[test]
    fn capacity_overflow_truncates_and_flags() {
        let mut cmds = vec![PathCommand::Move(Vec2::zero())];
        for i in 0..(MAX_CONTOUR_VERTICES + 10) {
            cmds.push(PathCommand::Line(Vec2::new(i as f32, 0.0)));
        }
        let mut c = Contour::default();
        compute_contour(&cmds, 1.0, false, &mut c);
        assert!(c.truncated);
        assert_eq!(c.verts.len(), MAX_CONTOUR_VERTICES);
    }

    #[test]
    fn finer_error_never_drops_vertices() {
        let cmds = vec![
            PathCommand::Move(Vec2::new(0.0, 0.0)),
            PathCommand::Cubic {
                out_ctl: Vec2::new(50.0, 0.0),
                in_ctl: Vec2::new(50.0, 100.0),
                to: Vec2::new(100.0, 100.0),
            },
            PathCommand::Close,
        ];
        let mut counts = Vec::new();
        for error in [8.0, 2.0, 0.5] {
            let mut c = Contour::default();
            compute_contour(&cmds, error, false, &mut c);
            counts.push(c.verts.len());
        }
        assert!(counts[0] < counts[1] && counts[1] < counts[2], "{counts:?}");
    }

    #[test]
    fn signed_area_sign_tracks_winding() {
        let ccw = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        let cw: Vec<Vec2> = ccw.iter().rev().copied().collect();
        assert!(run_signed_area(&ccw) > 0.0);
        assert!(run_signed_area(&cw) < 0.0);
    }

    #[test]
    fn stroke_strip_doubles_vertices_and_wraps_closed_runs() {
        let mut c = Contour::default();
        compute_contour(&rect_commands(), 1.0, false, &mut c);
        let strip = build_stroke_strip(
            c.runs.iter().map(|r| (&c.verts[r.start as usize..r.end as usize], r.closed)),
            1.0,
        );
        assert_eq!(strip.runs.len(), 1);
        // 4 points * 2 + repeated leading pair.
        assert_eq!(strip.verts.len(), 10);
        assert_eq!(strip.runs[0], (0, 10));
        // Leading pair repeated verbatim at the end.
        assert_eq!(strip.verts[0], strip.verts[8]);
        assert_eq!(strip.verts[1], strip.verts[9]);
    }
}
