//! Nine-pass polyline optimizer enforcing 45°/90°-only routing discipline.
//!
//! Every pass is a pure function of `(polyline, hull_map)`; the hull map is
//! optional so unit tests can exercise the purely geometric passes (dedup,
//! collinear merge) without constructing a board. When absent,
//! clearance-dependent passes degrade to pass-through rather than
//! optimistically accepting a shortcut they can't verify is clear.

use super::board::NetId;
use super::geometry::Point;
use super::hull_map::HullMap;

const DEDUP_DISTANCE: f64 = 0.05;
const COLLINEAR_TOLERANCE_DEG: f64 = 5.0;
const DIRECTION_CHANGE_THRESHOLD_DEG: f64 = 30.0;
const MIN_SEGMENT_LENGTH: f64 = 0.2;

/// Optional clearance context threaded through every pass.
pub struct OptimizerContext<'a> {
    pub hull_map: Option<&'a HullMap>,
    pub net_id: NetId,
    pub half_width: f64,
}

impl<'a> OptimizerContext<'a> {
    pub fn none(net_id: NetId, half_width: f64) -> Self {
        Self { hull_map: None, net_id, half_width }
    }

    fn is_clear(&self, a: Point, b: Point) -> bool {
        match self.hull_map {
            Some(hull_map) => hull_map.blocking_hulls(a, b, self.net_id).is_empty(),
            None => true,
        }
    }
}

/// Run all nine passes in order, returning the optimized polyline.
pub fn optimize(polyline: &[Point], ctx: &OptimizerContext) -> Vec<Point> {
    let mut path = polyline.to_vec();
    path = dedup_points(&path);
    path = enforce_45_degree(&path, ctx);
    path = merge_collinear(&path);
    path = remove_backtracks(&path, ctx);
    path = eliminate_axis_reversals(&path, ctx);
    path = shortcut_corners(&path, ctx);
    path = minimize_direction_changes(&path, ctx);
    path = drop_short_segments(&path, ctx);
    merge_collinear(&path)
}

fn dedup_points(polyline: &[Point]) -> Vec<Point> {
    if polyline.is_empty() {
        return Vec::new();
    }
    let mut out = vec![polyline[0]];
    for &p in &polyline[1..] {
        if p.distance_to(*out.last().unwrap()) >= DEDUP_DISTANCE {
            out.push(p);
        }
    }
    out
}

fn angle_of(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

fn is_45_discipline(angle: f64) -> bool {
    let normalized = angle.rem_euclid(360.0);
    let remainder = normalized % 45.0;
    remainder < 1e-6 || (45.0 - remainder) < 1e-6
}

/// Insert a dogleg corner at any non-45°/90° segment: a diagonal run
/// covering `min(adx, ady)` on both axes, plus a straight run along the
/// dominant axis covering the remainder, in either order. Prefers whichever
/// order is clearance-free.
fn enforce_45_degree(polyline: &[Point], ctx: &OptimizerContext) -> Vec<Point> {
    if polyline.len() < 2 {
        return polyline.to_vec();
    }
    let mut out = vec![polyline[0]];
    for window in polyline.windows(2) {
        let (a, b) = (window[0], window[1]);
        let angle = angle_of(a, b);
        if is_45_discipline(angle) {
            out.push(b);
            continue;
        }

        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let adx = dx.abs();
        let ady = dy.abs();
        let sx = dx.signum();
        let sy = dy.signum();

        // Diagonal run covers min(adx, ady) on both axes; the straight run
        // covers the remainder along whichever axis is dominant.
        let (diagonal_first, straight_first) = if adx >= ady {
            let diag_end = Point::new(a.x + sx * ady, a.y + dy);
            let straight_end = Point::new(a.x + sx * (adx - ady), a.y);
            (diag_end, straight_end)
        } else {
            let diag_end = Point::new(a.x + dx, a.y + sy * adx);
            let straight_end = Point::new(a.x, a.y + sy * (ady - adx));
            (diag_end, straight_end)
        };

        let diagonal_first_clear = ctx.is_clear(a, diagonal_first) && ctx.is_clear(diagonal_first, b);
        let straight_first_clear = ctx.is_clear(a, straight_first) && ctx.is_clear(straight_first, b);

        if diagonal_first_clear {
            out.push(diagonal_first);
        } else if straight_first_clear {
            out.push(straight_first);
        } else {
            // Neither order is clearance-verified; fall back to diagonal
            // first rather than leaving a non-45° segment.
            out.push(diagonal_first);
        }
        out.push(b);
    }
    out
}

fn merge_collinear(polyline: &[Point]) -> Vec<Point> {
    if polyline.len() < 3 {
        return polyline.to_vec();
    }
    let mut out = vec![polyline[0]];
    for i in 1..polyline.len() - 1 {
        let prev = *out.last().unwrap();
        let curr = polyline[i];
        let next = polyline[i + 1];
        if prev.distance_to(curr) < 1e-9 || curr.distance_to(next) < 1e-9 {
            continue;
        }
        let angle_in = angle_of(prev, curr);
        let angle_out = angle_of(curr, next);
        let diff = angle_diff(angle_in, angle_out);
        if diff > COLLINEAR_TOLERANCE_DEG {
            out.push(curr);
        }
    }
    out.push(*polyline.last().unwrap());
    out
}

fn angle_diff(a: f64, b: f64) -> f64 {
    let mut diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 {
        diff = 360.0 - diff;
    }
    diff
}

/// Scan 4-9 point windows for a shorter, clearance-free 45°-dogleg
/// replacement spanning the window's endpoints.
fn remove_backtracks(polyline: &[Point], ctx: &OptimizerContext) -> Vec<Point> {
    if polyline.len() < 4 {
        return polyline.to_vec();
    }

    let mut out = polyline.to_vec();
    let max_window = 9.min(out.len());

    let mut window_size = max_window;
    while window_size >= 4 {
        let mut i = 0;
        while i + window_size <= out.len() {
            let start = out[i];
            let end = out[i + window_size - 1];
            if let Some(dogleg) = shortest_clearance_free_dogleg(start, end, ctx) {
                let replacement_len: f64 = std::iter::once(start).chain(dogleg.clone()).chain(std::iter::once(end))
                    .collect::<Vec<_>>()
                    .windows(2)
                    .map(|w| w[0].distance_to(w[1]))
                    .sum();
                let original_len: f64 = out[i..i + window_size].windows(2).map(|w| w[0].distance_to(w[1])).sum();
                if replacement_len < original_len - 1e-6 {
                    let mut replacement = vec![start];
                    replacement.extend(dogleg);
                    replacement.push(end);
                    out.splice(i..i + window_size, replacement.clone());
                    i += replacement.len();
                    continue;
                }
            }
            i += 1;
        }
        window_size -= 1;
    }

    out
}

/// Shorter of the two single-dogleg corners between `a` and `b`, if
/// clearance-free; `None` if neither is.
fn shortest_clearance_free_dogleg(a: Point, b: Point, ctx: &OptimizerContext) -> Option<Vec<Point>> {
    let corner_h = Point::new(b.x, a.y);
    let corner_v = Point::new(a.x, b.y);

    let mut candidates = Vec::new();
    if ctx.is_clear(a, corner_h) && ctx.is_clear(corner_h, b) {
        candidates.push(vec![corner_h]);
    }
    if ctx.is_clear(a, corner_v) && ctx.is_clear(corner_v, b) {
        candidates.push(vec![corner_v]);
    }
    if ctx.is_clear(a, b) {
        candidates.push(vec![]);
    }

    candidates.into_iter().min_by(|x, y| {
        let len_x: f64 = std::iter::once(a).chain(x.iter().copied()).chain(std::iter::once(b)).collect::<Vec<_>>().windows(2).map(|w| w[0].distance_to(w[1])).sum();
        let len_y: f64 = std::iter::once(a).chain(y.iter().copied()).chain(std::iter::once(b)).collect::<Vec<_>>().windows(2).map(|w| w[0].distance_to(w[1])).sum();
        len_x.partial_cmp(&len_y).unwrap()
    })
}

/// Replace an X-then-Y-then-X (or Y-then-X-then-Y) wiggle with a direct
/// X-then-Y (or Y-then-X) dogleg when clearance-free.
fn eliminate_axis_reversals(polyline: &[Point], ctx: &OptimizerContext) -> Vec<Point> {
    if polyline.len() < 4 {
        return polyline.to_vec();
    }
    let mut out = Vec::with_capacity(polyline.len());
    out.push(polyline[0]);
    let mut i = 0;
    while i + 3 < polyline.len() {
        let (a, b, c, d) = (polyline[i], polyline[i + 1], polyline[i + 2], polyline[i + 3]);
        if is_axis_aligned(a, b) && is_axis_aligned(b, c) && is_axis_aligned(c, d) {
            let axis_ab = dominant_axis(a, b);
            let axis_bc = dominant_axis(b, c);
            let axis_cd = dominant_axis(c, d);
            if axis_ab == axis_cd && axis_ab != axis_bc {
                let direct_corner = match axis_ab {
                    Axis::X => Point::new(d.x, a.y),
                    Axis::Y => Point::new(a.x, d.y),
                };
                if ctx.is_clear(a, direct_corner) && ctx.is_clear(direct_corner, d) {
                    out.push(direct_corner);
                    out.push(d);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(b);
        i += 1;
    }
    while i + 1 < polyline.len() {
        out.push(polyline[i + 1]);
        i += 1;
    }
    out
}

#[derive(PartialEq, Eq, Debug)]
enum Axis {
    X,
    Y,
}

fn dominant_axis(a: Point, b: Point) -> Axis {
    if (b.x - a.x).abs() >= (b.y - a.y).abs() {
        Axis::X
    } else {
        Axis::Y
    }
}

fn is_axis_aligned(a: Point, b: Point) -> bool {
    (b.x - a.x).abs() < 1e-6 || (b.y - a.y).abs() < 1e-6
}

/// Greedily shortcut the farthest visible vertex reachable by a single
/// 45°-constrained line from the current point.
fn shortcut_corners(polyline: &[Point], ctx: &OptimizerContext) -> Vec<Point> {
    if polyline.len() < 3 {
        return polyline.to_vec();
    }
    let mut out = vec![polyline[0]];
    let mut i = 0;
    while i < polyline.len() - 1 {
        let mut farthest = i + 1;
        for j in (i + 2..polyline.len()).rev() {
            let candidate = polyline[j];
            let current = polyline[i];
            let angle = angle_of(current, candidate);
            if is_45_discipline(angle) && ctx.is_clear(current, candidate) {
                farthest = j;
                break;
            }
        }
        out.push(polyline[farthest]);
        i = farthest;
    }
    out
}

/// Any turn greater than 30° is replaced by a clearance-free 45°-dogleg if
/// one exists.
fn minimize_direction_changes(polyline: &[Point], ctx: &OptimizerContext) -> Vec<Point> {
    if polyline.len() < 3 {
        return polyline.to_vec();
    }
    let mut out = vec![polyline[0]];
    for i in 1..polyline.len() - 1 {
        let prev = *out.last().unwrap();
        let curr = polyline[i];
        let next = polyline[i + 1];
        let angle_in = angle_of(prev, curr);
        let angle_out = angle_of(curr, next);
        let turn = angle_diff(angle_in, angle_out);
        if turn > DIRECTION_CHANGE_THRESHOLD_DEG {
            if let Some(dogleg) = shortest_clearance_free_dogleg(prev, next, ctx) {
                out.extend(dogleg);
                continue;
            }
        }
        out.push(curr);
    }
    out.push(*polyline.last().unwrap());
    out
}

/// Drop segments shorter than 0.2mm, rejoining the gap with a 45° dogleg.
fn drop_short_segments(polyline: &[Point], ctx: &OptimizerContext) -> Vec<Point> {
    if polyline.len() < 2 {
        return polyline.to_vec();
    }
    let mut out = vec![polyline[0]];
    let mut i = 1;
    while i < polyline.len() {
        let prev = *out.last().unwrap();
        let curr = polyline[i];
        if prev.distance_to(curr) < MIN_SEGMENT_LENGTH && i + 1 < polyline.len() {
            let next = polyline[i + 1];
            if let Some(dogleg) = shortest_clearance_free_dogleg(prev, next, ctx) {
                out.extend(dogleg);
                out.push(next);
                i += 2;
                continue;
            }
        }
        out.push(curr);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::board::NO_NET;

    fn ctx() -> OptimizerContext<'static> {
        OptimizerContext::none(NO_NET, 0.1)
    }

    #[test]
    fn test_dedup_removes_close_points() {
        let path = vec![Point::new(0.0, 0.0), Point::new(0.01, 0.0), Point::new(5.0, 0.0)];
        let result = dedup_points(&path);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_merge_collinear_removes_straight_through_vertex() {
        let path = vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)];
        let result = merge_collinear(&path);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_merge_collinear_keeps_real_corner() {
        let path = vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)];
        let result = merge_collinear(&path);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_enforce_45_degree_inserts_dogleg() {
        let path = vec![Point::new(0.0, 0.0), Point::new(10.0, 3.0)];
        let result = enforce_45_degree(&path, &ctx());
        assert!(result.len() >= 3);
        for window in result.windows(2) {
            let angle = angle_of(window[0], window[1]);
            assert!(is_45_discipline(angle));
        }
    }

    #[test]
    fn test_full_pipeline_end_to_end_is_stable() {
        let path = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 0.001),
            Point::new(10.0, 7.0),
        ];
        let result = optimize(&path, &ctx());
        assert!(!result.is_empty());
        assert!((result[0].x - 0.0).abs() < 1e-6 && (result[0].y - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_eliminate_axis_reversal_wiggle() {
        let path = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 5.0),
        ];
        let result = eliminate_axis_reversals(&path, &ctx());
        assert!(result.len() <= path.len());
    }
}
