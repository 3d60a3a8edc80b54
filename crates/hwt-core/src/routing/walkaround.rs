//! Continuous hull-boundary-walking pathfinder, the backend used when
//! obstacle density makes grid quantization (`super::astar`) produce
//! unnecessary zig-zags.
//!
//! At each step: take the straight line to the goal if it's clear, else
//! walk the nearest blocking hull's boundary toward whichever direction
//! re-establishes a clear line of sight soonest.

use std::collections::HashSet;

use super::board::NetId;
use super::geometry::Point;
use super::hull_map::{HullId, HullMap};
use super::hulls::Hull;

pub const MAX_WALKAROUND_ITERATIONS: usize = 1000;
const STALL_THRESHOLD: usize = 20;
const PROGRESS_IMPROVEMENT: f64 = 0.05;

/// Per-segment bias used by reference/companion-guided routing (§4.11): a
/// deviation penalty that pulls the chosen walkaround direction toward
/// staying `spacing` away from `reference_path` rather than toward the
/// geometrically shortest detour.
pub struct CompanionGuide<'a> {
    pub reference_path: &'a [Point],
    pub spacing: f64,
}

/// Walk from `start` to `goal` around whatever hulls on `hull_map` block the
/// direct line, excluding the requesting net's own hulls. Returns the
/// walked polyline (inclusive of `start` and `goal`), or `None` if the
/// search stalls or exceeds the iteration cap.
pub fn walk(hull_map: &HullMap, start: Point, goal: Point, net_id: NetId, half_width: f64) -> Option<Vec<Point>> {
    walk_guided(hull_map, start, goal, net_id, half_width, DEFAULT_CORNER_OFFSET, None)
}

/// Default hull-vertex stand-off (§6's `corner_offset` tunable), used by the
/// plain [`walk`] entry point; [`walk_guided`] callers that have a
/// `RouterConfig` in scope should pass its `corner_offset` explicitly.
pub const DEFAULT_CORNER_OFFSET: f64 = 0.1;

/// Same as [`walk`], but with an optional [`CompanionGuide`] biasing the
/// CW/CCW direction choice at each step toward staying at `spacing` from
/// `reference_path`, and an explicit `corner_offset` added to `half_width`
/// when computing each hull-vertex stand-off (§4.9: `V' = V + normal *
/// (half_width + corner_offset)`; the escape maneuver in step 3 uses plain
/// `half_width`, so the two can't share one parameter).
pub fn walk_guided(hull_map: &HullMap, start: Point, goal: Point, net_id: NetId, half_width: f64, corner_offset: f64, guide: Option<&CompanionGuide>) -> Option<Vec<Point>> {
    let mut path = vec![start];
    let mut current = start;
    let mut stall_count = 0usize;
    let mut best_remaining = current.distance_to(goal);
    let mut visited: HashSet<HullId> = HashSet::new();

    for _ in 0..MAX_WALKAROUND_ITERATIONS {
        if has_line_of_sight(hull_map, current, goal, net_id) {
            path.push(goal);
            return Some(path);
        }

        let blockers = hull_map.blocking_hulls(current, goal, net_id);
        let Some(blocking) = blockers.first() else {
            // Reported blocked but nothing found: treat as clear (grid vs.
            // continuous disagreement at the boundary).
            path.push(goal);
            return Some(path);
        };

        if visited.contains(&blocking.id) {
            let Some(escape) = escape_maneuver(current, goal, half_width, 0) else {
                return None;
            };
            if hull_map.point_inside_any_hull(escape, net_id) {
                return None;
            }
            path.push(escape);
            current = escape;
            continue;
        }
        visited.insert(blocking.id);

        let hull = hull_map.hull(blocking.id);

        let next = step_around_hull(hull, blocking.edge_index, current, goal, hull_map, net_id, half_width, corner_offset, guide);
        let Some(next) = next else {
            return None;
        };

        let remaining = next.distance_to(goal);
        if remaining < best_remaining * (1.0 - PROGRESS_IMPROVEMENT) {
            stall_count = 0;
            best_remaining = remaining;
        } else {
            stall_count += 1;
            if stall_count >= STALL_THRESHOLD {
                return None;
            }
        }

        path.push(next);
        current = next;
        visited.clear();
    }

    None
}

fn has_line_of_sight(hull_map: &HullMap, from: Point, to: Point, net_id: NetId) -> bool {
    hull_map.blocking_hulls(from, to, net_id).is_empty()
}

/// Pick the candidate vertex (the entry edge's start vertex walking
/// clockwise, or its end vertex walking counter-clockwise) that best
/// progresses toward `goal`: prefer whichever direction re-establishes
/// line of sight soonest, otherwise the shorter of (distance walked so far
/// + remaining distance to goal).
fn step_around_hull(hull: &Hull, entry_edge: usize, current: Point, goal: Point, hull_map: &HullMap, net_id: NetId, half_width: f64, corner_offset: f64, guide: Option<&CompanionGuide>) -> Option<Point> {
    let n = hull.polygon.len();
    let standoff = half_width + corner_offset;

    // Walk starts from the entry edge's endpoints: its start vertex going
    // clockwise, its end vertex going counter-clockwise.
    let cw_candidate = candidate_at(hull, entry_edge, standoff);
    let ccw_candidate = candidate_at(hull, (entry_edge + 1) % n, standoff);

    let candidates: Vec<Point> = [cw_candidate, ccw_candidate]
        .into_iter()
        .flatten()
        .filter(|p| !point_inside_other_hull(hull_map, *p, hull, net_id))
        .collect();

    if candidates.is_empty() {
        // Escape maneuver: step perpendicular to the current heading by
        // three half-widths.
        return escape_maneuver(current, goal, half_width, n);
    }

    candidates
        .into_iter()
        .min_by(|a, b| score_candidate(*a, current, goal, hull_map, net_id, guide).partial_cmp(&score_candidate(*b, current, goal, hull_map, net_id, guide)).unwrap())
}

fn score_candidate(candidate: Point, current: Point, goal: Point, hull_map: &HullMap, net_id: NetId, guide: Option<&CompanionGuide>) -> f64 {
    let penalty = guide.map(deviation_penalty(candidate)).unwrap_or(0.0);
    if has_line_of_sight(hull_map, candidate, goal, net_id) {
        return -1.0 + penalty; // Always preferred: re-establishes sight immediately.
    }
    current.distance_to(candidate) + candidate.distance_to(goal) + penalty
}

/// `0.5 * (distance_to_reference - spacing)^2`, biasing direction choice
/// toward candidates that stay at the target spacing from the reference
/// path rather than the geometrically shortest detour.
fn deviation_penalty(candidate: Point) -> impl Fn(&CompanionGuide) -> f64 {
    move |guide: &CompanionGuide| {
        let dist = distance_to_polyline(candidate, guide.reference_path);
        0.5 * (dist - guide.spacing).powi(2)
    }
}

fn distance_to_polyline(p: Point, polyline: &[Point]) -> f64 {
    polyline
        .windows(2)
        .map(|w| super::geometry::point_to_segment_distance(p, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Compute the offset candidate point at vertex `idx`'s bisector.
fn candidate_at(hull: &Hull, idx: usize, standoff: f64) -> Option<Point> {
    let n = hull.polygon.len();
    if n == 0 {
        return None;
    }

    let vertex = hull.polygon[idx];
    let prev = hull.polygon[(idx + n - 1) % n];
    let next = hull.polygon[(idx + 1) % n];

    let normal_in = outward_normal(prev, vertex);
    let normal_out = outward_normal(vertex, next);
    let bisector = normalize_sum(normal_in, normal_out).unwrap_or(normal_in);

    Some(Point::new(vertex.x + bisector.x * standoff, vertex.y + bisector.y * standoff))
}

/// Outward normal of the edge `a -> b`: the edge direction rotated 90°
/// clockwise, `(dx, dy) -> (dy, -dx)`.
fn outward_normal(a: Point, b: Point) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt().max(1e-9);
    Point::new(dy / len, -dx / len)
}

fn normalize_sum(a: Point, b: Point) -> Option<Point> {
    let sum = Point::new(a.x + b.x, a.y + b.y);
    let len = (sum.x * sum.x + sum.y * sum.y).sqrt();
    if len < 1e-6 {
        // Reflex corner: bisector is degenerate, fall back to either normal.
        return None;
    }
    Some(Point::new(sum.x / len, sum.y / len))
}

fn point_inside_other_hull(hull_map: &HullMap, p: Point, own_hull: &Hull, net_id: NetId) -> bool {
    let _ = own_hull;
    hull_map.point_inside_any_hull(p, net_id)
}

fn escape_maneuver(current: Point, goal: Point, half_width: f64, _sides: usize) -> Option<Point> {
    let dx = goal.x - current.x;
    let dy = goal.y - current.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-9 {
        return None;
    }
    let perp = Point::new(-dy / len, dx / len);
    Some(Point::new(current.x + perp.x * half_width * 3.0, current.y + perp.y * half_width * 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::board::{Board, NO_NET};
    use crate::routing::shapes::{PadShape, RoutingPad};

    fn board_with_obstacle() -> Board {
        let mut board = Board::default();
        board.pads.push(RoutingPad {
            center: Point::new(5.0, 0.0),
            width: 2.0,
            height: 2.0,
            shape: PadShape::Circle,
            angle: 0.0,
            roundrect_ratio: 0.25,
            layers: vec!["F.Cu".to_string()],
            net_id: NO_NET,
        });
        board
    }

    #[test]
    fn test_clear_line_returns_direct_path() {
        let board = Board::default();
        let hull_map = HullMap::build(&board, "F.Cu", 0.2);
        let path = walk(&hull_map, Point::new(0.0, 0.0), Point::new(10.0, 0.0), NetId(1), 0.1);
        assert_eq!(path, Some(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]));
    }

    #[test]
    fn test_walk_around_single_obstacle_reaches_goal() {
        let board = board_with_obstacle();
        let hull_map = HullMap::build(&board, "F.Cu", 0.2);
        let path = walk(&hull_map, Point::new(0.0, 0.0), Point::new(10.0, 0.0), NetId(1), 0.1);
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.len() > 2);
        let last = *path.last().unwrap();
        assert!((last.x - 10.0).abs() < 1e-6 && (last.y - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_outward_normal_rotation_convention() {
        let n = outward_normal(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert!((n.x - 0.0).abs() < 1e-9);
        assert!((n.y - (-1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_deviation_penalty_is_zero_at_target_spacing() {
        let reference = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let guide = CompanionGuide { reference_path: &reference, spacing: 1.0 };
        let candidate = Point::new(5.0, 1.0);
        let penalty = deviation_penalty(candidate)(&guide);
        assert!(penalty.abs() < 1e-9);
    }

    #[test]
    fn test_deviation_penalty_grows_with_distance_from_spacing() {
        let reference = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let guide = CompanionGuide { reference_path: &reference, spacing: 1.0 };
        let near = deviation_penalty(Point::new(5.0, 1.2))(&guide);
        let far = deviation_penalty(Point::new(5.0, 4.0))(&guide);
        assert!(far > near);
    }

    #[test]
    fn test_walk_guided_with_companion_guide_still_reaches_goal() {
        let board = board_with_obstacle();
        let hull_map = HullMap::build(&board, "F.Cu", 0.2);
        let reference = vec![Point::new(0.0, 0.0), Point::new(5.0, 2.0), Point::new(10.0, 0.0)];
        let guide = CompanionGuide { reference_path: &reference, spacing: 1.0 };
        let path = walk_guided(&hull_map, Point::new(0.0, 0.0), Point::new(10.0, 0.0), NetId(1), 0.1, DEFAULT_CORNER_OFFSET, Some(&guide));
        assert!(path.is_some());
        let last = *path.unwrap().last().unwrap();
        assert!((last.x - 10.0).abs() < 1e-6 && (last.y - 0.0).abs() < 1e-6);
    }
}
