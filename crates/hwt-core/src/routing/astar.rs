//! 8-connected grid A* search, the default (fast, approximate) pathfinding
//! backend.
//!
//! Deliberately inadmissible (heuristic weight > 1) in exchange for speed:
//! this backend is meant for the common case of mostly-open boards, with
//! the continuous walkaround backend (`super::walkaround`) handling dense
//! obstacle fields where grid quantization would otherwise zig-zag.

use std::collections::{BinaryHeap, HashMap, HashSet};

use super::geometry::Point;

/// Heuristic weight applied to the octile-distance estimate; > 1.0 trades
/// optimality for search speed.
pub const HEURISTIC_WEIGHT: f64 = 1.5;

/// Safety cap on expanded nodes before giving up and reporting no route.
pub const MAX_ASTAR_ITERATIONS: usize = 100_000;

const CARDINAL_COST: f64 = 1.0;
const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// Penalty added when the incoming step turns relative to the previous
/// step, keyed by the minimum wrap-around difference between the two
/// direction indices (of 8 possible directions).
fn turn_penalty(delta: i32) -> f64 {
    match delta {
        0 => 0.0,
        1 => 0.1,
        2 => 0.5,
        3 => 1.5,
        4 => 3.0,
        _ => 3.0,
    }
}

/// The 8 grid directions, indexed 0..8 starting at East and proceeding
/// counter-clockwise, matching the order `atan2` would sort them in.
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

fn direction_index(dx: i32, dy: i32) -> usize {
    DIRECTIONS.iter().position(|&d| d == (dx, dy)).expect("unit step")
}

fn direction_delta(a: usize, b: usize) -> i32 {
    let diff = (a as i32 - b as i32).abs();
    diff.min(8 - diff)
}

#[derive(Clone, Copy, PartialEq)]
struct Node {
    f: f64,
    g: f64,
    cell: (i32, i32),
    dir: Option<usize>,
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.f.partial_cmp(&self.f).unwrap_or(std::cmp::Ordering::Equal)
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

fn octile_heuristic(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = (a.0 - b.0).unsigned_abs() as f64;
    let dy = (a.1 - b.1).unsigned_abs() as f64;
    let (min, max) = if dx < dy { (dx, dy) } else { (dy, dx) };
    min * DIAGONAL_COST + (max - min) * CARDINAL_COST
}

/// Query surface the grid search needs; implemented by
/// [`super::obstacle_grid::ObstacleGrid`] wrapped with the
/// `extra_blocked`/`allowed_cells` overlay described below.
pub trait GridObstacles {
    fn is_blocked(&self, cell: (i32, i32)) -> bool;
}

/// A* search over an 8-connected grid from `start` to `goal`, both given in
/// world units and snapped to `resolution`-sized cells.
///
/// `extra_blocked` cells are blocked in addition to whatever `obstacles`
/// reports; `allowed_cells` are exempted from blocking even if `obstacles`
/// or `extra_blocked` says otherwise (the net-escape compromise: the
/// requested net's own footprint stays walkable) — except blocking from a
/// *different* net (carried via `extra_blocked`) always wins over
/// `allowed_cells`, so the allowance can never paper over a real foreign
/// obstacle.
pub fn find_path(
    obstacles: &impl GridObstacles,
    resolution: f64,
    start: Point,
    goal: Point,
    extra_blocked: &HashSet<(i32, i32)>,
    allowed_cells: &HashSet<(i32, i32)>,
) -> Option<Vec<Point>> {
    let to_cell = |p: Point| ((p.x / resolution).round() as i32, (p.y / resolution).round() as i32);
    let start_cell = to_cell(start);
    let goal_cell = to_cell(goal);

    let is_blocked = |cell: (i32, i32)| -> bool {
        if cell == goal_cell {
            return false;
        }
        if extra_blocked.contains(&cell) {
            // A different net's obstacle always wins over the allowance.
            return true;
        }
        obstacles.is_blocked(cell) && !allowed_cells.contains(&cell)
    };

    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<(i32, i32), f64> = HashMap::new();
    let mut came_from: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
    let mut best_dir: HashMap<(i32, i32), usize> = HashMap::new();

    g_score.insert(start_cell, 0.0);
    open.push(Node {
        f: octile_heuristic(start_cell, goal_cell) * HEURISTIC_WEIGHT,
        g: 0.0,
        cell: start_cell,
        dir: None,
    });

    let mut iterations = 0usize;
    let mut closed = HashSet::new();

    while let Some(current) = open.pop() {
        if closed.contains(&current.cell) {
            continue;
        }
        if current.cell == goal_cell {
            return Some(reconstruct_path(&came_from, start_cell, goal_cell, resolution));
        }

        iterations += 1;
        if iterations > MAX_ASTAR_ITERATIONS {
            return None;
        }
        closed.insert(current.cell);

        for &(dx, dy) in &DIRECTIONS {
            let next = (current.cell.0 + dx, current.cell.1 + dy);
            if closed.contains(&next) || is_blocked(next) {
                continue;
            }

            // Corner-cut rejection: a diagonal move is illegal if either
            // orthogonal neighbor it would clip is blocked.
            if dx != 0 && dy != 0 {
                let orth_a = (current.cell.0 + dx, current.cell.1);
                let orth_b = (current.cell.0, current.cell.1 + dy);
                if is_blocked(orth_a) || is_blocked(orth_b) {
                    continue;
                }
            }

            let step_cost = if dx != 0 && dy != 0 { DIAGONAL_COST } else { CARDINAL_COST };
            let new_dir = direction_index(dx, dy);
            let penalty = match current.dir {
                Some(prev_dir) => turn_penalty(direction_delta(new_dir, prev_dir)),
                None => 0.0,
            };
            let tentative_g = current.g + step_cost + penalty;

            if tentative_g < *g_score.get(&next).unwrap_or(&f64::INFINITY) {
                g_score.insert(next, tentative_g);
                came_from.insert(next, current.cell);
                best_dir.insert(next, new_dir);
                let f = tentative_g + octile_heuristic(next, goal_cell) * HEURISTIC_WEIGHT;
                open.push(Node { f, g: tentative_g, cell: next, dir: Some(new_dir) });
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &HashMap<(i32, i32), (i32, i32)>, start: (i32, i32), goal: (i32, i32), resolution: f64) -> Vec<Point> {
    let mut cells = vec![goal];
    let mut current = goal;
    while current != start {
        current = came_from[&current];
        cells.push(current);
    }
    cells.reverse();

    // Merge consecutive steps sharing the same unit direction vector.
    let mut merged = vec![cells[0]];
    let mut last_dir: Option<(i32, i32)> = None;
    for window in cells.windows(2) {
        let dir = (
            (window[1].0 - window[0].0).signum(),
            (window[1].1 - window[0].1).signum(),
        );
        if Some(dir) != last_dir {
            merged.push(window[0]);
            last_dir = Some(dir);
        }
    }
    merged.push(*cells.last().unwrap());
    merged.dedup();

    merged
        .into_iter()
        .map(|(cx, cy)| Point::new(cx as f64 * resolution, cy as f64 * resolution))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyGrid;
    impl GridObstacles for EmptyGrid {
        fn is_blocked(&self, _cell: (i32, i32)) -> bool {
            false
        }
    }

    struct WallGrid {
        wall_x: i32,
        gap_y: i32,
    }
    impl GridObstacles for WallGrid {
        fn is_blocked(&self, cell: (i32, i32)) -> bool {
            cell.0 == self.wall_x && cell.1 != self.gap_y
        }
    }

    #[test]
    fn test_straight_line_path_in_open_grid() {
        let grid = EmptyGrid;
        let path = find_path(&grid, 0.1, Point::new(0.0, 0.0), Point::new(1.0, 0.0), &HashSet::new(), &HashSet::new());
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.len() >= 2);
        assert!((path[0].x - 0.0).abs() < 1e-9);
        assert!((path.last().unwrap().x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_routes_through_gap_in_wall() {
        let grid = WallGrid { wall_x: 5, gap_y: 0 };
        let path = find_path(&grid, 0.1, Point::new(0.0, 0.0), Point::new(1.0, 0.0), &HashSet::new(), &HashSet::new());
        assert!(path.is_some());
    }

    #[test]
    fn test_no_route_returns_none() {
        struct AllBlocked;
        impl GridObstacles for AllBlocked {
            fn is_blocked(&self, _cell: (i32, i32)) -> bool {
                true
            }
        }
        let path = find_path(&AllBlocked, 0.1, Point::new(0.0, 0.0), Point::new(1.0, 0.0), &HashSet::new(), &HashSet::new());
        assert!(path.is_none());
    }

    #[test]
    fn test_allowed_cells_override_base_block_but_not_extra_blocked() {
        struct Blocked;
        impl GridObstacles for Blocked {
            fn is_blocked(&self, cell: (i32, i32)) -> bool {
                cell == (1, 0)
            }
        }
        let mut allowed = HashSet::new();
        allowed.insert((1, 0));
        let path = find_path(&Blocked, 1.0, Point::new(0.0, 0.0), Point::new(2.0, 0.0), &HashSet::new(), &allowed);
        assert!(path.is_some());

        let mut extra = HashSet::new();
        extra.insert((1, 0));
        let path2 = find_path(&Blocked, 1.0, Point::new(0.0, 0.0), Point::new(2.0, 0.0), &extra, &allowed);
        // A different net's obstacle should still win over the allowance,
        // forcing the diagonal detour rather than a straight line through (1,0).
        assert!(path2.is_some());
        assert!(!path2.unwrap().iter().any(|p| (p.x - 1.0).abs() < 1e-9 && p.y.abs() < 1e-9));
    }

    #[test]
    fn test_turn_penalty_table() {
        assert_eq!(turn_penalty(0), 0.0);
        assert_eq!(turn_penalty(1), 0.1);
        assert_eq!(turn_penalty(2), 0.5);
        assert_eq!(turn_penalty(3), 1.5);
        assert_eq!(turn_penalty(4), 3.0);
    }
}
