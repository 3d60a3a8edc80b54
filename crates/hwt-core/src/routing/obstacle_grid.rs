//! Discretized occupancy grid backing the A* pathfinding backend.
//!
//! Each cell is `resolution` units wide (default 0.025mm); a cell is
//! "blocked" if its center falls within `clearance` of any same-layer,
//! different-net copper. Dilation by a pathfinding agent's own half-width is
//! memoized since the same radius gets requested on every A* call for a
//! given net/width combination.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::board::{Board, NetId};
use super::geometry::Point;

/// Default grid cell size, in board units (mm).
pub const DEFAULT_RESOLUTION: f64 = 0.025;

/// Grid radius (in cells, rounded) pre-warmed at construction time, covering
/// the common ~0.125mm half-width + clearance dilation up front.
const PREWARM_RADIUS_MM: f64 = 0.125;

pub struct ObstacleGrid {
    pub resolution: f64,
    layer: String,
    blocked: HashSet<(i32, i32)>,
    dilated_cache: RefCell<HashMap<i32, HashSet<(i32, i32)>>>,
}

impl ObstacleGrid {
    /// Build a grid for `layer` marking every pad/trace/via/edge-cut not
    /// belonging to `allowed_net_id` (pass `None` to block everything).
    pub fn build(board: &Board, layer: &str, resolution: f64, clearance: f64, allowed_net_id: Option<NetId>) -> Self {
        let mut grid = Self {
            resolution,
            layer: layer.to_string(),
            blocked: HashSet::new(),
            dilated_cache: RefCell::new(HashMap::new()),
        };

        for pad in board.pads_on_layer(layer) {
            if Some(pad.net_id) == allowed_net_id {
                continue;
            }
            grid.mark_pad(pad, clearance);
        }
        for trace in board.traces_on_layer(layer) {
            if Some(trace.net_id) == allowed_net_id {
                continue;
            }
            grid.mark_capsule(trace.start, trace.end, trace.width / 2.0 + clearance);
        }
        for via in &board.vias {
            if Some(via.net_id) == allowed_net_id {
                continue;
            }
            grid.mark_disc(via.center, via.outer_size / 2.0 + clearance);
        }
        for (start, end) in &board.edge_cuts {
            grid.mark_capsule(*start, *end, clearance);
        }

        grid.prewarm();
        grid
    }

    fn to_cell(&self, p: Point) -> (i32, i32) {
        ((p.x / self.resolution).round() as i32, (p.y / self.resolution).round() as i32)
    }

    fn mark_disc(&mut self, center: Point, radius: f64) {
        let (ccx, ccy) = self.to_cell(center);
        let cell_radius = (radius / self.resolution).ceil() as i32;
        for dx in -cell_radius..=cell_radius {
            for dy in -cell_radius..=cell_radius {
                let p = Point::new((ccx + dx) as f64 * self.resolution, (ccy + dy) as f64 * self.resolution);
                if p.distance_to(center) <= radius {
                    self.blocked.insert((ccx + dx, ccy + dy));
                }
            }
        }
    }

    fn mark_capsule(&mut self, start: Point, end: Point, radius: f64) {
        let (min_cx, min_cy) = self.to_cell(Point::new(start.x.min(end.x) - radius, start.y.min(end.y) - radius));
        let (max_cx, max_cy) = self.to_cell(Point::new(start.x.max(end.x) + radius, start.y.max(end.y) + radius));
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                let p = Point::new(cx as f64 * self.resolution, cy as f64 * self.resolution);
                if super::geometry::point_to_segment_distance(p, start, end) <= radius {
                    self.blocked.insert((cx, cy));
                }
            }
        }
    }

    fn mark_pad(&mut self, pad: &super::shapes::RoutingPad, clearance: f64) {
        let radius = pad.bounding_radius(clearance);
        let (min_cx, min_cy) = self.to_cell(Point::new(pad.center.x - radius, pad.center.y - radius));
        let (max_cx, max_cy) = self.to_cell(Point::new(pad.center.x + radius, pad.center.y + radius));
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                let p = Point::new(cx as f64 * self.resolution, cy as f64 * self.resolution);
                if super::shapes::distance_to_pad(p, pad) <= clearance {
                    self.blocked.insert((cx, cy));
                }
            }
        }
    }

    fn prewarm(&self) {
        let radius_cells = (PREWARM_RADIUS_MM / self.resolution).round() as i32;
        self.dilate(radius_cells);
    }

    /// Blocked-cell set dilated outward by `radius_cells` grid cells (the
    /// pathfinding agent's own half-width expressed in cells), memoized.
    pub fn dilate(&self, radius_cells: i32) -> std::cell::Ref<'_, HashSet<(i32, i32)>> {
        if !self.dilated_cache.borrow().contains_key(&radius_cells) {
            let dilated = self.compute_dilation(radius_cells);
            self.dilated_cache.borrow_mut().insert(radius_cells, dilated);
        }
        std::cell::Ref::map(self.dilated_cache.borrow(), |cache| &cache[&radius_cells])
    }

    fn compute_dilation(&self, radius_cells: i32) -> HashSet<(i32, i32)> {
        if radius_cells <= 0 {
            return self.blocked.clone();
        }
        let offsets: Vec<(i32, i32)> = (-radius_cells..=radius_cells)
            .flat_map(|dx| (-radius_cells..=radius_cells).map(move |dy| (dx, dy)))
            .filter(|(dx, dy)| ((*dx * dx + dy * dy) as f64).sqrt() <= radius_cells as f64)
            .collect();

        let mut dilated = HashSet::with_capacity(self.blocked.len() * offsets.len().max(1));
        for &(cx, cy) in &self.blocked {
            for &(dx, dy) in &offsets {
                dilated.insert((cx + dx, cy + dy));
            }
        }
        dilated
    }

    pub fn is_blocked(&self, cell: (i32, i32), radius_cells: i32) -> bool {
        self.dilate(radius_cells).contains(&cell)
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::shapes::{PadShape, RoutingPad};

    fn board_with_pad() -> Board {
        let mut board = Board::default();
        board.pads.push(RoutingPad {
            center: Point::new(1.0, 1.0),
            width: 0.5,
            height: 0.5,
            shape: PadShape::Circle,
            angle: 0.0,
            roundrect_ratio: 0.25,
            layers: vec!["F.Cu".to_string()],
            net_id: NetId(1),
        });
        board
    }

    #[test]
    fn test_pad_center_is_blocked() {
        let board = board_with_pad();
        let grid = ObstacleGrid::build(&board, "F.Cu", 0.05, 0.2, None);
        let cell = grid.to_cell(Point::new(1.0, 1.0));
        assert!(grid.is_blocked(cell, 0));
    }

    #[test]
    fn test_allowed_net_id_is_not_blocked() {
        let board = board_with_pad();
        let grid = ObstacleGrid::build(&board, "F.Cu", 0.05, 0.2, Some(NetId(1)));
        let cell = grid.to_cell(Point::new(1.0, 1.0));
        assert!(!grid.is_blocked(cell, 0));
    }

    #[test]
    fn test_dilation_expands_blocked_region() {
        let board = board_with_pad();
        let grid = ObstacleGrid::build(&board, "F.Cu", 0.05, 0.2, None);
        let far_cell = grid.to_cell(Point::new(1.0 + 0.5, 1.0));
        let small = grid.is_blocked(far_cell, 0);
        let large = grid.is_blocked(far_cell, 20);
        assert!(large || !small);
    }

    #[test]
    fn test_far_point_unblocked() {
        let board = board_with_pad();
        let grid = ObstacleGrid::build(&board, "F.Cu", 0.05, 0.2, None);
        let cell = grid.to_cell(Point::new(50.0, 50.0));
        assert!(!grid.is_blocked(cell, 0));
    }
}
