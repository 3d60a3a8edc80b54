//! Router facade: the single entry point callers use to route traces,
//! check via placements, and manage in-flight (pending) traces.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::astar::{self, GridObstacles};
use super::board::{Board, NetId, COPPER_LAYERS, NO_NET};
use super::errors::{RouteError, ViaError};
use super::geometry::Point;
use super::hull_map::HullMap;
use super::obstacle_grid::ObstacleGrid;
use super::optimizer::{self, OptimizerContext};
use super::pending::{PendingTrace, PendingTraceStore};
use super::spatial_index::{ElementRef, SpatialIndex};
use super::walkaround;

/// Tunable routing parameters. `Default` matches the original tool's
/// hard-coded constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub clearance: f64,
    pub grid_resolution: f64,
    pub heuristic_weight: f64,
    pub max_astar_iterations: usize,
    pub max_walkaround_iterations: usize,
    pub stall_threshold: usize,
    pub progress_improvement: f64,
    pub corner_offset: f64,
    pub chamfer_ratio: f64,
    pub via_default_size: f64,
    pub via_default_drill: f64,
    pub cache_obstacles: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            clearance: 0.2,
            grid_resolution: 0.025,
            heuristic_weight: astar::HEURISTIC_WEIGHT,
            max_astar_iterations: astar::MAX_ASTAR_ITERATIONS,
            max_walkaround_iterations: walkaround::MAX_WALKAROUND_ITERATIONS,
            stall_threshold: 20,
            progress_improvement: 0.05,
            corner_offset: 0.1,
            chamfer_ratio: super::hulls::CHAMFER_RATIO,
            via_default_size: 0.8,
            via_default_drill: 0.4,
            cache_obstacles: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteBackend {
    Walkaround,
    AstarGrid,
}

#[derive(Debug, Clone)]
pub struct RouteResult {
    pub polyline: Vec<Point>,
    pub backend: RouteBackend,
}

struct GridOverlay<'a> {
    grid: &'a ObstacleGrid,
    radius_cells: i32,
}

impl GridObstacles for GridOverlay<'_> {
    fn is_blocked(&self, cell: (i32, i32)) -> bool {
        self.grid.is_blocked(cell, self.radius_cells)
    }
}

pub struct Router<'a> {
    board: &'a Board,
    config: RouterConfig,
    hull_maps: RefCell<HashMap<String, HullMap>>,
    obstacle_grids: RefCell<HashMap<String, ObstacleGrid>>,
    pending: RefCell<PendingTraceStore>,
    spatial_index: SpatialIndex,
}

impl<'a> Router<'a> {
    pub fn new(board: &'a Board, config: RouterConfig) -> Self {
        let spatial_index = SpatialIndex::build(board, 1.0, config.clearance);
        let router = Self {
            board,
            config,
            hull_maps: RefCell::new(HashMap::new()),
            obstacle_grids: RefCell::new(HashMap::new()),
            pending: RefCell::new(PendingTraceStore::new()),
            spatial_index,
        };
        if router.config.cache_obstacles {
            for layer in COPPER_LAYERS {
                router.obstacle_grid_for(layer, None);
            }
        }
        router
    }

    fn inflation(&self, width: f64) -> f64 {
        self.config.clearance + width / 2.0
    }

    fn hull_map_for(&self, layer: &str, width: f64) -> std::cell::RefMut<'_, HullMap> {
        let key = format!("{layer}@{width}");
        if !self.hull_maps.borrow().contains_key(&key) {
            let map = HullMap::build(self.board, layer, self.inflation(width));
            self.hull_maps.borrow_mut().insert(key.clone(), map);
        }
        std::cell::RefMut::map(self.hull_maps.borrow_mut(), |maps| maps.get_mut(&key).unwrap())
    }

    fn obstacle_grid_for(&self, layer: &str, allowed_net_id: Option<NetId>) -> std::cell::Ref<'_, ObstacleGrid> {
        let key = format!("{layer}:{:?}", allowed_net_id);
        if !self.obstacle_grids.borrow().contains_key(&key) {
            let grid = ObstacleGrid::build(self.board, layer, self.config.grid_resolution, self.config.clearance, allowed_net_id);
            self.obstacle_grids.borrow_mut().insert(key.clone(), grid);
        }
        std::cell::Ref::map(self.obstacle_grids.borrow(), |grids| &grids[&key])
    }

    /// Route a trace from `start` to `end` on `layer` for `net_id`. Tries
    /// the continuous walkaround backend first, falling back to the A* grid
    /// backend on failure.
    pub fn route(&self, start: Point, end: Point, layer: &str, width: f64, net_id: NetId) -> Result<RouteResult, RouteError> {
        self.route_impl(start, end, layer, width, net_id, None)
    }

    /// Reference/companion-guided routing: thread the route through
    /// waypoints derived from `reference_path`, skipping the optimizer.
    pub fn route_with_reference(&self, start: Point, end: Point, layer: &str, width: f64, net_id: NetId, reference_path: &[Point], spacing: f64) -> Result<RouteResult, RouteError> {
        self.route_impl(start, end, layer, width, net_id, Some((reference_path, spacing)))
    }

    fn route_impl(&self, start: Point, end: Point, layer: &str, width: f64, net_id: NetId, reference: Option<(&[Point], f64)>) -> Result<RouteResult, RouteError> {
        let half_width = width / 2.0;

        let pending_snapshot: Vec<PendingTrace> = self.pending.borrow().get_by_layer(layer).into_iter().cloned().collect();
        {
            let mut hull_map = self.hull_map_for(layer, width);
            let refs: Vec<&PendingTrace> = pending_snapshot.iter().collect();
            hull_map.sync_pending(&refs, net_id);
        }

        self.check_endpoint_guards(start, end, layer, width, net_id)?;

        let waypoints = match reference {
            Some((reference_path, spacing)) => derive_companion_waypoints(start, end, reference_path, spacing),
            None => vec![start, end],
        };

        let mut full_path = Vec::new();
        let mut backend_used = RouteBackend::Walkaround;
        let mut any_walkaround_failed = false;

        let guide = reference.map(|(reference_path, spacing)| walkaround::CompanionGuide { reference_path, spacing });

        for window in waypoints.windows(2) {
            let (seg_start, seg_end) = (window[0], window[1]);
            let hull_map = self.hull_map_for(layer, width);
            match walkaround::walk_guided(&hull_map, seg_start, seg_end, net_id, half_width, self.config.corner_offset, guide.as_ref()) {
                Some(segment) => {
                    extend_path(&mut full_path, &segment);
                }
                None => {
                    any_walkaround_failed = true;
                    break;
                }
            }
        }

        if any_walkaround_failed {
            full_path.clear();
            backend_used = RouteBackend::AstarGrid;

            let radius_cells = (half_width.max(0.0) / self.config.grid_resolution).ceil() as i32;
            for window in waypoints.windows(2) {
                let (seg_start, seg_end) = (window[0], window[1]);
                let grid = self.obstacle_grid_for(layer, Some(net_id));
                let overlay = GridOverlay { grid: &grid, radius_cells };
                let own_cells = net_allowed_cells(self.board, layer, net_id, self.config.grid_resolution, &grid);
                let extra_blocked: HashSet<(i32, i32)> = self
                    .pending
                    .borrow()
                    .blocked_cells(layer, self.config.grid_resolution, self.config.clearance, Some(net_id))
                    .into_iter()
                    .collect();
                match astar::find_path(&overlay, self.config.grid_resolution, seg_start, seg_end, &extra_blocked, &own_cells) {
                    Some(segment) => extend_path(&mut full_path, &segment),
                    None => return Err(RouteError::NoRoute),
                }
            }
        }

        if full_path.is_empty() {
            return Err(RouteError::NoRoute);
        }

        let optimized = if reference.is_some() {
            full_path
        } else {
            let hull_map = self.hull_map_for(layer, width);
            let ctx = OptimizerContext { hull_map: Some(&hull_map), net_id, half_width };
            optimizer::optimize(&full_path, &ctx)
        };

        Ok(RouteResult { polyline: optimized, backend: backend_used })
    }

    /// Endpoint guards §7 asks the core to enforce before planning:
    /// a start/end sitting inside a different-net obstacle fails with a
    /// distinct error so the UI can highlight which endpoint is at fault,
    /// and start/end resolving to two different existing nets (within a
    /// tight tolerance — i.e. both endpoints sit on pad/via centers) fails
    /// rather than silently bridging them.
    fn check_endpoint_guards(&self, start: Point, end: Point, layer: &str, width: f64, net_id: NetId) -> Result<(), RouteError> {
        const ENDPOINT_NET_TOLERANCE: f64 = 0.05;

        let hull_map = self.hull_map_for(layer, width);
        if hull_map.point_inside_any_hull(start, net_id) {
            return Err(RouteError::StartBlocked);
        }
        if hull_map.point_inside_any_hull(end, net_id) {
            return Err(RouteError::EndBlocked);
        }

        if let (Some(start_net), Some(end_net)) = (
            self.find_net_at(start, layer, ENDPOINT_NET_TOLERANCE),
            self.find_net_at(end, layer, ENDPOINT_NET_TOLERANCE),
        ) {
            if start_net != end_net {
                return Err(RouteError::DifferentNetEndpoint);
            }
        }

        Ok(())
    }

    /// Check whether a via of the given radius at `point` clears every
    /// different-net copper within `radius + clearance` on every layer.
    pub fn check_via(&self, point: Point, radius: f64, net_id: NetId) -> Result<(), ViaError> {
        for layer in COPPER_LAYERS {
            for pad in self.board.pads_on_layer(layer) {
                if pad.net_id == net_id {
                    continue;
                }
                if super::shapes::distance_to_pad(point, pad) <= radius + self.config.clearance {
                    return Err(ViaError::ClearanceViolation { layer: layer.to_string() });
                }
            }
            for trace in self.board.traces_on_layer(layer) {
                if trace.net_id == net_id {
                    continue;
                }
                if super::shapes::distance_to_trace(point, trace) <= radius + self.config.clearance {
                    return Err(ViaError::ClearanceViolation { layer: layer.to_string() });
                }
            }
            // Vias implicitly span every copper layer (§3), so an existing
            // via conflicts on whichever layer is currently being checked.
            for via in &self.board.vias {
                if via.net_id == net_id {
                    continue;
                }
                if super::shapes::distance_to_via(point, via) <= radius + self.config.clearance {
                    return Err(ViaError::ClearanceViolation { layer: layer.to_string() });
                }
            }
        }
        Ok(())
    }

    /// Nearest pad or via center on `layer` within `tolerance` of `point`,
    /// ties broken by minimum distance. Uses the spatial index's coarse
    /// bounding-box prefilter rather than scanning every board element.
    pub fn find_net_at(&self, point: Point, layer: &str, tolerance: f64) -> Option<NetId> {
        let mut best: Option<(f64, NetId)> = None;
        for element in self.spatial_index.query_nearby(point.x, point.y, tolerance, layer) {
            let (center, net_id) = match element {
                ElementRef::Pad(i) => (self.board.pads[i].center, self.board.pads[i].net_id),
                ElementRef::Via(i) => (self.board.vias[i].center, self.board.vias[i].net_id),
                ElementRef::Trace(_) => continue,
            };
            let d = point.distance_to(center);
            if d <= tolerance && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, net_id));
            }
        }
        best.map(|(_, net)| net)
    }

    pub fn register_trace(&self, trace: PendingTrace) {
        self.pending.borrow_mut().add(trace);
    }

    pub fn remove_trace(&self, id: &str) -> bool {
        let existed = self.pending.borrow().all().any(|t| t.id == id);
        self.pending.borrow_mut().remove(id);
        existed
    }

    pub fn clear_traces(&self) {
        self.pending.borrow_mut().clear();
    }

    pub fn list_traces(&self) -> Vec<PendingTrace> {
        self.pending.borrow().all().cloned().collect()
    }
}

fn extend_path(full_path: &mut Vec<Point>, segment: &[Point]) {
    if full_path.last().copied() == segment.first().copied() {
        full_path.extend_from_slice(&segment[1..]);
    } else {
        full_path.extend_from_slice(segment);
    }
}

/// Cells the requesting net's own footprint makes passable despite the base
/// grid marking them blocked (§4.8's rotated-pad escape compromise): the
/// bounding-circle inflation of each own-net pad/trace, minus whatever a
/// *different*-net object also blocks there. `grid` must already be built
/// with `allowed_net_id = Some(net_id)`, so `grid.is_blocked(cell, 0)` tests
/// exactly "blocked by something other than this net" (§9: preserve the
/// original's `_get_net_cells` compromise, which never lets the allowance
/// paper over a real foreign clearance violation).
fn net_allowed_cells(board: &Board, layer: &str, net_id: NetId, resolution: f64, grid: &ObstacleGrid) -> HashSet<(i32, i32)> {
    let mut cells = HashSet::new();
    let to_cell = |p: Point| ((p.x / resolution).round() as i32, (p.y / resolution).round() as i32);
    for pad in board.pads_on_layer(layer) {
        if pad.net_id != net_id {
            continue;
        }
        let radius_cells = (pad.bounding_radius(0.0) / resolution).ceil() as i32;
        let (cx, cy) = to_cell(pad.center);
        for dx in -radius_cells..=radius_cells {
            for dy in -radius_cells..=radius_cells {
                cells.insert((cx + dx, cy + dy));
            }
        }
    }
    for trace in board.traces_on_layer(layer) {
        if trace.net_id != net_id {
            continue;
        }
        cells.insert(to_cell(trace.start));
        cells.insert(to_cell(trace.end));
    }
    if net_id == NO_NET {
        cells.clear();
    }
    cells.retain(|cell| !grid.is_blocked(*cell, 0));
    cells
}

/// Derive one waypoint per reference-path interior corner, offset
/// perpendicular to the local bisector by `spacing`, staying on the same
/// side as `start` relative to the reference path's first segment.
fn derive_companion_waypoints(start: Point, end: Point, reference_path: &[Point], spacing: f64) -> Vec<Point> {
    if reference_path.len() < 3 {
        return vec![start, end];
    }

    let side_sign = super::geometry::line_side(start, reference_path[0], reference_path[1]).signum();
    let mut waypoints = vec![start];

    for i in 1..reference_path.len() - 1 {
        let prev = reference_path[i - 1];
        let curr = reference_path[i];
        let next = reference_path[i + 1];

        let in_dir = unit(curr.x - prev.x, curr.y - prev.y);
        let out_dir = unit(next.x - curr.x, next.y - curr.y);
        let in_normal = (in_dir.1, -in_dir.0);
        let out_normal = (out_dir.1, -out_dir.0);
        let bisector = unit(in_normal.0 + out_normal.0, in_normal.1 + out_normal.1);

        waypoints.push(Point::new(
            curr.x + bisector.0 * spacing * side_sign,
            curr.y + bisector.1 * spacing * side_sign,
        ));
    }

    waypoints.push(end);
    waypoints
}

fn unit(dx: f64, dy: f64) -> (f64, f64) {
    let len = (dx * dx + dy * dy).sqrt().max(1e-9);
    (dx / len, dy / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::shapes::{PadShape, RoutingPad};

    fn empty_board() -> Board {
        Board::default()
    }

    #[test]
    fn test_route_on_empty_board_is_direct() {
        let board = empty_board();
        let router = Router::new(&board, RouterConfig::default());
        let result = router.route(Point::new(0.0, 0.0), Point::new(10.0, 0.0), "F.Cu", 0.25, NetId(1)).unwrap();
        assert!(result.polyline.len() >= 2);
        assert!(router.list_traces().is_empty());
    }

    #[test]
    fn test_check_via_same_net_is_fine() {
        let mut board = empty_board();
        board.pads.push(RoutingPad {
            center: Point::new(0.0, 0.0),
            width: 1.0,
            height: 1.0,
            shape: PadShape::Circle,
            angle: 0.0,
            roundrect_ratio: 0.25,
            layers: vec!["F.Cu".to_string()],
            net_id: NetId(5),
        });
        let router = Router::new(&board, RouterConfig::default());
        assert!(router.check_via(Point::new(0.0, 0.0), 0.4, NetId(5)).is_ok());
    }

    #[test]
    fn test_check_via_different_net_conflicts() {
        let mut board = empty_board();
        board.pads.push(RoutingPad {
            center: Point::new(0.0, 0.0),
            width: 1.0,
            height: 1.0,
            shape: PadShape::Circle,
            angle: 0.0,
            roundrect_ratio: 0.25,
            layers: vec!["F.Cu".to_string()],
            net_id: NetId(5),
        });
        let router = Router::new(&board, RouterConfig::default());
        assert!(router.check_via(Point::new(0.0, 0.0), 0.4, NetId(6)).is_err());
    }

    #[test]
    fn test_route_with_reference_follows_guided_waypoints() {
        let board = empty_board();
        let router = Router::new(&board, RouterConfig::default());
        let reference_path = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0)];
        let result = router
            .route_with_reference(Point::new(0.0, 0.0), Point::new(10.0, 0.0), "F.Cu", 0.25, NetId(1), &reference_path, 1.0)
            .unwrap();
        assert_eq!(result.polyline.first().copied(), Some(Point::new(0.0, 0.0)));
        assert_eq!(result.polyline.last().copied(), Some(Point::new(10.0, 0.0)));
        assert!(router.list_traces().is_empty());
    }

    #[test]
    fn test_register_and_remove_trace() {
        let board = empty_board();
        let router = Router::new(&board, RouterConfig::default());
        router.register_trace(PendingTrace {
            id: "t1".to_string(),
            polyline: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            width: 0.25,
            layer: "F.Cu".to_string(),
            net_id: Some(NetId(1)),
        });
        assert_eq!(router.list_traces().len(), 1);
        assert!(router.remove_trace("t1"));
        assert!(router.list_traces().is_empty());
    }
}
