//! Per-layer collection of obstacle hulls, backing the walkaround planner.

use std::collections::HashMap;

use super::board::{Board, NetId};
use super::geometry::{line_side, segment_polyline_intersections, Point};
use super::hulls::{pad_hull, segment_hull, trace_hull, via_hull, Hull, HullSource};
use super::pending::PendingTrace;

/// Arena index into a [`HullMap`]'s hull list. Never a raw pointer/`Rc` —
/// the spatial grid and query results refer to hulls purely by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HullId(pub usize);

/// A discovered obstacle in the path of a prospective route, together with
/// where the query segment actually enters its boundary (closest entry
/// first after sorting).
#[derive(Debug, Clone, Copy)]
pub struct BlockingHull {
    pub id: HullId,
    /// Where the query segment crosses this hull's boundary.
    pub intersection_point: Point,
    /// Index of the polygon edge the query segment crosses.
    pub edge_index: usize,
    /// Parameter along the query segment, in `[0, 1]`.
    pub t: f64,
}

/// Coarse grid cell size used purely to bucket hulls for `blocking_hulls`
/// queries; independent of the obstacle grid's fine routing resolution.
const HULL_GRID_CELL_SIZE: f64 = 2.0;

/// All hulls on one copper layer: a permanent set (derived once from board
/// pads/traces/vias/edge-cuts) plus a mutable pending set (from
/// currently-registered [`PendingTrace`]s), sharing one spatial grid.
pub struct HullMap {
    layer: String,
    inflation: f64,
    hulls: Vec<Hull>,
    pending_start: usize,
    grid: HashMap<(i64, i64), Vec<HullId>>,
}

impl HullMap {
    /// Build the permanent hull set for `layer` at the given clearance +
    /// trace half-width inflation radius.
    pub fn build(board: &Board, layer: &str, inflation: f64) -> Self {
        let mut map = Self {
            layer: layer.to_string(),
            inflation,
            hulls: Vec::new(),
            pending_start: 0,
            grid: HashMap::new(),
        };

        for pad in board.pads_on_layer(layer) {
            map.push_hull(pad_hull(pad, inflation));
        }
        for trace in board.traces_on_layer(layer) {
            map.push_hull(trace_hull(trace, inflation));
        }
        for via in &board.vias {
            map.push_hull(via_hull(via, inflation));
        }
        for (start, end) in &board.edge_cuts {
            map.push_hull(segment_hull(*start, *end, 0.05, inflation, super::board::NO_NET, HullSource::EdgeCut));
        }

        map.pending_start = map.hulls.len();
        map
    }

    fn push_hull(&mut self, hull: Hull) -> HullId {
        let id = HullId(self.hulls.len());
        let (min_cx, min_cy) = self.cell_coords(hull.bbox.0.x, hull.bbox.0.y);
        let (max_cx, max_cy) = self.cell_coords(hull.bbox.1.x, hull.bbox.1.y);
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                self.grid.entry((cx, cy)).or_default().push(id);
            }
        }
        self.hulls.push(hull);
        id
    }

    fn cell_coords(&self, x: f64, y: f64) -> (i64, i64) {
        ((x / HULL_GRID_CELL_SIZE).floor() as i64, (y / HULL_GRID_CELL_SIZE).floor() as i64)
    }

    /// Re-derive the pending-hull list from every pending trace on this
    /// layer (called before planning; the caller removes them again on
    /// every exit path). Filters out traces of `exclude_net`, mirroring
    /// same-net transparency.
    pub fn sync_pending(&mut self, pending: &[&PendingTrace], exclude_net: NetId) {
        self.clear_pending();
        for trace in pending {
            if trace.layer != self.layer {
                continue;
            }
            let net_id = trace.net_id.unwrap_or(super::board::UNASSIGNED_PENDING_NET);
            if net_id == exclude_net {
                continue;
            }
            for window in trace.polyline.windows(2) {
                let hull = segment_hull(window[0], window[1], trace.width, self.inflation, net_id, HullSource::PendingTrace);
                self.push_hull(hull);
            }
        }
    }

    /// Remove every pending hull, restoring the map to its permanent-only
    /// state. Safe to call even if nothing pending was added.
    pub fn clear_pending(&mut self) {
        if self.hulls.len() == self.pending_start {
            return;
        }
        self.hulls.truncate(self.pending_start);
        for bucket in self.grid.values_mut() {
            bucket.retain(|id| id.0 < self.pending_start);
        }
    }

    pub fn hull(&self, id: HullId) -> &Hull {
        &self.hulls[id.0]
    }

    /// Hulls (excluding `exclude_net`'s own) whose bounding box the segment
    /// `from -> to` might cross, sorted by parameter along the query
    /// (closest entry point from `from` first).
    pub fn blocking_hulls(&self, from: Point, to: Point, exclude_net: NetId) -> Vec<BlockingHull> {
        let min_x = from.x.min(to.x);
        let max_x = from.x.max(to.x);
        let min_y = from.y.min(to.y);
        let max_y = from.y.max(to.y);

        let (min_cx, min_cy) = self.cell_coords(min_x, min_y);
        let (max_cx, max_cy) = self.cell_coords(max_x, max_y);

        let mut seen = std::collections::HashSet::new();
        let mut hits = Vec::new();

        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                let Some(bucket) = self.grid.get(&(cx, cy)) else { continue };
                for &id in bucket {
                    if !seen.insert(id) {
                        continue;
                    }
                    let hull = &self.hulls[id.0];
                    if hull.net_id == exclude_net {
                        continue;
                    }
                    if !bbox_overlaps(hull.bbox, (Point::new(min_x, min_y), Point::new(max_x, max_y))) {
                        continue;
                    }
                    let Some((intersection_point, edge_index, t)) = polygon_entry(&hull.polygon, from, to) else {
                        continue;
                    };
                    hits.push(BlockingHull { id, intersection_point, edge_index, t });
                }
            }
        }

        hits.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap());
        hits
    }

    /// Whether `p` is inside any hull (excluding `exclude_net`'s own),
    /// using a tiny symmetric probe window plus a ray-casting fallback so
    /// points sitting exactly on a polygon edge resolve consistently.
    pub fn point_inside_any_hull(&self, p: Point, exclude_net: NetId) -> bool {
        const WINDOW: f64 = 1e-6;
        for hull in &self.hulls {
            if hull.net_id == exclude_net {
                continue;
            }
            if p.x < hull.bbox.0.x - WINDOW
                || p.x > hull.bbox.1.x + WINDOW
                || p.y < hull.bbox.0.y - WINDOW
                || p.y > hull.bbox.1.y + WINDOW
            {
                continue;
            }
            if point_in_polygon(p, &hull.polygon) {
                return true;
            }
        }
        false
    }
}

fn bbox_overlaps(a: (Point, Point), b: (Point, Point)) -> bool {
    a.0.x <= b.1.x && a.1.x >= b.0.x && a.0.y <= b.1.y && a.1.y >= b.0.y
}

/// Where segment `from -> to` enters `polygon`'s boundary, or `None` if it
/// doesn't cross and neither endpoint sits inside. Crossing edges are
/// resolved via the segment/polyline intersection helper and take the
/// earliest one along the query; a fully-contained endpoint with no edge
/// crossing falls back to the polygon's nearest edge to `from`.
fn polygon_entry(polygon: &[Point], from: Point, to: Point) -> Option<(Point, usize, f64)> {
    let hits = segment_polyline_intersections(from, to, polygon, true);
    if let Some(first) = hits.first() {
        return Some((first.point, first.edge_index, first.t));
    }
    if point_in_polygon(from, polygon) || point_in_polygon(to, polygon) {
        let (edge_index, point) = nearest_edge(polygon, from);
        return Some((point, edge_index, 0.0));
    }
    None
}

fn nearest_edge(polygon: &[Point], from: Point) -> (usize, Point) {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            let (closest, _) = super::geometry::closest_point_on_segment(from, a, b);
            (i, closest)
        })
        .min_by(|(_, a), (_, b)| from.distance_sq_to(*a).partial_cmp(&from.distance_sq_to(*b)).unwrap())
        .unwrap_or((0, from))
}

/// Ray-casting point-in-polygon test (even-odd rule).
fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = polygon[i];
        let vj = polygon[j];
        if ((vi.y > p.y) != (vj.y > p.y)) && (p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Sign of which side of an edge a point lies on; exposed for the
/// walkaround planner's bisector-direction bookkeeping.
pub fn edge_side(p: Point, a: Point, b: Point) -> f64 {
    line_side(p, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::board::NetId;
    use crate::routing::shapes::{PadShape, RoutingPad};

    fn board_with_pad(net: NetId) -> Board {
        let mut board = Board::default();
        board.pads.push(RoutingPad {
            center: Point::new(5.0, 0.0),
            width: 2.0,
            height: 2.0,
            shape: PadShape::Circle,
            angle: 0.0,
            roundrect_ratio: 0.25,
            layers: vec!["F.Cu".to_string()],
            net_id: net,
        });
        board
    }

    #[test]
    fn test_blocking_hulls_detects_obstacle_in_path() {
        let board = board_with_pad(NetId(1));
        let map = HullMap::build(&board, "F.Cu", 0.2);
        let hits = map.blocking_hulls(Point::new(0.0, 0.0), Point::new(10.0, 0.0), NetId(0));
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_blocking_hulls_same_net_is_transparent() {
        let board = board_with_pad(NetId(1));
        let map = HullMap::build(&board, "F.Cu", 0.2);
        let hits = map.blocking_hulls(Point::new(0.0, 0.0), Point::new(10.0, 0.0), NetId(1));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_blocking_hulls_reports_entry_point_on_boundary() {
        let board = board_with_pad(NetId(1));
        let map = HullMap::build(&board, "F.Cu", 0.2);
        let hits = map.blocking_hulls(Point::new(0.0, 0.0), Point::new(10.0, 0.0), NetId(0));
        let hit = hits[0];
        let hull = map.hull(hit.id);
        assert!((hit.intersection_point.y).abs() < 1e-6, "entry point should sit on the x-axis line");
        assert!(hit.intersection_point.x > 0.0 && hit.intersection_point.x < 5.0);
        assert!(hit.edge_index < hull.polygon.len());
        assert!(hit.t > 0.0 && hit.t < 1.0);
    }

    #[test]
    fn test_blocking_hulls_sorted_by_parameter_along_query() {
        let mut board = board_with_pad(NetId(1));
        board.pads.push(RoutingPad {
            center: Point::new(8.0, 0.0),
            width: 1.0,
            height: 1.0,
            shape: PadShape::Circle,
            angle: 0.0,
            roundrect_ratio: 0.25,
            layers: vec!["F.Cu".to_string()],
            net_id: NetId(2),
        });
        let map = HullMap::build(&board, "F.Cu", 0.2);
        let hits = map.blocking_hulls(Point::new(0.0, 0.0), Point::new(10.0, 0.0), NetId(0));
        assert_eq!(hits.len(), 2);
        assert!(hits[0].t < hits[1].t);
    }

    #[test]
    fn test_point_inside_any_hull() {
        let board = board_with_pad(NetId(1));
        let map = HullMap::build(&board, "F.Cu", 0.2);
        assert!(map.point_inside_any_hull(Point::new(5.0, 0.0), NetId(0)));
        assert!(!map.point_inside_any_hull(Point::new(50.0, 50.0), NetId(0)));
    }

    #[test]
    fn test_unassigned_pending_trace_blocks_even_a_no_net_route() {
        // A pending trace with no net (`net_id: None`) must still act as an
        // obstacle for a route that also has no net — the two "no net"
        // values are not the same net, even though both collapse to the
        // same `NO_NET` sentinel once interned.
        let board = Board::default();
        let mut map = HullMap::build(&board, "F.Cu", 0.2);
        let trace = PendingTrace {
            id: "t1".to_string(),
            polyline: vec![Point::new(5.0, -5.0), Point::new(5.0, 5.0)],
            width: 0.5,
            layer: "F.Cu".to_string(),
            net_id: None,
        };
        map.sync_pending(&[&trace], crate::routing::board::NO_NET);
        let hits = map.blocking_hulls(Point::new(0.0, 0.0), Point::new(10.0, 0.0), crate::routing::board::NO_NET);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_pending_hulls_sync_and_clear() {
        let board = Board::default();
        let mut map = HullMap::build(&board, "F.Cu", 0.2);
        let trace = PendingTrace {
            id: "t1".to_string(),
            polyline: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            width: 0.25,
            layer: "F.Cu".to_string(),
            net_id: None,
        };
        map.sync_pending(&[&trace], NetId(5));
        assert!(map.blocking_hulls(Point::new(5.0, -5.0), Point::new(5.0, 5.0), NetId(0)).len() == 1);
        map.clear_pending();
        assert!(map.blocking_hulls(Point::new(5.0, -5.0), Point::new(5.0, 5.0), NetId(0)).is_empty());
    }
}
