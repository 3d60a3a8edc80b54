//! In-flight trace bookkeeping: traces a route is currently building before
//! they're committed to the board as permanent [`RoutingTrace`]s.
//!
//! Kept distinct from the permanent [`super::board::Board`] traces because a
//! multi-segment net (reference/companion routing, or a route spanning
//! several calls) needs to see its own earlier segments as obstacles for
//! later segments on other nets, while staying invisible to itself.

use std::collections::HashMap;

use super::board::NetId;
use super::geometry::Point;

/// A trace that hasn't been committed to the board yet.
#[derive(Debug, Clone)]
pub struct PendingTrace {
    pub id: String,
    pub polyline: Vec<Point>,
    pub width: f64,
    pub layer: String,
    pub net_id: Option<NetId>,
}

/// Sample spacing used when marching along a pending trace's polyline to
/// mark grid cells as blocked. Finer than the default grid resolution so no
/// cell along a thin trace is skipped.
const MARCH_STEP: f64 = 0.02;

#[derive(Default)]
pub struct PendingTraceStore {
    traces: HashMap<String, PendingTrace>,
    blocked_cache: std::cell::RefCell<HashMap<String, Vec<(i32, i32)>>>,
}

impl PendingTraceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, trace: PendingTrace) {
        self.blocked_cache.borrow_mut().remove(&trace.layer);
        self.traces.insert(trace.id.clone(), trace);
    }

    pub fn remove(&mut self, id: &str) {
        if let Some(trace) = self.traces.remove(id) {
            self.blocked_cache.borrow_mut().remove(&trace.layer);
        }
    }

    pub fn clear(&mut self) {
        self.traces.clear();
        self.blocked_cache.borrow_mut().clear();
    }

    pub fn get_by_layer(&self, layer: &str) -> Vec<&PendingTrace> {
        self.traces.values().filter(|t| t.layer == layer).collect()
    }

    pub fn all(&self) -> impl Iterator<Item = &PendingTrace> {
        self.traces.values()
    }

    /// Grid cells (at `resolution`) that pending traces on `layer` occupy,
    /// marching along each polyline at `MARCH_STEP` and stamping a disc of
    /// radius `trace.width / 2 + clearance` at each sample.
    ///
    /// Cached per layer only when `exclude_net_id` is `None` — the common
    /// case of "block everything pending on this layer" — since a per-net
    /// exclusion set changes on every route call and isn't worth caching.
    pub fn blocked_cells(&self, layer: &str, resolution: f64, clearance: f64, exclude_net_id: Option<NetId>) -> Vec<(i32, i32)> {
        if exclude_net_id.is_none() {
            if let Some(cached) = self.blocked_cache.borrow().get(layer) {
                return cached.clone();
            }
        }

        let mut cells = std::collections::HashSet::new();
        for trace in self.get_by_layer(layer) {
            if exclude_net_id.is_some() && trace.net_id == exclude_net_id {
                continue;
            }
            let radius = trace.width / 2.0 + clearance;
            march_polyline(&trace.polyline, MARCH_STEP, |p| {
                stamp_disc(p, radius, resolution, &mut cells);
            });
        }

        let result: Vec<(i32, i32)> = cells.into_iter().collect();
        if exclude_net_id.is_none() {
            self.blocked_cache.borrow_mut().insert(layer.to_string(), result.clone());
        }
        result
    }

    /// Whether `p` lies inside the inflated footprint of any pending trace
    /// on `layer` (excluding `exclude_net_id`'s own).
    pub fn is_point_blocked(&self, p: Point, layer: &str, clearance: f64, exclude_net_id: Option<NetId>) -> bool {
        for trace in self.get_by_layer(layer) {
            if exclude_net_id.is_some() && trace.net_id == exclude_net_id {
                continue;
            }
            let radius = trace.width / 2.0 + clearance;
            for window in trace.polyline.windows(2) {
                if super::geometry::point_to_segment_distance(p, window[0], window[1]) <= radius {
                    return true;
                }
            }
        }
        false
    }
}

fn march_polyline(polyline: &[Point], step: f64, mut visit: impl FnMut(Point)) {
    for window in polyline.windows(2) {
        let (a, b) = (window[0], window[1]);
        let length = a.distance_to(b);
        if length < 1e-9 {
            visit(a);
            continue;
        }
        let steps = (length / step).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            visit(a.lerp(b, t));
        }
    }
}

fn stamp_disc(center: Point, radius: f64, resolution: f64, cells: &mut std::collections::HashSet<(i32, i32)>) {
    let cell_radius = (radius / resolution).ceil() as i32;
    let (ccx, ccy) = (
        (center.x / resolution).round() as i32,
        (center.y / resolution).round() as i32,
    );
    for dx in -cell_radius..=cell_radius {
        for dy in -cell_radius..=cell_radius {
            let cell_center = Point::new((ccx + dx) as f64 * resolution, (ccy + dy) as f64 * resolution);
            if cell_center.distance_to(center) <= radius {
                cells.insert((ccx + dx, ccy + dy));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trace(net_id: Option<NetId>) -> PendingTrace {
        PendingTrace {
            id: "p1".to_string(),
            polyline: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            width: 0.25,
            layer: "F.Cu".to_string(),
            net_id,
        }
    }

    #[test]
    fn test_add_and_remove() {
        let mut store = PendingTraceStore::new();
        store.add(sample_trace(Some(NetId(1))));
        assert_eq!(store.get_by_layer("F.Cu").len(), 1);
        store.remove("p1");
        assert!(store.get_by_layer("F.Cu").is_empty());
    }

    #[test]
    fn test_blocked_cells_contains_start_point() {
        let mut store = PendingTraceStore::new();
        store.add(sample_trace(Some(NetId(1))));
        let cells = store.blocked_cells("F.Cu", 0.1, 0.2, None);
        assert!(!cells.is_empty());
    }

    #[test]
    fn test_blocked_cells_excludes_same_net() {
        let mut store = PendingTraceStore::new();
        store.add(sample_trace(Some(NetId(1))));
        let cells = store.blocked_cells("F.Cu", 0.1, 0.2, Some(NetId(1)));
        assert!(cells.is_empty());
    }

    #[test]
    fn test_is_point_blocked() {
        let mut store = PendingTraceStore::new();
        store.add(sample_trace(Some(NetId(1))));
        assert!(store.is_point_blocked(Point::new(0.5, 0.0), "F.Cu", 0.2, None));
        assert!(!store.is_point_blocked(Point::new(5.0, 5.0), "F.Cu", 0.2, None));
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = PendingTraceStore::new();
        store.add(sample_trace(None));
        store.clear();
        assert!(store.all().next().is_none());
    }
}
