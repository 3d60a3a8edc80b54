//! Grid-based spatial index for fast nearby-element queries.
//!
//! A coarse uniform grid buckets element indices by location so a query
//! point only has to scan nearby cells instead of every element on the
//! board.

use std::collections::{HashMap, HashSet};

use super::board::{Board, COPPER_LAYERS};
use super::geometry::Point;

/// A reference into one of the board's element arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Pad(usize),
    Trace(usize),
    Via(usize),
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Bounds {
    fn overlaps_query(&self, x: f64, y: f64, radius: f64) -> bool {
        self.min_x <= x + radius && self.max_x >= x - radius && self.min_y <= y + radius && self.max_y >= y - radius
    }
}

/// Uniform-grid spatial index over a board's pads/traces/vias.
pub struct SpatialIndex {
    cell_size: f64,
    grid: HashMap<(i64, i64), Vec<(ElementRef, Bounds)>>,
    by_layer: HashMap<String, Vec<(ElementRef, Bounds)>>,
}

impl SpatialIndex {
    /// Build an index over every pad/trace/via in `board`, with bounding
    /// boxes expanded by `clearance` so coarse queries never miss a
    /// clearance-relevant neighbor.
    pub fn build(board: &Board, cell_size: f64, clearance: f64) -> Self {
        let mut index = Self {
            cell_size,
            grid: HashMap::new(),
            by_layer: HashMap::new(),
        };

        for (i, pad) in board.pads.iter().enumerate() {
            let extent = if pad.angle != 0.0 {
                (pad.width.powi(2) + pad.height.powi(2)).sqrt() / 2.0 + clearance
            } else {
                pad.width.max(pad.height) / 2.0 + clearance
            };
            let bounds = Bounds {
                min_x: pad.center.x - extent,
                max_x: pad.center.x + extent,
                min_y: pad.center.y - extent,
                max_y: pad.center.y + extent,
            };
            let element = ElementRef::Pad(i);
            index.insert(element, bounds);
            for layer in &pad.layers {
                index.insert_layer(layer, element, bounds);
            }
        }

        for (i, trace) in board.traces.iter().enumerate() {
            let extent = trace.width / 2.0 + clearance;
            let bounds = Bounds {
                min_x: trace.start.x.min(trace.end.x) - extent,
                max_x: trace.start.x.max(trace.end.x) + extent,
                min_y: trace.start.y.min(trace.end.y) - extent,
                max_y: trace.start.y.max(trace.end.y) + extent,
            };
            let element = ElementRef::Trace(i);
            index.insert(element, bounds);
            index.insert_layer(&trace.layer, element, bounds);
        }

        for (i, via) in board.vias.iter().enumerate() {
            let extent = via.outer_size / 2.0 + clearance;
            let bounds = Bounds {
                min_x: via.center.x - extent,
                max_x: via.center.x + extent,
                min_y: via.center.y - extent,
                max_y: via.center.y + extent,
            };
            let element = ElementRef::Via(i);
            index.insert(element, bounds);
            for layer in COPPER_LAYERS {
                index.insert_layer(layer, element, bounds);
            }
        }

        index
    }

    fn cell_coords(&self, x: f64, y: f64) -> (i64, i64) {
        ((x / self.cell_size).floor() as i64, (y / self.cell_size).floor() as i64)
    }

    fn insert(&mut self, element: ElementRef, bounds: Bounds) {
        let (min_cx, min_cy) = self.cell_coords(bounds.min_x, bounds.min_y);
        let (max_cx, max_cy) = self.cell_coords(bounds.max_x, bounds.max_y);
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                self.grid.entry((cx, cy)).or_default().push((element, bounds));
            }
        }
    }

    fn insert_layer(&mut self, layer: &str, element: ElementRef, bounds: Bounds) {
        self.by_layer.entry(layer.to_string()).or_default().push((element, bounds));
    }

    /// Elements whose clearance-expanded bounding box might be within
    /// `radius` of `(x, y)` on `layer`. This is a coarse filter: callers
    /// must still apply an exact shape-distance check.
    pub fn query_nearby(&self, x: f64, y: f64, radius: f64, layer: &str) -> Vec<ElementRef> {
        let search_radius = radius + self.cell_size;
        let (min_cx, min_cy) = self.cell_coords(x - search_radius, y - search_radius);
        let (max_cx, max_cy) = self.cell_coords(x + search_radius, y + search_radius);

        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                let Some(bucket) = self.grid.get(&(cx, cy)) else { continue };
                for (element, bounds) in bucket {
                    if !seen.insert(*element) {
                        continue;
                    }
                    if !self.element_on_layer(*element, layer) {
                        continue;
                    }
                    if bounds.overlaps_query(x, y, radius) {
                        out.push(*element);
                    }
                }
            }
        }

        out
    }

    fn element_on_layer(&self, element: ElementRef, layer: &str) -> bool {
        self.by_layer
            .get(layer)
            .is_some_and(|elems| elems.iter().any(|(e, _)| *e == element))
    }

    pub fn elements_on_layer(&self, layer: &str) -> Vec<ElementRef> {
        self.by_layer.get(layer).map(|v| v.iter().map(|(e, _)| *e).collect()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::board::NetId;
    use crate::routing::shapes::{PadShape, RoutingPad};

    fn sample_board() -> Board {
        let mut board = Board::default();
        board.pads.push(RoutingPad {
            center: Point::new(5.0, 5.0),
            width: 1.0,
            height: 1.0,
            shape: PadShape::Circle,
            angle: 0.0,
            roundrect_ratio: 0.25,
            layers: vec!["F.Cu".to_string()],
            net_id: NetId(0),
        });
        board
    }

    #[test]
    fn test_query_nearby_finds_pad() {
        let board = sample_board();
        let index = SpatialIndex::build(&board, 1.0, 0.2);
        let hits = index.query_nearby(5.0, 5.0, 1.0, "F.Cu");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], ElementRef::Pad(0));
    }

    #[test]
    fn test_query_nearby_wrong_layer_misses() {
        let board = sample_board();
        let index = SpatialIndex::build(&board, 1.0, 0.2);
        let hits = index.query_nearby(5.0, 5.0, 1.0, "B.Cu");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_query_nearby_far_away_misses() {
        let board = sample_board();
        let index = SpatialIndex::build(&board, 1.0, 0.2);
        let hits = index.query_nearby(50.0, 50.0, 1.0, "F.Cu");
        assert!(hits.is_empty());
    }
}
