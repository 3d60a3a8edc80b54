//! The read-only board model the routing engine operates over, plus the
//! net-name <-> [`NetId`] translation table.
//!
//! The rest of this crate's document model (`crate::layout::{Trace, Via}`)
//! identifies nets by human-readable string name. The routing engine needs a
//! compact, `Copy`/`Eq`/`Hash`/`Ord` key for hot-path grid and set lookups,
//! so it interns net names into a small integer [`NetId`] at board-build
//! time (see `SPEC_FULL.md` §3, "Net identity").

use std::collections::HashMap;

use crate::geometry::Point2D;
use crate::layout::{Layout, OutlineType, PadShape as DocPadShape};

use super::geometry::Point;
use super::shapes::{PadShape, RoutingPad, RoutingTrace, RoutingVia};

/// Copper layers that vias are assumed to span.
pub const COPPER_LAYERS: &[&str] = &["F.Cu", "B.Cu", "In1.Cu", "In2.Cu"];

/// A compact, interned net identity used throughout the routing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetId(pub i32);

/// Sentinel net id for copper with no assigned net (e.g. unconnected pads).
pub const NO_NET: NetId = NetId(-1);

/// Distinct from [`NO_NET`]: a pending trace registered with no net at all
/// (`PendingTrace::net_id == None`). Kept separate from `NO_NET` so it never
/// collides with a caller's `exclude_net` when the caller is *also* routing
/// without specifying a net — otherwise an unassigned pending trace would go
/// transparent for exactly the routes most likely to cross it.
pub const UNASSIGNED_PENDING_NET: NetId = NetId(i32::MIN);

/// Bidirectional net-name <-> [`NetId`] interning table.
#[derive(Debug, Clone, Default)]
pub struct NetTable {
    by_name: HashMap<String, NetId>,
    by_id: Vec<String>,
}

impl NetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or assign a `NetId` for `name`. An empty name always maps to
    /// [`NO_NET`] and is never interned.
    pub fn intern(&mut self, name: &str) -> NetId {
        if name.is_empty() {
            return NO_NET;
        }
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = NetId(self.by_id.len() as i32);
        self.by_id.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn name_of(&self, id: NetId) -> Option<&str> {
        if id == NO_NET {
            return None;
        }
        self.by_id.get(id.0 as usize).map(|s| s.as_str())
    }
}

/// The read-only, derived-from-`Layout` board view the routing engine
/// queries. Built once per routing session; cheap to rebuild if the
/// underlying document changes.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub nets: NetTable,
    pub pads: Vec<RoutingPad>,
    pub traces: Vec<RoutingTrace>,
    pub vias: Vec<RoutingVia>,
    /// Board outline edges (edge-cut segments), treated as obstacles from
    /// the outside.
    pub edge_cuts: Vec<(Point, Point)>,
    pub bounds: (Point, Point),
}

impl Board {
    /// Build a routing board from the document-level layout, interning net
    /// names into `NetId`s as pads/traces/vias are visited.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut nets = NetTable::new();
        let mut pads = Vec::new();
        let mut traces = Vec::new();
        let mut vias = Vec::new();

        for component in &layout.components {
            for pad in &component.pads {
                let net_id = nets.intern(pad.net.as_deref().unwrap_or(""));
                let shape = match pad.shape {
                    DocPadShape::Circle => PadShape::Circle,
                    DocPadShape::RoundRect => PadShape::RoundRect,
                    DocPadShape::Oval => PadShape::Oval,
                    // Trapezoid/Custom pads are approximated as rectangles
                    // for clearance purposes (mechanical-footprint fidelity
                    // is out of scope for the routing engine).
                    DocPadShape::Rect | DocPadShape::Trapezoid | DocPadShape::Custom => PadShape::Rect,
                };

                let world_center = rotate_and_translate(
                    pad.position,
                    component.position.to_point2d(),
                    component.rotation,
                );

                pads.push(RoutingPad {
                    center: Point::new(world_center.x, world_center.y),
                    width: pad.size.0,
                    height: pad.size.1,
                    shape,
                    angle: (pad.angle + component.rotation).rem_euclid(360.0),
                    roundrect_ratio: pad.roundrect_ratio,
                    layers: pad.layers.clone(),
                    net_id,
                });
            }
        }

        for trace in &layout.traces {
            let net_id = nets.intern(&trace.net);
            traces.push(RoutingTrace {
                start: Point::new(trace.start.x, trace.start.y),
                end: Point::new(trace.end.x, trace.end.y),
                width: trace.width,
                layer: trace.layer.clone(),
                net_id,
            });
        }

        for via in &layout.vias {
            let net_id = nets.intern(&via.net);
            vias.push(RoutingVia {
                center: Point::new(via.position.x, via.position.y),
                outer_size: via.pad,
                drill: via.drill,
                net_id,
            });
        }

        let bounds = compute_bounds(&pads, &traces, &vias);
        let edge_cuts = outline_edges(layout);

        Self {
            nets,
            pads,
            traces,
            vias,
            edge_cuts,
            bounds,
        }
    }

    pub fn traces_on_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a RoutingTrace> {
        self.traces.iter().filter(move |t| t.layer == layer)
    }

    pub fn pads_on_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a RoutingPad> {
        self.pads.iter().filter(move |p| p.on_layer(layer))
    }
}

/// Board outline, as a closed ring of edge segments treated as obstacles
/// from the outside. Polygon outlines use their points directly; rectangle
/// outlines are anchored at the origin and sized by `width`/`height`.
/// Circular outlines have no edge-cut representation here (routing never
/// needs to hug a circular board edge in the boards this crate targets)
/// and are skipped.
fn outline_edges(layout: &Layout) -> Vec<(Point, Point)> {
    let Some(outline) = &layout.outline else {
        return Vec::new();
    };

    let points: Vec<Point> = match outline.outline_type {
        OutlineType::Polygon => outline.points.iter().map(|p| Point::new(p.x, p.y)).collect(),
        OutlineType::Rectangle => {
            let w = outline.width.unwrap_or(0.0);
            let h = outline.height.unwrap_or(0.0);
            vec![
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                Point::new(w, h),
                Point::new(0.0, h),
            ]
        }
        OutlineType::Circle => return Vec::new(),
    };

    if points.len() < 2 {
        return Vec::new();
    }

    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
        .collect()
}

fn rotate_and_translate(local: Point2D, origin: Point2D, rotation_degrees: f64) -> Point2D {
    if rotation_degrees == 0.0 {
        return Point2D::new(origin.x + local.x, origin.y + local.y);
    }
    let rad = rotation_degrees.to_radians();
    let cos_a = rad.cos();
    let sin_a = rad.sin();
    Point2D::new(
        origin.x + local.x * cos_a - local.y * sin_a,
        origin.y + local.x * sin_a + local.y * cos_a,
    )
}

fn compute_bounds(pads: &[RoutingPad], traces: &[RoutingTrace], vias: &[RoutingVia]) -> (Point, Point) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    let mut grow = |p: Point| {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    };

    for pad in pads {
        grow(pad.center);
    }
    for trace in traces {
        grow(trace.start);
        grow(trace.end);
    }
    for via in vias {
        grow(via.center);
    }

    if !min_x.is_finite() {
        return (Point::new(0.0, 0.0), Point::new(0.0, 0.0));
    }

    (Point::new(min_x, min_y), Point::new(max_x, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_table_interns_consistently() {
        let mut table = NetTable::new();
        let a = table.intern("GND");
        let b = table.intern("VCC");
        let a2 = table.intern("GND");
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(table.name_of(a), Some("GND"));
    }

    #[test]
    fn test_net_table_empty_name_is_no_net() {
        let mut table = NetTable::new();
        assert_eq!(table.intern(""), NO_NET);
    }

    #[test]
    fn test_board_from_empty_layout() {
        let board = Board::from_layout(&Layout::default());
        assert!(board.pads.is_empty());
        assert!(board.traces.is_empty());
    }
}
