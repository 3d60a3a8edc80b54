//! Hull generation: inflating board elements into CCW obstacle polygons.
//!
//! The inflation radius is always `clearance + trace_half_width`. Shapes are
//! turned into simple closed polygons so the walkaround planner can walk
//! their boundary directly instead of re-deriving signed distances at every
//! step.

use super::board::NetId;
use super::geometry::Point;
use super::shapes::{PadShape, RoutingPad, RoutingTrace, RoutingVia};

/// Default chamfer fraction applied to rect/roundrect pad corners when
/// turning them into an octagon.
pub const CHAMFER_RATIO: f64 = 0.3;

/// Number of segments used per quarter-circle when fanning out a stadium cap.
const CAP_FAN_SEGMENTS: usize = 4;

/// Number of sides used to approximate a circular pad or via.
const CIRCLE_SIDES: usize = 16;

/// Where a hull came from, for diagnostics and for source-aware filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HullSource {
    Pad,
    Trace,
    Via,
    PendingTrace,
    EdgeCut,
}

/// An inflated obstacle polygon.
#[derive(Debug, Clone)]
pub struct Hull {
    /// Vertices in counter-clockwise order, simple (non-self-intersecting).
    pub polygon: Vec<Point>,
    pub net_id: NetId,
    pub bbox: (Point, Point),
    pub source: HullSource,
}

impl Hull {
    fn from_polygon(mut polygon: Vec<Point>, net_id: NetId, source: HullSource) -> Self {
        enforce_ccw(&mut polygon);
        let bbox = polygon_bbox(&polygon);
        Self { polygon, net_id, bbox, source }
    }
}

fn polygon_bbox(polygon: &[Point]) -> (Point, Point) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in polygon {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    (Point::new(min_x, min_y), Point::new(max_x, max_y))
}

fn signed_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area / 2.0
}

fn enforce_ccw(polygon: &mut [Point]) {
    if signed_area(polygon) < 0.0 {
        polygon.reverse();
    }
}

fn rotate_point(p: Point, center: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return p;
    }
    let rad = degrees.to_radians();
    let cos_a = rad.cos();
    let sin_a = rad.sin();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(center.x + dx * cos_a - dy * sin_a, center.y + dx * sin_a + dy * cos_a)
}

/// Build the inflated hull for a pad, given the clearance + trace half-width
/// inflation radius.
pub fn pad_hull(pad: &RoutingPad, inflation: f64) -> Hull {
    match pad.shape {
        PadShape::Circle => {
            let radius = pad.width.min(pad.height) / 2.0 + inflation;
            Hull::from_polygon(regular_polygon(pad.center, radius, CIRCLE_SIDES), pad.net_id, HullSource::Pad)
        }
        PadShape::Oval => {
            stadium_hull(pad.center, pad.width, pad.height, pad.angle, inflation, pad.net_id, HullSource::Pad)
        }
        PadShape::Rect | PadShape::RoundRect => {
            octagon_rect_hull(pad.center, pad.width, pad.height, pad.angle, inflation, pad.net_id, HullSource::Pad)
        }
    }
}

/// Build the inflated hull for a trace capsule.
pub fn trace_hull(trace: &RoutingTrace, inflation: f64) -> Hull {
    let dx = trace.end.x - trace.start.x;
    let dy = trace.end.y - trace.start.y;
    let angle = dy.atan2(dx).to_degrees();
    let center = Point::new((trace.start.x + trace.end.x) / 2.0, (trace.start.y + trace.end.y) / 2.0);
    let length = trace.start.distance_to(trace.end);
    // A trace is a stadium whose long axis runs along the segment: width =
    // length + trace width (the caps), height = trace width.
    stadium_hull(center, length + trace.width, trace.width, angle, inflation, trace.net_id, HullSource::Trace)
}

/// Build the inflated hull for a via (circular footprint).
pub fn via_hull(via: &RoutingVia, inflation: f64) -> Hull {
    let radius = via.outer_size / 2.0 + inflation;
    Hull::from_polygon(regular_polygon(via.center, radius, CIRCLE_SIDES), via.net_id, HullSource::Via)
}

/// Build the inflated hull for a bare polyline segment at some width (used
/// for pending traces before they become permanent `RoutingTrace`s).
pub fn segment_hull(start: Point, end: Point, width: f64, inflation: f64, net_id: NetId, source: HullSource) -> Hull {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let angle = dy.atan2(dx).to_degrees();
    let center = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    let length = start.distance_to(end);
    stadium_hull(center, length + width, width, angle, inflation, net_id, source)
}

fn regular_polygon(center: Point, radius: f64, sides: usize) -> Vec<Point> {
    (0..sides)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (sides as f64);
            Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .collect()
}

/// Chamfered-corner octagon approximating an inflated rectangle (used for
/// both `Rect` and `RoundRect` pads — the chamfer plays the same role as the
/// rounded corner for walkaround purposes).
fn octagon_rect_hull(center: Point, width: f64, height: f64, angle: f64, inflation: f64, net_id: NetId, source: HullSource) -> Hull {
    let half_w = width / 2.0 + inflation;
    let half_h = height / 2.0 + inflation;
    let chamfer = (half_w.min(half_h)) * CHAMFER_RATIO;

    let local = vec![
        Point::new(-half_w + chamfer, -half_h),
        Point::new(half_w - chamfer, -half_h),
        Point::new(half_w, -half_h + chamfer),
        Point::new(half_w, half_h - chamfer),
        Point::new(half_w - chamfer, half_h),
        Point::new(-half_w + chamfer, half_h),
        Point::new(-half_w, half_h - chamfer),
        Point::new(-half_w, -half_h + chamfer),
    ];

    let polygon = local.into_iter().map(|p| rotate_point(Point::new(center.x + p.x, center.y + p.y), center, angle)).collect();
    Hull::from_polygon(polygon, net_id, source)
}

/// Stadium (discorectangle) hull: offset side-lines plus quarter-fan
/// semicircle caps. `width`/`height` follow the oval-pad convention (the
/// longer dimension is the cap-to-cap axis).
///
/// When the rotation is close to a multiple of 90 degrees relative to which
/// axis is longer (`45 < |angle mod 180| < 135`), the long/short axis roles
/// are swapped before building so the stadium orientation stays consistent
/// with what the caller's `angle` actually means geometrically.
fn stadium_hull(center: Point, width: f64, height: f64, angle: f64, inflation: f64, net_id: NetId, source: HullSource) -> Hull {
    let (long_axis, short_axis, axis_angle) = if width >= height {
        (width, height, angle)
    } else {
        (height, width, angle + 90.0)
    };

    let normalized = axis_angle.rem_euclid(180.0);
    let (long_axis, short_axis, axis_angle) = if (45.0..135.0).contains(&normalized) {
        (short_axis, long_axis, axis_angle - 90.0)
    } else {
        (long_axis, short_axis, axis_angle)
    };

    let radius = short_axis / 2.0 + inflation;
    let cap_offset = (long_axis / 2.0 - short_axis / 2.0).max(0.0);

    let mut polygon = Vec::new();

    // Right cap: semicircle fanned from -90deg to +90deg (local frame,
    // long axis along local +x), CCW.
    for i in 0..=(CAP_FAN_SEGMENTS * 2) {
        let theta = -std::f64::consts::FRAC_PI_2 + std::f64::consts::PI * (i as f64) / (CAP_FAN_SEGMENTS as f64 * 2.0);
        polygon.push(Point::new(cap_offset + radius * theta.cos(), radius * theta.sin()));
    }
    // Left cap: semicircle fanned from +90deg to +270deg, CCW.
    for i in 0..=(CAP_FAN_SEGMENTS * 2) {
        let theta = std::f64::consts::FRAC_PI_2 + std::f64::consts::PI * (i as f64) / (CAP_FAN_SEGMENTS as f64 * 2.0);
        polygon.push(Point::new(-cap_offset + radius * theta.cos(), radius * theta.sin()));
    }

    let polygon = polygon
        .into_iter()
        .map(|p| rotate_point(Point::new(center.x + p.x, center.y + p.y), center, axis_angle))
        .collect();

    Hull::from_polygon(polygon, net_id, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::board::NetId;

    #[test]
    fn test_pad_hull_is_ccw() {
        let pad = RoutingPad {
            center: Point::new(0.0, 0.0),
            width: 2.0,
            height: 1.0,
            shape: PadShape::Rect,
            angle: 0.0,
            roundrect_ratio: 0.25,
            layers: vec![],
            net_id: NetId(0),
        };
        let hull = pad_hull(&pad, 0.2);
        assert!(signed_area(&hull.polygon) > 0.0);
    }

    #[test]
    fn test_rotated_roundrect_bbox_matches_rotated_rect() {
        let pad = RoutingPad {
            center: Point::new(0.0, 0.0),
            width: 4.0,
            height: 2.0,
            shape: PadShape::RoundRect,
            angle: 45.0,
            roundrect_ratio: 0.25,
            layers: vec![],
            net_id: NetId(0),
        };
        let hull = pad_hull(&pad, 0.0);
        // Rotated rectangle (half extents 2, 1) bbox at 45 degrees:
        // half-extent along each world axis = 2*cos45 + 1*sin45 ~= 2.1213
        let expected = 2.0 * std::f64::consts::FRAC_1_SQRT_2 + 1.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert!((hull.bbox.1.x - expected).abs() < 0.05);
        assert!((hull.bbox.1.y - expected).abs() < 0.05);
    }

    #[test]
    fn test_stadium_cap_bbox_accurate() {
        let trace = RoutingTrace {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
            width: 0.5,
            layer: "F.Cu".to_string(),
            net_id: NetId(0),
        };
        let hull = trace_hull(&trace, 0.0);
        // Expect bbox: x in [-0.25, 10.25], y in [-0.25, 0.25]
        assert!((hull.bbox.0.x - (-0.25)).abs() < 0.01);
        assert!((hull.bbox.1.x - 10.25).abs() < 0.01);
        assert!((hull.bbox.0.y - (-0.25)).abs() < 0.01);
        assert!((hull.bbox.1.y - 0.25).abs() < 0.01);
    }

    #[test]
    fn test_circle_via_hull_is_16gon() {
        let via = RoutingVia {
            center: Point::new(1.0, 1.0),
            outer_size: 0.8,
            drill: 0.4,
            net_id: NetId(0),
        };
        let hull = via_hull(&via, 0.0);
        assert_eq!(hull.polygon.len(), CIRCLE_SIDES);
    }
}
