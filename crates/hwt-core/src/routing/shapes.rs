//! Routing-engine element shapes and point-to-edge distance calculations.
//!
//! These mirror the document-level `crate::layout::Pad`/`Trace`/`Via` but use
//! the routing engine's compact [`NetId`] instead of string net names, since
//! these are looked up inside hot pathfinding loops.

use super::board::NetId;
use super::geometry::{point_to_segment_distance, Point};

/// Pad outline shape, as seen by the routing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadShape {
    Circle,
    Rect,
    RoundRect,
    Oval,
}

/// A copper pad on some set of layers.
#[derive(Debug, Clone)]
pub struct RoutingPad {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub shape: PadShape,
    /// Rotation in degrees.
    pub angle: f64,
    /// Corner radius ratio for `PadShape::RoundRect`, in `0.0..=0.5`.
    pub roundrect_ratio: f64,
    pub layers: Vec<String>,
    pub net_id: NetId,
}

impl RoutingPad {
    pub fn on_layer(&self, layer: &str) -> bool {
        self.layers.iter().any(|l| l == layer)
    }

    /// Conservative single-radius bound used for escape/allow-region math
    /// (§4.8's rotated-pad compromise): half the diagonal for a rotated pad,
    /// otherwise the larger half-dimension.
    pub fn bounding_radius(&self, clearance: f64) -> f64 {
        let w = self.width + 2.0 * clearance;
        let h = self.height + 2.0 * clearance;
        if self.angle != 0.0 {
            (w * w + h * h).sqrt() / 2.0
        } else {
            w.max(h) / 2.0
        }
    }
}

/// A trace segment (capsule: a line segment with rounded ends of `width / 2`).
#[derive(Debug, Clone)]
pub struct RoutingTrace {
    pub start: Point,
    pub end: Point,
    pub width: f64,
    pub layer: String,
    pub net_id: NetId,
}

/// A via, spanning every copper layer.
#[derive(Debug, Clone)]
pub struct RoutingVia {
    pub center: Point,
    pub outer_size: f64,
    pub drill: f64,
    pub net_id: NetId,
}

/// Signed distance from `p` to the edge of `pad`: positive outside, negative
/// inside, zero on the boundary.
pub fn distance_to_pad(p: Point, pad: &RoutingPad) -> f64 {
    let dx = p.x - pad.center.x;
    let dy = p.y - pad.center.y;

    let (local_x, local_y) = if pad.angle != 0.0 {
        let angle_rad = -pad.angle.to_radians();
        let cos_a = angle_rad.cos();
        let sin_a = angle_rad.sin();
        (dx * cos_a - dy * sin_a, dx * sin_a + dy * cos_a)
    } else {
        (dx, dy)
    };

    let half_w = pad.width / 2.0;
    let half_h = pad.height / 2.0;

    match pad.shape {
        PadShape::Circle => distance_to_circle(local_x, local_y, half_w.min(half_h)),
        PadShape::Oval => distance_to_oval(local_x, local_y, half_w, half_h),
        PadShape::RoundRect => {
            let corner_radius = half_w.min(half_h) * pad.roundrect_ratio;
            distance_to_roundrect(local_x, local_y, half_w, half_h, corner_radius)
        }
        PadShape::Rect => distance_to_rect(local_x, local_y, half_w, half_h),
    }
}

fn distance_to_circle(x: f64, y: f64, radius: f64) -> f64 {
    (x * x + y * y).sqrt() - radius
}

fn distance_to_rect(x: f64, y: f64, half_w: f64, half_h: f64) -> f64 {
    if x.abs() <= half_w && y.abs() <= half_h {
        let dist_to_x_edge = half_w - x.abs();
        let dist_to_y_edge = half_h - y.abs();
        return -dist_to_x_edge.min(dist_to_y_edge);
    }

    let closest_x = x.clamp(-half_w, half_w);
    let closest_y = y.clamp(-half_h, half_h);
    ((x - closest_x).powi(2) + (y - closest_y).powi(2)).sqrt()
}

fn distance_to_oval(x: f64, y: f64, half_w: f64, half_h: f64) -> f64 {
    if half_w > half_h {
        let radius = half_h;
        let cap_offset = half_w - radius;
        if x < -cap_offset {
            ((x + cap_offset).powi(2) + y * y).sqrt() - radius
        } else if x > cap_offset {
            ((x - cap_offset).powi(2) + y * y).sqrt() - radius
        } else {
            y.abs() - radius
        }
    } else if half_h > half_w {
        let radius = half_w;
        let cap_offset = half_h - radius;
        if y < -cap_offset {
            (x * x + (y + cap_offset).powi(2)).sqrt() - radius
        } else if y > cap_offset {
            (x * x + (y - cap_offset).powi(2)).sqrt() - radius
        } else {
            x.abs() - radius
        }
    } else {
        (x * x + y * y).sqrt() - half_w
    }
}

fn distance_to_roundrect(x: f64, y: f64, half_w: f64, half_h: f64, corner_radius: f64) -> f64 {
    let corner_radius = corner_radius.min(half_w).min(half_h);
    if corner_radius <= 0.0 {
        return distance_to_rect(x, y, half_w, half_h);
    }

    let inner_half_w = half_w - corner_radius;
    let inner_half_h = half_h - corner_radius;

    if x.abs() <= inner_half_w {
        y.abs() - half_h
    } else if y.abs() <= inner_half_h {
        x.abs() - half_w
    } else {
        let corner_x = if x > 0.0 { inner_half_w } else { -inner_half_w };
        let corner_y = if y > 0.0 { inner_half_h } else { -inner_half_h };
        ((x - corner_x).powi(2) + (y - corner_y).powi(2)).sqrt() - corner_radius
    }
}

/// Signed distance from `p` to the edge of a capsule-shaped trace.
pub fn distance_to_trace(p: Point, trace: &RoutingTrace) -> f64 {
    let centerline_dist = point_to_segment_distance(p, trace.start, trace.end);
    centerline_dist - trace.width / 2.0
}

/// Signed distance from `p` to the edge of a via (circular footprint).
pub fn distance_to_via(p: Point, via: &RoutingVia) -> f64 {
    p.distance_to(via.center) - via.outer_size / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(shape: PadShape, width: f64, height: f64, angle: f64) -> RoutingPad {
        RoutingPad {
            center: Point::new(0.0, 0.0),
            width,
            height,
            shape,
            angle,
            roundrect_ratio: 0.25,
            layers: vec!["F.Cu".to_string()],
            net_id: NetId(0),
        }
    }

    #[test]
    fn test_distance_to_circle_pad() {
        let p = pad(PadShape::Circle, 2.0, 2.0, 0.0);
        assert!((distance_to_pad(Point::new(2.0, 0.0), &p) - 1.0).abs() < 1e-9);
        assert!(distance_to_pad(Point::new(0.0, 0.0), &p) < 0.0);
    }

    #[test]
    fn test_distance_to_rect_pad_inside_is_negative() {
        let p = pad(PadShape::Rect, 4.0, 2.0, 0.0);
        assert!(distance_to_pad(Point::new(0.0, 0.0), &p) < 0.0);
        assert!(distance_to_pad(Point::new(3.0, 0.0), &p) > 0.0);
    }

    #[test]
    fn test_distance_to_rotated_rect_pad() {
        let p = pad(PadShape::Rect, 4.0, 1.0, 90.0);
        // Rotated 90 degrees, the long axis now lies along y.
        let d_along_y = distance_to_pad(Point::new(0.0, 2.5), &p);
        let d_along_x = distance_to_pad(Point::new(2.5, 0.0), &p);
        assert!(d_along_y < d_along_x);
    }

    #[test]
    fn test_distance_to_oval_pad_caps() {
        let p = pad(PadShape::Oval, 4.0, 2.0, 0.0);
        // Cap center offset is (2 - 1) = 1, so point at (3, 0) is exactly on cap edge.
        assert!((distance_to_pad(Point::new(3.0, 0.0), &p)).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_roundrect_corner() {
        let mut p = pad(PadShape::RoundRect, 4.0, 4.0, 0.0);
        p.roundrect_ratio = 0.5;
        // corner radius = min(2,2)*0.5 = 1.0, so corner point distance should be consistent
        let d = distance_to_pad(Point::new(2.0, 2.0), &p);
        assert!(d > 0.0);
    }

    #[test]
    fn test_distance_to_trace_capsule() {
        let trace = RoutingTrace {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
            width: 0.5,
            layer: "F.Cu".to_string(),
            net_id: NetId(1),
        };
        assert!((distance_to_trace(Point::new(5.0, 0.5), &trace) - 0.25).abs() < 1e-9);
        assert!(distance_to_trace(Point::new(5.0, 0.0), &trace) < 0.0);
    }

    #[test]
    fn test_distance_to_via_circle() {
        let via = RoutingVia {
            center: Point::new(0.0, 0.0),
            outer_size: 0.8,
            drill: 0.4,
            net_id: NetId(2),
        };
        assert!((distance_to_via(Point::new(0.4, 0.0), &via)).abs() < 1e-9);
    }
}
