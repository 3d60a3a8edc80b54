//! Cascading auto-router: a fixed, small escalation of candidates built
//! strictly on top of [`super::router::Router`]. No global rip-up-and-retry
//! — each call tries a bounded candidate set and never perturbs existing
//! traces.

use super::board::{NetId, COPPER_LAYERS};
use super::geometry::Point;
use super::router::{RouteBackend, Router};

#[derive(Debug, Clone)]
pub struct AutoRouteResult {
    pub success: bool,
    pub segments: Vec<RoutedSegment>,
    pub vias: Vec<Point>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RoutedSegment {
    pub polyline: Vec<Point>,
    pub layer: String,
    pub backend: RouteBackend,
}

impl AutoRouteResult {
    fn failure(reason: &str) -> Self {
        Self { success: false, segments: Vec::new(), vias: Vec::new(), reason: Some(reason.to_string()) }
    }

    fn single_layer(segment: RoutedSegment) -> Self {
        Self { success: true, segments: vec![segment], vias: Vec::new(), reason: None }
    }
}

/// Try `preferred_layer` alone, then every other copper layer alone, then
/// single-via candidates, then (if `max_vias >= 2`) two-via candidates.
pub fn auto_route(
    router: &Router,
    start: Point,
    end: Point,
    preferred_layer: &str,
    width: f64,
    net_id: NetId,
    via_size: f64,
    max_vias: u32,
) -> AutoRouteResult {
    if let Ok(result) = router.route(start, end, preferred_layer, width, net_id) {
        return AutoRouteResult::single_layer(RoutedSegment { polyline: result.polyline, layer: preferred_layer.to_string(), backend: result.backend });
    }

    for layer in COPPER_LAYERS {
        if *layer == preferred_layer {
            continue;
        }
        if let Ok(result) = router.route(start, end, layer, width, net_id) {
            return AutoRouteResult::single_layer(RoutedSegment { polyline: result.polyline, layer: layer.to_string(), backend: result.backend });
        }
    }

    let via_radius = via_size / 2.0;
    let candidates = via_candidates(start, end);

    for &via_point in &candidates {
        if router.check_via(via_point, via_radius, net_id).is_err() {
            continue;
        }
        let Ok(leg_a) = router.route(start, via_point, preferred_layer, width, net_id) else {
            continue;
        };
        for layer in COPPER_LAYERS {
            if *layer == preferred_layer {
                continue;
            }
            if let Ok(leg_b) = router.route(via_point, end, layer, width, net_id) {
                return AutoRouteResult {
                    success: true,
                    segments: vec![
                        RoutedSegment { polyline: leg_a.polyline.clone(), layer: preferred_layer.to_string(), backend: leg_a.backend },
                        RoutedSegment { polyline: leg_b.polyline, layer: layer.to_string(), backend: leg_b.backend },
                    ],
                    vias: vec![via_point],
                    reason: None,
                };
            }
        }
    }

    if max_vias >= 2 {
        for &via_a in &candidates {
            for &via_b in &candidates {
                if via_a == via_b {
                    continue;
                }
                if router.check_via(via_a, via_radius, net_id).is_err() || router.check_via(via_b, via_radius, net_id).is_err() {
                    continue;
                }
                let Ok(leg_a) = router.route(start, via_a, preferred_layer, width, net_id) else { continue };

                for mid_layer in COPPER_LAYERS {
                    if *mid_layer == preferred_layer {
                        continue;
                    }
                    let Ok(leg_mid) = router.route(via_a, via_b, mid_layer, width, net_id) else { continue };
                    let Ok(leg_c) = router.route(via_b, end, preferred_layer, width, net_id) else { continue };

                    return AutoRouteResult {
                        success: true,
                        segments: vec![
                            RoutedSegment { polyline: leg_a.polyline.clone(), layer: preferred_layer.to_string(), backend: leg_a.backend },
                            RoutedSegment { polyline: leg_mid.polyline, layer: mid_layer.to_string(), backend: leg_mid.backend },
                            RoutedSegment { polyline: leg_c.polyline, layer: preferred_layer.to_string(), backend: leg_c.backend },
                        ],
                        vias: vec![via_a, via_b],
                        reason: None,
                    };
                }
            }
        }
    }

    AutoRouteResult::failure("No valid route found - all paths blocked")
}

/// Eight via candidates: 25%/50%/75% along the direct line, each with a
/// perpendicular offset of `max(1.0mm, 10% of length)`, plus the direct
/// point itself at each fraction. Degenerates to the single start point
/// when start and end coincide.
fn via_candidates(start: Point, end: Point) -> Vec<Point> {
    let length = start.distance_to(end);
    if length < 1e-9 {
        return vec![start];
    }

    let offset = (length * 0.1).max(1.0);
    let dx = (end.x - start.x) / length;
    let dy = (end.y - start.y) / length;
    let perp = (dy, -dx);

    let mut candidates = Vec::with_capacity(8);
    for &fraction in &[0.25, 0.5, 0.75] {
        let base = Point::new(start.x + dx * length * fraction, start.y + dy * length * fraction);
        candidates.push(Point::new(base.x + perp.0 * offset, base.y + perp.1 * offset));
        candidates.push(Point::new(base.x - perp.0 * offset, base.y - perp.1 * offset));
    }
    // Two remaining on-line candidates (25% and 75%) to round out the set.
    candidates.push(Point::new(start.x + dx * length * 0.25, start.y + dy * length * 0.25));
    candidates.push(Point::new(start.x + dx * length * 0.75, start.y + dy * length * 0.75));

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::board::Board;
    use crate::routing::router::RouterConfig;

    #[test]
    fn test_auto_route_direct_on_preferred_layer() {
        let board = Board::default();
        let router = Router::new(&board, RouterConfig::default());
        let result = auto_route(&router, Point::new(0.0, 0.0), Point::new(5.0, 0.0), "F.Cu", 0.25, NetId(1), 0.8, 0);
        assert!(result.success);
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].layer, "F.Cu");
    }

    #[test]
    fn test_via_candidates_degenerate_case() {
        let candidates = via_candidates(Point::new(1.0, 1.0), Point::new(1.0, 1.0));
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_via_candidates_nonempty_for_real_segment() {
        let candidates = via_candidates(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(candidates.len(), 8);
    }
}
