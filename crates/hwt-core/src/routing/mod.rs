//! Interactive PCB trace autorouter: obstacle modeling, spatial indexing,
//! two pathfinding backends, and a polyline optimizer sitting on top of the
//! [`crate::layout::Layout`] document model.

mod astar;
mod autorouter;
mod board;
mod errors;
mod geometry;
mod hull_map;
mod hulls;
mod obstacle_grid;
mod optimizer;
mod pending;
mod router;
mod shapes;
mod spatial_index;
mod walkaround;

pub use autorouter::{auto_route, AutoRouteResult, RoutedSegment};
pub use board::{Board, NetId, NetTable, COPPER_LAYERS, NO_NET};
pub use errors::{RouteError, ViaError};
pub use geometry::Point;
pub use hulls::{Hull, HullSource};
pub use pending::{PendingTrace, PendingTraceStore};
pub use router::{RouteBackend, RouteResult, Router, RouterConfig};
pub use shapes::{PadShape, RoutingPad, RoutingTrace, RoutingVia};
