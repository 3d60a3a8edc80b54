//! Error types returned by the routing engine's public operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no route found between the requested endpoints")]
    NoRoute,
    #[error("start point is blocked by foreign copper")]
    StartBlocked,
    #[error("end point is blocked by foreign copper")]
    EndBlocked,
    #[error("endpoint belongs to a different net than the one requested")]
    DifferentNetEndpoint,
}

#[derive(Debug, Error)]
pub enum ViaError {
    #[error("via placement violates clearance on layer {layer}")]
    ClearanceViolation { layer: String },
}
