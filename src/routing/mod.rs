//! Boundary to the external routing provider.

pub mod osrm;

use async_trait::async_trait;
use thiserror::Error;

use crate::utils::geo::Coordinate;

pub use osrm::OsrmClient;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing provider timed out")]
    Timeout,

    #[error("routing provider returned status {0}")]
    Status(u16),

    #[error("routing request failed: {0}")]
    Transport(String),

    #[error("malformed routing response: {0}")]
    Malformed(String),

    #[error("routing provider found no route")]
    NoRoutes,
}

/// A candidate path as handed over by the provider, already in km/minutes
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoute {
    pub path: Vec<Coordinate>,
    pub distance_km: f64,
    pub duration_min: u32,
}

/// Anything that can propose paths between two points.
///
/// Implementations return the provider's preferred route first, followed
/// by whatever alternatives it found.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn alternatives(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<RawRoute>, RoutingError>;
}
