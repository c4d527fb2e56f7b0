//! OSRM (Open Source Routing Machine) client.
//!
//! Uses the public `route` service with `alternatives=true`, which returns
//! up to three candidate paths as GeoJSON line strings.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::routing::{RawRoute, RoutingError, RoutingProvider};
use crate::utils::geo::Coordinate;

pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// meters
    distance: f64,
    /// seconds
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: [lng, lat]
    coordinates: Vec<[f64; 2]>,
}

/// Routing provider backed by an OSRM server
pub struct OsrmClient {
    client: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmClient {
    pub fn new(
        base_url: impl Into<String>,
        profile: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RoutingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RoutingError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            profile: profile.into(),
        })
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}",
            self.base_url, self.profile, origin.lng, origin.lat, destination.lng, destination.lat
        )
    }
}

#[async_trait]
impl RoutingProvider for OsrmClient {
    async fn alternatives(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<RawRoute>, RoutingError> {
        let url = self.route_url(origin, destination);
        tracing::debug!(%url, "Requesting OSRM alternatives");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("alternatives", "true"),
                ("steps", "false"),
                ("continue_straight", "false"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout
                } else {
                    RoutingError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Status(status.as_u16()));
        }

        let body: OsrmResponse = response
            .json()
            .await
            .map_err(|e| RoutingError::Malformed(e.to_string()))?;

        into_raw_routes(body)
    }
}

fn into_raw_routes(body: OsrmResponse) -> Result<Vec<RawRoute>, RoutingError> {
    if body.code != "Ok" {
        return Err(RoutingError::Malformed(format!(
            "code {}: {}",
            body.code,
            body.message.unwrap_or_default()
        )));
    }
    if body.routes.is_empty() {
        return Err(RoutingError::NoRoutes);
    }

    body.routes
        .into_iter()
        .enumerate()
        .map(|(i, route)| {
            if route.geometry.coordinates.is_empty() {
                return Err(RoutingError::Malformed(format!("route {} has no geometry", i)));
            }
            if !route.distance.is_finite() || !route.duration.is_finite() {
                return Err(RoutingError::Malformed(format!(
                    "route {} has a non-finite distance or duration",
                    i
                )));
            }

            Ok(RawRoute {
                path: route
                    .geometry
                    .coordinates
                    .into_iter()
                    .map(|[lng, lat]| Coordinate::new(lat, lng))
                    .collect(),
                distance_km: crate::risk::round2(route.distance / 1000.0),
                duration_min: (route.duration / 60.0).round().max(0.0) as u32,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<RawRoute>, RoutingError> {
        into_raw_routes(serde_json::from_str(json).expect("valid test payload"))
    }

    #[test]
    fn test_converts_geojson_and_units() {
        let routes = parse(
            r#"{
                "code": "Ok",
                "routes": [
                    {
                        "distance": 5234.7,
                        "duration": 731.0,
                        "geometry": {"type": "LineString", "coordinates": [[-99.1332, 19.4326], [-99.1247, 19.4497]]}
                    },
                    {
                        "distance": 6100.0,
                        "duration": 840.0,
                        "geometry": {"type": "LineString", "coordinates": [[-99.1332, 19.4326], [-99.1300, 19.4400], [-99.1247, 19.4497]]}
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].distance_km, 5.23);
        assert_eq!(routes[0].duration_min, 12);
        assert_eq!(routes[0].path[0], Coordinate::new(19.4326, -99.1332));
        assert_eq!(routes[1].path.len(), 3);
        assert_eq!(routes[1].duration_min, 14);
    }

    #[test]
    fn test_non_ok_code_is_malformed() {
        let err = parse(r#"{"code": "NoSegment", "message": "Could not find a matching segment"}"#)
            .unwrap_err();
        assert!(matches!(err, RoutingError::Malformed(_)));
    }

    #[test]
    fn test_empty_routes_is_no_routes() {
        let err = parse(r#"{"code": "Ok", "routes": []}"#).unwrap_err();
        assert!(matches!(err, RoutingError::NoRoutes));
    }

    #[test]
    fn test_route_without_geometry_is_malformed() {
        let err = parse(
            r#"{"code": "Ok", "routes": [{"distance": 10.0, "duration": 5.0, "geometry": {"coordinates": []}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RoutingError::Malformed(_)));
    }

    #[test]
    fn test_route_url_uses_lng_lat_order() {
        let client = OsrmClient::new("http://localhost:5000/", "walking", Duration::from_secs(1)).unwrap();
        let url = client.route_url(Coordinate::new(19.4326, -99.1332), Coordinate::new(19.4497, -99.1247));
        assert_eq!(
            url,
            "http://localhost:5000/route/v1/walking/-99.133200,19.432600;-99.124700,19.449700"
        );
    }
}
