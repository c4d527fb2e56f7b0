use std::env;
use std::time::Duration;

use crate::risk::planner::DEFAULT_ROUTING_TIMEOUT;
use crate::risk::{DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_KM};
use crate::routing::osrm::DEFAULT_OSRM_BASE_URL;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub osrm_base_url: String,
    pub osrm_profile: String,
    pub routing_timeout_secs: u64,
    pub nearby_radius_km: f64,
    pub nearby_limit: usize,
    pub seed_demo_zones: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            osrm_base_url: env::var("OSRM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OSRM_BASE_URL.to_string()),
            osrm_profile: env::var("OSRM_PROFILE")
                .unwrap_or_else(|_| "driving".to_string()),
            routing_timeout_secs: env::var("ROUTING_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_ROUTING_TIMEOUT.as_secs().to_string())
                .parse()
                .expect("ROUTING_TIMEOUT_SECS must be a number"),
            nearby_radius_km: env::var("NEARBY_RADIUS_KM")
                .unwrap_or_else(|_| DEFAULT_NEARBY_RADIUS_KM.to_string())
                .parse()
                .expect("NEARBY_RADIUS_KM must be a number"),
            nearby_limit: env::var("NEARBY_LIMIT")
                .unwrap_or_else(|_| DEFAULT_NEARBY_LIMIT.to_string())
                .parse()
                .expect("NEARBY_LIMIT must be a number"),
            seed_demo_zones: env::var("SEED_DEMO_ZONES")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn routing_timeout(&self) -> Duration {
        Duration::from_secs(self.routing_timeout_secs)
    }
}
