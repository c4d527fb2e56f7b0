pub mod rider_location;
pub mod risk_zone;
pub mod route_plan;
