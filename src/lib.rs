//! ev-trip-planner core
//!
//! Decides whether an EV can finish a trip on its current charge and, when
//! it cannot, places charging stops along the route.

pub mod traits;
pub mod geo;
pub mod haversine;
pub mod polyline;
pub mod station;
pub mod matcher;
pub mod planner;
pub mod trip;
pub mod session;
pub mod vehicle;
pub mod osrm;
pub mod nominatim;
pub mod crowd;
pub mod format;
