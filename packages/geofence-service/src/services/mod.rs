pub mod geofence_gate;
pub mod location_provider;
pub mod monitor;
pub mod shelter;
