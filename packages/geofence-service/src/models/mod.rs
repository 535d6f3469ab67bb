pub mod geofence;
pub mod location;
pub mod requests;
pub mod shelter;

// Re-export commonly used types
pub use geofence::GeofenceResult;
pub use location::{GeoPoint, GeoSample, LocationValidationError};
pub use requests::{
    AttendanceCheckRequest, AttendanceCheckResponse, ErrorResponse, EvaluateGeofenceRequest,
    EvaluateGeofenceResponse, RegisterShelterRequest,
};
pub use shelter::{Shelter, ShelterValidationError};
