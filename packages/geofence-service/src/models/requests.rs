use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{geofence::GeofenceResult, location::GeoPoint, location::GeoSample, shelter::Shelter};
use crate::libraries::attendance_check::AttendanceCheckResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateGeofenceRequest {
    pub current: GeoPoint,
    pub target: GeoPoint,
    pub max_distance_meters: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateGeofenceResponse {
    #[serde(flatten)]
    pub result: GeofenceResult,
    pub display_distance_meters: f64,
    pub bearing_degrees: f64,
    pub message: String,
}

impl EvaluateGeofenceResponse {
    pub fn new(result: GeofenceResult, bearing_degrees: f64) -> Self {
        Self {
            display_distance_meters: result.display_distance_meters(),
            message: result.to_string(),
            result,
            bearing_degrees,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCheckRequest {
    pub shelter_id: u64,
    pub sample: GeoSample,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCheckResponse {
    pub success: bool,
    pub shelter_id: u64,
    pub shelter_name: String,

    // Check-in record (when validation passes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_id: Option<Uuid>,

    // Distance info, present whenever the sample got as far as the geofence.
    // Same meaning as in EvaluateGeofenceResponse: raw and rounded distance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_distance_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance_meters: Option<f64>,

    // Status messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl AttendanceCheckResponse {
    pub fn accepted(shelter: &Shelter, attendance_id: Uuid, result: &AttendanceCheckResult) -> Self {
        Self {
            success: true,
            attendance_id: Some(attendance_id),
            message: Some(format!("Checked in at {}", shelter.name)),
            ..Self::from_result(shelter, result)
        }
    }

    pub fn rejected(shelter: &Shelter, result: &AttendanceCheckResult) -> Self {
        Self {
            success: false,
            error: Some(
                result
                    .error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "Location check failed.".to_string()),
            ),
            error_code: result.error.as_ref().map(|e| e.code().to_string()),
            ..Self::from_result(shelter, result)
        }
    }

    fn from_result(shelter: &Shelter, result: &AttendanceCheckResult) -> Self {
        Self {
            success: result.passed,
            shelter_id: shelter.id,
            shelter_name: shelter.name.clone(),
            attendance_id: None,
            distance_meters: result.geofence.map(|g| g.distance_meters),
            display_distance_meters: result.geofence.map(|g| g.display_distance_meters()),
            max_distance_meters: result.geofence.map(|g| g.max_distance_meters),
            message: None,
            error: None,
            error_code: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterShelterRequest {
    pub name: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub radius_meters: Option<f64>,
}

impl RegisterShelterRequest {
    pub fn into_shelter(self, id: u64) -> Shelter {
        Shelter {
            id,
            name: self.name,
            location: self.location,
            radius_meters: self.radius_meters,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
