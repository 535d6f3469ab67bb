use serde::{Deserialize, Serialize};

use super::location::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub id: u64,                    // Shelter id from the backend
    pub name: String,               // Shelter display name
    pub location: GeoPoint,         // Registered check-in point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>, // Allowed check-in radius, service default when absent
}

impl Shelter {
    pub fn new(id: u64, name: String, location: GeoPoint) -> Self {
        Self {
            id,
            name,
            location,
            radius_meters: None,
        }
    }

    pub fn with_radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = Some(radius_meters);
        self
    }

    /// Radius to enforce for this shelter
    pub fn radius_or(&self, default_radius_meters: f64) -> f64 {
        self.radius_meters.unwrap_or(default_radius_meters)
    }

    /// Validate shelter data
    pub fn validate(&self) -> Result<(), ShelterValidationError> {
        if self.name.trim().is_empty() || self.name.chars().count() > 100 {
            return Err(ShelterValidationError::InvalidName);
        }

        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(ShelterValidationError::InvalidLatitude);
        }

        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(ShelterValidationError::InvalidLongitude);
        }

        if let Some(radius) = self.radius_meters {
            if !radius.is_finite() || radius < 0.0 {
                return Err(ShelterValidationError::InvalidRadius);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShelterValidationError {
    #[error("Shelter name must be between 1 and 100 characters")]
    InvalidName,

    #[error("Invalid latitude: must be between -90 and 90")]
    InvalidLatitude,

    #[error("Invalid longitude: must be between -180 and 180")]
    InvalidLongitude,

    #[error("Invalid radius: must be a non-negative number of meters")]
    InvalidRadius,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_shelter() -> Shelter {
        Shelter::new(
            7,
            "Shelter Cempaka".to_string(),
            GeoPoint::new(-6.2, 106.816666),
        )
    }

    #[test]
    fn test_shelter_validation_valid() {
        let shelter = create_test_shelter();
        assert!(shelter.validate().is_ok());
        assert!(shelter.with_radius(0.0).validate().is_ok());
    }

    #[test]
    fn test_shelter_validation_invalid_name() {
        let mut shelter = create_test_shelter();
        shelter.name = "   ".to_string();
        assert_eq!(shelter.validate(), Err(ShelterValidationError::InvalidName));

        shelter.name = "a".repeat(101);
        assert_eq!(shelter.validate(), Err(ShelterValidationError::InvalidName));
    }

    #[test]
    fn test_shelter_validation_invalid_coordinates() {
        let mut shelter = create_test_shelter();
        shelter.location.latitude = 91.0;
        assert_eq!(
            shelter.validate(),
            Err(ShelterValidationError::InvalidLatitude)
        );

        shelter.location.latitude = 0.0;
        shelter.location.longitude = f64::NAN;
        assert_eq!(
            shelter.validate(),
            Err(ShelterValidationError::InvalidLongitude)
        );
    }

    #[test]
    fn test_shelter_validation_invalid_radius() {
        let shelter = create_test_shelter().with_radius(-5.0);
        assert_eq!(shelter.validate(), Err(ShelterValidationError::InvalidRadius));

        let shelter = create_test_shelter().with_radius(f64::INFINITY);
        assert_eq!(shelter.validate(), Err(ShelterValidationError::InvalidRadius));
    }

    #[test]
    fn test_radius_fallback() {
        let shelter = create_test_shelter();
        assert_eq!(shelter.radius_or(100.0), 100.0);
        assert_eq!(shelter.with_radius(40.0).radius_or(100.0), 40.0);
    }
}
