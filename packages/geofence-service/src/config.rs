use serde::Deserialize;

use crate::libraries::attendance_check::AttendanceCheckConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    // JSON array of shelters to seed the registry with
    #[serde(default)]
    pub shelters_file: Option<String>,

    // Radius applied to shelters that don't carry their own
    #[serde(default = "default_radius_meters")]
    pub default_radius_meters: f64,

    #[serde(default = "default_max_accuracy_meters")]
    pub max_accuracy_meters: f64,

    #[serde(default = "default_max_sample_age_ms")]
    pub max_sample_age_ms: i64,

    #[serde(default = "default_max_clock_drift_ms")]
    pub max_clock_drift_ms: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Config>()
    }

    pub fn check_config(&self) -> AttendanceCheckConfig {
        AttendanceCheckConfig {
            max_accuracy_meters: self.max_accuracy_meters,
            max_sample_age_ms: self.max_sample_age_ms,
            max_clock_drift_ms: self.max_clock_drift_ms,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            shelters_file: None,
            default_radius_meters: default_radius_meters(),
            max_accuracy_meters: default_max_accuracy_meters(),
            max_sample_age_ms: default_max_sample_age_ms(),
            max_clock_drift_ms: default_max_clock_drift_ms(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_radius_meters() -> f64 {
    100.0
}

fn default_max_accuracy_meters() -> f64 {
    50.0
}

fn default_max_sample_age_ms() -> i64 {
    30_000
}

fn default_max_clock_drift_ms() -> i64 {
    5_000
}
