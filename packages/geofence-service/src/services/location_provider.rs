use std::collections::VecDeque;
use std::future::Future;
use tokio::sync::{mpsc, Mutex};

use crate::models::GeoSample;

/// Permission state reported by a location provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied.")]
    PermissionDenied,

    #[error("Location services are disabled.")]
    ServicesDisabled,

    #[error("Timed out waiting for a location fix.")]
    Timeout,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

impl LocationError {
    /// Terminal errors end a position subscription; the rest may clear up on the next fix
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::ServicesDisabled)
    }
}

pub type SampleStream = mpsc::Receiver<Result<GeoSample, LocationError>>;

/// Source of device positions.
///
/// Implementations wrap whatever platform API is available. Everything above
/// this trait is platform independent.
pub trait LocationProvider: Send + Sync {
    fn permission_status(&self) -> impl Future<Output = PermissionStatus> + Send;

    /// Prompt for permission, returning the resulting status
    fn request_permission(&self) -> impl Future<Output = PermissionStatus> + Send;

    fn current_position(&self) -> impl Future<Output = Result<GeoSample, LocationError>> + Send;

    /// Subscribe to continuous updates. Dropping the receiver cancels the subscription.
    fn watch_position(&self) -> Result<SampleStream, LocationError>;
}

/// Provider that replays a fixed script of readings
pub struct ScriptedLocationProvider {
    permission: Mutex<PermissionStatus>,
    grant_on_request: bool,
    positions: Mutex<VecDeque<Result<GeoSample, LocationError>>>,
    watch_script: Vec<Result<GeoSample, LocationError>>,
}

impl ScriptedLocationProvider {
    pub fn new(permission: PermissionStatus) -> Self {
        Self {
            permission: Mutex::new(permission),
            grant_on_request: true,
            positions: Mutex::new(VecDeque::new()),
            watch_script: Vec::new(),
        }
    }

    /// Whether a permission prompt is accepted
    pub fn grant_on_request(mut self, grant: bool) -> Self {
        self.grant_on_request = grant;
        self
    }

    /// Readings returned one by one from `current_position`
    pub fn with_positions(
        mut self,
        positions: impl IntoIterator<Item = Result<GeoSample, LocationError>>,
    ) -> Self {
        self.positions = Mutex::new(positions.into_iter().collect());
        self
    }

    /// Readings delivered to every `watch_position` subscriber
    pub fn with_watch_script(
        mut self,
        script: impl IntoIterator<Item = Result<GeoSample, LocationError>>,
    ) -> Self {
        self.watch_script = script.into_iter().collect();
        self
    }
}

impl LocationProvider for ScriptedLocationProvider {
    async fn permission_status(&self) -> PermissionStatus {
        *self.permission.lock().await
    }

    async fn request_permission(&self) -> PermissionStatus {
        let mut permission = self.permission.lock().await;
        if *permission == PermissionStatus::Undetermined {
            *permission = if self.grant_on_request {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
        }
        *permission
    }

    async fn current_position(&self) -> Result<GeoSample, LocationError> {
        if *self.permission.lock().await != PermissionStatus::Granted {
            return Err(LocationError::PermissionDenied);
        }

        let next = self.positions.lock().await.pop_front();
        match next {
            Some(reading) => reading,
            // An exhausted script never produces a fix
            None => std::future::pending().await,
        }
    }

    fn watch_position(&self) -> Result<SampleStream, LocationError> {
        let (tx, rx) = mpsc::channel(self.watch_script.len().max(1));
        for reading in &self.watch_script {
            if tx.try_send(reading.clone()).is_err() {
                break;
            }
        }
        Ok(rx)
    }
}
