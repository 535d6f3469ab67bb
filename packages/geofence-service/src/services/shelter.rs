use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{Shelter, ShelterValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ShelterError {
    #[error("Failed to read shelters file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse shelters file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Shelter {id} is invalid: {source}")]
    Invalid {
        id: u64,
        #[source]
        source: ShelterValidationError,
    },

    #[error("Shelter {0} is listed more than once")]
    Duplicate(u64),
}

/// Registry of shelter check-in locations, kept in memory
pub struct ShelterService {
    shelters: RwLock<HashMap<u64, Shelter>>,
}

impl ShelterService {
    pub fn new() -> Self {
        Self {
            shelters: RwLock::new(HashMap::new()),
        }
    }

    /// Build a registry from a list, rejecting invalid or duplicate entries
    pub fn from_shelters(
        shelters: impl IntoIterator<Item = Shelter>,
    ) -> Result<Self, ShelterError> {
        let mut map = HashMap::new();
        for shelter in shelters {
            shelter.validate().map_err(|source| ShelterError::Invalid {
                id: shelter.id,
                source,
            })?;
            if map.contains_key(&shelter.id) {
                return Err(ShelterError::Duplicate(shelter.id));
            }
            map.insert(shelter.id, shelter);
        }

        Ok(Self {
            shelters: RwLock::new(map),
        })
    }

    /// Load shelters from a JSON array file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ShelterError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let shelters: Vec<Shelter> = serde_json::from_str(&contents)?;

        let service = Self::from_shelters(shelters)?;
        info!("Loaded shelters from {}", path.display());
        Ok(service)
    }

    /// Get a shelter by ID
    pub async fn get(&self, id: u64) -> Option<Shelter> {
        let shelters = self.shelters.read().await;
        shelters.get(&id).cloned()
    }

    /// Register or update a shelter. Returns true when the shelter is new.
    pub async fn upsert(&self, shelter: Shelter) -> Result<bool, ShelterValidationError> {
        shelter.validate()?;

        let mut shelters = self.shelters.write().await;
        debug!("Registering shelter {} ({})", shelter.id, shelter.name);
        Ok(shelters.insert(shelter.id, shelter).is_none())
    }

    /// All shelters ordered by ID
    pub async fn list(&self) -> Vec<Shelter> {
        let shelters = self.shelters.read().await;
        let mut list: Vec<Shelter> = shelters.values().cloned().collect();
        list.sort_by_key(|s| s.id);
        list
    }

    pub async fn len(&self) -> usize {
        self.shelters.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shelters.read().await.is_empty()
    }
}

impl Default for ShelterService {
    fn default() -> Self {
        Self::new()
    }
}
