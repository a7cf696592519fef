use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

use super::MaterialStore;
use crate::error::StoreError;
use crate::kernel::commit::NewMaterial;

/// Keeps created records in memory. Failures can be queued up front.
#[derive(Debug, Default)]
pub struct InMemoryMaterialStore {
    created: Mutex<Vec<(String, NewMaterial)>>,
    failures: Mutex<VecDeque<String>>,
}

impl InMemoryMaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next create call fails with `reason`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push_back(reason.into());
        }
    }

    pub fn created(&self) -> Vec<(String, NewMaterial)> {
        self.created.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MaterialStore for InMemoryMaterialStore {
    async fn create_material(&self, material: &NewMaterial) -> Result<String, StoreError> {
        let failure = self
            .failures
            .lock()
            .map_err(|_| StoreError::Unavailable("failure queue poisoned".to_string()))?
            .pop_front();
        if let Some(reason) = failure {
            return Err(StoreError::Unavailable(reason));
        }

        let id = Uuid::new_v4().to_string();
        self.created
            .lock()
            .map_err(|_| StoreError::Unavailable("record list poisoned".to_string()))?
            .push((id.clone(), material.clone()));
        Ok(id)
    }
}
