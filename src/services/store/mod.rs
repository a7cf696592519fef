//! Persistence seam for committed materials.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::kernel::commit::NewMaterial;

pub mod memory;
pub mod rest;

pub use memory::InMemoryMaterialStore;
pub use rest::RestMaterialStore;

#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Create one material record and return its id.
    async fn create_material(&self, material: &NewMaterial) -> Result<String, StoreError>;
}
