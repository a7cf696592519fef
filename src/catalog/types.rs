use serde::{Deserialize, Serialize};

use super::id;
use crate::intent::MaterialStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "id::string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(deserialize_with = "id::string")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "id::string")]
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(deserialize_with = "id::string")]
    pub id: String,
    pub name: String,
}

/// An already-created material, as far as summaries need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    #[serde(default, deserialize_with = "id::string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "id::optional")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub estimated_total_cost: Option<f64>,
    #[serde(default)]
    pub status: Option<MaterialStatus>,
}

/// Read-only snapshot of the backend's reference data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub materials: Vec<MaterialRecord>,
}
