use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::MaterialStore;
use crate::catalog::{id, Catalog, MaterialRecord, Project, Stage, Supplier};
use crate::config::BackendConfig;
use crate::error::StoreError;
use crate::kernel::commit::NewMaterial;

const REST_PREFIX: &str = "rest/v1";
/// Catalog reads only. Creates are awaited without a deadline.
const CATALOG_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the hosted backend's REST tables.
#[derive(Clone)]
pub struct RestMaterialStore {
    client: Client,
    config: BackendConfig,
}

#[derive(Deserialize)]
struct CreatedRow {
    #[serde(deserialize_with = "id::string")]
    id: String,
}

impl RestMaterialStore {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.config.base_url, REST_PREFIX, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    fn select_request(&self, table: &str, columns: &str) -> RequestBuilder {
        let url = format!("{}?select={}", self.table_url(table), columns);
        self.authorized(self.client.get(url)).timeout(CATALOG_TIMEOUT)
    }

    fn create_request(&self, material: &NewMaterial) -> RequestBuilder {
        let url = self.table_url(&self.config.materials_table);
        self.authorized(self.client.post(url))
            .header("Prefer", "return=representation")
            .json(material)
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, columns: &str) -> Result<Vec<T>, StoreError> {
        debug!(table, "Fetching catalog table");
        let response = self.select_request(table, columns).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the reference data the dialogue resolves names against.
    pub async fn load_catalog(&self) -> Result<Catalog, StoreError> {
        let (projects, stages, suppliers, materials) = tokio::try_join!(
            self.select::<Project>("projects", "id,name"),
            self.select::<Stage>("stages", "id,name,project_id"),
            self.select::<Supplier>("suppliers", "id,name"),
            self.select::<MaterialRecord>("materials", "id,name,project_id,estimated_total_cost,status"),
        )?;
        info!(
            projects = projects.len(),
            stages = stages.len(),
            suppliers = suppliers.len(),
            materials = materials.len(),
            "Catalog loaded"
        );
        Ok(Catalog { projects, stages, suppliers, materials })
    }
}

#[async_trait]
impl MaterialStore for RestMaterialStore {
    async fn create_material(&self, material: &NewMaterial) -> Result<String, StoreError> {
        let response = self.create_request(material).send().await?;
        let response = check_status(response).await?;

        let rows: Vec<CreatedRow> = response.json().await?;
        let row = rows.into_iter().next().ok_or(StoreError::EmptyResponse)?;
        Ok(row.id)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
    })
}
