use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::intent::{MaterialStatus, ParsedMaterialRequest};

pub const UNNAMED_MATERIAL: &str = "Material sem nome";
pub const DEFAULT_UNIT: &str = "un";

/// Create-record payload for the material store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaterial {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub status: MaterialStatus,
    pub estimated_total_cost: f64,
    pub unit_cost: f64,
    pub delivery_date: Option<String>,
    pub project_id: Option<String>,
    pub stage_id: Option<String>,
    pub supplier_id: Option<String>,
}

/// Resolve names to ids and apply defaults.
///
/// Names resolve by exact match; the stage is looked up only inside the
/// resolved project.
pub fn build_payload(record: &ParsedMaterialRequest, catalog: &Catalog) -> NewMaterial {
    let project = record
        .project_name
        .as_deref()
        .and_then(|name| catalog.project_by_name(name));
    let stage_id = match (project, record.stage_name.as_deref()) {
        (Some(project), Some(stage)) => catalog.stage_by_name(&project.id, stage).map(|s| s.id.clone()),
        _ => None,
    };
    let supplier_id = record
        .supplier_name
        .as_deref()
        .and_then(|name| catalog.supplier_by_name(name))
        .map(|s| s.id.clone());

    let quantity = record.quantity();
    let total = record.estimated_total_cost.unwrap_or(0.0);
    let unit_cost = if total != 0.0 && quantity != 0.0 { total / quantity } else { 0.0 };

    NewMaterial {
        name: record
            .material_name
            .clone()
            .unwrap_or_else(|| UNNAMED_MATERIAL.to_string()),
        quantity,
        unit: record.unit.clone().unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        status: record.status(),
        estimated_total_cost: total,
        unit_cost,
        delivery_date: record.delivery_date.as_ref().map(|d| d.to_string()),
        project_id: project.map(|p| p.id.clone()),
        stage_id,
        supplier_id,
    }
}
