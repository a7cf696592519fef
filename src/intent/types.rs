use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialStatus {
    #[default]
    Requested,
    Delivered,
    Used,
}

impl MaterialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Delivered => "delivered",
            Self::Used => "used",
        }
    }

    /// Portuguese label shown on the confirmation card.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Requested => "Solicitado",
            Self::Delivered => "Entregue",
            Self::Used => "Usado",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestIntent {
    /// Create a material record.
    #[default]
    AddMaterial,
    /// Cost/count summary for a project.
    ProjectInfo,
}

/// A delivery date as captured from the user.
///
/// Free-text date answers that match no known form are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeliveryDate {
    On(NaiveDate),
    Unparsed(String),
}

impl fmt::Display for DeliveryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryDate::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DeliveryDate::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Structured material request, built from the first utterance and refined
/// turn by turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedMaterialRequest {
    pub material_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub estimated_total_cost: Option<f64>,
    pub status: Option<MaterialStatus>,
    pub delivery_date: Option<DeliveryDate>,
    pub project_name: Option<String>,
    pub stage_name: Option<String>,
    pub supplier_name: Option<String>,
    pub intent: RequestIntent,
    pub confidence: f32, // 0.0 - 1.0
}

impl ParsedMaterialRequest {
    /// Quantity with the extractor default applied.
    pub fn quantity(&self) -> f64 {
        self.quantity.unwrap_or(1.0)
    }

    pub fn status(&self) -> MaterialStatus {
        self.status.unwrap_or_default()
    }

    /// Overwrites only the fields `other` carries a value for.
    ///
    /// `intent` and `confidence` belong to the first turn and are never merged.
    pub fn merge_from(&mut self, other: ParsedMaterialRequest) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.material_name, other.material_name);
        take(&mut self.quantity, other.quantity);
        take(&mut self.unit, other.unit);
        take(&mut self.estimated_total_cost, other.estimated_total_cost);
        take(&mut self.status, other.status);
        take(&mut self.delivery_date, other.delivery_date);
        take(&mut self.project_name, other.project_name);
        take(&mut self.stage_name, other.stage_name);
        take(&mut self.supplier_name, other.supplier_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_confirmed_fields() {
        let mut pending = ParsedMaterialRequest {
            material_name: Some("Cimento".to_string()),
            quantity: Some(10.0),
            unit: Some("saco".to_string()),
            intent: RequestIntent::AddMaterial,
            confidence: 1.0,
            ..Default::default()
        };

        let refinement = ParsedMaterialRequest {
            estimated_total_cost: Some(350.0),
            intent: RequestIntent::ProjectInfo,
            confidence: 0.3,
            ..Default::default()
        };

        pending.merge_from(refinement);

        assert_eq!(pending.quantity, Some(10.0));
        assert_eq!(pending.unit.as_deref(), Some("saco"));
        assert_eq!(pending.estimated_total_cost, Some(350.0));
        assert_eq!(pending.intent, RequestIntent::AddMaterial);
        assert_eq!(pending.confidence, 1.0);
    }

    #[test]
    fn unparsed_date_displays_raw_text() {
        let date = DeliveryDate::Unparsed("semana que vem".to_string());
        assert_eq!(date.to_string(), "semana que vem");

        let date = DeliveryDate::On(NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
        assert_eq!(date.to_string(), "2026-03-05");
    }
}
