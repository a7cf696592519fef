//! Backend ids arrive as text (uuid) or as integers depending on the table.
//! Both are kept as strings.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

pub fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Catalog, Stage};

    #[test]
    fn test_numeric_ids_become_strings() {
        let stage: Stage = serde_json::from_str(r#"{"id": 7, "name": "Fundação", "project_id": 3}"#).unwrap();
        assert_eq!(stage.id, "7");
        assert_eq!(stage.project_id, "3");
    }

    #[test]
    fn test_catalog_with_mixed_ids() {
        let catalog: Catalog = serde_json::from_str(
            r#"{
                "projects": [{"id": 1, "name": "Casa Silva"}],
                "stages": [{"id": "s1", "name": "Fundação", "project_id": 1}],
                "suppliers": [{"id": 9, "name": "Depósito Central"}],
                "materials": [
                    {"id": 100, "name": "Areia", "project_id": 1, "estimated_total_cost": 80.0, "status": "delivered"},
                    {"id": 101, "name": "Brita", "project_id": null}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.projects[0].id, "1");
        assert_eq!(catalog.stages_for("1").len(), 1);
        assert_eq!(catalog.supplier_by_name("Depósito Central").map(|s| s.id.as_str()), Some("9"));
        assert_eq!(catalog.materials_for("1").len(), 1);
        assert_eq!(catalog.materials[1].project_id, None);
    }
}
