use serde::{Deserialize, Serialize};

use super::types::{Catalog, MaterialRecord, Project};
use crate::intent::MaterialStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SummaryScope {
    Project(String),
    All,
}

/// Cost and count figures over a set of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub scope: SummaryScope,
    pub material_count: usize,
    pub total_cost: f64,
    pub requested: usize,
    pub delivered: usize,
    pub used: usize,
}

impl ProjectSummary {
    pub fn for_project(catalog: &Catalog, project: &Project) -> Self {
        Self::over(SummaryScope::Project(project.name.clone()), catalog.materials_for(&project.id).into_iter())
    }

    pub fn overall(catalog: &Catalog) -> Self {
        Self::over(SummaryScope::All, catalog.materials.iter())
    }

    fn over<'a>(scope: SummaryScope, materials: impl Iterator<Item = &'a MaterialRecord>) -> Self {
        let mut summary = Self {
            scope,
            material_count: 0,
            total_cost: 0.0,
            requested: 0,
            delivered: 0,
            used: 0,
        };

        for material in materials {
            summary.material_count += 1;
            summary.total_cost += material.estimated_total_cost.unwrap_or(0.0);
            match material.status.unwrap_or_default() {
                MaterialStatus::Requested => summary.requested += 1,
                MaterialStatus::Delivered => summary.delivered += 1,
                MaterialStatus::Used => summary.used += 1,
            }
        }
        summary
    }

    pub fn render(&self) -> String {
        let title = match &self.scope {
            SummaryScope::Project(name) => format!("Resumo do projeto {}", name),
            SummaryScope::All => "Resumo geral de todos os projetos".to_string(),
        };
        let count = if self.material_count == 1 {
            "1 material".to_string()
        } else {
            format!("{} materiais", self.material_count)
        };

        format!(
            "{}:\n• {}\n• Custo total estimado: {}\n• Solicitados: {} | Entregues: {} | Usados: {}",
            title,
            count,
            format_brl(self.total_cost),
            self.requested,
            self.delivered,
            self.used,
        )
    }
}

/// `1234.5` -> `R$ 1.234,50`
pub fn format_brl(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();

    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
    }

    #[test]
    fn test_summary_counts_by_status() {
        let catalog = Catalog {
            projects: vec![Project { id: "p1".into(), name: "Casa Silva".into() }],
            materials: vec![
                MaterialRecord {
                    id: "m1".into(),
                    name: "Cimento".into(),
                    project_id: Some("p1".into()),
                    estimated_total_cost: Some(500.0),
                    status: Some(MaterialStatus::Delivered),
                },
                MaterialRecord {
                    id: "m2".into(),
                    name: "Areia".into(),
                    project_id: Some("p1".into()),
                    estimated_total_cost: None,
                    status: None,
                },
                MaterialRecord {
                    id: "m3".into(),
                    name: "Brita".into(),
                    project_id: Some("p9".into()),
                    estimated_total_cost: Some(80.0),
                    status: Some(MaterialStatus::Used),
                },
            ],
            ..Default::default()
        };

        let summary = ProjectSummary::for_project(&catalog, &catalog.projects[0]);
        assert_eq!(summary.material_count, 2);
        assert_eq!(summary.total_cost, 500.0);
        assert_eq!((summary.requested, summary.delivered, summary.used), (1, 1, 0));

        let overall = ProjectSummary::overall(&catalog);
        assert_eq!(overall.material_count, 3);
        assert!(overall.render().contains("R$ 580,00"));
    }
}
