//! Name lookups over the catalog snapshot.
//!
//! Exact lookups (used at commit time and by the selector) compare names
//! as stored. Free-text lookups are case-insensitive.

use super::types::{Catalog, MaterialRecord, Project, Stage, Supplier};

impl Catalog {
    pub fn project_by_name(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn stage_by_name(&self, project_id: &str, name: &str) -> Option<&Stage> {
        self.stages_for(project_id).into_iter().find(|s| s.name == name)
    }

    pub fn supplier_by_name(&self, name: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.name == name)
    }

    pub fn stages_for(&self, project_id: &str) -> Vec<&Stage> {
        self.stages.iter().filter(|s| s.project_id == project_id).collect()
    }

    pub fn materials_for(&self, project_id: &str) -> Vec<&MaterialRecord> {
        self.materials
            .iter()
            .filter(|m| m.project_id.as_deref() == Some(project_id))
            .collect()
    }

    /// Resolve a project for a summary request: exact, then prefix, then
    /// substring, all case-insensitive.
    pub fn find_project(&self, query: &str) -> Option<&Project> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        let named = || self.projects.iter().map(|p| (p, p.name.to_lowercase()));
        named()
            .find(|(_, name)| *name == query)
            .or_else(|| named().find(|(_, name)| name.starts_with(&query)))
            .or_else(|| named().find(|(_, name)| name.contains(&query) || query.contains(name.as_str())))
            .map(|(p, _)| p)
    }

    pub fn search_project(&self, answer: &str) -> Option<&Project> {
        self.projects.iter().find(|p| loosely_matches(&p.name, answer))
    }

    pub fn search_stage(&self, project_id: &str, answer: &str) -> Option<&Stage> {
        self.stages_for(project_id)
            .into_iter()
            .find(|s| loosely_matches(&s.name, answer))
    }

    pub fn search_supplier(&self, answer: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| loosely_matches(&s.name, answer))
    }
}

/// Case-insensitive substring match in either direction.
fn loosely_matches(name: &str, answer: &str) -> bool {
    let name = name.to_lowercase();
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() || name.is_empty() {
        return false;
    }
    name.contains(&answer) || answer.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog {
            projects: vec![
                Project { id: "p1".into(), name: "Casa Silva".into() },
                Project { id: "p2".into(), name: "Casa".into() },
                Project { id: "p3".into(), name: "Edifício Aurora".into() },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn exact_match_wins_over_prefix() {
        let catalog = catalog();
        assert_eq!(catalog.find_project("casa").map(|p| p.id.as_str()), Some("p2"));
        assert_eq!(catalog.find_project("CASA SILVA").map(|p| p.id.as_str()), Some("p1"));
    }

    #[test]
    fn prefix_then_substring() {
        let catalog = catalog();
        assert_eq!(catalog.find_project("edif").map(|p| p.id.as_str()), Some("p3"));
        assert_eq!(catalog.find_project("aurora").map(|p| p.id.as_str()), Some("p3"));
        assert!(catalog.find_project("galpão").is_none());
        assert!(catalog.find_project("   ").is_none());
    }

    #[test]
    fn free_text_answer_matches_either_direction() {
        let catalog = catalog();
        assert_eq!(catalog.search_project("aurora").map(|p| p.id.as_str()), Some("p3"));
        assert_eq!(
            catalog.search_project("é o edifício aurora").map(|p| p.id.as_str()),
            Some("p3")
        );
    }
}
