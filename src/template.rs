use crate::form::{DEFAULT_HIERARCHY, DEFAULT_MEMORY, FormData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemplateAgent {
    #[serde(default)]
    pub name: String,
}

/// A starter profile the wizard can be seeded from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentTemplate {
    pub id: String,
    pub name: String,
    pub role: String,
    pub soul: String,
    pub identity: String,
    pub tools: Vec<String>,
    pub hierarchy: String,
    pub memory: String,
    pub user_guidelines: String,
    pub agents: Vec<TemplateAgent>,
}

impl AgentTemplate {
    /// Form data the wizard would hold right after picking this template
    pub fn baseline_form(&self) -> FormData {
        let or = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        let agents = self
            .agents
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let mut form = FormData::new();
        form.insert("templateId".into(), self.id.clone());
        form.insert("name".into(), self.name.clone());
        form.insert("role".into(), self.role.clone());
        form.insert("soul".into(), self.soul.clone());
        form.insert("identity".into(), self.identity.clone());
        form.insert("tools".into(), self.tools.join(", "));
        form.insert("hierarchy".into(), or(&self.hierarchy, DEFAULT_HIERARCHY));
        form.insert("memory".into(), or(&self.memory, DEFAULT_MEMORY));
        form.insert("memoryNotes".into(), String::new());
        form.insert("userGuidelines".into(), self.user_guidelines.clone());
        form.insert("agents".into(), agents);
        form
    }
}

/// The template named by `selected_id`, or the first one
pub fn select_template<'a>(
    templates: &'a [AgentTemplate],
    selected_id: Option<&str>,
) -> Option<&'a AgentTemplate> {
    selected_id
        .and_then(|id| templates.iter().find(|t| t.id == id))
        .or_else(|| templates.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> Vec<AgentTemplate> {
        serde_json::from_str(
            r#"[
                {"id": "general-assistant", "name": "General Assistant", "tools": ["search"]},
                {"id": "forge", "name": "Forge", "role": "Infra", "tools": ["git", "shell"],
                 "agents": [{"name": "scout"}, {"name": "critic"}], "hierarchy": "Lead"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_baseline_form_defaults() {
        let form = templates()[0].baseline_form();
        assert_eq!(form["templateId"], "general-assistant");
        assert_eq!(form["tools"], "search");
        assert_eq!(form["hierarchy"], "Standalone");
        assert_eq!(form["memory"], "Session-only");
        assert_eq!(form["role"], "");
        assert_eq!(form.len(), 11);
    }

    #[test]
    fn test_baseline_form_lists() {
        let form = templates()[1].baseline_form();
        assert_eq!(form["tools"], "git, shell");
        assert_eq!(form["agents"], "scout\ncritic");
        assert_eq!(form["hierarchy"], "Lead");
    }

    #[test]
    fn test_select_template() {
        let all = templates();
        assert_eq!(select_template(&all, Some("forge")).unwrap().id, "forge");
        assert_eq!(
            select_template(&all, Some("missing")).unwrap().id,
            "general-assistant"
        );
        assert_eq!(select_template(&all, None).unwrap().id, "general-assistant");
        assert!(select_template(&[], None).is_none());
    }
}
