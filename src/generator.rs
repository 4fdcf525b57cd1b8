use crate::form::{FileMap, FormData};
use serde_json::{Value, json};

/// Renders the generated files for a form. Must be deterministic.
pub trait FileGenerator {
    fn generate(&self, form: &FormData) -> FileMap;
}

impl<F> FileGenerator for F
where
    F: Fn(&FormData) -> FileMap,
{
    fn generate(&self, form: &FormData) -> FileMap {
        self(form)
    }
}

/// Default generator: the six agent profile artifacts, each pretty-printed as JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct AgentFileGenerator;

impl AgentFileGenerator {
    fn artifacts(form: &FormData) -> Vec<(&'static str, Value)> {
        let get = |key: &str| form.get(key).map(String::as_str).unwrap_or_default();

        let tools: Vec<&str> = get("tools")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        let agents: Vec<Value> = get("agents")
            .lines()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(|name| json!({ "name": name }))
            .collect();

        vec![
            (
                "SOUL.md",
                json!({ "role": get("role"), "principle": get("soul") }),
            ),
            (
                "IDENTITY.md",
                json!({
                    "name": get("name"),
                    "hierarchy": get("hierarchy"),
                    "identity": get("identity"),
                }),
            ),
            ("TOOLS.md", json!({ "enabled": tools })),
            (
                "MEMORY.md",
                json!({ "mode": get("memory"), "notes": get("memoryNotes") }),
            ),
            ("USER.md", json!({ "guidelines": get("userGuidelines") })),
            ("AGENTS.json", json!({ "agents": agents })),
        ]
    }
}

impl FileGenerator for AgentFileGenerator {
    fn generate(&self, form: &FormData) -> FileMap {
        Self::artifacts(form)
            .into_iter()
            .map(|(file, value)| {
                // Serializing a json! value cannot fail
                let text = serde_json::to_string_pretty(&value).unwrap_or_default();
                (file.to_string(), text)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_generates_all_artifacts() {
        let files = AgentFileGenerator.generate(&FormData::new());
        let names: Vec<&str> = files.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "SOUL.md",
                "IDENTITY.md",
                "TOOLS.md",
                "MEMORY.md",
                "USER.md",
                "AGENTS.json"
            ]
        );
    }

    #[test]
    fn test_object_keys_keep_declared_order() {
        let files = AgentFileGenerator.generate(&form(&[
            ("role", "R"),
            ("soul", "S"),
            ("name", "N"),
            ("hierarchy", "H"),
            ("identity", "I"),
        ]));
        assert_eq!(files["SOUL.md"], "{\n  \"role\": \"R\",\n  \"principle\": \"S\"\n}");
        assert_eq!(
            files["IDENTITY.md"],
            "{\n  \"name\": \"N\",\n  \"hierarchy\": \"H\",\n  \"identity\": \"I\"\n}"
        );
    }

    #[test]
    fn test_tools_are_split_one_per_line() {
        let files = AgentFileGenerator.generate(&form(&[("tools", "git, , shell")]));
        assert_eq!(
            files["TOOLS.md"],
            "{\n  \"enabled\": [\n    \"git\",\n    \"shell\"\n  ]\n}"
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let data = form(&[("role", "Builder"), ("agents", "scout\n\ncritic")]);
        assert_eq!(
            AgentFileGenerator.generate(&data),
            AgentFileGenerator.generate(&data)
        );
        assert!(AgentFileGenerator.generate(&data)["AGENTS.json"].contains("critic"));
    }

    #[test]
    fn test_closure_generator() {
        let generator = |data: &FormData| -> FileMap {
            let mut files = FileMap::new();
            files.insert("echo.txt".into(), data.get("x").cloned().unwrap_or_default());
            files
        };
        assert_eq!(generator.generate(&form(&[("x", "1")]))["echo.txt"], "1");
    }
}
