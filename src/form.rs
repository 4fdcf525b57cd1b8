//! Form data as handed over by the wizard, plus import parsing.
//!
//! Every value is a string. Form fields are kept sorted so that serialization
//! (and thus the autosave hash) is stable for equal content. Generated files
//! keep the order the generator emitted them in.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Field name -> value
pub type FormData = BTreeMap<String, String>;

/// Filename -> rendered text, in generation order
pub type FileMap = IndexMap<String, String>;

pub const DEFAULT_HIERARCHY: &str = "Standalone";
pub const DEFAULT_MEMORY: &str = "Session-only";

#[derive(Error, Debug)]
pub enum FormError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Imported content is not a valid JSON object")]
    NotAnObject,
}

/// Unwrap the form payload from an exported config, a saved wizard state or a bare object
pub fn parse_agent_json(raw: &str) -> Result<Value, FormError> {
    let parsed: Value = serde_json::from_str(raw)?;

    if let Some(form) = parsed.pointer("/wizardState/formData")
        && form.is_object()
    {
        return Ok(form.clone());
    }
    if let Some(form) = parsed.get("formData")
        && form.is_object()
    {
        return Ok(form.clone());
    }
    if !parsed.is_object() {
        return Err(FormError::NotAnObject);
    }
    Ok(parsed)
}

/// Keep the string-valued fields of a JSON object
pub fn string_fields(value: &Value) -> FormData {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Map an imported object onto the canonical wizard fields.
///
/// Missing fields become empty strings, so a resolved baseline never lacks a key.
pub fn normalize_imported(data: &Value) -> FormData {
    let tools = match data.get("tools") {
        Some(Value::Array(items)) => items
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.map(scalar_text).unwrap_or_default(),
    };

    let agents = match data.get("agents") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|agent| match agent {
                Value::String(name) => name.clone(),
                other => other.get("name").map(scalar_text).unwrap_or_default(),
            })
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.map(scalar_text).unwrap_or_default(),
    };

    let mut form = FormData::new();
    form.insert("templateId".into(), field(data, &["templateId"]));
    form.insert("name".into(), field(data, &["name"]));
    form.insert("role".into(), field(data, &["role"]));
    form.insert("soul".into(), field(data, &["soul", "principle"]));
    form.insert("identity".into(), field(data, &["identity"]));
    form.insert("tools".into(), tools);
    form.insert(
        "hierarchy".into(),
        or_default(field(data, &["hierarchy"]), DEFAULT_HIERARCHY),
    );
    form.insert(
        "memory".into(),
        or_default(field(data, &["memory"]), DEFAULT_MEMORY),
    );
    form.insert("memoryNotes".into(), field(data, &["memoryNotes", "notes"]));
    form.insert(
        "userGuidelines".into(),
        field(data, &["userGuidelines", "guidelines"]),
    );
    form.insert("agents".into(), agents);
    form
}

/// Read a JSON form file from disk, keeping its string fields
pub fn read_form_file(path: &Path) -> Result<FormData, FormError> {
    let raw = fs::read_to_string(path)?;
    Ok(string_fields(&parse_agent_json(&raw)?))
}

/// Read an import file from disk and normalize it
pub fn read_import_file(path: &Path) -> Result<FormData, FormError> {
    let raw = fs::read_to_string(path)?;
    Ok(normalize_imported(&parse_agent_json(&raw)?))
}

/// First non-empty value among the given aliases
fn field(data: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| data.get(*key))
        .map(scalar_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_wizard_state_payload() {
        let raw = r#"{"app":"agent-prompt-builder","wizardState":{"formData":{"name":"Hera"}}}"#;
        let form = parse_agent_json(raw).unwrap();
        assert_eq!(form, json!({"name": "Hera"}));
    }

    #[test]
    fn test_parse_form_data_payload() {
        let raw = r#"{"formData":{"role":"Builder"}}"#;
        let form = parse_agent_json(raw).unwrap();
        assert_eq!(form, json!({"role": "Builder"}));
    }

    #[test]
    fn test_parse_bare_object_and_reject_scalars() {
        let form = parse_agent_json(r#"{"tools":"git"}"#).unwrap();
        assert_eq!(form, json!({"tools": "git"}));

        assert!(matches!(
            parse_agent_json("[1, 2]"),
            Err(FormError::NotAnObject)
        ));
        assert!(matches!(parse_agent_json("{oops"), Err(FormError::Json(_))));
    }

    #[test]
    fn test_string_fields_drops_non_strings() {
        let form = string_fields(&json!({"name": "a", "count": 3, "nested": {"x": 1}}));
        assert_eq!(form.len(), 1);
        assert_eq!(form["name"], "a");
    }

    #[test]
    fn test_normalize_fills_every_field() {
        let form = normalize_imported(&json!({}));
        assert_eq!(form.len(), 11);
        assert_eq!(form["hierarchy"], "Standalone");
        assert_eq!(form["memory"], "Session-only");
        assert_eq!(form["tools"], "");
        assert_eq!(form["agents"], "");
    }

    #[test]
    fn test_normalize_arrays_and_aliases() {
        let form = normalize_imported(&json!({
            "tools": ["git", "shell"],
            "agents": ["scout", {"name": "critic"}, {"role": "nameless"}],
            "principle": "Be precise",
            "guidelines": "Ask first",
            "notes": "Keep a diary"
        }));
        assert_eq!(form["tools"], "git, shell");
        assert_eq!(form["agents"], "scout\ncritic");
        assert_eq!(form["soul"], "Be precise");
        assert_eq!(form["userGuidelines"], "Ask first");
        assert_eq!(form["memoryNotes"], "Keep a diary");
    }
}
