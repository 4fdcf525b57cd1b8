use crate::constant::AUTOSAVE_NAME;
use crate::form::{FileMap, FormData};
use crate::generator::FileGenerator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where a snapshot came from. Display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    #[default]
    Manual,
    Auto,
    Template,
    Import,
    Live,
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SnapshotSource::Manual => "manual",
            SnapshotSource::Auto => "auto",
            SnapshotSource::Template => "template",
            SnapshotSource::Import => "import",
            SnapshotSource::Live => "live",
        };
        f.write_str(label)
    }
}

/// Captured form data together with the files it rendered to.
///
/// Fields are private: a snapshot is only built through [`Snapshot::capture`],
/// which keeps `files` derived from `form_data`, and is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    id: String,
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    source: SnapshotSource,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    form_data: FormData,
    #[serde(default)]
    files: FileMap,
}

fn default_name() -> String {
    AUTOSAVE_NAME.to_string()
}

impl Snapshot {
    /// Capture `form` at `now`. A blank name becomes "autosave".
    pub fn capture<G: FileGenerator + ?Sized>(
        form: &FormData,
        name: &str,
        source: SnapshotSource,
        generator: &G,
        now: DateTime<Utc>,
    ) -> Self {
        let name = name.trim();
        Self {
            id: Uuid::new_v4().to_string(),
            name: if name.is_empty() {
                default_name()
            } else {
                name.to_string()
            },
            source,
            timestamp: now,
            form_data: form.clone(),
            files: generator.generate(form),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn form_data(&self) -> &FormData {
        &self.form_data
    }

    pub fn files(&self) -> &FileMap {
        &self.files
    }

    /// Value of a form field, empty when missing
    pub fn field(&self, key: &str) -> &str {
        self.form_data.get(key).map(String::as_str).unwrap_or("")
    }

    /// Label used in selectors: `name · timestamp`
    pub fn label(&self) -> String {
        format!(
            "{} · {}",
            self.name,
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
