//! Compare mode: picks two snapshots, diffs them and drives merge/patch actions.

use crate::backend::{KeyValueStore, SnapshotStore};
use crate::constant::{CURRENT_NAME, IMPORTED_NAME};
use crate::form::FormData;
use crate::generator::FileGenerator;
use crate::history::{
    self, DiffOptions, LastDiff, MergeSelection, diff_snapshots, generate_changelog,
};
use crate::render::render_diff;
use crate::snapshot::{Snapshot, SnapshotSource};
use crate::template::{AgentTemplate, select_template};
use chrono::{DateTime, NaiveDate, Utc};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

const CURRENT_SELECTOR: &str = "__current";
const TEMPLATE_SELECTOR: &str = "__template";
const IMPORTED_SELECTOR: &str = "__imported";

/// The form layer the session reads live data from and hands merges back to
pub trait FormHost {
    fn form_data(&self) -> FormData;

    fn apply_form_data(&mut self, data: FormData);
}

/// Plain in-memory form, useful for tests and the CLI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticForm(pub FormData);

impl FormHost for StaticForm {
    fn form_data(&self) -> FormData {
        self.0.clone()
    }

    fn apply_form_data(&mut self, data: FormData) {
        self.0 = data;
    }
}

/// One side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SnapshotRef {
    /// Live form data, captured at compare time
    Current,
    /// Baseline of the selected starter template
    Template,
    /// Last imported configuration
    Imported,
    /// History entry by id
    Version(String),
}

impl FromStr for SnapshotRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            CURRENT_SELECTOR => SnapshotRef::Current,
            TEMPLATE_SELECTOR => SnapshotRef::Template,
            IMPORTED_SELECTOR => SnapshotRef::Imported,
            id => SnapshotRef::Version(id.to_string()),
        })
    }
}

impl fmt::Display for SnapshotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotRef::Current => f.write_str(CURRENT_SELECTOR),
            SnapshotRef::Template => f.write_str(TEMPLATE_SELECTOR),
            SnapshotRef::Imported => f.write_str(IMPORTED_SELECTOR),
            SnapshotRef::Version(id) => f.write_str(id),
        }
    }
}

/// Entry of the left/right pickers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOption {
    pub selector: SnapshotRef,
    pub label: String,
}

/// `apb-version-history-YYYY-MM-DD.json`
pub fn history_export_filename(date: NaiveDate) -> String {
    format!("apb-version-history-{}.json", date.format("%Y-%m-%d"))
}

pub struct CompareSession<S, G, H> {
    store: SnapshotStore<S, G>,
    host: H,
    templates: Vec<AgentTemplate>,
    imported: Option<Snapshot>,
    enabled: bool,
    left: SnapshotRef,
    right: SnapshotRef,
    options: DiffOptions,
    selection: MergeSelection,
    last: Option<LastDiff>,
    changelog: Option<String>,
}

impl<S: KeyValueStore, G: FileGenerator, H: FormHost> CompareSession<S, G, H> {
    pub fn new(store: SnapshotStore<S, G>, host: H) -> Self {
        Self {
            store,
            host,
            templates: Vec::new(),
            imported: None,
            enabled: false,
            left: SnapshotRef::Template,
            right: SnapshotRef::Current,
            options: DiffOptions::default(),
            selection: MergeSelection::new(),
            last: None,
            changelog: None,
        }
    }

    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &SnapshotStore<S, G> {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn left(&self) -> &SnapshotRef {
        &self.left
    }

    pub fn right(&self) -> &SnapshotRef {
        &self.right
    }

    pub fn options(&self) -> DiffOptions {
        self.options
    }

    pub fn selection(&self) -> &MergeSelection {
        &self.selection
    }

    pub fn last_diff(&self) -> Option<&LastDiff> {
        self.last.as_ref()
    }

    pub fn changelog(&self) -> Option<&str> {
        self.changelog.as_deref()
    }

    pub fn imported_baseline(&self) -> Option<&Snapshot> {
        self.imported.as_ref()
    }

    pub fn history(&self) -> Vec<Snapshot> {
        self.store.history()
    }

    pub fn set_templates(&mut self, templates: Vec<AgentTemplate>) {
        self.templates = templates;
    }

    pub fn set_imported_baseline(&mut self, form: &FormData) {
        self.imported = Some(
            self.store
                .create_snapshot(form, IMPORTED_NAME, SnapshotSource::Import),
        );
    }

    /// Enable or disable compare mode. Each switch starts a fresh selection;
    /// enabling runs a comparison right away.
    pub fn toggle_compare_mode(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.selection.clear();
        debug!("Compare mode {}", if self.enabled { "on" } else { "off" });
        if self.enabled {
            self.perform_compare();
        }
        self.enabled
    }

    pub fn select(&mut self, left: SnapshotRef, right: SnapshotRef) {
        self.left = left;
        self.right = right;
    }

    pub fn set_options(&mut self, options: DiffOptions) -> Option<&LastDiff> {
        self.options = options;
        self.perform_compare()
    }

    /// Resolve a reference to a snapshot. Live and template references are
    /// captured fresh on every call.
    pub fn resolve(&self, selector: &SnapshotRef) -> Option<Snapshot> {
        match selector {
            SnapshotRef::Current => Some(self.store.create_snapshot(
                &self.host.form_data(),
                CURRENT_NAME,
                SnapshotSource::Live,
            )),
            SnapshotRef::Template => {
                let live = self.host.form_data();
                let template = select_template(
                    &self.templates,
                    live.get("templateId").map(String::as_str),
                )?;
                Some(self.store.create_snapshot(
                    &template.baseline_form(),
                    &format!("template:{}", template.id),
                    SnapshotSource::Template,
                ))
            }
            SnapshotRef::Imported => self.imported.clone(),
            SnapshotRef::Version(id) => self.store.find(id),
        }
    }

    /// Re-resolve both sides, diff them and keep the result for merge and
    /// patch. Does nothing when either side cannot be resolved.
    pub fn perform_compare(&mut self) -> Option<&LastDiff> {
        let (Some(left), Some(right)) = (self.resolve(&self.left), self.resolve(&self.right))
        else {
            debug!("Compare skipped: {} vs {} unresolved", self.left, self.right);
            return None;
        };

        let result = diff_snapshots(&left, &right, &self.options);
        debug!(
            "Compared {} with {}: {} of {} files changed",
            left.name(),
            right.name(),
            result.changed_files().count(),
            result.full.len()
        );
        self.changelog = Some(generate_changelog(&left, &right, &result));
        self.last = Some(LastDiff {
            left,
            right,
            result,
        });
        self.last.as_ref()
    }

    pub fn swap(&mut self) -> Option<&LastDiff> {
        std::mem::swap(&mut self.left, &mut self.right);
        self.perform_compare()
    }

    pub fn compare_template_to_current(&mut self) -> Option<&LastDiff> {
        self.select(SnapshotRef::Template, SnapshotRef::Current);
        self.perform_compare()
    }

    pub fn compare_imported_to_current(&mut self) -> Option<&LastDiff> {
        self.select(SnapshotRef::Imported, SnapshotRef::Current);
        self.perform_compare()
    }

    /// Flip one line of the last diff in or out of the merge selection
    pub fn toggle_line(&mut self, file: &str, index: usize) -> Option<bool> {
        let last = self.last.as_ref()?;
        self.selection.toggle(&last.result, file, index)
    }

    /// Apply the selection to the left side and hand the result to the form
    pub fn merge_selected(&mut self) -> Option<FormData> {
        let last = self.last.as_ref()?;
        let merged = history::merge_selected(last, &self.selection);
        info!("Merged {} selected lines", self.selection.len());
        self.host.apply_form_data(merged.clone());
        Some(merged)
    }

    pub fn copy_right_to_left(&mut self) -> Option<FormData> {
        let right = self.resolve(&self.right)?;
        let data = history::copy_right_to_left(&right);
        self.host.apply_form_data(data.clone());
        Some(data)
    }

    pub fn reset_to_previous(&mut self) -> Option<FormData> {
        let data = history::reset_to_previous(&self.store.history())?;
        self.host.apply_form_data(data.clone());
        Some(data)
    }

    pub fn generate_patch(&self) -> Option<String> {
        let last = self.last.as_ref()?;
        Some(history::generate_patch(&last.left, &last.right, &last.result))
    }

    pub fn render(&self) -> Option<String> {
        let last = self.last.as_ref()?;
        Some(render_diff(&last.result, &self.selection))
    }

    /// Save the live form. Without a name the version is called `v<n>`.
    pub fn save_version(&mut self, name: Option<&str>) -> Snapshot {
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("v{}", self.store.history().len() + 1),
        };
        let snapshot =
            self.store
                .save_version(&self.host.form_data(), &name, SnapshotSource::Manual);
        if self.enabled {
            self.perform_compare();
        }
        snapshot
    }

    pub fn on_form_data_change(&mut self) -> Option<Snapshot> {
        self.on_form_data_change_at(Utc::now())
    }

    pub fn on_form_data_change_at(&mut self, now: DateTime<Utc>) -> Option<Snapshot> {
        let form = self.host.form_data();
        self.store.on_form_data_change_at(&form, now)
    }

    /// Picker entries: live form, template, imported (when present), then history
    pub fn compare_options(&self) -> Vec<CompareOption> {
        let mut options = vec![
            CompareOption {
                selector: SnapshotRef::Current,
                label: "Current form (live)".to_string(),
            },
            CompareOption {
                selector: SnapshotRef::Template,
                label: "Template baseline".to_string(),
            },
        ];
        if self.imported.is_some() {
            options.push(CompareOption {
                selector: SnapshotRef::Imported,
                label: "Imported JSON baseline".to_string(),
            });
        }
        options.extend(self.store.history().into_iter().map(|s| CompareOption {
            selector: SnapshotRef::Version(s.id().to_string()),
            label: s.label(),
        }));
        options
    }

    pub fn export_history_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.store.history())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use crate::generator::AgentFileGenerator;

    type TestSession = CompareSession<MemoryStore, AgentFileGenerator, StaticForm>;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn session(live: &[(&str, &str)]) -> TestSession {
        let store = SnapshotStore::new(MemoryStore::new(), AgentFileGenerator);
        CompareSession::new(store, StaticForm(form(live)))
    }

    #[test]
    fn test_selector_round_trip() {
        for raw in ["__current", "__template", "__imported", "1234-abcd"] {
            let parsed: SnapshotRef = raw.parse().unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
        assert_eq!(
            "abc".parse::<SnapshotRef>().unwrap(),
            SnapshotRef::Version("abc".to_string())
        );
    }

    #[test]
    fn test_unresolved_reference_is_noop() {
        let mut session = session(&[("role", "Builder")]);
        assert!(session.compare_imported_to_current().is_none());
        assert!(session.last_diff().is_none());
        assert!(session.generate_patch().is_none());
        assert!(session.merge_selected().is_none());

        // No templates loaded either
        assert!(session.compare_template_to_current().is_none());
    }

    #[test]
    fn test_current_reflects_latest_live_data() {
        let mut session = session(&[("role", "Builder")]);
        let saved = session.save_version(None);
        assert_eq!(saved.name(), "v1");

        session.select(SnapshotRef::Version(saved.id().to_string()), SnapshotRef::Current);
        let last = session.perform_compare().unwrap();
        assert_eq!(last.result.changed_files().count(), 0);

        session.host_mut().0.insert("role".into(), "Critic".into());
        let last = session.perform_compare().unwrap();
        assert!(last.result.is_changed("SOUL.md"));
        assert_eq!(last.right.source(), SnapshotSource::Live);
        assert!(session.changelog().unwrap().contains("Modified role: Builder → Critic"));
    }

    #[test]
    fn test_toggle_clears_selection_and_compares() {
        let mut session = session(&[("role", "Builder")]);
        session.set_imported_baseline(&form(&[("role", "Critic")]));
        session.select(SnapshotRef::Imported, SnapshotRef::Current);

        assert!(session.toggle_compare_mode());
        assert!(session.last_diff().is_some());

        let row = session
            .last_diff()
            .unwrap()
            .result
            .file("SOUL.md")
            .unwrap()
            .rows
            .iter()
            .find(|r| r.row_type.is_selectable())
            .unwrap()
            .index;
        assert_eq!(session.toggle_line("SOUL.md", row), Some(true));
        assert_eq!(session.selection().len(), 1);

        assert!(!session.toggle_compare_mode());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_swap() {
        let mut session = session(&[]);
        session.set_imported_baseline(&FormData::new());
        session.select(SnapshotRef::Imported, SnapshotRef::Current);
        let last = session.swap().unwrap();
        assert_eq!(last.left.name(), "current");
        assert_eq!(last.right.name(), "imported");
        assert_eq!(session.left(), &SnapshotRef::Current);
    }

    #[test]
    fn test_template_reference() {
        let mut session = session(&[("templateId", "forge"), ("role", "Smith")]);
        session.set_templates(vec![
            AgentTemplate {
                id: "general".into(),
                ..AgentTemplate::default()
            },
            AgentTemplate {
                id: "forge".into(),
                role: "Infra".into(),
                ..AgentTemplate::default()
            },
        ]);

        let last = session.compare_template_to_current().unwrap();
        assert_eq!(last.left.name(), "template:forge");
        assert_eq!(last.left.source(), SnapshotSource::Template);
        assert_eq!(last.left.field("hierarchy"), "Standalone");
        assert!(session.changelog().unwrap().contains("Modified role: Infra → Smith"));
    }

    #[test]
    fn test_copy_right_to_left_and_reset() {
        let mut session = session(&[("role", "A")]);
        session.save_version(Some("first"));
        session.host_mut().0.insert("role".into(), "B".into());
        session.save_version(Some("second"));

        session.set_imported_baseline(&form(&[("role", "Imported")]));
        session.select(SnapshotRef::Current, SnapshotRef::Imported);
        assert_eq!(session.copy_right_to_left().unwrap()["role"], "Imported");
        assert_eq!(session.host().0["role"], "Imported");

        assert_eq!(session.reset_to_previous().unwrap()["role"], "A");
        assert_eq!(session.host().0["role"], "A");
    }

    #[test]
    fn test_reset_needs_two_versions() {
        let mut session = session(&[("role", "A")]);
        session.save_version(None);
        assert!(session.reset_to_previous().is_none());
        assert_eq!(session.host().0["role"], "A");
    }

    #[test]
    fn test_compare_options() {
        let mut session = session(&[]);
        assert_eq!(session.compare_options().len(), 2);

        session.set_imported_baseline(&FormData::new());
        let saved = session.save_version(Some("named"));
        let options = session.compare_options();
        assert_eq!(options.len(), 4);
        assert_eq!(options[2].selector, SnapshotRef::Imported);
        assert_eq!(options[3].selector, SnapshotRef::Version(saved.id().to_string()));
        assert!(options[3].label.starts_with("named · "));
    }

    #[test]
    fn test_export_history() {
        let mut session = session(&[("role", "A")]);
        session.save_version(Some("one"));
        let json = session.export_history_json().unwrap();
        let parsed: Vec<Snapshot> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name(), "one");

        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(
            history_export_filename(date),
            "apb-version-history-2026-03-09.json"
        );
    }
}
