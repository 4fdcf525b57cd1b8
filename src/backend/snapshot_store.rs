use super::KeyValueStore;
use crate::config::Settings;
use crate::constant::{AUTOSAVE_COOLDOWN_SECS, AUTOSAVE_NAME, HISTORY_KEY, MAX_VERSIONS};
use crate::form::FormData;
use crate::generator::FileGenerator;
use crate::snapshot::{Snapshot, SnapshotSource};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info, warn};
use xxhash_rust::xxh64::xxh64;

/// Decide whether an autosave should be written.
///
/// Unchanged content never writes; changed content writes only once the
/// cooldown since the last write has fully elapsed.
pub fn should_autosave(
    now: DateTime<Utc>,
    last_write: Option<DateTime<Utc>>,
    last_hash: Option<&str>,
    new_hash: &str,
    cooldown: Duration,
) -> bool {
    if last_hash == Some(new_hash) {
        return false;
    }
    match last_write {
        None => true,
        // A clock that went backwards counts as "too soon"
        Some(at) => (now - at).to_std().is_ok_and(|elapsed| elapsed >= cooldown),
    }
}

#[derive(Debug, Default)]
struct AutosaveState {
    last_hash: Option<String>,
    last_at: Option<DateTime<Utc>>,
}

/// Owns the version history: a newest-first list capped at `limit`,
/// persisted under a single key of the injected store.
pub struct SnapshotStore<S, G> {
    store: S,
    generator: G,
    limit: usize,
    cooldown: Duration,
    autosave: AutosaveState,
}

impl<S: KeyValueStore, G: FileGenerator> SnapshotStore<S, G> {
    pub fn new(store: S, generator: G) -> Self {
        Self {
            store,
            generator,
            limit: MAX_VERSIONS,
            cooldown: Duration::from_secs(AUTOSAVE_COOLDOWN_SECS),
            autosave: AutosaveState::default(),
        }
    }

    pub fn with_settings(store: S, generator: G, settings: &Settings) -> Self {
        Self {
            limit: settings.history_limit.max(1),
            cooldown: settings.autosave_cooldown(),
            ..Self::new(store, generator)
        }
    }

    /// XXHash64 of the serialized form, as 16 hex characters
    pub fn content_hash(form: &FormData) -> String {
        // A string map always serializes
        let raw = serde_json::to_string(form).unwrap_or_default();
        format!("{:016x}", xxh64(raw.as_bytes(), 0))
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn create_snapshot(&self, form: &FormData, name: &str, source: SnapshotSource) -> Snapshot {
        self.create_snapshot_at(form, name, source, Utc::now())
    }

    pub fn create_snapshot_at(
        &self,
        form: &FormData,
        name: &str,
        source: SnapshotSource,
        now: DateTime<Utc>,
    ) -> Snapshot {
        Snapshot::capture(form, name, source, &self.generator, now)
    }

    /// Newest first
    pub fn history(&self) -> Vec<Snapshot> {
        self.store.get(HISTORY_KEY, Vec::new())
    }

    /// Truncate to the cap and persist. Returns whether the write succeeded.
    pub fn set_history(&self, mut items: Vec<Snapshot>) -> bool {
        items.truncate(self.limit);
        self.store.set(HISTORY_KEY, &items)
    }

    pub fn find(&self, id: &str) -> Option<Snapshot> {
        self.history().into_iter().find(|s| s.id() == id)
    }

    pub fn save_version(&self, form: &FormData, name: &str, source: SnapshotSource) -> Snapshot {
        self.save_version_at(form, name, source, Utc::now())
    }

    /// Prepend a new snapshot and persist. The snapshot is returned even if
    /// persisting fails; it just won't survive a reload.
    pub fn save_version_at(
        &self,
        form: &FormData,
        name: &str,
        source: SnapshotSource,
        now: DateTime<Utc>,
    ) -> Snapshot {
        let item = self.create_snapshot_at(form, name, source, now);

        let mut history = self.history();
        history.insert(0, item.clone());
        if self.set_history(history) {
            info!("Saved version {} ({}, {})", item.name(), item.source(), item.id());
        } else {
            warn!("Version {} kept in memory only", item.id());
        }
        item
    }

    pub fn on_form_data_change(&mut self, form: &FormData) -> Option<Snapshot> {
        self.on_form_data_change_at(form, Utc::now())
    }

    /// Autosave trigger, throttled by content hash and cooldown
    pub fn on_form_data_change_at(
        &mut self,
        form: &FormData,
        now: DateTime<Utc>,
    ) -> Option<Snapshot> {
        let hash = Self::content_hash(form);
        if !should_autosave(
            now,
            self.autosave.last_at,
            self.autosave.last_hash.as_deref(),
            &hash,
            self.cooldown,
        ) {
            debug!("Autosave skipped for {}", hash);
            return None;
        }

        self.autosave.last_hash = Some(hash);
        self.autosave.last_at = Some(now);
        Some(self.save_version_at(form, AUTOSAVE_NAME, SnapshotSource::Auto, now))
    }
}
