use super::{KeyValueStore, StoreError};
use crate::config::Config;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON file per key, named `<namespace>.<key>.json`
pub struct FileStore {
    dir: PathBuf,
    namespace: String,
}

impl FileStore {
    /// Store rooted in the configured data directory
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        Self::with_dir(config.store_dir(), &config.settings.store_namespace)
    }

    pub fn with_dir(dir: PathBuf, namespace: &str) -> Result<Self, StoreError> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            namespace: namespace.to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.{}.json", self.namespace, safe))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key);

        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, raw: &str) -> Result<(), StoreError> {
        fs::write(self.key_path(key), raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn setup_test_store() -> (FileStore, PathBuf) {
        let test_dir = std::env::temp_dir().join(format!("test_file_store_{}", Uuid::new_v4()));
        let store = FileStore::with_dir(test_dir.join("store"), "apb").unwrap();
        (store, test_dir)
    }

    fn cleanup_test_dir(test_dir: &Path) {
        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    fn test_save_and_load_value() {
        let (store, test_dir) = setup_test_store();

        let mut value = BTreeMap::new();
        value.insert("role".to_string(), "Builder".to_string());
        assert!(store.set("versionHistory", &value));

        assert!(store.dir().join("apb.versionHistory.json").exists());
        let loaded: BTreeMap<String, String> = store.get("versionHistory", BTreeMap::new());
        assert_eq!(loaded, value);

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_missing_key_returns_fallback() {
        let (store, test_dir) = setup_test_store();

        assert!(store.read("nothing").unwrap().is_none());
        let loaded: Vec<String> = store.get("nothing", Vec::new());
        assert!(loaded.is_empty());

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_keys_are_sanitized() {
        let (store, test_dir) = setup_test_store();

        assert!(store.set("../escape:key", &1));
        assert!(store.dir().join("apb.___escape_key.json").exists());

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_write_failure_reports_false() {
        let (store, test_dir) = setup_test_store();

        fs::remove_dir_all(store.dir()).unwrap();
        assert!(!store.set("versionHistory", &Vec::<u8>::new()));

        cleanup_test_dir(&test_dir);
    }
}
