/// Application name and metadata constants
pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "AgentPromptBuilder";
pub const APP_NAME: &str = "agent-history";

/// Environment variable read by the log filter
pub const LOG_ENV_VAR: &str = "AGENT_HISTORY_LOG";

/// Storage key the version history is persisted under
pub const HISTORY_KEY: &str = "versionHistory";
pub const DEFAULT_STORE_NAMESPACE: &str = "apb";
pub const STORE_DIR: &str = "store";

/// History related magic numbers
pub const MAX_VERSIONS: usize = 5;
pub const AUTOSAVE_COOLDOWN_SECS: u64 = 25;

/// Default labels
pub const AUTOSAVE_NAME: &str = "autosave";
pub const CURRENT_NAME: &str = "current";
pub const IMPORTED_NAME: &str = "imported";

/// Placeholder shown in the changelog for blank values
pub const EMPTY_VALUE: &str = "∅";

/// Export filenames
pub const PATCH_FILENAME: &str = "changes.patch";
pub const CHANGELOG_FILENAME: &str = "changelog.md";
