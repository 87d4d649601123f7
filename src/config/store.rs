//! Persisted KEY=VALUE config store.
//!
//! The store is a plain text file of newline-delimited `KEY=VALUE` pairs at a
//! fixed per-user location, so it survives tool upgrades and is independent
//! of the working directory. Blank lines and lines starting with `#` are
//! ignored on read. On write only keys with non-empty values are emitted.
//! Values containing newlines are unsupported (documented limitation).

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ConfigError;

/// Canonical store key for the OpenRouter API key.
pub const KEY_API_KEY: &str = "api_key";

/// Canonical store key for the model identifier.
pub const KEY_MODEL: &str = "model";

/// Resolve a user-supplied key to its canonical store key.
///
/// Short aliases map to the canonical names; unrecognized keys pass through
/// unchanged so the store can hold arbitrary entries.
pub fn resolve_key(key: &str) -> &str {
    match key {
        "key" | "apikey" | "api-key" => KEY_API_KEY,
        "id" | "model-id" | "model_id" => KEY_MODEL,
        other => other,
    }
}

/// The persisted key/value store, held in file order.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl ConfigStore {
    /// Fixed per-user store location: `<config_dir>/epigram/config`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("epigram").join("config"))
    }

    /// Load the store from `path`. A missing file is an empty store.
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => parse_entries(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(ConfigError::ReadFailed {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        debug!("Loaded {} config entries from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    /// Get a value by (possibly aliased) key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let canonical = resolve_key(key);
        self.entries
            .iter()
            .find(|(k, _)| k == canonical)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value under its (possibly aliased) key, replacing any existing
    /// entry. The caller validates that the value is non-empty.
    pub fn set(&mut self, key: &str, value: &str) {
        let canonical = resolve_key(key);
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == canonical) {
            entry.1 = value.to_string();
        } else {
            self.entries.push((canonical.to_string(), value.to_string()));
        }
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Rewrite the store file, creating the parent directory if absent.
    ///
    /// Writes to a temp file in the same directory and renames it into
    /// place, so a crash mid-write never truncates the store. Only keys
    /// with non-empty values are emitted, one line each, no escaping.
    pub fn save(&self) -> Result<(), ConfigError> {
        let write_failed = |e: std::io::Error| ConfigError::WriteFailed {
            path: self.path.display().to_string(),
            source: e,
        };

        let parent = self.path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent).map_err(write_failed)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_failed)?;
        for (key, value) in &self.entries {
            if value.is_empty() {
                continue;
            }
            writeln!(tmp, "{key}={value}").map_err(write_failed)?;
        }

        tmp.persist(&self.path)
            .map_err(|e| write_failed(e.error))?;

        debug!("Wrote config store to {}", self.path.display());
        Ok(())
    }
}

/// Parse `KEY=VALUE` lines, ignoring blanks and `#` comments.
fn parse_entries(content: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match trimmed.split_once('=') {
            Some((key, value)) => entries.push((key.to_string(), value.to_string())),
            None => warn!("Ignoring malformed config line: {trimmed}"),
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_key_aliases() {
        assert_eq!(resolve_key("key"), "api_key");
        assert_eq!(resolve_key("apikey"), "api_key");
        assert_eq!(resolve_key("api-key"), "api_key");
        assert_eq!(resolve_key("api_key"), "api_key");
        assert_eq!(resolve_key("id"), "model");
        assert_eq!(resolve_key("model-id"), "model");
        assert_eq!(resolve_key("model"), "model");
    }

    #[test]
    fn test_resolve_key_passes_unknown_through() {
        assert_eq!(resolve_key("editor"), "editor");
        assert_eq!(resolve_key("API_KEY"), "API_KEY");
    }

    #[test]
    fn test_parse_entries_skips_comments_and_blanks() {
        let content = "# a comment\n\napi_key=sk-test\nmodel=some/model\n  \n# another\n";
        let entries = parse_entries(content);
        assert_eq!(
            entries,
            vec![
                ("api_key".to_string(), "sk-test".to_string()),
                ("model".to_string(), "some/model".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_entries_keeps_equals_in_value() {
        // Only the first '=' splits; the rest stays in the value verbatim.
        let entries = parse_entries("api_key=abc=def\n");
        assert_eq!(entries, vec![("api_key".to_string(), "abc=def".to_string())]);
    }

    #[test]
    fn test_parse_entries_skips_lines_without_equals() {
        let entries = parse_entries("not a pair\nmodel=m\n");
        assert_eq!(entries, vec![("model".to_string(), "m".to_string())]);
    }

    #[test]
    fn test_set_replaces_via_alias() {
        let mut store = ConfigStore {
            path: PathBuf::from("/dev/null"),
            entries: vec![("api_key".to_string(), "old".to_string())],
        };
        store.set("key", "new");
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.get("api_key"), Some("new"));
    }

    #[test]
    fn test_get_via_alias_after_set() {
        let mut store = ConfigStore {
            path: PathBuf::from("/dev/null"),
            entries: Vec::new(),
        };
        store.set("id", "acme/model-1");
        assert_eq!(store.get("model"), Some("acme/model-1"));
        assert_eq!(store.get("model-id"), Some("acme/model-1"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config");

        let mut store = ConfigStore::load(path.clone()).unwrap();
        store.set("key", "sk-or-v1-abc");
        store.set("editor", "vim");
        store.save().unwrap();

        let reloaded = ConfigStore::load(path).unwrap();
        assert_eq!(reloaded.get("api_key"), Some("sk-or-v1-abc"));
        assert_eq!(reloaded.get("editor"), Some("vim"));
    }

    #[test]
    fn test_save_omits_empty_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");

        let store = ConfigStore {
            path: path.clone(),
            entries: vec![
                ("api_key".to_string(), String::new()),
                ("model".to_string(), "m".to_string()),
            ],
        };
        store.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "model=m\n");
    }

    #[test]
    fn test_load_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::load(dir.path().join("absent")).unwrap();
        assert!(store.entries().is_empty());
    }
}
