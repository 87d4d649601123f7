//! Configuration resolution and the `config get`/`config set` actions.

pub mod store;

pub use store::{ConfigStore, KEY_API_KEY, KEY_MODEL, resolve_key};

use crate::error::ConfigError;

/// Model used when the store has no `model` entry. The `:free` suffix marks
/// a free-tier model, so no cost is ever reported for the default.
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";

/// Typed view of the store, resolved once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl Config {
    /// Materialize the typed config from the store.
    pub fn resolve(store: &ConfigStore) -> Self {
        Self {
            api_key: store.get(KEY_API_KEY).map(str::to_string),
            model: store.get(KEY_MODEL).map(str::to_string),
        }
    }

    /// The model identifier to use, falling back to [`DEFAULT_MODEL`].
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Run a `config <action>` invocation against the store.
///
/// Returns the text to print. `set` persists the store; `get` never writes.
pub fn run_action(
    store: &mut ConfigStore,
    action: &str,
    key: Option<&str>,
    value: Option<&str>,
) -> Result<String, ConfigError> {
    match action {
        "get" => Ok(show(store, key)),
        "set" => {
            let (key, value) = match (key, value) {
                (Some(k), Some(v)) if !k.is_empty() && !v.is_empty() => (k, v),
                _ => return Err(ConfigError::MissingSetArguments),
            };
            store.set(key, value);
            store.save()?;
            Ok(format!("Saved {}", resolve_key(key)))
        }
        other => Err(ConfigError::InvalidAction(other.to_string())),
    }
}

/// Render a key's value, or all known keys when no key is given.
///
/// Absent keys show their documented fallback: the default model identifier
/// for `model`, `Not set` otherwise.
fn show(store: &ConfigStore, key: Option<&str>) -> String {
    match key {
        Some(key) => {
            let canonical = resolve_key(key);
            format!("{canonical}={}", describe_value(store, canonical))
        }
        None => {
            let mut lines: Vec<String> = [KEY_API_KEY, KEY_MODEL]
                .iter()
                .map(|k| format!("{k}={}", describe_value(store, k)))
                .collect();
            // Extra entries the user stored under unrecognized keys.
            for (k, v) in store.entries() {
                if k != KEY_API_KEY && k != KEY_MODEL {
                    lines.push(format!("{k}={v}"));
                }
            }
            lines.join("\n")
        }
    }
}

fn describe_value(store: &ConfigStore, canonical: &str) -> String {
    match store.get(canonical) {
        Some(value) => value.to_string(),
        None if canonical == KEY_MODEL => format!("{DEFAULT_MODEL} (default)"),
        None => "Not set".to_string(),
    }
}
