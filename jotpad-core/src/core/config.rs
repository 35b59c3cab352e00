//! Store configuration.
//!
//! Every field has a default, so hosts only spell out what they change:
//!
//! ```rust
//! use jotpad_core::StoreConfig;
//!
//! let config = StoreConfig::from_json(r#"{ "excerptChars": 40 }"#).unwrap();
//! assert_eq!(config.excerpt_chars, 40);
//! assert_eq!(config.storage_key, "jotpad-notes");
//! ```

use serde::{Deserialize, Serialize};

use crate::core::note::DEFAULT_TITLE;
use crate::{JotpadError, Result};

/// Key the note collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "jotpad-notes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Key of the single persisted blob.
    pub storage_key: String,
    /// Title used for new notes and for saves with a blank title.
    pub default_title: String,
    /// Character budget of sidebar excerpts.
    pub excerpt_chars: usize,
    /// Quiet period before an auto-save fires.
    pub autosave_delay_ms: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_title: DEFAULT_TITLE.to_string(),
            excerpt_chars: 100,
            autosave_delay_ms: 1000,
        }
    }
}

impl StoreConfig {
    /// Parses a JSON object, filling missing fields with defaults, and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::Json`] for malformed JSON and
    /// [`JotpadError::InvalidConfig`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values can drive a store.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(JotpadError::InvalidConfig(
                "storageKey must not be empty".to_string(),
            ));
        }
        if self.default_title.trim().is_empty() {
            return Err(JotpadError::InvalidConfig(
                "defaultTitle must not be blank".to_string(),
            ));
        }
        if self.excerpt_chars == 0 {
            return Err(JotpadError::InvalidConfig(
                "excerptChars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Key the unreadable blob is copied to before the store starts fresh.
    pub fn corrupt_backup_key(&self) -> String {
        format!("{}.corrupt", self.storage_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.storage_key, "jotpad-notes");
        assert_eq!(config.default_title, "Untitled");
        assert_eq!(config.excerpt_chars, 100);
        assert_eq!(config.autosave_delay_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = StoreConfig::from_json(r#"{"storageKey":"my-notes","autosaveDelayMs":250}"#)
            .unwrap();
        assert_eq!(config.storage_key, "my-notes");
        assert_eq!(config.autosave_delay_ms, 250);
        assert_eq!(config.default_title, "Untitled");
        assert_eq!(config.corrupt_backup_key(), "my-notes.corrupt");
    }

    #[test]
    fn test_from_json_rejects_empty_key() {
        let err = StoreConfig::from_json(r#"{"storageKey":"  "}"#).unwrap_err();
        assert!(matches!(err, JotpadError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_rejects_zero_excerpt() {
        let err = StoreConfig::from_json(r#"{"excerptChars":0}"#).unwrap_err();
        assert!(matches!(err, JotpadError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = StoreConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, JotpadError::Json(_)));
    }
}
