//! Store settings supplied by the host page.
//!
//! The page may pass a JSON object (usually from a `data-config` attribute).
//! Anything missing or invalid falls back to the defaults so a typo never
//! keeps the notepad from starting.

use jotpad_core::StoreConfig;

/// Parses the page's config; returns defaults if it is absent or unusable.
pub fn load_config(json: Option<&str>) -> StoreConfig {
    match json.map(str::trim).filter(|s| !s.is_empty()) {
        None => StoreConfig::default(),
        Some(json) => StoreConfig::from_json(json).unwrap_or_else(|e| {
            log::warn!("Ignoring page config: {e}");
            StoreConfig::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        assert_eq!(load_config(None), StoreConfig::default());
        assert_eq!(load_config(Some("   ")), StoreConfig::default());
    }

    #[test]
    fn test_partial_config_is_merged() {
        let config = load_config(Some(r#"{"autosaveDelayMs": 300}"#));
        assert_eq!(config.autosave_delay_ms, 300);
        assert_eq!(config.storage_key, StoreConfig::default().storage_key);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        assert_eq!(load_config(Some("{broken")), StoreConfig::default());
        assert_eq!(
            load_config(Some(r#"{"excerptChars": 0}"#)),
            StoreConfig::default()
        );
    }
}
