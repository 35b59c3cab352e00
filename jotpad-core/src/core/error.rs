//! Error types for the Jotpad core library.

use thiserror::Error;

/// Failures reported by a [`Storage`](super::storage::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A SQLite operation failed.
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The backing store could not be reached (e.g. storage disabled by the browser).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backing store refused the write (e.g. quota exceeded).
    #[error("Write rejected: {0}")]
    WriteRejected(String),

    /// The opened file is not a valid Jotpad store.
    #[error("Invalid store: {0}")]
    InvalidStore(String),
}

/// All errors that can occur within the Jotpad core library.
///
/// Every variant is recoverable: the store stays usable for the next action.
#[derive(Debug, Error)]
pub enum JotpadError {
    /// A note ID was requested that does not exist in the collection.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// The operation needs a selected note and none is selected.
    #[error("No note is selected")]
    NoCurrentNote,

    /// Writing or reading the persisted snapshot failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),

    /// Note data could not be serialized to or from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias that pins the error type to [`JotpadError`].
pub type Result<T> = std::result::Result<T, JotpadError>;

impl JotpadError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::NoCurrentNote => "Select a note first".to_string(),
            Self::Persistence(e) => format!("Changes not saved yet: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::InvalidConfig(msg) => msg.clone(),
        }
    }

    /// Whether the in-memory change behind this error was kept.
    ///
    /// Only persistence failures leave a mutation applied; it is written out
    /// again on the next successful persist.
    #[must_use]
    pub fn is_pending_write(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_current_note_message() {
        let e = JotpadError::NoCurrentNote;
        assert!(e.to_string().contains("No note"));
        assert_eq!(e.user_message(), "Select a note first");
    }

    #[test]
    fn test_storage_error_converts_to_persistence() {
        let e: JotpadError = StorageError::WriteRejected("quota".to_string()).into();
        assert!(matches!(e, JotpadError::Persistence(_)));
        assert!(e.is_pending_write());
        assert!(e.user_message().contains("quota"));
    }

    #[test]
    fn test_not_found_is_not_pending_write() {
        let e = JotpadError::NoteNotFound("abc".to_string());
        assert!(!e.is_pending_write());
        assert!(e.to_string().contains("abc"));
    }
}
