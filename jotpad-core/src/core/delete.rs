//! Result type for note removal.
//!
//! Deleting a note may move the selection. [`DeleteResult`] tells the caller
//! which note (if any) is current afterwards so the editor can be reloaded
//! without a second query.
//!
//! ## Serialization
//!
//! Fields serialize in camelCase (`deletedId`, `currentId`, `selectionChanged`),
//! consistent with all other types that cross into the page.
//!
//! ## Examples
//!
//! ```rust
//! use jotpad_core::DeleteResult;
//!
//! let result = DeleteResult {
//!     deleted_id: "a".to_string(),
//!     current_id: Some("b".to_string()),
//!     selection_changed: true,
//!     remaining: 1,
//! };
//! let json = serde_json::to_string(&result).unwrap();
//! assert!(json.contains("deletedId"));
//! assert!(json.contains("selectionChanged"));
//! ```

use serde::{Deserialize, Serialize};

/// The outcome of [`NoteStore::delete_note`](super::store::NoteStore::delete_note).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// ID of the note that was removed.
    pub deleted_id: String,

    /// The current note after the removal; `None` when the collection is now empty
    /// or nothing was selected before.
    pub current_id: Option<String>,

    /// Whether the removed note was the current one, so the selection moved.
    pub selection_changed: bool,

    /// Number of notes left in the collection.
    pub remaining: usize,
}

/// Picks the current note after `deleted` was removed from `remaining_ids`.
///
/// Deleting a non-current note keeps the selection. Deleting the current
/// note selects the first remaining note, never the former neighbour.
pub(crate) fn next_current<'a>(
    current: Option<&'a str>,
    deleted: &str,
    mut remaining_ids: impl Iterator<Item = &'a str>,
) -> Option<&'a str> {
    match current {
        Some(id) if id == deleted => remaining_ids.next(),
        other => other,
    }
}
