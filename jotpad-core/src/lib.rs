//! Core library for Jotpad, a small notepad that lives in the browser.
//!
//! The primary entry point is [`NoteStore`], which owns the note collection
//! and the current selection and mirrors every change into a [`Storage`]
//! backend. All mutations go through `NoteStore` methods or [`Command`]s.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use crate::core::{
    autosave::Debouncer,
    clock::{Clock, ManualClock, SystemClock},
    command::{Command, CommandOutcome},
    config::{StoreConfig, DEFAULT_STORAGE_KEY},
    delete::DeleteResult,
    error::{JotpadError, Result, StorageError},
    export::{export_note, slugify_title, ExportDocument, ExportFormat, ExportPayload, APP_VERSION},
    note::{EditorState, ListView, Note, NoteSummary, DEFAULT_TITLE},
    storage::{MemoryStorage, Storage},
    store::{Applied, Initialized, NoteStore},
    text::{excerpt, html_to_text},
};

#[cfg(feature = "sqlite")]
#[doc(inline)]
pub use crate::core::storage::SqliteStorage;
