//! User gestures as typed commands.
//!
//! The page adapter turns each DOM event into exactly one [`Command`] and
//! hands it to [`NoteStore::apply`](super::store::NoteStore::apply). Commands
//! are serde-tagged so a host page can also post them as JSON.

use serde::{Deserialize, Serialize};

use crate::{DeleteResult, ExportFormat, ExportPayload, ListView, Note};

/// One store operation with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Command {
    /// "New note" button.
    CreateNote,
    /// Click on a sidebar row.
    SelectNote {
        /// ID of the clicked note.
        id: String,
    },
    /// Save button or a fired auto-save.
    SaveCurrent {
        /// Title field contents.
        title: String,
        /// Editor surface contents.
        content: String,
    },
    /// Delete button (after confirmation, if the page asks for one).
    DeleteNote {
        /// ID of the note to remove.
        id: String,
    },
    /// Export the open note.
    ExportCurrent {
        /// Requested file format.
        format: ExportFormat,
    },
    /// Export every note, one file each.
    ExportAll {
        /// Requested file format.
        format: ExportFormat,
    },
}

impl Command {
    /// Whether running this command can change the persisted collection.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateNote | Self::SaveCurrent { .. } | Self::DeleteNote { .. }
        )
    }

    /// Short label used in log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateNote => "create_note",
            Self::SelectNote { .. } => "select_note",
            Self::SaveCurrent { .. } => "save_current",
            Self::DeleteNote { .. } => "delete_note",
            Self::ExportCurrent { .. } => "export_current",
            Self::ExportAll { .. } => "export_all",
        }
    }
}

/// What a command produced, plus the refreshed sidebar for the list renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum CommandOutcome {
    Created { note: Note, list: ListView },
    Selected { note: Note, list: ListView },
    Saved { note: Note, list: ListView },
    Deleted { result: DeleteResult, list: ListView },
    Exported { payloads: Vec<ExportPayload> },
}

impl CommandOutcome {
    /// The sidebar to redraw, if the command touched it.
    #[must_use]
    pub fn list(&self) -> Option<&ListView> {
        match self {
            Self::Created { list, .. }
            | Self::Selected { list, .. }
            | Self::Saved { list, .. }
            | Self::Deleted { list, .. } => Some(list),
            Self::Exported { .. } => None,
        }
    }
}
