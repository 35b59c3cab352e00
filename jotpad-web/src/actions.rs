//! Toolbar actions of the notepad page.
//!
//! Buttons carry a `data-action` attribute; the page forwards its value here
//! and gets back the gesture it stands for.

use jotpad_core::ExportFormat;

/// A toolbar gesture, before any argument from the page is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NewNote,
    SaveNote,
    DeleteNote,
    Export(ExportFormat),
    ExportAll(ExportFormat),
}

/// `(data-action, label)` pairs in toolbar order.
pub const TOOLBAR: &[(&str, &str)] = &[
    ("note_new", "New Note"),
    ("note_save", "Save"),
    ("note_delete", "Delete"),
    ("export_txt", "Export as Text"),
    ("export_md", "Export as Markdown"),
    ("export_html", "Export as HTML"),
    ("export_json", "Export as JSON"),
    ("export_all_txt", "Download All Notes"),
];

impl Action {
    /// Maps a `data-action` value to its action; unknown ids are ignored.
    pub fn from_id(id: &str) -> Option<Self> {
        let action = match id {
            "note_new" => Self::NewNote,
            "note_save" => Self::SaveNote,
            "note_delete" => Self::DeleteNote,
            other => {
                if let Some(ext) = other.strip_prefix("export_all_") {
                    Self::ExportAll(ext.parse().ok()?)
                } else if let Some(ext) = other.strip_prefix("export_") {
                    Self::Export(ext.parse().ok()?)
                } else {
                    return None;
                }
            }
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_toolbar_entry_maps_to_an_action() {
        for (id, _) in TOOLBAR {
            assert!(Action::from_id(id).is_some(), "unmapped toolbar id {id}");
        }
    }

    #[test]
    fn test_export_ids() {
        assert_eq!(
            Action::from_id("export_md"),
            Some(Action::Export(ExportFormat::Markdown))
        );
        assert_eq!(
            Action::from_id("export_all_json"),
            Some(Action::ExportAll(ExportFormat::Json))
        );
        assert_eq!(Action::from_id("export_pdf"), None);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        assert_eq!(Action::from_id("view_refresh"), None);
        assert_eq!(Action::from_id(""), None);
    }
}
