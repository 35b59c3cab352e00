use serde::{Deserialize, Serialize};

use super::text;

/// Title given to notes whose title is empty or whitespace-only.
pub const DEFAULT_TITLE: &str = "Untitled";

/// One user document.
///
/// Serialized with camelCase keys; a JSON array of these is the persisted
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    /// HTML fragment produced by the editor; opaque to the store.
    pub content: String,
    /// Unix milliseconds (UTC).
    pub created_at: i64,
    /// Unix milliseconds (UTC).
    pub updated_at: i64,
}

impl Note {
    /// Plain-text preview of the body, at most `max_chars` characters plus an ellipsis.
    pub fn excerpt(&self, max_chars: usize) -> String {
        text::excerpt(&self.content, max_chars)
    }

    /// The body with markup removed.
    pub fn plain_text(&self) -> String {
        text::html_to_text(&self.content)
    }
}

/// Returns `title` trimmed, or `placeholder` when nothing is left.
pub fn normalize_title(title: &str, placeholder: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

/// One sidebar row, as consumed by the list renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub updated_at: i64,
    pub is_current: bool,
}

/// Everything the list renderer needs to redraw the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub notes: Vec<NoteSummary>,
    pub current_id: Option<String>,
}

/// What the editor binding loads into its title field and editing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl From<&Note> for EditorState {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Note {
        Note {
            id: "test-id".to_string(),
            title: "Test Note".to_string(),
            content: "<p>Hello <b>there</b></p>".to_string(),
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_note_serializes_camel_case() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"createdAt\":1700000000000"));
        assert!(json.contains("\"updatedAt\":1700000000000"));
        assert!(!json.contains("created_at"));
    }

    #[test]
    fn test_note_excerpt_and_plain_text() {
        let note = sample();
        assert_eq!(note.plain_text(), "Hello there");
        assert_eq!(note.excerpt(5), "Hello…");
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("", DEFAULT_TITLE), "Untitled");
        assert_eq!(normalize_title("   \t", DEFAULT_TITLE), "Untitled");
        assert_eq!(normalize_title("  Groceries ", DEFAULT_TITLE), "Groceries");
    }

    #[test]
    fn test_editor_state_from_note() {
        let state = EditorState::from(&sample());
        assert_eq!(state.id, "test-id");
        assert_eq!(state.title, "Test Note");
    }
}
