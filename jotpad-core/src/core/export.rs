//! Single-note export to downloadable files.

use chrono::{SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::core::note::Note;
use crate::core::text::{html_escape, html_to_text};
use crate::Result;

/// Version string written into JSON exports.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the JSON export layout.
pub const EXPORT_VERSION: u32 = 1;

/// File formats a note can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Text,
    Markdown,
    Html,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "md",
            Self::Html => "html",
            Self::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Markdown => "text/markdown",
            Self::Html => "text/html",
            Self::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown export format: {other}")),
        }
    }
}

/// A serialized note plus what the download collaborator needs to save it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub filename: String,
    pub mime_type: String,
    pub body: String,
}

/// Top-level structure of a JSON export.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u32,
    pub app_version: String,
    /// Unix milliseconds at which the export was produced.
    pub exported_at: i64,
    pub note: Note,
}

/// Serializes `note` in `format`.
///
/// `exported_at` is only recorded in JSON exports.
///
/// # Errors
///
/// Returns [`crate::JotpadError::Json`] if a JSON export cannot be serialized.
pub fn export_note(note: &Note, format: ExportFormat, exported_at: i64) -> Result<ExportPayload> {
    let body = match format {
        ExportFormat::Text => render_text(note),
        ExportFormat::Markdown => render_markdown(note),
        ExportFormat::Html => render_html(note),
        ExportFormat::Json => {
            let document = ExportDocument {
                version: EXPORT_VERSION,
                app_version: APP_VERSION.to_string(),
                exported_at,
                note: note.clone(),
            };
            serde_json::to_string_pretty(&document)?
        }
    };

    Ok(ExportPayload {
        filename: format!("{}.{}", slugify_title(&note.title), format.extension()),
        mime_type: format.mime_type().to_string(),
        body,
    })
}

/// Converts a note title into a safe filename stem.
pub fn slugify_title(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let slug: String = slug
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() { "note".to_string() } else { slug }
}

/// RFC 3339 rendering of a millisecond timestamp; out-of-range values print raw.
fn format_timestamp(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => millis.to_string(),
    }
}

fn render_text(note: &Note) -> String {
    format!(
        "{}\n\nCreated: {}\nUpdated: {}\n\n{}\n",
        note.title,
        format_timestamp(note.created_at),
        format_timestamp(note.updated_at),
        note.plain_text(),
    )
}

fn render_markdown(note: &Note) -> String {
    format!(
        "# {}\n\n_Created {} · Updated {}_\n\n{}\n",
        note.title,
        format_timestamp(note.created_at),
        format_timestamp(note.updated_at),
        html_to_text(&note.content),
    )
}

fn render_html(note: &Note) -> String {
    let title = html_escape(&note.title);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<p><small>Created {} &middot; Updated {}</small></p>\n{}\n</body>\n</html>\n",
        format_timestamp(note.created_at),
        format_timestamp(note.updated_at),
        note.content,
    )
}
