//! The note store: the ordered note collection, the selection, and the
//! persisted snapshot that mirrors them.

use std::collections::HashSet;

use uuid::Uuid;

use crate::core::clock::{Clock, MonotonicStamp, SystemClock};
use crate::core::delete::next_current;
use crate::core::export::export_note;
use crate::core::note::normalize_title;
use crate::{
    Command, CommandOutcome, DeleteResult, EditorState, ExportFormat, ExportPayload,
    JotpadError, ListView, Note, NoteSummary, Result, Storage, StoreConfig,
};

/// What [`NoteStore::initialize`] found and what the renderer should show first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initialized {
    pub notes: Vec<Note>,
    pub current_id: Option<String>,
    /// A default note was created because nothing usable was stored.
    pub created_default: bool,
    /// The stored blob could not be parsed; it was copied aside and replaced.
    pub recovered_from_corrupt: bool,
    /// User-facing text of a read or write failure during load. The store
    /// is usable regardless; a failed write is retried like any other.
    pub storage_error: Option<String>,
}

/// A command's outcome together with the fate of its write.
///
/// The in-memory change behind `outcome` has happened even when
/// `write_error` is set.
#[derive(Debug)]
pub struct Applied {
    pub outcome: CommandOutcome,
    pub write_error: Option<JotpadError>,
}

/// Owns the note collection, newest first, and the current-note pointer.
///
/// Every mutation writes the whole collection through the [`Storage`] port.
/// A failed write is reported as [`JotpadError::Persistence`] but the
/// in-memory change is kept; the store stays dirty and the next mutation or
/// [`NoteStore::flush`] writes the full collection again.
pub struct NoteStore<S: Storage> {
    storage: S,
    config: StoreConfig,
    clock: Box<dyn Clock>,
    stamp: MonotonicStamp,
    notes: Vec<Note>,
    current_id: Option<String>,
    dirty: bool,
}

impl<S: Storage> NoteStore<S> {
    /// Creates an empty store over `storage` using the system clock.
    ///
    /// Nothing is read until [`Self::initialize`] is called.
    pub fn new(storage: S, config: StoreConfig) -> Self {
        Self::with_clock(storage, config, Box::new(SystemClock))
    }

    /// Like [`Self::new`] with an explicit time source.
    pub fn with_clock(storage: S, config: StoreConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            storage,
            config,
            clock,
            stamp: MonotonicStamp::default(),
            notes: Vec::new(),
            current_id: None,
            dirty: false,
        }
    }

    /// Loads the persisted collection and selects a note.
    ///
    /// Stored order is kept and the first note becomes current. When nothing
    /// is stored, or the stored collection is empty, one default note is
    /// created, selected and persisted. An unparsable blob is copied to
    /// [`StoreConfig::corrupt_backup_key`] and treated as absent.
    ///
    /// Storage failures never abort loading. An unreadable port yields an
    /// empty notebook with the default note, and a failed write leaves the
    /// store dirty; either is reported in [`Initialized::storage_error`].
    pub fn initialize(&mut self) -> Initialized {
        let key = self.config.storage_key.clone();
        let mut recovered_from_corrupt = false;
        let mut storage_error = None;

        let stored = match self.storage.load(&key) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Could not read notes from '{key}' ({e}); starting with an empty notebook");
                storage_error = Some(JotpadError::from(e).user_message());
                None
            }
        };

        let loaded = match stored {
            None => Vec::new(),
            Some(blob) => match serde_json::from_str::<Vec<Note>>(&blob) {
                Ok(notes) => notes,
                Err(e) => {
                    log::warn!("Stored notes under '{key}' are unreadable ({e}); starting fresh");
                    let backup_key = self.config.corrupt_backup_key();
                    if let Err(e) = self.storage.store(&backup_key, &blob) {
                        log::warn!("Could not back up unreadable notes to '{backup_key}': {e}");
                    }
                    recovered_from_corrupt = true;
                    Vec::new()
                }
            },
        };

        let loaded_len = loaded.len();
        self.notes = dedupe_ids(loaded);
        let repaired = self.notes.len() != loaded_len;
        for note in &self.notes {
            self.stamp.observe(note.created_at.max(note.updated_at));
        }
        self.current_id = self.notes.first().map(|n| n.id.clone());
        self.dirty = false;

        let created_default = self.notes.is_empty();
        let persisted = if created_default {
            let note = self.blank_note();
            self.current_id = Some(note.id.clone());
            self.notes.push(note);
            self.persist()
        } else if repaired {
            self.persist()
        } else {
            Ok(())
        };

        log::info!(
            "Loaded {} note(s) from '{key}'{}",
            self.notes.len(),
            if created_default { " (created default note)" } else { "" }
        );

        if let Err(e) = persisted {
            storage_error.get_or_insert_with(|| e.user_message());
        }
        Initialized {
            notes: self.notes.clone(),
            current_id: self.current_id.clone(),
            created_default,
            recovered_from_corrupt,
            storage_error,
        }
    }

    // ── Queries ───────────────────────────────────────────────────

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// All notes, newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// The note open in the editor, if any.
    pub fn current(&self) -> Option<&Note> {
        self.current_id.as_deref().and_then(|id| self.find(id))
    }

    /// Fetches a single note by ID.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::NoteNotFound`] if no note has `id`.
    pub fn get_note(&self, id: &str) -> Result<&Note> {
        self.find(id)
            .ok_or_else(|| JotpadError::NoteNotFound(id.to_string()))
    }

    /// Whether the last persistence attempt failed and a write is outstanding.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The sidebar model: one row per note with its excerpt, plus the selection.
    pub fn list_view(&self) -> ListView {
        let current = self.current_id.as_deref();
        ListView {
            notes: self
                .notes
                .iter()
                .map(|n| NoteSummary {
                    id: n.id.clone(),
                    title: n.title.clone(),
                    excerpt: n.excerpt(self.config.excerpt_chars),
                    updated_at: n.updated_at,
                    is_current: current == Some(n.id.as_str()),
                })
                .collect(),
            current_id: self.current_id.clone(),
        }
    }

    /// What the editor should show, or `None` when nothing is selected.
    pub fn editor_state(&self) -> Option<EditorState> {
        self.current().map(EditorState::from)
    }

    // ── Mutations ─────────────────────────────────────────────────

    /// Creates a blank note at the top of the list and selects it.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::Persistence`] if the write fails; the note is
    /// still created and selected.
    pub fn create_note(&mut self) -> Result<Note> {
        let note = self.insert_blank();
        self.persist()?;
        Ok(note)
    }

    /// Makes `id` the current note. Selection is not persisted.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::NoteNotFound`] if no note has `id`; the
    /// selection is left as it was.
    pub fn select_note(&mut self, id: &str) -> Result<&Note> {
        let index = self
            .position(id)
            .ok_or_else(|| JotpadError::NoteNotFound(id.to_string()))?;
        self.current_id = Some(id.to_string());
        log::debug!("Selected note {id}");
        Ok(&self.notes[index])
    }

    /// Writes `title` and `content` into the current note and refreshes `updated_at`.
    ///
    /// A blank title is replaced by the configured default title.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::NoCurrentNote`] if nothing is selected, or
    /// [`JotpadError::Persistence`] if the write fails (the edit is kept).
    pub fn save_current(&mut self, title: &str, content: &str) -> Result<Note> {
        let saved = self.write_current(title, content)?;
        self.persist()?;
        Ok(saved)
    }

    /// Removes the note with `id`, moving the selection if it pointed there.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::NoteNotFound`] if no note has `id` (nothing
    /// changes), or [`JotpadError::Persistence`] if the write fails (the
    /// removal is kept).
    pub fn delete_note(&mut self, id: &str) -> Result<DeleteResult> {
        let result = self.remove(id)?;
        self.persist()?;
        Ok(result)
    }

    /// Serializes the current note for download. Does not mutate.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::NoCurrentNote`] if nothing is selected, or
    /// [`JotpadError::Json`] if a JSON export cannot be built.
    pub fn export_current(&self, format: ExportFormat) -> Result<ExportPayload> {
        let note = self.current().ok_or(JotpadError::NoCurrentNote)?;
        export_note(note, format, self.clock.now_millis())
    }

    /// Serializes every note, in list order, one payload per note.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::Json`] if a JSON export cannot be built.
    pub fn export_all(&self, format: ExportFormat) -> Result<Vec<ExportPayload>> {
        let now = self.clock.now_millis();
        self.notes
            .iter()
            .map(|note| export_note(note, format, now))
            .collect()
    }

    /// Retries an outstanding write. Does nothing when the store is clean.
    ///
    /// Call at teardown so a failed write gets one more chance.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::Persistence`] if the write fails again.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.persist()?;
        }
        Ok(())
    }

    /// Runs one [`Command`] and returns its outcome with the refreshed sidebar.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation, including a failed write.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        let applied = self.try_apply(command)?;
        match applied.write_error {
            Some(e) => Err(e),
            None => Ok(applied.outcome),
        }
    }

    /// Like [`Self::apply`], but a failed write still hands back the outcome
    /// so the page can show the change that memory already holds.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::NoteNotFound`], [`JotpadError::NoCurrentNote`]
    /// or [`JotpadError::Json`] when the command itself cannot run. Nothing
    /// changes in that case.
    pub fn try_apply(&mut self, command: Command) -> Result<Applied> {
        log::debug!("Applying {}", command.name());
        let mutates = command.is_mutation();
        let outcome = match command {
            Command::CreateNote => {
                let note = self.insert_blank();
                CommandOutcome::Created { note, list: self.list_view() }
            }
            Command::SelectNote { id } => {
                let note = self.select_note(&id)?.clone();
                CommandOutcome::Selected { note, list: self.list_view() }
            }
            Command::SaveCurrent { title, content } => {
                let note = self.write_current(&title, &content)?;
                CommandOutcome::Saved { note, list: self.list_view() }
            }
            Command::DeleteNote { id } => {
                let result = self.remove(&id)?;
                CommandOutcome::Deleted { result, list: self.list_view() }
            }
            Command::ExportCurrent { format } => CommandOutcome::Exported {
                payloads: vec![self.export_current(format)?],
            },
            Command::ExportAll { format } => CommandOutcome::Exported {
                payloads: self.export_all(format)?,
            },
        };
        let write_error = if mutates { self.persist().err() } else { None };
        Ok(Applied { outcome, write_error })
    }

    /// Gives the storage back, e.g. to reopen it in a test.
    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ── Internals ─────────────────────────────────────────────────

    fn find(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    fn insert_blank(&mut self) -> Note {
        let note = self.blank_note();
        self.notes.insert(0, note.clone());
        self.current_id = Some(note.id.clone());
        log::debug!("Created note {}", note.id);
        note
    }

    fn write_current(&mut self, title: &str, content: &str) -> Result<Note> {
        let index = self
            .current_id
            .as_deref()
            .and_then(|id| self.position(id))
            .ok_or(JotpadError::NoCurrentNote)?;

        let updated_at = self.stamp.next(self.clock.now_millis());
        let note = &mut self.notes[index];
        note.title = normalize_title(title, &self.config.default_title);
        note.content = content.to_string();
        note.updated_at = updated_at;
        let saved = note.clone();

        log::debug!("Saved note {}", saved.id);
        Ok(saved)
    }

    fn remove(&mut self, id: &str) -> Result<DeleteResult> {
        let index = self
            .position(id)
            .ok_or_else(|| JotpadError::NoteNotFound(id.to_string()))?;
        self.notes.remove(index);

        let was_current = self.current_id.as_deref() == Some(id);
        let next = next_current(
            self.current_id.as_deref(),
            id,
            self.notes.iter().map(|n| n.id.as_str()),
        )
        .map(str::to_string);
        self.current_id = next;

        log::debug!("Deleted note {id}, {} left", self.notes.len());
        Ok(DeleteResult {
            deleted_id: id.to_string(),
            current_id: self.current_id.clone(),
            selection_changed: was_current,
            remaining: self.notes.len(),
        })
    }

    fn blank_note(&mut self) -> Note {
        let now = self.stamp.next(self.clock.now_millis());
        Note {
            id: Uuid::new_v4().to_string(),
            title: self.config.default_title.clone(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Writes the whole collection. Failure leaves the store dirty.
    fn persist(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.notes)?;
        match self.storage.store(&self.config.storage_key, &blob) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                log::warn!("Could not persist {} note(s): {e}", self.notes.len());
                self.dirty = true;
                Err(e.into())
            }
        }
    }
}

/// Drops notes whose ID already appeared earlier in the list.
fn dedupe_ids(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    let before = notes.len();
    let kept: Vec<Note> = notes
        .into_iter()
        .filter(|n| seen.insert(n.id.clone()))
        .collect();
    if kept.len() != before {
        log::warn!("Dropped {} note(s) with duplicate IDs", before - kept.len());
    }
    kept
}
