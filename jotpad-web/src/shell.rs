//! Platform-neutral half of the page adapter.
//!
//! [`Shell`] sits between DOM events and the [`NoteStore`]: it turns
//! toolbar actions into commands, keeps the pending auto-save draft, and
//! turns errors into status text. It never touches the DOM, so it runs
//! under plain `cargo test`; [`crate::JotpadApp`] drives it from the browser.

use jotpad_core::{
    Command, CommandOutcome, Debouncer, Initialized, JotpadError, ListView, Note, NoteStore,
    Result, Storage, StoreConfig,
};

use crate::actions::Action;

/// Editor contents waiting for the auto-save timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub note_id: String,
    pub title: String,
    pub content: String,
}

/// Whatever the page has to react to after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Nothing visible changed.
    None,
    /// The store ran a command; redraw from the outcome.
    Outcome(CommandOutcome),
    /// The user declined the delete prompt.
    Cancelled,
}

pub struct Shell<S: Storage> {
    store: NoteStore<S>,
    autosave: Debouncer<Draft>,
    status: Option<String>,
}

impl<S: Storage> Shell<S> {
    pub fn new(store: NoteStore<S>) -> Self {
        let delay = store.config().autosave_delay_ms;
        Self {
            store,
            autosave: Debouncer::new(delay),
            status: None,
        }
    }

    /// Loads the store. Storage trouble only sets the status line; the
    /// notepad always starts with a note open.
    pub fn start(&mut self) -> Initialized {
        let init = self.store.initialize();
        if let Some(message) = &init.storage_error {
            self.status = Some(message.clone());
        } else if init.recovered_from_corrupt {
            self.status =
                Some("Saved notes were unreadable; started a fresh notebook".to_string());
        }
        init
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    pub fn config(&self) -> &StoreConfig {
        self.store.config()
    }

    pub fn list_view(&self) -> ListView {
        self.store.list_view()
    }

    /// Takes the status message set by the last failing event, if any.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    /// Runs `command`, saving any pending draft first so it is not lost when
    /// the selection moves.
    ///
    /// A failed write still returns the outcome, since memory already holds
    /// the change and the page must show it; the failure goes to the status
    /// line and is retried on the next write.
    ///
    /// # Errors
    ///
    /// Propagates an error that stopped the command from running; its user
    /// message is also kept as status.
    pub fn dispatch(&mut self, command: Command) -> Result<CommandOutcome> {
        match &command {
            // An explicit save supersedes whatever the timer would write.
            Command::SaveCurrent { .. } => {
                self.autosave.cancel();
            }
            _ => self.save_pending_draft(),
        }

        let applied = self.store.try_apply(command).inspect_err(|e| self.report(e))?;
        if let Some(e) = &applied.write_error {
            self.report(e);
        }
        Ok(applied.outcome)
    }

    /// Handles a toolbar click.
    ///
    /// `editor` is the title and content currently on screen, used by Save.
    /// `confirm` is asked before a delete and receives the note to be removed.
    ///
    /// # Errors
    ///
    /// Propagates the store error; its user message is also kept as status.
    pub fn on_action(
        &mut self,
        action: Action,
        editor: (&str, &str),
        confirm: impl FnOnce(&Note) -> bool,
    ) -> Result<Reaction> {
        let command = match action {
            Action::NewNote => Command::CreateNote,
            Action::SaveNote => Command::SaveCurrent {
                title: editor.0.to_string(),
                content: editor.1.to_string(),
            },
            Action::DeleteNote => {
                let Some(note) = self.store.current() else {
                    let e = JotpadError::NoCurrentNote;
                    self.report(&e);
                    return Err(e);
                };
                if !confirm(note) {
                    return Ok(Reaction::Cancelled);
                }
                Command::DeleteNote { id: note.id.clone() }
            }
            Action::Export(format) => Command::ExportCurrent { format },
            Action::ExportAll(format) => Command::ExportAll { format },
        };
        self.dispatch(command).map(Reaction::Outcome)
    }

    /// Records editor input and (re)arms auto-save.
    ///
    /// Returns the delay after which [`Self::fire_autosave`] should run, or
    /// `None` when no note is open and there is nothing to save into.
    pub fn on_input(&mut self, now: i64, title: &str, content: &str) -> Option<u32> {
        let note_id = self.store.current_id()?.to_string();
        self.autosave.schedule(
            now,
            Draft {
                note_id,
                title: title.to_string(),
                content: content.to_string(),
            },
        );
        Some(self.autosave.delay_ms())
    }

    /// Saves the pending draft if its quiet period is over.
    pub fn fire_autosave(&mut self, now: i64) -> Reaction {
        match self.autosave.take_due(now) {
            Some(draft) => self.save_draft(draft),
            None => Reaction::None,
        }
    }

    /// Saves any pending draft and retries an outstanding write; for page unload.
    ///
    /// # Errors
    ///
    /// Returns [`JotpadError::Persistence`] if the final write fails.
    pub fn shutdown(&mut self) -> Result<()> {
        self.save_pending_draft();
        self.store.flush().inspect_err(|e| self.report(e))
    }

    pub fn has_pending_draft(&self) -> bool {
        self.autosave.is_pending()
    }

    fn save_pending_draft(&mut self) {
        if let Some(draft) = self.autosave.take_now() {
            self.save_draft(draft);
        }
    }

    fn save_draft(&mut self, draft: Draft) -> Reaction {
        if self.store.current_id() != Some(draft.note_id.as_str()) {
            log::debug!("Dropping draft for {}: no longer open", draft.note_id);
            return Reaction::None;
        }
        self.dispatch(Command::SaveCurrent {
            title: draft.title,
            content: draft.content,
        })
        .map_or(Reaction::None, Reaction::Outcome)
    }

    fn report(&mut self, e: &JotpadError) {
        log::warn!("{e}");
        self.status = Some(e.user_message());
    }
}
