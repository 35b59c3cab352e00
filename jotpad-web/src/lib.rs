//! Browser adapter for Jotpad.
//!
//! [`JotpadApp`] is the object the page script creates. It owns a
//! [`Shell`] over [`LocalStorage`], arms the auto-save timer on input, hands
//! export payloads to the download helper and flushes on `beforeunload`.
//! Rendering stays in the page: it registers a callback with
//! [`JotpadApp::on_change`] and redraws the sidebar from the list view it
//! receives.

pub mod actions;
pub mod download;
pub mod logging;
pub mod settings;
pub mod shell;
pub mod storage;

// Re-export the core types the page-facing API speaks in.
pub use jotpad_core::{
    Command, CommandOutcome, EditorState, ExportFormat, ExportPayload, JotpadError, ListView,
    NoteStore, StoreConfig,
};
pub use shell::{Draft, Reaction, Shell};
pub use storage::LocalStorage;

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use log::LevelFilter;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

use crate::actions::Action;

type SharedShell = Rc<RefCell<Shell<LocalStorage>>>;
type ChangeCallback = Rc<RefCell<Option<js_sys::Function>>>;

/// The notepad as seen from the page script.
#[wasm_bindgen]
pub struct JotpadApp {
    shell: SharedShell,
    on_change: ChangeCallback,
    /// The armed auto-save; replacing it drops (and so cancels) the old one.
    autosave_timer: Rc<RefCell<Option<Timeout>>>,
    _unload_listener: EventListener,
}

#[wasm_bindgen]
impl JotpadApp {
    /// Loads notes from local storage. `config` is an optional JSON object
    /// of [`StoreConfig`] fields.
    ///
    /// Never fails: if storage cannot be read the notepad opens a fresh note
    /// and [`Self::take_status`] explains why.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> JotpadApp {
        logging::init_logging(LevelFilter::Info);

        let config = settings::load_config(config.as_deref());
        let mut shell = Shell::new(NoteStore::new(LocalStorage::new(), config));
        shell.start();
        let shell = Rc::new(RefCell::new(shell));

        let unload_shell = shell.clone();
        let unload_listener =
            EventListener::new(&gloo_utils::window(), "beforeunload", move |_event| {
                if let Ok(mut shell) = unload_shell.try_borrow_mut() {
                    // Nothing to show the user any more; the shell already logged it.
                    let _ = shell.shutdown();
                }
            });

        JotpadApp {
            shell,
            on_change: Rc::new(RefCell::new(None)),
            autosave_timer: Rc::new(RefCell::new(None)),
            _unload_listener: unload_listener,
        }
    }

    /// `[[dataAction, label], ...]` for building the toolbar.
    pub fn toolbar() -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&actions::TOOLBAR)?)
    }

    /// Registers `callback(listView)`, called whenever the sidebar should be redrawn.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        *self.on_change.borrow_mut() = Some(callback);
    }

    #[wasm_bindgen(js_name = listView)]
    pub fn list_view(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.shell.borrow().list_view())?)
    }

    /// `{ id, title, content }` of the open note, or `null`.
    #[wasm_bindgen(js_name = editorState)]
    pub fn editor_state(&self) -> Result<JsValue, JsValue> {
        match self.shell.borrow().store().editor_state() {
            Some(state) => Ok(serde_wasm_bindgen::to_value(&state)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Runs a command object such as `{ type: "SelectNote", id }`.
    ///
    /// A failed write still returns the outcome; check [`Self::take_status`].
    pub fn dispatch(&self, command: JsValue) -> Result<JsValue, JsValue> {
        let command: Command = serde_wasm_bindgen::from_value(command)?;
        let outcome = self.shell.borrow_mut().dispatch(command);
        self.react(Reaction::Outcome(outcome.map_err(to_js)?))
    }

    /// Handles a toolbar button by its `data-action` id. Unknown ids are ignored.
    ///
    /// `title` and `content` are what the editor currently shows.
    #[wasm_bindgen(js_name = onAction)]
    pub fn on_action(&self, id: &str, title: &str, content: &str) -> Result<JsValue, JsValue> {
        let Some(action) = Action::from_id(id) else {
            log::debug!("Ignoring unknown action '{id}'");
            return Ok(JsValue::NULL);
        };
        let reaction = self
            .shell
            .borrow_mut()
            .on_action(action, (title, content), confirm_delete)
            .map_err(to_js)?;
        self.react(reaction)
    }

    /// Editor input: (re)arms the auto-save timer.
    #[wasm_bindgen(js_name = onInput)]
    pub fn on_input(&self, title: &str, content: &str) {
        let now = now_millis();
        let Some(delay) = self.shell.borrow_mut().on_input(now, title, content) else {
            return;
        };
        let deadline = now + i64::from(delay);

        let shell = self.shell.clone();
        let on_change = self.on_change.clone();
        let timer = Timeout::new(delay, move || {
            // The timer only fires once the quiet period is over, even if the
            // clock reads a hair early.
            let reaction = shell.borrow_mut().fire_autosave(now_millis().max(deadline));
            if let Reaction::Outcome(outcome) = reaction {
                if let Some(list) = outcome.list() {
                    notify(&on_change, list);
                }
            }
        });
        *self.autosave_timer.borrow_mut() = Some(timer);
    }

    /// Saves any pending draft and retries a failed write.
    pub fn flush(&self) -> Result<(), JsValue> {
        self.autosave_timer.borrow_mut().take();
        self.shell.borrow_mut().shutdown().map_err(to_js)
    }

    /// The message of the last failure, once.
    #[wasm_bindgen(js_name = takeStatus)]
    pub fn take_status(&self) -> Option<String> {
        self.shell.borrow_mut().take_status()
    }
}

impl JotpadApp {
    fn react(&self, reaction: Reaction) -> Result<JsValue, JsValue> {
        match reaction {
            Reaction::None | Reaction::Cancelled => Ok(JsValue::NULL),
            Reaction::Outcome(outcome) => {
                if let CommandOutcome::Exported { payloads } = &outcome {
                    download::download_all(payloads)?;
                }
                if let Some(list) = outcome.list() {
                    notify(&self.on_change, list);
                }
                Ok(serde_wasm_bindgen::to_value(&outcome)?)
            }
        }
    }
}

fn notify(on_change: &ChangeCallback, list: &ListView) {
    let Some(callback) = on_change.borrow().clone() else {
        return;
    };
    match serde_wasm_bindgen::to_value(list) {
        Ok(value) => {
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                log::warn!("List renderer failed: {}", storage::js_message(&e));
            }
        }
        Err(e) => log::warn!("Could not serialize list view: {e}"),
    }
}

fn confirm_delete(note: &jotpad_core::Note) -> bool {
    let message = format!("Delete \"{}\"? This cannot be undone.", note.title);
    gloo_utils::window()
        .confirm_with_message(&message)
        .unwrap_or(false)
}

fn now_millis() -> i64 {
    js_sys::Date::now() as i64
}

fn to_js(e: JotpadError) -> JsValue {
    JsValue::from_str(&e.user_message())
}
