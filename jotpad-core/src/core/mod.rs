//! Internal domain modules for the Jotpad core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod autosave;
pub mod clock;
pub mod command;
pub mod config;
pub mod delete;
pub mod error;
pub mod export;
pub mod note;
pub mod storage;
pub mod store;
pub mod text;

#[doc(inline)]
pub use autosave::Debouncer;
#[doc(inline)]
pub use clock::{Clock, ManualClock, SystemClock};
#[doc(inline)]
pub use command::{Command, CommandOutcome};
#[doc(inline)]
pub use config::StoreConfig;
#[doc(inline)]
pub use delete::DeleteResult;
#[doc(inline)]
pub use error::{JotpadError, Result, StorageError};
#[doc(inline)]
pub use export::{ExportFormat, ExportPayload};
#[doc(inline)]
pub use note::{EditorState, ListView, Note, NoteSummary};
#[doc(inline)]
pub use storage::{MemoryStorage, Storage};
#[doc(inline)]
pub use store::{Applied, Initialized, NoteStore};
