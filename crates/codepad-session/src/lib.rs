//! Editor session engine for Codepad.
//!
//! The session owns the active document and its debounced persistence, the
//! run lifecycle, and the output panel layout. It is a synchronous state
//! machine: hosts feed it [`Message`]s and carry out the [`Effect`]s it
//! returns. [`SessionRuntime`] is a ready-made tokio host.
//!
//! # Architecture
//!
//! - `document` - active buffer, save timer, language switching
//! - `run` - run controller and tickets
//! - `layout` - drag-to-resize and fullscreen
//! - `keyboard` - shortcuts and Tab indentation
//! - `backend` / `clipboard` - collaborator contracts and stock implementations
//! - `session` - the orchestrator
//! - `runtime` - tokio event loop around a session
//! - `config` - TOML settings

pub mod backend;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod keyboard;
pub mod layout;
pub mod message;
pub mod notice;
pub mod run;
pub mod runtime;
pub mod session;

pub use backend::{BackendError, ExecutionBackend, SimulatedBackend, simulate};
pub use clipboard::{Clipboard, ClipboardError, DeniedClipboard, MemoryClipboard};
pub use config::{EditorSettings, ExecutionSettings, SettingsError};
pub use document::{DocumentModel, SaveOutcome, SwitchPolicy};
pub use keyboard::{Key, KeyChord, KeyPress, Keymap, Shortcut, parse_key_chord};
pub use layout::{LayoutController, LayoutState};
pub use message::{Effect, Message};
pub use notice::{Notice, NoticeKind};
pub use run::{RunController, RunRejection, RunRequest, RunTicket};
pub use runtime::{RuntimeClosed, SessionHandle, SessionRuntime};
pub use session::{Session, SessionOptions, SessionSnapshot};
