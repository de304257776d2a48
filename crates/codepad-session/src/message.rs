//! Messages into the session and effects out of it.
//!
//! The session never performs IO itself. Everything the user does arrives
//! as a [`Message`]; everything the host must do comes back as an
//! [`Effect`].

use codepad_model::{ExecutionResult, Language};

use crate::backend::BackendError;
use crate::clipboard::ClipboardError;
use crate::keyboard::KeyPress;
use crate::notice::Notice;
use crate::run::{RunRequest, RunTicket};

#[derive(Debug, Clone)]
pub enum Message {
    /// Editor content changed.
    Edit(String),
    /// Tab pressed with the selection `[start, end)`.
    InsertIndent { start: usize, end: usize },
    SelectLanguage(Language),
    ToggleTheme,
    ToggleFullscreen,
    Run,
    RunFinished {
        ticket: RunTicket,
        result: Result<ExecutionResult, BackendError>,
    },
    Copy,
    CopyFinished(Result<(), ClipboardError>),
    /// Global key press, checked against the keymap.
    Key(KeyPress),
    PointerDown { y: i32 },
    PointerMove { y: i32 },
    PointerUp,
    ClearOutput,
    /// Time passed; fire any due saves.
    SaveTick,
    /// Write pending saves now.
    Flush,
    /// Reset run and layout state.
    Reset,
}

/// Work the host performs on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call the execution backend and report back with
    /// [`Message::RunFinished`].
    Execute(RunRequest),
    /// Copy text and report back with [`Message::CopyFinished`].
    CopyToClipboard(String),
    Notify(Notice),
}
