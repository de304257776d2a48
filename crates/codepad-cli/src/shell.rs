//! Line syntax of the interactive shell.
//!
//! Plain lines are appended to the document. Lines starting with `:` are
//! commands; `::` escapes a literal leading colon.

use codepad_model::Language;
use codepad_session::{KeyPress, Message, parse_key_chord};
use thiserror::Error;

pub const HELP: &str = "\
Lines without a leading ':' are appended to the document.

  :run             run the document
  :lang <tag>      switch language (javascript, python, cpp, java)
  :theme           toggle dark/light theme
  :fullscreen      toggle fullscreen
  :resize <dy>     drag the output panel by dy pixels
  :key <chord>     press a key chord (e.g. ctrl+enter, f11)
  :tab             insert an indent at the end of the document
  :copy            copy the document
  :show            print the document and the last result
  :erase           empty the document
  :clear           clear the output
  :reset           reset run and layout state
  :help            show this help
  :quit            save and exit";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    /// Text to append as a new line.
    Text(String),
    Run,
    Language(Language),
    Theme,
    Fullscreen,
    Resize(i32),
    Key(KeyPress),
    Tab,
    Copy,
    Show,
    Erase,
    Clear,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("unknown command ':{0}' (try :help)")]
    UnknownCommand(String),

    #[error(":{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument for :{command}: {reason}")]
    InvalidArgument {
        command: &'static str,
        reason: String,
    },
}

pub fn parse_line(line: &str) -> Result<ShellInput, ShellError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(escaped) = line.strip_prefix("::") {
        return Ok(ShellInput::Text(format!(":{escaped}")));
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(ShellInput::Text(line.to_string()));
    };

    let (name, argument) = match command.trim().split_once(char::is_whitespace) {
        Some((name, rest)) => (name, Some(rest.trim())),
        None => (command.trim(), None),
    };

    match name {
        "run" | "r" => Ok(ShellInput::Run),
        "lang" | "l" => {
            let tag = argument.ok_or(ShellError::MissingArgument("lang"))?;
            tag.parse()
                .map(ShellInput::Language)
                .map_err(|error: codepad_model::ModelError| ShellError::InvalidArgument {
                    command: "lang",
                    reason: error.user_message(),
                })
        }
        "theme" => Ok(ShellInput::Theme),
        "fullscreen" | "fs" => Ok(ShellInput::Fullscreen),
        "resize" => {
            let delta = argument.ok_or(ShellError::MissingArgument("resize"))?;
            delta
                .parse()
                .map(ShellInput::Resize)
                .map_err(|_| ShellError::InvalidArgument {
                    command: "resize",
                    reason: format!("'{delta}' is not a whole number of pixels"),
                })
        }
        "key" => {
            let chord = argument.ok_or(ShellError::MissingArgument("key"))?;
            parse_key_chord(chord)
                .map(|chord| ShellInput::Key(chord.to_press()))
                .ok_or_else(|| ShellError::InvalidArgument {
                    command: "key",
                    reason: format!("'{chord}' is not a key chord"),
                })
        }
        "tab" => Ok(ShellInput::Tab),
        "copy" => Ok(ShellInput::Copy),
        "show" | "s" => Ok(ShellInput::Show),
        "erase" => Ok(ShellInput::Erase),
        "clear" => Ok(ShellInput::Clear),
        "reset" => Ok(ShellInput::Reset),
        "help" | "h" | "?" => Ok(ShellInput::Help),
        "quit" | "q" | "exit" => Ok(ShellInput::Quit),
        other => Err(ShellError::UnknownCommand(other.to_string())),
    }
}

/// Messages for inputs that map directly onto the session.
///
/// Inputs that depend on the current document (text, tab, erase) or that
/// the shell handles itself return an empty list.
pub fn messages_for(input: &ShellInput) -> Vec<Message> {
    match input {
        ShellInput::Run => vec![Message::Run],
        ShellInput::Language(language) => vec![Message::SelectLanguage(*language)],
        ShellInput::Theme => vec![Message::ToggleTheme],
        ShellInput::Fullscreen => vec![Message::ToggleFullscreen],
        ShellInput::Resize(delta) => vec![
            Message::PointerDown { y: 0 },
            Message::PointerMove { y: *delta },
            Message::PointerUp,
        ],
        ShellInput::Key(press) => vec![Message::Key(*press)],
        ShellInput::Copy => vec![Message::Copy],
        ShellInput::Clear => vec![Message::ClearOutput],
        ShellInput::Reset => vec![Message::Reset],
        ShellInput::Text(_)
        | ShellInput::Tab
        | ShellInput::Erase
        | ShellInput::Show
        | ShellInput::Help
        | ShellInput::Quit => Vec::new(),
    }
}

/// Document text after appending `line`.
pub fn append_line(text: &str, line: &str) -> String {
    if text.is_empty() || text.ends_with('\n') {
        format!("{text}{line}")
    } else {
        format!("{text}\n{line}")
    }
}
