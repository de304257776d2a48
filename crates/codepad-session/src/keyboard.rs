//! Keyboard shortcuts and Tab indentation.
//!
//! Chord strings like `ctrl+enter` or `cmd+enter` come from settings and
//! are matched against key presses at runtime. Only the configured chords
//! are intercepted; every other key belongs to the text editor.

use crate::config::{KeymapSettings, SettingsError};

/// Spaces inserted by Tab.
pub const INDENT: &str = "  ";

/// A physical key, as far as shortcuts care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Escape,
    Function(u8),
    Char(char),
}

/// A key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyPress {
    /// Press with no modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyChord {
    /// The press this chord describes, with exactly its modifiers held.
    pub fn to_press(&self) -> KeyPress {
        KeyPress {
            key: self.key,
            ctrl: self.ctrl,
            alt: self.alt,
            shift: self.shift,
            meta: self.meta,
        }
    }

    /// A press matches when the key is the same and every modifier the
    /// chord names is held. Extra modifiers are allowed.
    pub fn matches(&self, press: &KeyPress) -> bool {
        self.key == press.key
            && (!self.ctrl || press.ctrl)
            && (!self.alt || press.alt)
            && (!self.shift || press.shift)
            && (!self.meta || press.meta)
    }
}

pub fn parse_key_chord(input: &str) -> Option<KeyChord> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }

    let mut chord = KeyChord {
        key: Key::Escape,
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };
    let mut key = None;

    for part in trimmed.split('+').map(str::trim).filter(|part| !part.is_empty()) {
        match part {
            "ctrl" | "control" => chord.ctrl = true,
            "alt" | "option" => chord.alt = true,
            "shift" => chord.shift = true,
            "meta" | "cmd" | "super" => chord.meta = true,
            other => {
                if key.is_some() {
                    return None;
                }
                key = Some(parse_key(other)?);
            }
        }
    }

    chord.key = key?;
    Some(chord)
}

fn parse_key(input: &str) -> Option<Key> {
    match input {
        "enter" | "return" => return Some(Key::Enter),
        "tab" => return Some(Key::Tab),
        "esc" | "escape" => return Some(Key::Escape),
        _ => {}
    }
    if let Some(number) = input.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=24).contains(&number).then_some(Key::Function(number));
    }
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(Key::Char(ch)),
        _ => None,
    }
}

/// What a global shortcut asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Run,
    ToggleFullscreen,
}

#[derive(Debug, Clone)]
pub struct Keymap {
    run: Vec<KeyChord>,
    fullscreen: Vec<KeyChord>,
}

impl Default for Keymap {
    /// The bindings of [`KeymapSettings::default`].
    fn default() -> Self {
        Self::from_settings(&KeymapSettings::default()).expect("default key bindings parse")
    }
}

impl Keymap {
    pub fn from_settings(settings: &KeymapSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            run: parse_all(&settings.run)?,
            fullscreen: parse_all(&settings.fullscreen)?,
        })
    }

    /// The shortcut bound to `press`, if any.
    pub fn dispatch(&self, press: &KeyPress) -> Option<Shortcut> {
        if self.run.iter().any(|chord| chord.matches(press)) {
            Some(Shortcut::Run)
        } else if self.fullscreen.iter().any(|chord| chord.matches(press)) {
            Some(Shortcut::ToggleFullscreen)
        } else {
            None
        }
    }
}

fn parse_all(chords: &[String]) -> Result<Vec<KeyChord>, SettingsError> {
    chords
        .iter()
        .map(|raw| parse_key_chord(raw).ok_or_else(|| SettingsError::InvalidKeyChord(raw.clone())))
        .collect()
}

/// Text and caret after pressing Tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentEdit {
    pub text: String,
    pub caret: usize,
}

/// Replace the selection `[start, end)` with [`INDENT`].
///
/// Positions are character indices and are clamped to the text. The caret
/// lands right after the inserted spaces.
pub fn insert_indent(text: &str, start: usize, end: usize) -> IndentEdit {
    let len = text.chars().count();
    let start = start.min(len);
    let end = end.clamp(start, len);

    let byte_at = |index: usize| {
        text.char_indices()
            .nth(index)
            .map_or(text.len(), |(byte, _)| byte)
    };
    let (head, tail) = (&text[..byte_at(start)], &text[byte_at(end)..]);

    IndentEdit {
        text: format!("{head}{INDENT}{tail}"),
        caret: start + INDENT.chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chords() {
        let chord = parse_key_chord("Ctrl+Enter").unwrap();
        assert_eq!(chord.key, Key::Enter);
        assert!(chord.ctrl && !chord.meta);

        assert_eq!(parse_key_chord("f11").unwrap().key, Key::Function(11));
        assert_eq!(parse_key_chord("cmd+k").unwrap().key, Key::Char('k'));
        assert!(parse_key_chord("").is_none());
        assert!(parse_key_chord("ctrl").is_none());
        assert!(parse_key_chord("ctrl+a+b").is_none());
        assert!(parse_key_chord("f99").is_none());
    }

    #[test]
    fn chord_press_matches_its_chord() {
        let chord = parse_key_chord("ctrl+shift+f").unwrap();
        assert!(chord.matches(&chord.to_press()));
        assert!(!chord.matches(&KeyPress::new(Key::Char('f')).with_ctrl()));
    }

    #[test]
    fn ctrl_or_cmd_enter_runs() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.dispatch(&KeyPress::new(Key::Enter).with_ctrl()),
            Some(Shortcut::Run)
        );
        assert_eq!(
            keymap.dispatch(&KeyPress::new(Key::Enter).with_meta()),
            Some(Shortcut::Run)
        );
        assert_eq!(
            keymap.dispatch(&KeyPress::new(Key::Enter).with_ctrl().with_shift()),
            Some(Shortcut::Run)
        );
    }

    #[test]
    fn f11_toggles_fullscreen() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.dispatch(&KeyPress::new(Key::Function(11))),
            Some(Shortcut::ToggleFullscreen)
        );
    }

    #[test]
    fn plain_keys_pass_through() {
        let keymap = Keymap::default();
        assert_eq!(keymap.dispatch(&KeyPress::new(Key::Enter)), None);
        assert_eq!(keymap.dispatch(&KeyPress::new(Key::Tab)), None);
        assert_eq!(keymap.dispatch(&KeyPress::new(Key::Char('c')).with_ctrl()), None);
    }

    #[test]
    fn invalid_binding_is_reported() {
        let settings = KeymapSettings {
            run: vec!["ctrl+".to_string()],
            fullscreen: vec![],
        };
        assert!(matches!(
            Keymap::from_settings(&settings),
            Err(SettingsError::InvalidKeyChord(raw)) if raw == "ctrl+"
        ));
    }

    #[test]
    fn tab_inserts_two_spaces_at_caret() {
        assert_eq!(
            insert_indent("ab", 1, 1),
            IndentEdit {
                text: "a  b".to_string(),
                caret: 3
            }
        );
        assert_eq!(insert_indent("abcde", 5, 5).text, "abcde  ");
    }

    #[test]
    fn tab_replaces_selection() {
        let edit = insert_indent("let x = 1;", 4, 5);
        assert_eq!(edit.text, "let    = 1;");
        assert_eq!(edit.caret, 6);
    }

    #[test]
    fn tab_counts_characters_not_bytes() {
        let edit = insert_indent("héllo", 2, 2);
        assert_eq!(edit.text, "hé  llo");
        assert_eq!(edit.caret, 4);
    }

    #[test]
    fn tab_clamps_out_of_range_positions() {
        let edit = insert_indent("ab", 10, 3);
        assert_eq!(edit.text, "ab  ");
        assert_eq!(edit.caret, 4);
    }
}
