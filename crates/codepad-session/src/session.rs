//! The session orchestrator.
//!
//! [`Session`] owns the store and every controller, and turns each
//! [`Message`] into state changes plus a list of [`Effect`]s. It is fully
//! synchronous: time comes in as an argument and IO goes out as effects,
//! so the whole editor can be driven from a plain test.
//!
//! # Persistence failures
//!
//! A failed write never stops the session. The text stays in memory (see
//! [`DocumentModel`]), the session is flagged as degraded, and one warning
//! notice is emitted when that flag turns on. It turns off again once every
//! pending document and the theme have been written.

use std::time::Instant;

use codepad_model::{Language, RunState, Theme};
use codepad_persistence::{AutoSaveConfig, KeyValueStore, StoreKey};
use serde::Serialize;

use crate::config::{EditorSettings, SettingsError};
use crate::document::{DocumentModel, SaveOutcome, SwitchPolicy};
use crate::keyboard::{Keymap, Shortcut, insert_indent};
use crate::layout::{DEFAULT_PANEL_HEIGHT, LayoutController, LayoutState};
use crate::message::{Effect, Message};
use crate::notice::{
    COPY_FAILED, COPY_SUCCEEDED, EMPTY_SOURCE, Notice, RUN_FAILED, RUN_SUCCEEDED, STORE_DEGRADED,
};
use crate::run::{RunController, RunRejection};

/// How a session starts out.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub language: Language,
    pub autosave: AutoSaveConfig,
    pub switch_policy: SwitchPolicy,
    pub initial_height: u32,
    pub keymap: Keymap,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            autosave: AutoSaveConfig::default(),
            switch_policy: SwitchPolicy::default(),
            initial_height: DEFAULT_PANEL_HEIGHT,
            keymap: Keymap::default(),
        }
    }
}

impl SessionOptions {
    /// Options from user settings. Fails only on an unparseable key binding.
    pub fn from_settings(settings: &EditorSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            language: settings.session.default_language,
            autosave: settings.autosave.clone(),
            switch_policy: settings.session.switch_policy,
            initial_height: settings.layout.initial_height,
            keymap: Keymap::from_settings(&settings.keymap)?,
        })
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub fn with_switch_policy(mut self, policy: SwitchPolicy) -> Self {
        self.switch_policy = policy;
        self
    }
}

/// Everything a host needs to render the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub language: Language,
    pub text: String,
    /// Caret position requested by the last edit (set by Tab indentation).
    pub caret: Option<usize>,
    pub theme: Theme,
    pub run: RunState,
    pub layout: LayoutState,
    /// Some edit is waiting to be saved.
    pub has_pending_save: bool,
    /// Writes are failing; edits are only kept for this session.
    pub degraded: bool,
}

impl SessionSnapshot {
    /// The run button is disabled while a run is in flight.
    pub fn can_run(&self) -> bool {
        !self.run.is_running()
    }
}

pub struct Session<S: KeyValueStore> {
    store: S,
    document: DocumentModel,
    run: RunController,
    layout: LayoutController,
    keymap: Keymap,
    theme: Theme,
    theme_unsaved: bool,
    degraded: bool,
    caret: Option<usize>,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session on `store`.
    ///
    /// The theme is read once here; an unrecognized stored value falls back
    /// to the default.
    pub fn new(store: S, options: SessionOptions) -> Self {
        let theme = match store.read_string(StoreKey::Theme) {
            Some(raw) => raw.parse().unwrap_or_else(|error| {
                tracing::warn!("Ignoring stored theme: {}", error);
                Theme::default()
            }),
            None => Theme::default(),
        };
        let document = DocumentModel::open(
            &store,
            options.language,
            options.autosave,
            options.switch_policy,
        );

        tracing::debug!(
            "Session started ({}, {}, {:?})",
            options.language,
            theme,
            options.switch_policy
        );

        Self {
            store,
            document,
            run: RunController::new(),
            layout: LayoutController::new(options.initial_height),
            keymap: options.keymap,
            theme,
            theme_unsaved: false,
            degraded: false,
            caret: None,
        }
    }

    #[inline]
    pub fn document(&self) -> &DocumentModel {
        &self.document
    }

    #[inline]
    pub fn run_state(&self) -> &RunState {
        self.run.state()
    }

    #[inline]
    pub fn layout(&self) -> &LayoutController {
        &self.layout
    }

    #[inline]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// When the next [`Message::SaveTick`] has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.document.next_deadline()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            language: self.document.language(),
            text: self.document.text().to_string(),
            caret: self.caret,
            theme: self.theme,
            run: self.run.state().clone(),
            layout: self.layout.snapshot(),
            has_pending_save: self.document.has_pending_save(),
            degraded: self.degraded,
        }
    }

    /// Apply one message.
    pub fn update(&mut self, message: Message, now: Instant) -> Vec<Effect> {
        match message {
            Message::Edit(text) => {
                self.document.edit(text, now);
                self.caret = None;
                Vec::new()
            }
            Message::InsertIndent { start, end } => {
                let edit = insert_indent(self.document.text(), start, end);
                self.document.edit(edit.text, now);
                self.caret = Some(edit.caret);
                Vec::new()
            }
            Message::SelectLanguage(language) => {
                let outcomes = self.document.switch_to(&mut self.store, language);
                self.caret = None;
                self.record_saves(&outcomes)
            }
            Message::ToggleTheme => self.toggle_theme(),
            Message::ToggleFullscreen => {
                let fullscreen = self.layout.toggle_fullscreen();
                tracing::debug!("Fullscreen {}", if fullscreen { "on" } else { "off" });
                Vec::new()
            }
            Message::Run => self.start_run(),
            Message::RunFinished { ticket, result } => {
                let transport_failed = result.is_err();
                if !self.run.settle(ticket, result) {
                    return Vec::new();
                }
                let notice = if transport_failed {
                    Notice::error(RUN_FAILED)
                } else {
                    Notice::success(RUN_SUCCEEDED)
                };
                vec![Effect::Notify(notice)]
            }
            Message::Copy => vec![Effect::CopyToClipboard(self.document.text().to_string())],
            Message::CopyFinished(Ok(())) => vec![Effect::Notify(Notice::success(COPY_SUCCEEDED))],
            Message::CopyFinished(Err(error)) => {
                tracing::warn!("Copy failed: {}", error);
                vec![Effect::Notify(Notice::error(COPY_FAILED))]
            }
            Message::Key(press) => match self.keymap.dispatch(&press) {
                Some(Shortcut::Run) => self.update(Message::Run, now),
                Some(Shortcut::ToggleFullscreen) => self.update(Message::ToggleFullscreen, now),
                None => Vec::new(),
            },
            Message::PointerDown { y } => {
                self.layout.pointer_down(y);
                Vec::new()
            }
            Message::PointerMove { y } => {
                self.layout.pointer_move(y);
                Vec::new()
            }
            Message::PointerUp => {
                self.layout.pointer_up();
                Vec::new()
            }
            Message::ClearOutput => {
                self.run.clear();
                Vec::new()
            }
            Message::SaveTick => {
                let outcomes = self.document.poll_saves(&mut self.store, now);
                self.record_saves(&outcomes)
            }
            Message::Flush => {
                let outcomes = self.document.flush_all(&mut self.store);
                self.record_saves(&outcomes)
            }
            Message::Reset => {
                self.run.reset();
                self.layout.reset();
                self.caret = None;
                tracing::debug!("Session reset");
                Vec::new()
            }
        }
    }

    /// Write everything still pending. Call before dropping the session.
    pub fn shutdown(&mut self) -> Vec<Effect> {
        let outcomes = self.document.flush_all(&mut self.store);
        if self.theme_unsaved {
            self.write_theme();
        }
        self.record_saves(&outcomes)
    }

    /// Give the store back, e.g. to inspect it after a test.
    pub fn into_store(self) -> S {
        self.store
    }

    fn start_run(&mut self) -> Vec<Effect> {
        match self.run.submit(self.document.text(), self.document.language()) {
            Ok(request) => {
                let notice = Notice::info(format!("Running {} code...", request.language.tag()));
                vec![Effect::Notify(notice), Effect::Execute(request)]
            }
            Err(RunRejection::EmptySource) => vec![Effect::Notify(Notice::error(EMPTY_SOURCE))],
            Err(RunRejection::AlreadyRunning) => {
                tracing::debug!("Run ignored, one is already in flight");
                Vec::new()
            }
        }
    }

    fn toggle_theme(&mut self) -> Vec<Effect> {
        self.theme = self.theme.toggled();
        self.write_theme();
        self.refresh_degraded()
    }

    fn write_theme(&mut self) {
        match self.store.write_string(StoreKey::Theme, self.theme.as_str()) {
            Ok(()) => self.theme_unsaved = false,
            Err(error) => {
                tracing::warn!("Could not save theme: {}", error);
                self.theme_unsaved = true;
            }
        }
    }

    fn record_saves(&mut self, outcomes: &[SaveOutcome]) -> Vec<Effect> {
        for outcome in outcomes {
            if let SaveOutcome::Saved(language) = outcome {
                tracing::info!("Saved {} document", language);
            }
        }
        self.refresh_degraded()
    }

    fn refresh_degraded(&mut self) -> Vec<Effect> {
        let degraded = self.document.has_unsaved_overlay() || self.theme_unsaved;
        let was_degraded = std::mem::replace(&mut self.degraded, degraded);
        match (was_degraded, degraded) {
            (false, true) => {
                tracing::warn!("Store unavailable, keeping changes in memory");
                vec![Effect::Notify(Notice::warning(STORE_DEGRADED))]
            }
            (true, false) => {
                tracing::info!("Store recovered");
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}
