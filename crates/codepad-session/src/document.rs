//! The active document and its debounced persistence.
//!
//! Edits replace the in-memory text immediately and push back a single
//! [`SaveTimer`]. When the timer fires the current text is written, unless
//! it is blank: templates and empty buffers never reach the store.
//!
//! If a write fails, the text is kept in an in-session overlay that
//! [`DocumentModel::load`] consults before the store, so nothing the user
//! typed is lost for the rest of the session.

use std::collections::HashMap;
use std::mem;
use std::time::Instant;

use codepad_model::{Document, Language, is_blank};
use codepad_persistence::{AutoSaveConfig, KeyValueStore, PersistenceError, SaveTimer, StoreKey};
use serde::{Deserialize, Serialize};

/// What happens to a pending save when the language changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchPolicy {
    /// Write the pending text before switching.
    #[default]
    Flush,
    /// Let the pending save fire on its own timer after the switch.
    KeepTimer,
}

/// Result of one save attempt.
#[derive(Debug)]
pub enum SaveOutcome {
    /// Text was written to the store.
    Saved(Language),
    /// Text was blank, nothing was written.
    SkippedBlank(Language),
    /// The store rejected the write; the text lives on in memory.
    Failed {
        language: Language,
        error: PersistenceError,
    },
}

/// A pending save that outlived a language switch.
#[derive(Debug)]
struct ParkedSave {
    language: Language,
    text: String,
    timer: SaveTimer,
}

/// The in-memory buffer for the active language.
#[derive(Debug)]
pub struct DocumentModel {
    active: Document,
    /// Unsaved edits on the active document.
    dirty: bool,
    timer: SaveTimer,
    autosave: AutoSaveConfig,
    policy: SwitchPolicy,
    parked: Vec<ParkedSave>,
    /// Text whose write failed, by language.
    overlay: HashMap<Language, String>,
}

impl DocumentModel {
    /// Open a model with `language` active.
    pub fn open<S: KeyValueStore + ?Sized>(
        store: &S,
        language: Language,
        autosave: AutoSaveConfig,
        policy: SwitchPolicy,
    ) -> Self {
        let mut model = Self {
            active: Document::from_template(language),
            dirty: false,
            timer: SaveTimer::new(),
            autosave,
            policy,
            parked: Vec::new(),
            overlay: HashMap::new(),
        };
        model.active = model.load(store, language);
        model
    }

    /// The document that would become active for `language`.
    ///
    /// Unsaved in-session text wins over the store, which wins over the
    /// template. An empty stored value counts as absent.
    pub fn load<S: KeyValueStore + ?Sized>(&self, store: &S, language: Language) -> Document {
        if let Some(text) = self.overlay.get(&language) {
            return Document::new(language, text.clone());
        }
        match store.read_string(StoreKey::Document(language)) {
            Some(text) if !text.is_empty() => Document::new(language, text),
            _ => Document::from_template(language),
        }
    }

    #[inline]
    pub fn active(&self) -> &Document {
        &self.active
    }

    #[inline]
    pub fn language(&self) -> Language {
        self.active.language
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.active.text
    }

    /// Check whether any save (active or parked) is still pending.
    pub fn has_pending_save(&self) -> bool {
        self.dirty || !self.parked.is_empty()
    }

    /// Check whether some text exists only in memory after a failed write.
    pub fn has_unsaved_overlay(&self) -> bool {
        !self.overlay.is_empty()
    }

    /// Replace the active text and restart the quiet interval.
    pub fn edit(&mut self, text: impl Into<String>, now: Instant) {
        self.active.text = text.into();
        self.dirty = true;
        if self.autosave.enabled {
            self.timer.arm(now, self.autosave.debounce());
        }
    }

    /// Earliest moment a pending save is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.parked
            .iter()
            .filter_map(|parked| parked.timer.deadline())
            .chain(self.timer.deadline())
            .min()
    }

    /// Fire every save whose timer has elapsed.
    pub fn poll_saves<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        now: Instant,
    ) -> Vec<SaveOutcome> {
        let mut outcomes = Vec::new();

        let (due, waiting): (Vec<_>, Vec<_>) = mem::take(&mut self.parked)
            .into_iter()
            .partition(|parked| parked.timer.is_due(now));
        self.parked = waiting;
        for parked in due {
            outcomes.push(persist(store, &mut self.overlay, parked.language, &parked.text));
        }

        if self.timer.fire(now) {
            outcomes.push(self.save_active(store));
        }

        outcomes
    }

    /// Write the active document now if it has unsaved edits.
    pub fn flush<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> Option<SaveOutcome> {
        if !self.dirty {
            return None;
        }
        self.timer.cancel();
        Some(self.save_active(store))
    }

    /// Write every pending save now, parked ones included.
    ///
    /// Text held in memory after an earlier failed write is retried first,
    /// so newer parked or active text still wins for the same language.
    pub fn flush_all<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> Vec<SaveOutcome> {
        let mut outcomes: Vec<SaveOutcome> = Vec::new();
        for (language, text) in mem::take(&mut self.overlay) {
            outcomes.push(persist(store, &mut self.overlay, language, &text));
        }
        for parked in mem::take(&mut self.parked) {
            outcomes.push(persist(store, &mut self.overlay, parked.language, &parked.text));
        }
        outcomes.extend(self.flush(store));
        outcomes
    }

    /// Make `language` the active document.
    ///
    /// The previous document's pending save is resolved per the
    /// [`SwitchPolicy`] before the new text is loaded. Switching to the
    /// active language does nothing.
    pub fn switch_to<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        language: Language,
    ) -> Vec<SaveOutcome> {
        if language == self.active.language {
            return Vec::new();
        }

        let mut outcomes = Vec::new();
        match self.policy {
            SwitchPolicy::Flush => outcomes.extend(self.flush(store)),
            SwitchPolicy::KeepTimer if self.dirty => {
                self.parked.push(ParkedSave {
                    language: self.active.language,
                    text: self.active.text.clone(),
                    timer: mem::take(&mut self.timer),
                });
                self.dirty = false;
            }
            SwitchPolicy::KeepTimer => {}
        }

        let resumed = self
            .parked
            .iter()
            .position(|parked| parked.language == language)
            .map(|index| self.parked.remove(index));

        match resumed {
            Some(parked) => {
                tracing::debug!("Resuming parked save for {}", language);
                self.active = Document::new(language, parked.text);
                self.timer = parked.timer;
                self.dirty = true;
            }
            None => {
                self.active = self.load(store, language);
                self.timer = SaveTimer::new();
                self.dirty = false;
            }
        }

        outcomes
    }

    fn save_active<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> SaveOutcome {
        self.dirty = false;
        persist(store, &mut self.overlay, self.active.language, &self.active.text)
    }
}

fn persist<S: KeyValueStore + ?Sized>(
    store: &mut S,
    overlay: &mut HashMap<Language, String>,
    language: Language,
    text: &str,
) -> SaveOutcome {
    if is_blank(text) {
        tracing::debug!("Skipping save of blank {} document", language);
        return SaveOutcome::SkippedBlank(language);
    }

    match store.write_string(StoreKey::Document(language), text) {
        Ok(()) => {
            overlay.remove(&language);
            tracing::debug!("Saved {} document ({} bytes)", language, text.len());
            SaveOutcome::Saved(language)
        }
        Err(error) => {
            overlay.insert(language, text.to_string());
            tracing::warn!("Could not save {} document: {}", language, error);
            SaveOutcome::Failed { language, error }
        }
    }
}
