//! Test doubles shared by the session integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use codepad_model::{ExecutionResult, Language};
use codepad_persistence::{KeyValueStore, MemoryStore, PersistenceError, StoreKey};
use codepad_session::{BackendError, ExecutionBackend};

/// Store that records every write and can be told to start failing.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    inner: Arc<Mutex<MemoryStore>>,
    writes: Arc<Mutex<Vec<(String, String)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn writes_to(&self, key: StoreKey) -> Vec<String> {
        let key = key.as_string();
        self.writes()
            .into_iter()
            .filter(|(written, _)| *written == key)
            .map(|(_, value)| value)
            .collect()
    }

    pub fn get(&self, key: StoreKey) -> Option<String> {
        self.inner.lock().unwrap().read_string(key)
    }
}

impl KeyValueStore for RecordingStore {
    fn read_string(&self, key: StoreKey) -> Option<String> {
        self.get(key)
    }

    fn write_string(&mut self, key: StoreKey, value: &str) -> codepad_persistence::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable {
                reason: "quota exceeded".to_string(),
            });
        }
        self.writes
            .lock()
            .unwrap()
            .push((key.as_string(), value.to_string()));
        self.inner.lock().unwrap().write_string(key, value)
    }
}

/// Backend that counts calls and answers after a fixed delay.
#[derive(Debug, Clone)]
pub struct CountingBackend {
    calls: Arc<AtomicUsize>,
    delay: Duration,
    answer: ExecutionResult,
}

impl CountingBackend {
    pub fn new(delay: Duration, answer: ExecutionResult) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            delay,
            answer,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExecutionBackend for CountingBackend {
    fn execute(
        &self,
        _source: String,
        _language: Language,
    ) -> impl Future<Output = Result<ExecutionResult, BackendError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay;
        let answer = self.answer.clone();
        async move {
            tokio::time::sleep(delay).await;
            Ok(answer)
        }
    }
}

/// Backend that never answers.
#[derive(Debug, Clone, Copy)]
pub struct HangingBackend;

impl ExecutionBackend for HangingBackend {
    fn execute(
        &self,
        _source: String,
        _language: Language,
    ) -> impl Future<Output = Result<ExecutionResult, BackendError>> + Send {
        std::future::pending()
    }
}

/// Backend whose transport always fails.
#[derive(Debug, Clone, Copy)]
pub struct BrokenBackend;

impl ExecutionBackend for BrokenBackend {
    fn execute(
        &self,
        _source: String,
        _language: Language,
    ) -> impl Future<Output = Result<ExecutionResult, BackendError>> + Send {
        std::future::ready(Err(BackendError::Transport("connection refused".to_string())))
    }
}
