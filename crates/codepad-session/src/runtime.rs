//! Tokio driver for a [`Session`].
//!
//! One task owns the session and handles messages strictly in arrival
//! order. Backend and clipboard calls run as spawned tasks that post their
//! results back as ordinary messages, and the next save deadline is just
//! another branch of the select loop. A fresh [`SessionSnapshot`] is
//! published after every message, before any notice it produced is sent.

use std::sync::Arc;
use std::time::{Duration, Instant};

use codepad_persistence::KeyValueStore;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::backend::{BackendError, ExecutionBackend};
use crate::clipboard::Clipboard;
use crate::config::ExecutionSettings;
use crate::message::{Effect, Message};
use crate::notice::Notice;
use crate::run::RunRequest;
use crate::session::{Session, SessionSnapshot};

/// The runtime is gone; nothing sent will be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session runtime has shut down")]
pub struct RuntimeClosed;

#[derive(Debug)]
enum Command {
    Message(Message),
    Shutdown,
}

/// Cloneable handle for talking to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Queue a message.
    pub fn send(&self, message: Message) -> Result<(), RuntimeClosed> {
        self.commands
            .send(Command::Message(message))
            .map_err(|_| RuntimeClosed)
    }

    /// Ask the runtime to flush and stop. Messages queued before this are
    /// still handled.
    pub fn shutdown(&self) -> Result<(), RuntimeClosed> {
        self.commands.send(Command::Shutdown).map_err(|_| RuntimeClosed)
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until a snapshot satisfies `condition`.
    pub async fn wait_for(
        &self,
        condition: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot, RuntimeClosed> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots.wait_for(condition).await.map_err(|_| RuntimeClosed)?;
        Ok(snapshot.clone())
    }
}

pub struct SessionRuntime<S, B, C>
where
    S: KeyValueStore,
{
    session: Session<S>,
    backend: Arc<B>,
    clipboard: Arc<C>,
    timeout: Option<Duration>,
    inbox: mpsc::UnboundedReceiver<Command>,
    results_tx: mpsc::UnboundedSender<Message>,
    results_rx: mpsc::UnboundedReceiver<Message>,
    snapshots: watch::Sender<SessionSnapshot>,
    notices: mpsc::UnboundedSender<Notice>,
}

impl<S, B, C> SessionRuntime<S, B, C>
where
    S: KeyValueStore + Send + 'static,
    B: ExecutionBackend,
    C: Clipboard,
{
    /// Wrap `session`. Returns the runtime, a handle, and the stream of
    /// notices for the host to display.
    pub fn new(
        session: Session<S>,
        backend: B,
        clipboard: C,
    ) -> (Self, SessionHandle, mpsc::UnboundedReceiver<Notice>) {
        let (commands, inbox) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let (notices, notice_rx) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(session.snapshot());

        let runtime = Self {
            session,
            backend: Arc::new(backend),
            clipboard: Arc::new(clipboard),
            timeout: ExecutionSettings::default().timeout(),
            inbox,
            results_tx,
            results_rx,
            snapshots,
            notices,
        };
        let handle = SessionHandle {
            commands,
            snapshots: snapshot_rx,
        };
        (runtime, handle, notice_rx)
    }

    /// Give up on a backend call after `timeout`. `None` waits forever.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run on a new task. The task yields the store once shut down.
    pub fn spawn(self) -> JoinHandle<S> {
        tokio::spawn(self.run())
    }

    /// Process messages until shutdown or until every handle is dropped.
    pub async fn run(mut self) -> S {
        tracing::debug!("Session runtime started");
        loop {
            let deadline = self.session.next_deadline();
            tokio::select! {
                command = self.inbox.recv() => match command {
                    Some(Command::Message(message)) => self.dispatch(message),
                    Some(Command::Shutdown) | None => break,
                },
                Some(message) = self.results_rx.recv() => self.dispatch(message),
                () = sleep_until(deadline) => self.dispatch(Message::SaveTick),
            }
        }

        let effects = self.session.shutdown();
        self.publish();
        self.perform(effects);
        tracing::debug!("Session runtime stopped");
        self.session.into_store()
    }

    fn dispatch(&mut self, message: Message) {
        let now = tokio::time::Instant::now().into_std();
        let effects = self.session.update(message, now);
        self.publish();
        self.perform(effects);
    }

    fn perform(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Execute(request) => self.spawn_execution(request),
                Effect::CopyToClipboard(text) => self.spawn_copy(text),
                Effect::Notify(notice) => {
                    if self.notices.send(notice).is_err() {
                        tracing::trace!("Notice dropped, nobody is listening");
                    }
                }
            }
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.snapshot());
    }

    fn spawn_execution(&self, request: RunRequest) {
        let backend = Arc::clone(&self.backend);
        let results = self.results_tx.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let RunRequest {
                ticket,
                source,
                language,
            } = request;
            let call = backend.execute(source, language);
            let result = match timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::warn!("Run {} timed out after {} ms", ticket, limit.as_millis());
                        Err(BackendError::TimedOut(limit))
                    }
                },
                None => call.await,
            };
            if results.send(Message::RunFinished { ticket, result }).is_err() {
                tracing::debug!("Run {} finished after the runtime stopped", ticket);
            }
        });
    }

    fn spawn_copy(&self, text: String) {
        let clipboard = Arc::clone(&self.clipboard);
        let results = self.results_tx.clone();

        tokio::spawn(async move {
            let result = clipboard.copy(text).await;
            if results.send(Message::CopyFinished(result)).is_err() {
                tracing::debug!("Copy finished after the runtime stopped");
            }
        });
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
