//! Runtime tests under paused tokio time.

mod common;

use std::time::Duration;

use codepad_model::{ExecutionResult, Language, RunState};
use codepad_persistence::StoreKey;
use codepad_session::notice::{COPY_FAILED, COPY_SUCCEEDED, RUN_FAILED, RUN_SUCCEEDED};
use codepad_session::{
    Clipboard, DeniedClipboard, ExecutionBackend, MemoryClipboard, Message, NoticeKind, Session,
    SessionHandle, SessionOptions, SessionRuntime, SimulatedBackend,
};
use common::{BrokenBackend, CountingBackend, HangingBackend, RecordingStore};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

fn start<B: ExecutionBackend, C: Clipboard>(
    store: &RecordingStore,
    backend: B,
    clipboard: C,
    timeout: Option<Duration>,
) -> (
    SessionHandle,
    mpsc::UnboundedReceiver<codepad_session::Notice>,
    JoinHandle<RecordingStore>,
) {
    let session = Session::new(store.clone(), SessionOptions::default());
    let (runtime, handle, notices) = SessionRuntime::new(session, backend, clipboard);
    let task = runtime.with_timeout(timeout).spawn();
    (handle, notices, task)
}

async fn settled(handle: &SessionHandle) -> RunState {
    handle
        .wait_for(|snapshot| matches!(snapshot.run, RunState::Settled { .. }))
        .await
        .unwrap()
        .run
}

#[tokio::test(start_paused = true)]
async fn simulated_run_settles_with_canned_output() {
    let store = RecordingStore::new();
    let (handle, mut notices, _task) = start(
        &store,
        SimulatedBackend::default(),
        MemoryClipboard::new(),
        None,
    );

    handle.send(Message::SelectLanguage(Language::Python)).unwrap();
    handle.send(Message::Run).unwrap();

    let run = settled(&handle).await;
    assert_eq!(
        run.output(),
        Some("python code executed successfully!\nHello, World!\nFibonacci(10): 55")
    );

    let running = notices.recv().await.unwrap();
    assert_eq!(running.message, "Running python code...");
    assert_eq!(running.kind, NoticeKind::Info);
    assert_eq!(notices.recv().await.unwrap().message, RUN_SUCCEEDED);
}

#[tokio::test(start_paused = true)]
async fn backend_is_called_once_per_running_period() {
    let store = RecordingStore::new();
    let backend = CountingBackend::new(Duration::from_millis(1500), ExecutionResult::success("55"));
    let (handle, _notices, _task) = start(&store, backend.clone(), MemoryClipboard::new(), None);

    for _ in 0..5 {
        handle.send(Message::Run).unwrap();
    }
    let run = settled(&handle).await;

    assert_eq!(run.output(), Some("55"));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn hanging_backend_times_out() {
    let store = RecordingStore::new();
    let (handle, mut notices, _task) = start(
        &store,
        HangingBackend,
        MemoryClipboard::new(),
        Some(Duration::from_millis(3000)),
    );

    let started = tokio::time::Instant::now();
    handle.send(Message::Run).unwrap();
    let run = settled(&handle).await;

    assert_eq!(run.error(), Some("Execution timed out after 3000 ms"));
    assert!(started.elapsed() >= Duration::from_millis(3000));

    notices.recv().await.unwrap();
    let failure = notices.recv().await.unwrap();
    assert_eq!(failure.message, RUN_FAILED);
    assert_eq!(failure.kind, NoticeKind::Error);
}

#[tokio::test(start_paused = true)]
async fn without_timeout_a_hanging_run_stays_running() {
    let store = RecordingStore::new();
    let (handle, _notices, _task) = start(&store, HangingBackend, MemoryClipboard::new(), None);

    handle.send(Message::Run).unwrap();
    tokio::time::sleep(Duration::from_secs(3600)).await;

    assert!(handle.snapshot().run.is_running());
    assert!(!handle.snapshot().can_run());
}

#[tokio::test(start_paused = true)]
async fn transport_failure_settles_with_generic_error() {
    let store = RecordingStore::new();
    let (handle, _notices, _task) = start(&store, BrokenBackend, MemoryClipboard::new(), None);

    handle.send(Message::Run).unwrap();
    assert_eq!(settled(&handle).await.error(), Some(RUN_FAILED));
}

#[tokio::test(start_paused = true)]
async fn result_arriving_after_reset_is_ignored() {
    let store = RecordingStore::new();
    let backend = CountingBackend::new(Duration::from_millis(1000), ExecutionResult::success("late"));
    let (handle, _notices, _task) = start(&store, backend.clone(), MemoryClipboard::new(), None);

    handle.send(Message::Run).unwrap();
    handle.wait_for(|snapshot| snapshot.run.is_running()).await.unwrap();
    handle.send(Message::Reset).unwrap();
    handle.wait_for(|snapshot| snapshot.run == RunState::Idle).await.unwrap();

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(handle.snapshot().run, RunState::Idle);
    assert_eq!(backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn edits_are_saved_after_the_quiet_interval() {
    let store = RecordingStore::new();
    let (handle, _notices, _task) = start(
        &store,
        SimulatedBackend::instant(),
        MemoryClipboard::new(),
        None,
    );

    for text in ["c", "co", "con", "cons"] {
        handle.send(Message::Edit(text.to_string())).unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    assert!(store.writes().is_empty());

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(
        store.writes_to(StoreKey::Document(Language::JavaScript)),
        vec!["cons".to_string()]
    );
    assert!(!handle.snapshot().has_pending_save);
}

#[tokio::test(start_paused = true)]
async fn shutdown_flushes_and_returns_the_store() {
    let store = RecordingStore::new();
    let (handle, _notices, task) = start(
        &store,
        SimulatedBackend::instant(),
        MemoryClipboard::new(),
        None,
    );

    handle.send(Message::Edit("print('bye')".to_string())).unwrap();
    handle.shutdown().unwrap();
    let store = task.await.unwrap();

    assert_eq!(
        store.get(StoreKey::Document(Language::JavaScript)).as_deref(),
        Some("print('bye')")
    );
    assert!(handle.send(Message::Run).is_err());
}

#[tokio::test(start_paused = true)]
async fn copy_reports_success_and_failure() {
    let store = RecordingStore::new();
    let clipboard = MemoryClipboard::new();
    let (handle, mut notices, _task) =
        start(&store, SimulatedBackend::instant(), clipboard.clone(), None);

    handle.send(Message::Copy).unwrap();
    assert_eq!(notices.recv().await.unwrap().message, COPY_SUCCEEDED);
    assert_eq!(
        clipboard.contents().as_deref(),
        Some(Language::JavaScript.template())
    );

    let (handle, mut notices, _task) =
        start(&store, SimulatedBackend::instant(), DeniedClipboard, None);
    handle.send(Message::Copy).unwrap();
    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.message, COPY_FAILED);
    assert_eq!(notice.kind, NoticeKind::Error);
}
