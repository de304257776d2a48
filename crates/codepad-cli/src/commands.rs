use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use codepad_model::{Language, RunState};
use codepad_persistence::{FileStore, KeyValueStore, MemoryStore, StoreKey};
use codepad_session::keyboard::INDENT;
use codepad_session::notice::{EMPTY_SOURCE, RUN_FAILED, RUN_SUCCEEDED};
use codepad_session::{
    EditorSettings, Keymap, MemoryClipboard, Message, Notice, NoticeKind, Session, SessionHandle,
    SessionOptions, SessionRuntime, Shortcut, SimulatedBackend,
};
use codepad_cli::shell::{HELP, ShellInput, append_line, messages_for, parse_line};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cli::{RunArgs, SettingsArgs, ShellArgs, ShowArgs};

type BoxedStore = Box<dyn KeyValueStore + Send>;

/// Settings and store location shared by every command.
pub struct Environment {
    pub settings: EditorSettings,
    pub config_path: PathBuf,
    pub store_path: Option<PathBuf>,
}

impl Environment {
    /// Load settings from `config` (or the default location).
    ///
    /// A settings file that can't be read is reported and replaced by
    /// defaults; it never stops the command.
    pub fn load(config: Option<PathBuf>, store_path: Option<PathBuf>) -> Self {
        let config_path = config.unwrap_or_else(EditorSettings::config_path);
        let settings = EditorSettings::load_from(&config_path).unwrap_or_else(|error| {
            warn!("{error}, using default settings");
            EditorSettings::default()
        });
        Self {
            settings,
            config_path,
            store_path,
        }
    }

    fn open_store(&self) -> Result<FileStore> {
        let opened = match &self.store_path {
            Some(path) => FileStore::open(path),
            None => FileStore::open_default(),
        };
        opened.map_err(|error| {
            let hint = error
                .suggestion()
                .map(|hint| format!("\nhint: {hint}"))
                .unwrap_or_default();
            anyhow!("{}{hint}", error.user_message())
        })
    }

    fn options(&self, language: Language) -> Result<SessionOptions> {
        Ok(SessionOptions::from_settings(&self.settings)
            .context("load key bindings")?
            .with_language(language))
    }
}

pub fn run_languages(env: &Environment) -> Result<()> {
    let store = env.open_store()?;
    println!("{}", languages_table(&store));
    Ok(())
}

pub fn run_show(env: &Environment, args: &ShowArgs) -> Result<()> {
    println!("{}", document_text(env, args.language)?);
    Ok(())
}

pub fn run_settings(env: &Environment, args: &SettingsArgs) -> Result<()> {
    print!("{}", env.settings.to_toml()?);
    if args.init {
        let path = env.config_path.display();
        if init_settings(env)? {
            eprintln!("Wrote {path}");
        } else {
            eprintln!("{path} already exists, left unchanged");
        }
    }
    Ok(())
}

/// Write the effective settings unless a settings file already exists.
fn init_settings(env: &Environment) -> Result<bool> {
    if env.config_path.exists() {
        return Ok(false);
    }
    env.settings
        .save_to(&env.config_path)
        .with_context(|| format!("write {}", env.config_path.display()))?;
    info!("Wrote settings to {}", env.config_path.display());
    Ok(true)
}

fn languages_table<S: KeyValueStore>(store: &S) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Tag", "Language", "Saved document"]);
    apply_table_style(&mut table);
    for language in Language::ALL {
        let saved = store
            .read_string(StoreKey::Document(language))
            .filter(|text| !text.is_empty())
            .map_or_else(
                || "- (template)".to_string(),
                |text| format!("{} lines", text.lines().count()),
            );
        table.add_row(vec![
            language.tag().to_string(),
            language.label().to_string(),
            saved,
        ]);
    }
    table
}

/// Text of the document that would open for `language`.
fn document_text(env: &Environment, language: Language) -> Result<String> {
    let store = env.open_store()?;
    let session = Session::new(store, env.options(language)?);
    Ok(session.snapshot().text)
}

/// Run a document once. Returns `false` when the run settled with an error
/// or never started.
pub fn run_code(env: &Environment, args: &RunArgs) -> Result<bool> {
    let source = match &args.file {
        Some(path) => Some(
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?,
        ),
        None => None,
    };
    let store: BoxedStore = if source.is_some() {
        Box::new(MemoryStore::new())
    } else {
        Box::new(env.open_store()?)
    };

    let rt = Runtime::new().context("start async runtime")?;
    let mut running = start_session(&rt, env, store, args.language)?;
    if let Some(source) = source {
        running.handle.send(Message::Edit(source))?;
    }
    running.handle.send(Message::Run)?;

    let succeeded = match wait_for_run(&rt, &running.handle, &mut running.notices)? {
        Some(state) => print_run(&state),
        None => false,
    };
    running.finish(&rt)?;
    Ok(succeeded)
}

pub fn run_shell(env: &Environment, args: &ShellArgs) -> Result<()> {
    let language = args
        .language
        .unwrap_or(env.settings.session.default_language);
    let keymap = Keymap::from_settings(&env.settings.keymap).context("load key bindings")?;
    let rt = Runtime::new().context("start async runtime")?;
    let mut running = start_session(&rt, env, Box::new(env.open_store()?), language)?;
    let handle = running.handle.clone();

    let snapshot = handle.snapshot();
    let mut buffer = snapshot.text;
    println!(
        "codepad shell - {} ({} theme). Type :help for commands.",
        snapshot.language.label(),
        snapshot.theme
    );

    for line in io::stdin().lock().lines() {
        let line = line.context("read input")?;
        let input = match parse_line(&line) {
            Ok(input) => input,
            Err(error) => {
                eprintln!("{error}");
                continue;
            }
        };

        match &input {
            ShellInput::Quit => break,
            ShellInput::Help => println!("{HELP}"),
            ShellInput::Text(text) => {
                buffer = append_line(&buffer, text);
                handle.send(Message::Edit(buffer.clone()))?;
            }
            ShellInput::Erase => {
                buffer.clear();
                handle.send(Message::Edit(String::new()))?;
            }
            ShellInput::Tab => {
                let end = buffer.chars().count();
                handle.send(Message::InsertIndent { start: end, end })?;
                let caret = Some(end + INDENT.chars().count());
                buffer = rt.block_on(handle.wait_for(|s| s.caret == caret))?.text;
            }
            ShellInput::Show => {
                let snapshot = rt.block_on(handle.wait_for(|s| s.text == buffer))?;
                println!("--- {} ---\n{}", snapshot.language.label(), snapshot.text);
                print_run(&snapshot.run);
                println!(
                    "--- panel {}px{}{} ---",
                    snapshot.layout.panel_height,
                    if snapshot.layout.is_fullscreen { ", fullscreen" } else { "" },
                    if snapshot.degraded { ", not saving" } else { "" }
                );
            }
            ShellInput::Language(language) => {
                handle.send(Message::SelectLanguage(*language))?;
                let target = *language;
                buffer = rt.block_on(handle.wait_for(|s| s.language == target))?.text;
                println!("--- {} ---\n{}", target.label(), buffer);
            }
            other => {
                for message in messages_for(other) {
                    handle.send(message)?;
                }
                let starts_run = match other {
                    ShellInput::Run => true,
                    ShellInput::Key(press) => keymap.dispatch(press) == Some(Shortcut::Run),
                    _ => false,
                };
                if starts_run && let Some(state) = wait_for_run(&rt, &handle, &mut running.notices)? {
                    print_run(&state);
                }
            }
        }
        drain_notices(&mut running.notices);
    }

    running.finish(&rt)
}

struct RunningSession {
    handle: SessionHandle,
    notices: UnboundedReceiver<Notice>,
    task: JoinHandle<BoxedStore>,
}

impl RunningSession {
    /// Flush, stop the runtime and print whatever it had left to say.
    fn finish(mut self, rt: &Runtime) -> Result<()> {
        self.handle.shutdown()?;
        rt.block_on(self.task).context("session runtime panicked")?;
        drain_notices(&mut self.notices);
        info!("Session closed");
        Ok(())
    }
}

fn start_session(
    rt: &Runtime,
    env: &Environment,
    store: BoxedStore,
    language: Language,
) -> Result<RunningSession> {
    let session = Session::new(store, env.options(language)?);
    let backend = SimulatedBackend::from_settings(&env.settings.execution);
    let (runtime, handle, notices) = SessionRuntime::new(session, backend, MemoryClipboard::new());
    let task = rt.spawn(runtime.with_timeout(env.settings.execution.timeout()).run());
    Ok(RunningSession {
        handle,
        notices,
        task,
    })
}

/// Print notices until the run started last either settles or is rejected.
fn wait_for_run(
    rt: &Runtime,
    handle: &SessionHandle,
    notices: &mut UnboundedReceiver<Notice>,
) -> Result<Option<RunState>> {
    loop {
        let notice = rt
            .block_on(notices.recv())
            .ok_or_else(|| anyhow!("session stopped while running"))?;
        print_notice(&notice);
        match notice.message.as_str() {
            EMPTY_SOURCE => return Ok(None),
            RUN_SUCCEEDED | RUN_FAILED => return Ok(Some(handle.snapshot().run)),
            _ => {}
        }
    }
}

fn drain_notices(notices: &mut UnboundedReceiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        print_notice(&notice);
    }
}

fn print_notice(notice: &Notice) {
    let tag = match notice.kind {
        NoticeKind::Success => "ok",
        NoticeKind::Info => "..",
        NoticeKind::Warning => "warning",
        NoticeKind::Error => "error",
    };
    eprintln!("[{tag}] {}", notice.message);
}

/// Print a settled result. Returns `true` unless it holds an error.
fn print_run(state: &RunState) -> bool {
    match state {
        RunState::Settled {
            error: Some(error), ..
        } => {
            eprintln!("error: {error}");
            false
        }
        RunState::Settled {
            output: Some(output),
            ..
        } => {
            println!("{output}");
            true
        }
        RunState::Running { language, .. } => {
            eprintln!("({language} run in progress)");
            true
        }
        RunState::Settled { .. } | RunState::Idle => true,
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}
