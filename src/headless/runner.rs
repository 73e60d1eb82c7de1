//! Headless mode runner - main event loop driven by stdin
//!
//! Commands arrive one per line:
//!
//! | command       | effect                                       |
//! |---------------|----------------------------------------------|
//! | `add`         | open (or refocus) the creation form          |
//! | `type <text>` | append text to the focused form              |
//! | `clear`       | empty the focused form                       |
//! | `submit`      | submit the focused form                      |
//! | `cancel`      | cancel the focused form                      |
//! | `edit <id>`   | open the edit form of a comment              |
//! | `delete <id>` | ask to delete a comment                      |
//! | `y` / `n`     | answer the open confirmation                 |
//! | `ok`          | acknowledge the alert                        |
//! | `show`        | print the whole thread                       |
//! | `quit`        | exit once requests in flight have settled    |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use url::Url;

use threadline_app::config::{self, Settings};
use threadline_app::input_key::InputKey;
use threadline_app::state::{AppState, UiMode};
use threadline_app::{Engine, EngineEvent, Message};
use threadline_core::prelude::*;
use threadline_core::CommentId;
use threadline_remote::{AntiForgery, CommentService, HttpCommentService};

use super::HeadlessEvent;

/// Environment variable holding the anti-forgery token
pub const ANTI_FORGERY_TOKEN_ENV: &str = "THREADLINE_CSRF_TOKEN";

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub seed: Option<PathBuf>,
    pub fragment: Option<String>,
}

/// One parsed stdin line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinCommand {
    Add,
    Type(String),
    Clear,
    Submit,
    Cancel,
    Edit(CommentId),
    Delete(CommentId),
    Yes,
    No,
    Acknowledge,
    Show,
    Quit,
}

impl StdinCommand {
    /// Parse a line. `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };

        let command = match word {
            "add" | "a" => Self::Add,
            // Text keeps its inner spacing; only the separator is dropped
            "type" => {
                let text = line.trim_start().get(word.len() + 1..).unwrap_or_default();
                Self::Type(text.to_string())
            }
            "clear" => Self::Clear,
            "submit" | "s" => Self::Submit,
            "cancel" => Self::Cancel,
            "edit" => Self::Edit(parse_id(rest)?),
            "delete" => Self::Delete(parse_id(rest)?),
            "y" | "yes" => Self::Yes,
            "n" | "no" => Self::No,
            "ok" => Self::Acknowledge,
            "show" => Self::Show,
            "q" | "quit" => Self::Quit,
            _ => return Err(format!("Unknown command: {}", trimmed)),
        };
        Ok(Some(command))
    }
}

fn parse_id(arg: &str) -> std::result::Result<CommentId, String> {
    arg.trim()
        .trim_start_matches('#')
        .parse::<u64>()
        .map(CommentId)
        .map_err(|_| format!("Expected a comment id, got {:?}", arg.trim()))
}

/// Translate a command into the message it stands for in the current state
pub fn command_message(state: &AppState, command: &StdinCommand) -> Option<Message> {
    let focused = state.presenter.focused_slot();
    match command {
        StdinCommand::Add => Some(Message::OpenAddForm),
        StdinCommand::Type(text) => {
            let slot = focused?;
            let mut body = state.presenter.form(slot)?.body().to_string();
            body.push_str(text);
            Some(Message::FormInput { slot, body })
        }
        StdinCommand::Clear => Some(Message::Key(InputKey::CharCtrl('u'))),
        StdinCommand::Submit => Some(Message::Key(InputKey::CharCtrl('s'))),
        StdinCommand::Cancel => Some(Message::Key(InputKey::Esc)),
        StdinCommand::Edit(id) => Some(Message::EditComment { id: *id }),
        StdinCommand::Delete(id) => Some(Message::DeleteComment { id: *id }),
        StdinCommand::Yes | StdinCommand::No => {
            if state.ui_mode != UiMode::ConfirmDialog {
                return None;
            }
            let dialog = state.confirm_dialog_state.as_ref()?;
            if *command == StdinCommand::Yes {
                dialog.confirm()
            } else {
                dialog.decline()
            }
        }
        StdinCommand::Acknowledge => {
            (state.ui_mode == UiMode::Alert).then_some(Message::DismissAlert)
        }
        StdinCommand::Show => None,
        StdinCommand::Quit => Some(Message::Quit),
    }
}

/// Run in headless mode
pub async fn run_headless(project_path: &Path, overrides: Overrides) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("threadline starting in HEADLESS mode");
    info!("Project: {}", project_path.display());
    info!("═══════════════════════════════════════════════════════");

    if let Err(e) = config::init_threadline_directory(project_path) {
        warn!("Failed to initialize .threadline directory: {}", e);
    }
    let settings = apply_overrides(config::load_settings(project_path), &overrides);

    let thread = match load_thread(project_path, &settings, &overrides) {
        Ok(thread) => thread,
        Err(e) => {
            HeadlessEvent::error(e.to_string(), true).emit();
            return Err(e);
        }
    };

    let anti_forgery = std::env::var(ANTI_FORGERY_TOKEN_ENV)
        .ok()
        .map(|token| AntiForgery::new(settings.remote.anti_forgery_header.clone(), token));
    if anti_forgery.is_none() {
        warn!(
            "{} not set; requests carry no anti-forgery header",
            ANTI_FORGERY_TOKEN_ENV
        );
    }
    let service = Arc::new(HttpCommentService::new(
        settings.remote.timeout(),
        anti_forgery,
    )?);

    let mut engine = Engine::new(thread, settings, service);
    HeadlessEvent::ready(engine.state.thread.len()).emit();
    HeadlessEvent::view(engine.view()).emit();

    // Spawn headless-specific stdin reader
    let (cmd_tx, cmd_rx) = mpsc::channel::<StdinCommand>(64);
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(cmd_tx);
    });

    let result = headless_event_loop(&mut engine, cmd_rx).await;

    let mut events = engine.subscribe();
    let settled = engine.settle().await;
    if settled > 0 {
        info!("Applied {} completions before exit", settled);
    }
    engine.shutdown().await;
    forward_events(&mut events);

    info!("threadline headless mode exiting");
    result
}

fn apply_overrides(mut settings: Settings, overrides: &Overrides) -> Settings {
    if let Some(base_url) = &overrides.base_url {
        settings.remote.base_url = base_url.clone();
    }
    if let Some(fragment) = &overrides.fragment {
        settings.thread.fragment = Some(fragment.clone());
    }
    settings
}

fn load_thread(
    project_path: &Path,
    settings: &Settings,
    overrides: &Overrides,
) -> Result<threadline_core::Thread> {
    let seed_path = config::resolve_seed_path(project_path, settings, overrides.seed.as_deref())
        .ok_or_else(|| Error::config("No thread seed given; pass --seed or set thread.seed"))?;
    let base = Url::parse(&settings.remote.base_url).context("Invalid remote.base_url")?;
    config::load_seed(&seed_path)
        .with_context(|| format!("Failed to load thread seed {}", seed_path.display()))?
        .into_thread(&base)
}

/// Main headless event loop
async fn headless_event_loop<S>(
    engine: &mut Engine<S>,
    mut cmd_rx: mpsc::Receiver<StdinCommand>,
) -> Result<()>
where
    S: CommentService + Send + Sync + 'static,
{
    let mut events = engine.subscribe();
    let mut stdin_open = true;

    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        // Input is gone; finish what was started, then stop
        if !stdin_open && engine.in_flight() == 0 {
            engine.drain_pending_messages();
            forward_events(&mut events);
            info!("Stdin closed and no requests in flight");
            break;
        }

        tokio::select! {
            msg = engine.msg_rx.recv() => match msg {
                Some(msg) => engine.process_message(msg),
                None => {
                    info!("Message channel closed");
                    break;
                }
            },
            cmd = cmd_rx.recv(), if stdin_open => match cmd {
                Some(StdinCommand::Show) => HeadlessEvent::view(engine.view()).emit(),
                Some(cmd) => {
                    if let Some(msg) = command_message(&engine.state, &cmd) {
                        engine.process_message(msg);
                    }
                }
                None => stdin_open = false,
            },
        }

        forward_events(&mut events);
    }

    Ok(())
}

/// Write every pending engine event to stdout
fn forward_events(events: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => HeadlessEvent::from_engine_event(&event).emit(),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Skipped {} engine events", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Read commands from stdin until EOF or `quit` (blocking version)
fn spawn_stdin_reader_blocking(cmd_tx: mpsc::Sender<StdinCommand>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        match line {
            Ok(line) => match StdinCommand::parse(&line) {
                Ok(Some(command)) => {
                    let quit = command == StdinCommand::Quit;
                    if cmd_tx.blocking_send(command).is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {
                    // Ignore empty lines
                }
                Err(message) => {
                    warn!("{}", message);
                    HeadlessEvent::error(message, false).emit();
                }
            },
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadline_app::confirm_dialog::ConfirmDialogState;
    use threadline_app::form::FormSlot;
    use threadline_core::{AuthorId, Thread, ThreadEndpoints};
    use threadline_remote::test_utils::test_record;

    fn state() -> AppState {
        let thread = Thread::from_records(
            ThreadEndpoints::new(
                Url::parse("http://example.test/thread/1/").unwrap(),
                Url::parse("http://example.test/comments/").unwrap(),
            ),
            Some(AuthorId(1)),
            &[test_record(3, 1, "Hello")],
        )
        .unwrap();
        AppState::new(thread)
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(StdinCommand::parse("add"), Ok(Some(StdinCommand::Add)));
        assert_eq!(StdinCommand::parse("  submit "), Ok(Some(StdinCommand::Submit)));
        assert_eq!(StdinCommand::parse("y"), Ok(Some(StdinCommand::Yes)));
        assert_eq!(StdinCommand::parse("quit"), Ok(Some(StdinCommand::Quit)));
        assert_eq!(StdinCommand::parse(""), Ok(None));
        assert_eq!(StdinCommand::parse("   "), Ok(None));
    }

    #[test]
    fn test_parse_type_keeps_spacing() {
        assert_eq!(
            StdinCommand::parse("type Hello  world "),
            Ok(Some(StdinCommand::Type("Hello  world ".to_string())))
        );
        assert_eq!(
            StdinCommand::parse("type"),
            Ok(Some(StdinCommand::Type(String::new())))
        );
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(
            StdinCommand::parse("edit 3"),
            Ok(Some(StdinCommand::Edit(CommentId(3))))
        );
        assert_eq!(
            StdinCommand::parse("delete #12"),
            Ok(Some(StdinCommand::Delete(CommentId(12))))
        );
        assert!(StdinCommand::parse("edit three").is_err());
        assert!(StdinCommand::parse("delete").is_err());
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(StdinCommand::parse("reload").is_err());
    }

    #[test]
    fn test_type_appends_to_focused_form() {
        let mut state = state();
        assert!(command_message(&state, &StdinCommand::Type("x".to_string())).is_none());

        state.presenter.open_add_form();
        state
            .presenter
            .form_mut(FormSlot::AddComment)
            .unwrap()
            .set_body("Hel");

        match command_message(&state, &StdinCommand::Type("lo".to_string())) {
            Some(Message::FormInput { slot, body }) => {
                assert_eq!(slot, FormSlot::AddComment);
                assert_eq!(body, "Hello");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_answers_only_apply_to_open_dialog() {
        let mut state = state();
        assert!(command_message(&state, &StdinCommand::Yes).is_none());
        assert!(command_message(&state, &StdinCommand::Acknowledge).is_none());

        let key = state.thread.key_of(CommentId(3)).unwrap();
        state.show_confirm_dialog(ConfirmDialogState::delete_comment(key));
        assert!(matches!(
            command_message(&state, &StdinCommand::Yes),
            Some(Message::ConfirmDelete { .. })
        ));
        assert!(matches!(
            command_message(&state, &StdinCommand::No),
            Some(Message::KeepComment { .. })
        ));
    }

    #[test]
    fn test_overrides_win_over_config() {
        let settings = apply_overrides(
            Settings::default(),
            &Overrides {
                base_url: Some("http://comments.test".to_string()),
                seed: None,
                fragment: Some("#comment-3".to_string()),
            },
        );
        assert_eq!(settings.remote.base_url, "http://comments.test");
        assert_eq!(settings.thread.fragment.as_deref(), Some("#comment-3"));
    }

    #[test]
    fn test_missing_seed_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_thread(dir.path(), &Settings::default(), &Overrides::default());
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = load_thread(
            dir.path(),
            &Settings::default(),
            &Overrides {
                seed: Some(dir.path().join("missing.json")),
                ..Overrides::default()
            },
        );
        assert!(matches!(result, Err(Error::SeedNotFound { .. })));
    }

    #[test]
    fn test_bad_base_url_keeps_url_error() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("thread.json");
        std::fs::write(&seed, r#"{"thread_url": "/t/", "comment_url": "/c/"}"#).unwrap();

        let mut settings = Settings::default();
        settings.remote.base_url = "not a url".to_string();
        let result = load_thread(
            dir.path(),
            &settings,
            &Overrides {
                seed: Some(seed),
                ..Overrides::default()
            },
        );
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Url(_)));
        assert!(err.is_fatal());
    }
}
