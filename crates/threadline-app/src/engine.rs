//! Engine - shared orchestration state for runners
//!
//! The Engine owns the TEA state, the message channel, the comment service
//! and the handles of requests in flight. Runners feed it messages and
//! subscribe to the [`EngineEvent`]s it derives from state changes.

use std::sync::Arc;
use std::time::Duration;

use threadline_core::{CommentId, Thread};
use threadline_remote::CommentService;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::actions::RequestTasks;
use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::form::FormSlot;
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::AppState;
use crate::view::ThreadView;

/// How long settle and shutdown wait for each request still in flight
const REQUEST_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StateSnapshot {
    /// Revision of each comment, in thread order
    revisions: Vec<u64>,
    /// Open forms with their current error
    forms: Vec<(FormSlot, Option<String>)>,
    confirm: Option<(String, String)>,
    alert: Option<String>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        let revisions = state
            .thread
            .iter()
            .map(|(key, _)| state.thread.revision(key).unwrap_or_default())
            .collect();
        let forms = state
            .presenter
            .open_slots()
            .into_iter()
            .map(|slot| {
                let error = state
                    .presenter
                    .form(slot)
                    .and_then(|f| f.error())
                    .map(str::to_string);
                (slot, error)
            })
            .collect();

        Self {
            revisions,
            forms,
            confirm: state
                .confirm_dialog_state
                .as_ref()
                .map(|d| (d.title.clone(), d.message.clone())),
            alert: state.alert.as_ref().map(|a| a.message.clone()),
        }
    }

    fn form_error(&self, slot: FormSlot) -> Option<Option<&str>> {
        self.forms
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, error)| error.as_deref())
    }
}

/// Orchestration engine for a comment thread.
///
/// Generic over the comment service so tests can drive it with an
/// in-memory fake.
pub struct Engine<S> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, stdin, requests).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The runner's event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    service: Arc<S>,

    /// Requests that may still be in flight
    tasks: RequestTasks,

    /// Event broadcaster for external consumers.
    /// Subscribers receive EngineEvents after each message processing cycle.
    event_tx: broadcast::Sender<EngineEvent>,

    signal_task: JoinHandle<()>,
}

impl<S> Engine<S>
where
    S: CommentService + Send + Sync + 'static,
{
    /// Create an Engine for `thread`.
    ///
    /// Must be called inside a tokio runtime; the signal handler is spawned
    /// here.
    pub fn new(thread: Thread, settings: Settings, service: Arc<S>) -> Self {
        let state = AppState::with_settings(thread, settings);

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);

        let signal_task = signals::spawn_signal_handler(msg_tx.clone());

        let (event_tx, _) = broadcast::channel(256);

        info!(
            "Engine started with {} comments (viewer {:?})",
            state.thread.len(),
            state.thread.viewer()
        );

        Self {
            state,
            msg_tx,
            msg_rx,
            service,
            tasks: RequestTasks::default(),
            event_tx,
            signal_task,
        }
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle and emit
    /// events for whatever changed.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.service,
            &self.tasks,
        );

        let post = StateSnapshot::capture(&self.state);
        if pre != post {
            self.emit_events(&pre, &post);
        }
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Render the whole thread
    pub fn view(&self) -> ThreadView {
        self.state.view()
    }

    /// Number of requests not yet finished
    pub fn in_flight(&self) -> usize {
        let tasks = self
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Wait for requests in flight, then process their completions.
    ///
    /// Returns the number of messages processed.
    pub async fn settle(&mut self) -> usize {
        self.join_requests().await;
        self.drain_pending_messages()
    }

    /// Emit `Shutdown` and wait for requests still in flight.
    ///
    /// Requests are never aborted. Completions that arrive here are not
    /// processed; call [`Engine::settle`] first to apply them.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);
        self.signal_task.abort();
        self.join_requests().await;
        info!("Engine shut down");
    }

    async fn join_requests(&self) {
        let tasks: Vec<_> = {
            let mut tasks = self
                .tasks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            tasks.drain(..).collect()
        };

        for handle in tasks {
            match tokio::time::timeout(REQUEST_DRAIN_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Request task panicked: {}", e),
                Err(_) => warn!("Request still running at shutdown"),
            }
        }
    }

    /// Compare pre/post snapshots and emit one event per change
    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        let thread = &self.state.thread;

        for (index, (key, comment)) in thread.iter().enumerate() {
            let Some(id) = comment.id() else { continue };
            let view = self
                .state
                .presenter
                .presenter(key)
                .and_then(|p| p.view());
            let Some(view) = view else { continue };

            match pre.revisions.get(index) {
                None => self.emit(EngineEvent::CommentAdded { id, view }),
                Some(before) if post.revisions.get(index) != Some(before) => {
                    self.emit(EngineEvent::CommentUpdated { id, view })
                }
                Some(_) => {}
            }
        }

        for (slot, _) in &pre.forms {
            if post.form_error(*slot).is_none() {
                self.emit(EngineEvent::FormClosed {
                    slot: *slot,
                    comment: self.slot_comment(*slot),
                });
            }
        }

        for (slot, error) in &post.forms {
            let before = pre.form_error(*slot);
            if before.is_none() {
                self.emit(EngineEvent::FormOpened {
                    slot: *slot,
                    comment: self.slot_comment(*slot),
                });
            }
            if let Some(message) = error {
                if before.flatten() != Some(message.as_str()) {
                    self.emit(EngineEvent::FormError {
                        slot: *slot,
                        comment: self.slot_comment(*slot),
                        message: message.clone(),
                    });
                }
            }
        }

        if let Some((title, message)) = &post.confirm {
            if pre.confirm.as_ref() != post.confirm.as_ref() {
                self.emit(EngineEvent::ConfirmRequested {
                    title: title.clone(),
                    message: message.clone(),
                });
            }
        }

        if let Some(message) = &post.alert {
            if pre.alert.as_ref() != Some(message) {
                self.emit(EngineEvent::AlertShown {
                    message: message.clone(),
                });
            }
        }
    }

    fn slot_comment(&self, slot: FormSlot) -> Option<CommentId> {
        match slot {
            FormSlot::AddComment => None,
            FormSlot::Edit(key) => self.state.thread.get(key)?.id(),
        }
    }

    /// Emit a single EngineEvent to all subscribers.
    ///
    /// send() returns Err only if there are no receivers.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}
