//! Headless mode - NDJSON event output
//!
//! The thread is driven by line commands on stdin and every change is
//! written to stdout as newline-delimited JSON, one event per line. Each
//! event has an "event" field naming its type and a millisecond timestamp.
//!
//! # Example Output
//!
//! ```json
//! {"event":"ready","comments":2,"timestamp":1704700001000}
//! {"event":"form_opened","form":"add","comment":null,"timestamp":1704700002000}
//! {"event":"comment_added","id":7,"view":{"state":"populated","id":7,"body":"Hello",...},"timestamp":1704700003000}
//! ```

pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;

use threadline_app::{CommentView, EngineEvent, FormSlot, ThreadView};
use threadline_core::CommentId;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Thread loaded and accepting commands
    Ready { comments: usize, timestamp: i64 },

    CommentAdded {
        id: CommentId,
        view: CommentView,
        timestamp: i64,
    },

    CommentUpdated {
        id: CommentId,
        view: CommentView,
        timestamp: i64,
    },

    FormOpened {
        form: &'static str,
        comment: Option<CommentId>,
        timestamp: i64,
    },

    FormClosed {
        form: &'static str,
        comment: Option<CommentId>,
        timestamp: i64,
    },

    FormError {
        form: &'static str,
        comment: Option<CommentId>,
        message: String,
        timestamp: i64,
    },

    /// Waiting for `y` or `n`
    Confirm {
        title: String,
        message: String,
        timestamp: i64,
    },

    /// Waiting for `ok`
    Alert { message: String, timestamp: i64 },

    /// Full rendering of the thread
    View { thread: ThreadView, timestamp: i64 },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    Shutdown { timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        // Write to stdout with newline (NDJSON format)
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        // Flush to ensure immediate output
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn ready(comments: usize) -> Self {
        Self::Ready {
            comments,
            timestamp: Self::now(),
        }
    }

    pub fn view(thread: ThreadView) -> Self {
        Self::View {
            thread,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }

    /// Translate an engine event into its wire form
    pub fn from_engine_event(event: &EngineEvent) -> Self {
        let timestamp = Self::now();
        match event.clone() {
            EngineEvent::CommentAdded { id, view } => Self::CommentAdded {
                id,
                view,
                timestamp,
            },
            EngineEvent::CommentUpdated { id, view } => Self::CommentUpdated {
                id,
                view,
                timestamp,
            },
            EngineEvent::FormOpened { slot, comment } => Self::FormOpened {
                form: form_label(slot),
                comment,
                timestamp,
            },
            EngineEvent::FormClosed { slot, comment } => Self::FormClosed {
                form: form_label(slot),
                comment,
                timestamp,
            },
            EngineEvent::FormError {
                slot,
                comment,
                message,
            } => Self::FormError {
                form: form_label(slot),
                comment,
                message,
                timestamp,
            },
            EngineEvent::ConfirmRequested { title, message } => Self::Confirm {
                title,
                message,
                timestamp,
            },
            EngineEvent::AlertShown { message } => Self::Alert { message, timestamp },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }
}

fn form_label(slot: FormSlot) -> &'static str {
    match slot {
        FormSlot::AddComment => "add",
        FormSlot::Edit(_) => "edit",
    }
}
