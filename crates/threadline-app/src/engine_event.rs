//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. They are derived by comparing state snapshots, so
//! a subscriber only ever sees settled changes.

use threadline_core::CommentId;

use crate::form::FormSlot;
use crate::view::CommentView;

/// Domain events emitted by the Engine.
///
/// `comment` on the form events names the comment an edit form belongs to;
/// it is `None` for the creation form.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Thread
    // ─────────────────────────────────────────────────────────
    /// A comment was appended to the thread
    CommentAdded { id: CommentId, view: CommentView },

    /// A comment was saved or deleted in place
    CommentUpdated { id: CommentId, view: CommentView },

    // ─────────────────────────────────────────────────────────
    // Forms
    // ─────────────────────────────────────────────────────────
    FormOpened {
        slot: FormSlot,
        comment: Option<CommentId>,
    },

    FormClosed {
        slot: FormSlot,
        comment: Option<CommentId>,
    },

    /// Validation or request failure shown inline in a form
    FormError {
        slot: FormSlot,
        comment: Option<CommentId>,
        message: String,
    },

    // ─────────────────────────────────────────────────────────
    // Dialogs
    // ─────────────────────────────────────────────────────────
    /// A yes/no question is waiting for an answer
    ConfirmRequested { title: String, message: String },

    /// A blocking alert is waiting to be acknowledged
    AlertShown { message: String },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CommentAdded { .. } => "comment_added",
            Self::CommentUpdated { .. } => "comment_updated",
            Self::FormOpened { .. } => "form_opened",
            Self::FormClosed { .. } => "form_closed",
            Self::FormError { .. } => "form_error",
            Self::ConfirmRequested { .. } => "confirm",
            Self::AlertShown { .. } => "alert",
            Self::Shutdown => "shutdown",
        }
    }
}
