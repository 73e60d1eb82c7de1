//! Message types for the application (TEA pattern)

use std::fmt;

use crate::form::FormSlot;
use crate::input_key::InputKey;
use threadline_core::{CommentId, CommentKey, CommentRecord};

/// Correlates a remote completion with the form or presenter that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from the runner
    Key(InputKey),

    /// Quit without confirmation (Ctrl+C, signal handler, stdin)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Form Messages
    // ─────────────────────────────────────────────────────────
    /// The "add comment" entry point was activated
    OpenAddForm,

    /// Replace the body of a form's input
    FormInput { slot: FormSlot, body: String },

    SubmitForm { slot: FormSlot },

    /// Cancel button or Escape
    CancelForm { slot: FormSlot },

    /// User agreed to lose unsaved text
    ConfirmDiscard { slot: FormSlot },

    /// User declined to lose unsaved text
    KeepEditing { slot: FormSlot },

    // ─────────────────────────────────────────────────────────
    // Comment Messages
    // ─────────────────────────────────────────────────────────
    /// Edit control of a comment was activated
    EditComment { id: CommentId },

    /// Delete control of a comment was activated
    DeleteComment { id: CommentId },

    ConfirmDelete { key: CommentKey },

    KeepComment { key: CommentKey },

    /// Acknowledge the blocking alert
    DismissAlert,

    // ─────────────────────────────────────────────────────────
    // Remote Completions
    // ─────────────────────────────────────────────────────────
    CommentCreated {
        request_id: RequestId,
        record: CommentRecord,
    },

    CommentCreateFailed {
        request_id: RequestId,
        error: String,
    },

    CommentSaved {
        request_id: RequestId,
        key: CommentKey,
        record: CommentRecord,
    },

    CommentSaveFailed {
        request_id: RequestId,
        key: CommentKey,
        error: String,
    },

    CommentDeleted {
        request_id: RequestId,
        key: CommentKey,
    },

    CommentDeleteFailed {
        request_id: RequestId,
        key: CommentKey,
        error: String,
    },
}
