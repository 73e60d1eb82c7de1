//! Create/edit form state machine
//!
//! ```text
//!             submit (valid)              succeeded
//!   Editing ───────────────► Submitting ───────────► Closed(Submitted)
//!     ▲  │                        │
//!     │  │ cancel (clean or       │ failed
//!     │  │  confirmed)            ▼
//!     │  └──────────────► Closed(Cancelled)    back to Editing
//!     └───────────────────────────────────────────────┘
//! ```
//!
//! A form works on a copy of the comment. The thread-owned instance only
//! changes once the service has answered.

use threadline_core::{validate_body, Comment, CommentKey};
use tracing::debug;

use crate::message::RequestId;
use crate::view::FormView;

pub const CREATE_FAILED_MESSAGE: &str = "Something broke and your comment couldn't be created.";
pub const SAVE_FAILED_MESSAGE: &str = "Something broke and your comment couldn't be saved.";
pub const DISCARD_COMMENT_MESSAGE: &str = "You will lose your comment if you continue.";
pub const DISCARD_CHANGES_MESSAGE: &str = "You will lose your changes if you continue.";

/// Where a form is mounted. At most one form exists per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormSlot {
    /// The thread's creation form
    AddComment,
    /// An edit form replacing a comment's rendered content
    Edit(CommentKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Cancelled,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting { request: RequestId },
    Closed(CloseReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Body failed validation; nothing should be sent
    Invalid,
    /// Send this body
    Submit(String),
    /// Not in a state that accepts a submit
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    Ignored,
    Closed,
    /// Unsaved text would be lost; ask first
    NeedsConfirmation(String),
}

#[derive(Debug, Clone)]
pub struct FormController {
    slot: FormSlot,
    draft: Comment,
    original_body: String,
    phase: FormPhase,
    error: Option<String>,
    focused: bool,
}

impl FormController {
    /// Empty creation form
    pub fn for_create() -> Self {
        Self {
            slot: FormSlot::AddComment,
            draft: Comment::draft(),
            original_body: String::new(),
            phase: FormPhase::Editing,
            error: None,
            focused: true,
        }
    }

    /// Edit form pre-filled with the comment's current body
    pub fn for_edit(key: CommentKey, comment: &Comment) -> Self {
        Self {
            slot: FormSlot::Edit(key),
            draft: comment.to_draft(),
            original_body: comment.body().to_string(),
            phase: FormPhase::Editing,
            error: None,
            focused: true,
        }
    }

    pub fn slot(&self) -> FormSlot {
        self.slot
    }

    pub fn body(&self) -> &str {
        self.draft.body()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_editing(&self) -> bool {
        self.phase == FormPhase::Editing
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.phase, FormPhase::Closed(_))
    }

    /// Body differs from what the form was opened with
    pub fn is_dirty(&self) -> bool {
        self.body() != self.original_body
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Replace the input text. Controls are disabled outside `Editing`.
    pub fn set_body(&mut self, body: impl Into<String>) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.draft.set_body(body);
        true
    }

    /// Validate and move to `Submitting` under `request`
    pub fn submit(&mut self, request: RequestId) -> SubmitOutcome {
        if !self.is_editing() {
            return SubmitOutcome::Ignored;
        }
        if let Err(e) = validate_body(self.body()) {
            debug!("Form {:?} rejected: {}", self.slot, e);
            self.error = Some(e.to_string());
            self.focused = true;
            return SubmitOutcome::Invalid;
        }
        self.error = None;
        self.phase = FormPhase::Submitting { request };
        SubmitOutcome::Submit(self.body().to_string())
    }

    /// Whether `request` is the one this form is waiting for
    pub fn is_waiting_for(&self, request: RequestId) -> bool {
        self.phase == FormPhase::Submitting { request }
    }

    /// The in-flight request succeeded. Stale completions are ignored.
    pub fn succeeded(&mut self, request: RequestId) -> bool {
        if !self.is_waiting_for(request) {
            return false;
        }
        self.phase = FormPhase::Closed(CloseReason::Submitted);
        true
    }

    /// The in-flight request failed; back to `Editing` with the body intact
    pub fn failed(&mut self, request: RequestId) -> bool {
        let message = match self.slot {
            FormSlot::AddComment => CREATE_FAILED_MESSAGE,
            FormSlot::Edit(_) => SAVE_FAILED_MESSAGE,
        };
        self.fail_with(request, message)
    }

    pub fn fail_with(&mut self, request: RequestId, message: impl Into<String>) -> bool {
        if !self.is_waiting_for(request) {
            return false;
        }
        self.phase = FormPhase::Editing;
        self.error = Some(message.into());
        self.focused = true;
        true
    }

    pub fn cancel(&mut self) -> CancelOutcome {
        if !self.is_editing() {
            return CancelOutcome::Ignored;
        }
        if !self.is_dirty() {
            self.phase = FormPhase::Closed(CloseReason::Cancelled);
            return CancelOutcome::Closed;
        }
        let message = match self.slot {
            FormSlot::AddComment => DISCARD_COMMENT_MESSAGE,
            FormSlot::Edit(_) => DISCARD_CHANGES_MESSAGE,
        };
        CancelOutcome::NeedsConfirmation(message.to_string())
    }

    /// Answer to the discard confirmation. Returns true if the form closed.
    pub fn resolve_cancel(&mut self, confirmed: bool) -> bool {
        if !self.is_editing() {
            return false;
        }
        if confirmed {
            self.phase = FormPhase::Closed(CloseReason::Cancelled);
            true
        } else {
            self.focused = true;
            false
        }
    }

    pub fn view(&self) -> FormView {
        FormView {
            body: self.body().to_string(),
            submit_label: match self.slot {
                FormSlot::AddComment => "Add",
                FormSlot::Edit(_) => "Save",
            }
            .to_string(),
            disabled: self.is_submitting(),
            error: self.error.clone(),
            focused: self.focused,
        }
    }
}
