//! Confirm dialog state.
//!
//! Data model for confirmation dialogs. Each option carries the message sent
//! when it is picked; the first option confirms, the second declines.

use threadline_core::CommentKey;

use crate::form::FormSlot;
use crate::message::Message;

pub const DELETE_CONFIRMATION_MESSAGE: &str = "Delete this comment?";

#[derive(Debug, Clone)]
pub struct ConfirmDialogState {
    pub title: String,
    pub message: String,
    pub options: Vec<(String, Message)>,
}

impl ConfirmDialogState {
    /// Create a generic confirmation dialog
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        options: Vec<(&str, Message)>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options: options
                .into_iter()
                .map(|(label, msg)| (label.to_string(), msg))
                .collect(),
        }
    }

    /// Ask before throwing away unsaved form text
    pub fn discard_changes(slot: FormSlot, message: impl Into<String>) -> Self {
        Self::new(
            "Discard?",
            message,
            vec![
                ("Discard", Message::ConfirmDiscard { slot }),
                ("Keep editing", Message::KeepEditing { slot }),
            ],
        )
    }

    /// Ask before deleting a comment
    pub fn delete_comment(key: CommentKey) -> Self {
        Self::new(
            "Delete comment",
            DELETE_CONFIRMATION_MESSAGE,
            vec![
                ("Delete", Message::ConfirmDelete { key }),
                ("Cancel", Message::KeepComment { key }),
            ],
        )
    }

    /// Message of the confirming option
    pub fn confirm(&self) -> Option<Message> {
        self.options.first().map(|(_, msg)| msg.clone())
    }

    /// Message of the declining option
    pub fn decline(&self) -> Option<Message> {
        self.options.get(1).map(|(_, msg)| msg.clone())
    }
}
