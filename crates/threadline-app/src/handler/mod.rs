//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers for UI modes
//! - `form`: Create/edit form handlers
//! - `comment`: Edit and delete intents on a single comment
//! - `remote`: Completions of remote requests

pub(crate) mod comment;
pub(crate) mod form;
pub(crate) mod keys;
pub(crate) mod remote;
pub(crate) mod update;


use threadline_core::{CommentKey, CreateRequest, DestroyRequest, Notification, UpdateRequest};

use crate::message::{Message, RequestId};
use crate::state::AppState;

// Re-export main entry point
pub use keys::handle_key;
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// POST a new comment
    CreateComment {
        request_id: RequestId,
        request: CreateRequest,
    },

    /// PUT an edited comment
    UpdateComment {
        request_id: RequestId,
        key: CommentKey,
        request: UpdateRequest,
    },

    /// DELETE a comment
    DeleteComment {
        request_id: RequestId,
        key: CommentKey,
        request: DestroyRequest,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}

/// Hand a thread notification to the presenters subscribed to it
pub(crate) fn dispatch(state: &mut AppState, notification: &Notification) {
    state
        .presenter
        .handle_notification(&mut state.thread, notification);
}
