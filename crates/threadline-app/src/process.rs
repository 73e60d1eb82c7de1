//! Message processing
//!
//! Runs a message and its follow-ups through the TEA update function and
//! hands any resulting actions to the task spawner.

use std::sync::Arc;

use threadline_remote::CommentService;
use tokio::sync::mpsc;

use crate::actions::{handle_action, RequestTasks};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<S>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    service: &Arc<S>,
    tasks: &RequestTasks,
) where
    S: CommentService + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), service.clone(), tasks);
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
