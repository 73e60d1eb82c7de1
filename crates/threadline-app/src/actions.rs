//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every remote call runs on its own task and reports back through the
//! message channel. Completions re-enter the update loop in the order they
//! finish, which is what decides append order.

use std::sync::{Arc, Mutex};

use threadline_remote::CommentService;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::message::Message;
use crate::UpdateAction;

/// Handles of requests that may still be in flight
pub type RequestTasks = Arc<Mutex<Vec<JoinHandle<()>>>>;

/// Execute an action by spawning a background task
pub fn handle_action<S>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    service: Arc<S>,
    tasks: &RequestTasks,
) where
    S: CommentService + Send + Sync + 'static,
{
    let handle = match action {
        UpdateAction::CreateComment {
            request_id,
            request,
        } => tokio::spawn(async move {
            let msg = match service.create(&request).await {
                Ok(record) => Message::CommentCreated { request_id, record },
                Err(e) => {
                    warn!("Create {} failed: {}", request_id, e);
                    Message::CommentCreateFailed {
                        request_id,
                        error: e.to_string(),
                    }
                }
            };
            report(&msg_tx, msg).await;
        }),

        UpdateAction::UpdateComment {
            request_id,
            key,
            request,
        } => tokio::spawn(async move {
            let msg = match service.update(&request).await {
                Ok(record) => Message::CommentSaved {
                    request_id,
                    key,
                    record,
                },
                Err(e) => {
                    warn!("Update {} of comment {} failed: {}", request_id, request.id, e);
                    Message::CommentSaveFailed {
                        request_id,
                        key,
                        error: e.to_string(),
                    }
                }
            };
            report(&msg_tx, msg).await;
        }),

        UpdateAction::DeleteComment {
            request_id,
            key,
            request,
        } => tokio::spawn(async move {
            let msg = match service.destroy(&request).await {
                Ok(_) => Message::CommentDeleted { request_id, key },
                Err(e) => {
                    warn!("Delete {} of comment {} failed: {}", request_id, request.id, e);
                    Message::CommentDeleteFailed {
                        request_id,
                        key,
                        error: e.to_string(),
                    }
                }
            };
            report(&msg_tx, msg).await;
        }),
    };

    let mut tasks = tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    tasks.retain(|task| !task.is_finished());
    tasks.push(handle);
}

/// Send a completion back to the event loop
async fn report(msg_tx: &mpsc::Sender<Message>, msg: Message) {
    if msg_tx.send(msg).await.is_err() {
        // Engine already gone; nobody is waiting for this result
        debug!("Completion dropped, message channel closed");
    }
}
