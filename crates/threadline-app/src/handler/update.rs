//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;

use super::{comment, form, keys::handle_key, remote, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.quit();
            UpdateResult::none()
        }

        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        // ─────────────────────────────────────────────────────────
        // Form Messages
        // ─────────────────────────────────────────────────────────
        Message::OpenAddForm => form::handle_open_add_form(state),
        Message::FormInput { slot, body } => form::handle_input(state, slot, body),
        Message::SubmitForm { slot } => form::handle_submit(state, slot),
        Message::CancelForm { slot } => form::handle_cancel(state, slot),
        Message::ConfirmDiscard { slot } => form::handle_confirm_discard(state, slot),
        Message::KeepEditing { slot } => form::handle_keep_editing(state, slot),

        // ─────────────────────────────────────────────────────────
        // Comment Messages
        // ─────────────────────────────────────────────────────────
        Message::EditComment { id } => comment::handle_edit(state, id),
        Message::DeleteComment { id } => comment::handle_delete(state, id),
        Message::ConfirmDelete { key } => comment::handle_confirm_delete(state, key),
        Message::KeepComment { key } => comment::handle_keep_comment(state, key),

        Message::DismissAlert => {
            state.dismiss_alert();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Remote Completions
        // ─────────────────────────────────────────────────────────
        Message::CommentCreated { request_id, record } => {
            remote::handle_created(state, request_id, record)
        }
        Message::CommentCreateFailed { request_id, error } => {
            remote::handle_create_failed(state, request_id, error)
        }
        Message::CommentSaved {
            request_id,
            key,
            record,
        } => remote::handle_saved(state, request_id, key, record),
        Message::CommentSaveFailed {
            request_id,
            key,
            error,
        } => remote::handle_save_failed(state, request_id, key, error),
        Message::CommentDeleted { request_id, key } => {
            remote::handle_deleted(state, request_id, key)
        }
        Message::CommentDeleteFailed {
            request_id,
            key,
            error,
        } => remote::handle_delete_failed(state, request_id, key, error),
    }
}
