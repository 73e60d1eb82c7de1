//! Edit and delete intents on a single comment

use threadline_core::prelude::*;
use threadline_core::{CommentId, CommentKey};

use crate::confirm_dialog::ConfirmDialogState;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub(crate) fn handle_edit(state: &mut AppState, id: CommentId) -> UpdateResult {
    if state.is_modal() {
        return UpdateResult::none();
    }
    let Some(key) = state.thread.key_of(id) else {
        warn!("Edit requested for unknown comment {}", id);
        return UpdateResult::none();
    };
    match state.presenter.open_edit_form(&state.thread, key) {
        Ok(true) => info!("Editing comment {}", id),
        Ok(false) => debug!("Comment {} already being edited, refocused", id),
        Err(e) => debug!("Comment {} cannot be edited: {}", id, e),
    }
    UpdateResult::none()
}

pub(crate) fn handle_delete(state: &mut AppState, id: CommentId) -> UpdateResult {
    if state.is_modal() {
        return UpdateResult::none();
    }
    let Some(key) = state.thread.key_of(id) else {
        warn!("Delete requested for unknown comment {}", id);
        return UpdateResult::none();
    };
    let can_modify = state.thread.get(key).is_some_and(|c| c.can_modify());
    let busy = state
        .presenter
        .presenter(key)
        .is_some_and(|p| p.pending_delete().is_some() || p.form().is_some());
    if !can_modify || busy {
        debug!("Delete of comment {} not available", id);
        return UpdateResult::none();
    }

    state.show_confirm_dialog(ConfirmDialogState::delete_comment(key));
    UpdateResult::none()
}

pub(crate) fn handle_confirm_delete(state: &mut AppState, key: CommentKey) -> UpdateResult {
    state.close_confirm_dialog();
    let request = match state.thread.prepare_destroy(key) {
        Ok(request) => request,
        Err(e) => {
            warn!("Could not prepare delete: {}", e);
            return UpdateResult::none();
        }
    };

    let request_id = state.next_request_id();
    let Some(presenter) = state.presenter.presenter_mut(key) else {
        return UpdateResult::none();
    };
    presenter.begin_delete(request_id);
    info!("Deleting comment {} as request {}", request.id, request_id);

    UpdateResult::action(UpdateAction::DeleteComment {
        request_id,
        key,
        request,
    })
}

pub(crate) fn handle_keep_comment(state: &mut AppState, key: CommentKey) -> UpdateResult {
    state.close_confirm_dialog();
    debug!("{}; comment at {:?} kept", Error::ConfirmationDeclined, key);
    UpdateResult::none()
}
