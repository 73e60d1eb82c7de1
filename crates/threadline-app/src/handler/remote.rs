//! Completions of remote requests
//!
//! These are the only handlers that mutate the thread. A completion whose
//! request id no longer matches its form or presenter is stale; the server
//! result is still applied but the UI is left alone.

use threadline_core::prelude::*;
use threadline_core::{CommentKey, CommentRecord};

use crate::comment_presenter::DELETE_FAILED_MESSAGE;
use crate::form::{CloseReason, FormSlot};
use crate::message::RequestId;
use crate::state::AppState;

use super::{dispatch, UpdateResult};

pub(crate) fn handle_created(
    state: &mut AppState,
    request_id: RequestId,
    record: CommentRecord,
) -> UpdateResult {
    match state.thread.append_created(&record) {
        Ok(notification) => dispatch(state, &notification),
        Err(e) => warn!("Created comment not appended: {}", e),
    }

    let slot = FormSlot::AddComment;
    let closed = state
        .presenter
        .form_mut(slot)
        .is_some_and(|form| form.succeeded(request_id));
    if closed {
        state
            .presenter
            .close_form(slot, CloseReason::Submitted, &state.thread);
    } else {
        debug!("No creation form waiting for request {}", request_id);
    }
    UpdateResult::none()
}

pub(crate) fn handle_create_failed(
    state: &mut AppState,
    request_id: RequestId,
    error: String,
) -> UpdateResult {
    warn!("Create request {} failed: {}", request_id, error);
    reopen_form(state, FormSlot::AddComment, request_id);
    UpdateResult::none()
}

pub(crate) fn handle_saved(
    state: &mut AppState,
    request_id: RequestId,
    key: CommentKey,
    record: CommentRecord,
) -> UpdateResult {
    match state.thread.apply_saved(key, &record) {
        Ok(notification) => dispatch(state, &notification),
        Err(e) => warn!("Saved comment not applied: {}", e),
    }

    let slot = FormSlot::Edit(key);
    let closed = state
        .presenter
        .form_mut(slot)
        .is_some_and(|form| form.succeeded(request_id));
    if closed {
        state
            .presenter
            .close_form(slot, CloseReason::Submitted, &state.thread);
    }
    UpdateResult::none()
}

pub(crate) fn handle_save_failed(
    state: &mut AppState,
    request_id: RequestId,
    key: CommentKey,
    error: String,
) -> UpdateResult {
    warn!("Save request {} failed: {}", request_id, error);
    reopen_form(state, FormSlot::Edit(key), request_id);
    UpdateResult::none()
}

pub(crate) fn handle_deleted(
    state: &mut AppState,
    request_id: RequestId,
    key: CommentKey,
) -> UpdateResult {
    match state.thread.apply_deleted(key) {
        Ok(notification) => dispatch(state, &notification),
        Err(e) => warn!("Deleted comment not applied: {}", e),
    }
    if let Some(presenter) = state.presenter.presenter_mut(key) {
        presenter.finish_delete(request_id);
    }
    UpdateResult::none()
}

pub(crate) fn handle_delete_failed(
    state: &mut AppState,
    request_id: RequestId,
    key: CommentKey,
    error: String,
) -> UpdateResult {
    warn!("Delete request {} failed: {}", request_id, error);
    let rolled_back = state
        .presenter
        .presenter_mut(key)
        .is_some_and(|p| p.rollback_delete(request_id));
    if rolled_back {
        state.show_alert(DELETE_FAILED_MESSAGE);
    }
    UpdateResult::none()
}

/// Back to `Editing` with the failure message, if the form still waits for `request_id`
fn reopen_form(state: &mut AppState, slot: FormSlot, request_id: RequestId) {
    let reopened = state
        .presenter
        .form_mut(slot)
        .is_some_and(|form| form.failed(request_id));
    if reopened {
        state.presenter.focus(slot);
    } else {
        debug!("Stale failure for request {} ignored", request_id);
    }
}
