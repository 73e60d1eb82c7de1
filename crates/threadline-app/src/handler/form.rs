//! Create/edit form handlers

use threadline_core::prelude::*;

use crate::confirm_dialog::ConfirmDialogState;
use crate::form::{CancelOutcome, CloseReason, FormSlot, SubmitOutcome};
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub(crate) fn handle_open_add_form(state: &mut AppState) -> UpdateResult {
    if state.is_modal() {
        return UpdateResult::none();
    }
    if state.presenter.open_add_form() {
        info!("Creation form opened");
    } else {
        debug!("Creation form already open, refocused");
    }
    UpdateResult::none()
}

pub(crate) fn handle_input(state: &mut AppState, slot: FormSlot, body: String) -> UpdateResult {
    if state.is_modal() {
        return UpdateResult::none();
    }
    if let Some(form) = state.presenter.form_mut(slot) {
        if !form.set_body(body) {
            trace!("Input ignored, form {:?} is not editing", slot);
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_submit(state: &mut AppState, slot: FormSlot) -> UpdateResult {
    if state.is_modal() {
        return UpdateResult::none();
    }
    let request_id = state.next_request_id();
    let Some(form) = state.presenter.form_mut(slot) else {
        return UpdateResult::none();
    };

    let body = match form.submit(request_id) {
        SubmitOutcome::Submit(body) => body,
        SubmitOutcome::Invalid => {
            state.presenter.focus(slot);
            return UpdateResult::none();
        }
        SubmitOutcome::Ignored => {
            debug!("Submit ignored, form {:?} is busy", slot);
            return UpdateResult::none();
        }
    };

    let action = match slot {
        FormSlot::AddComment => state
            .thread
            .prepare_create(&body)
            .map(|request| UpdateAction::CreateComment {
                request_id,
                request,
            }),
        FormSlot::Edit(key) => {
            state
                .thread
                .prepare_save(key, &body)
                .map(|request| UpdateAction::UpdateComment {
                    request_id,
                    key,
                    request,
                })
        }
    };

    match action {
        Ok(action) => {
            info!("Submitting form {:?} as request {}", slot, request_id);
            UpdateResult::action(action)
        }
        Err(e) => {
            warn!("Could not prepare request for {:?}: {}", slot, e);
            if let Some(form) = state.presenter.form_mut(slot) {
                form.fail_with(request_id, e.to_string());
            }
            UpdateResult::none()
        }
    }
}

pub(crate) fn handle_cancel(state: &mut AppState, slot: FormSlot) -> UpdateResult {
    if state.is_modal() {
        return UpdateResult::none();
    }
    let Some(form) = state.presenter.form_mut(slot) else {
        return UpdateResult::none();
    };

    match form.cancel() {
        CancelOutcome::Ignored => {
            debug!("Cancel ignored while form {:?} is submitting", slot);
        }
        CancelOutcome::Closed => {
            state
                .presenter
                .close_form(slot, CloseReason::Cancelled, &state.thread);
        }
        CancelOutcome::NeedsConfirmation(message) => {
            state.show_confirm_dialog(ConfirmDialogState::discard_changes(slot, message));
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_confirm_discard(state: &mut AppState, slot: FormSlot) -> UpdateResult {
    state.close_confirm_dialog();
    let closed = state
        .presenter
        .form_mut(slot)
        .is_some_and(|form| form.resolve_cancel(true));
    if closed {
        state
            .presenter
            .close_form(slot, CloseReason::Cancelled, &state.thread);
    }
    UpdateResult::none()
}

pub(crate) fn handle_keep_editing(state: &mut AppState, slot: FormSlot) -> UpdateResult {
    state.close_confirm_dialog();
    debug!("{}; form {:?} stays open", Error::ConfirmationDeclined, slot);
    if let Some(form) = state.presenter.form_mut(slot) {
        form.resolve_cancel(false);
        state.presenter.focus(slot);
    }
    UpdateResult::none()
}
