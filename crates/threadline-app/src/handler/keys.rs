//! Key event handlers for different UI modes

use crate::form::FormSlot;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, UiMode};

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    match state.ui_mode {
        UiMode::ConfirmDialog => handle_key_confirm_dialog(state, key),
        UiMode::Alert => handle_key_alert(key),
        UiMode::Normal => match state.presenter.focused_slot() {
            Some(slot) => handle_key_form(state, slot, key),
            None => handle_key_normal(key),
        },
    }
}

/// Handle key events while a confirmation is up
fn handle_key_confirm_dialog(state: &AppState, key: InputKey) -> Option<Message> {
    let dialog = state.confirm_dialog_state.as_ref()?;
    match key {
        InputKey::Char('y' | 'Y') | InputKey::Enter => dialog.confirm(),
        InputKey::Char('n' | 'N') | InputKey::Esc => dialog.decline(),
        // Force quit with Ctrl+C even in dialog
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_key_alert(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Esc => Some(Message::DismissAlert),
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}

/// Handle key events in the focused form's textarea
fn handle_key_form(state: &AppState, slot: FormSlot, key: InputKey) -> Option<Message> {
    let body = state.presenter.form(slot)?.body();
    match key {
        InputKey::Char(c) => {
            let mut body = body.to_string();
            body.push(c);
            Some(Message::FormInput { slot, body })
        }

        // Newlines are part of the body; Ctrl+S submits
        InputKey::Enter => Some(Message::FormInput {
            slot,
            body: format!("{}\n", body),
        }),

        InputKey::Backspace => {
            let mut body = body.to_string();
            body.pop();
            Some(Message::FormInput { slot, body })
        }

        // Clear all input
        InputKey::CharCtrl('u') => Some(Message::FormInput {
            slot,
            body: String::new(),
        }),

        InputKey::CharCtrl('s') => Some(Message::SubmitForm { slot }),
        InputKey::Esc => Some(Message::CancelForm { slot }),
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_key_normal(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('a') => Some(Message::OpenAddForm),
        InputKey::Char('q') | InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}
