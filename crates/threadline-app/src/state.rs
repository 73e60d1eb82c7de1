//! Application state (Model in TEA pattern)

use threadline_core::Thread;

use crate::config::Settings;
use crate::confirm_dialog::ConfirmDialogState;
use crate::message::RequestId;
use crate::thread_presenter::ThreadPresenter;
use crate::view::ThreadView;

/// Lifecycle of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Current UI mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Thread and any open forms
    #[default]
    Normal,

    /// Confirmation dialog (discard text, delete comment)
    ConfirmDialog,

    /// Blocking alert that must be acknowledged
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    pub message: String,
}

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    /// Canonical comments; mutated only from remote completions
    pub thread: Thread,

    pub presenter: ThreadPresenter,

    pub ui_mode: UiMode,

    /// Confirmation dialog state
    pub confirm_dialog_state: Option<ConfirmDialogState>,

    pub alert: Option<AlertState>,

    pub phase: AppPhase,

    pub settings: Settings,

    next_request_id: u64,
}

impl AppState {
    pub fn new(thread: Thread) -> Self {
        Self::with_settings(thread, Settings::default())
    }

    /// Build the presenters for `thread`. The highlight comes from
    /// `settings.thread.fragment`.
    pub fn with_settings(mut thread: Thread, settings: Settings) -> Self {
        let presenter = ThreadPresenter::new(&mut thread, settings.thread.fragment.as_deref());
        Self {
            thread,
            presenter,
            ui_mode: UiMode::Normal,
            confirm_dialog_state: None,
            alert: None,
            phase: AppPhase::Running,
            settings,
            next_request_id: 1,
        }
    }

    /// Allocate the id for the next remote request
    pub fn next_request_id(&mut self) -> RequestId {
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        id
    }

    pub fn view(&self) -> ThreadView {
        self.presenter.render(&self.thread)
    }

    /// A confirmation or alert is up; intents are not accepted
    pub fn is_modal(&self) -> bool {
        self.ui_mode != UiMode::Normal
    }

    // ─────────────────────────────────────────────────────────
    // Dialogs
    // ─────────────────────────────────────────────────────────

    pub fn show_confirm_dialog(&mut self, dialog: ConfirmDialogState) {
        self.confirm_dialog_state = Some(dialog);
        if self.alert.is_none() {
            self.ui_mode = UiMode::ConfirmDialog;
        }
    }

    pub fn close_confirm_dialog(&mut self) {
        self.confirm_dialog_state = None;
        if self.alert.is_none() {
            self.ui_mode = UiMode::Normal;
        }
    }

    /// Alerts take precedence over an open confirmation
    pub fn show_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(AlertState {
            message: message.into(),
        });
        self.ui_mode = UiMode::Alert;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
        self.ui_mode = if self.confirm_dialog_state.is_some() {
            UiMode::ConfirmDialog
        } else {
            UiMode::Normal
        };
    }

    // ─────────────────────────────────────────────────────────
    // Quit
    // ─────────────────────────────────────────────────────────

    pub fn quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    /// Check if the app should quit
    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use threadline_core::ThreadEndpoints;
    use url::Url;

    fn state() -> AppState {
        AppState::new(Thread::new(
            ThreadEndpoints::new(
                Url::parse("http://example.test/t/").unwrap(),
                Url::parse("http://example.test/c/").unwrap(),
            ),
            None,
        ))
    }

    fn dialog() -> ConfirmDialogState {
        ConfirmDialogState::new("T", "M", vec![("OK", Message::Quit)])
    }

    #[test]
    fn test_request_ids_increase() {
        let mut state = state();
        let a = state.next_request_id();
        let b = state.next_request_id();
        assert!(b > a);
    }

    #[test]
    fn test_confirm_dialog_mode() {
        let mut state = state();
        state.show_confirm_dialog(dialog());
        assert_eq!(state.ui_mode, UiMode::ConfirmDialog);
        assert!(state.is_modal());
        state.close_confirm_dialog();
        assert_eq!(state.ui_mode, UiMode::Normal);
        assert!(state.confirm_dialog_state.is_none());
    }

    #[test]
    fn test_alert_over_dialog_returns_to_dialog() {
        let mut state = state();
        state.show_confirm_dialog(dialog());
        state.show_alert("boom");
        assert_eq!(state.ui_mode, UiMode::Alert);

        state.dismiss_alert();
        assert_eq!(state.ui_mode, UiMode::ConfirmDialog);
        assert!(state.alert.is_none());
    }

    #[test]
    fn test_quit() {
        let mut state = state();
        assert!(!state.should_quit());
        state.quit();
        assert!(state.should_quit());
    }
}
