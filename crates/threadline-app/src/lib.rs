//! threadline-app - Comment thread state and orchestration
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! comment thread: presenters and form state machines live in [`AppState`],
//! every change goes through [`handler::update`], and remote requests run as
//! background tasks that report back as messages. The [`Engine`] ties the
//! loop together for runners.

pub mod actions;
pub mod comment_presenter;
pub mod config;
pub mod confirm_dialog;
pub mod engine;
pub mod engine_event;
pub mod form;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod signals;
pub mod state;
pub mod thread_presenter;
pub mod view;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use form::{FormController, FormSlot};
pub use handler::{UpdateAction, UpdateResult};
pub use message::{Message, RequestId};
pub use state::AppState;
pub use view::{CommentView, FormView, ThreadView};
