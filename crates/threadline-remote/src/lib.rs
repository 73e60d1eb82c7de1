//! # threadline-remote - Remote Comment Service
//!
//! The boundary between a thread and the service that stores its comments.
//! Every operation takes a request descriptor prepared (and validated) by
//! [`threadline_core::Thread`] and answers with the canonical record.
//!
//! ## Public API
//! - [`CommentService`] - Async create/update/destroy, `Send` variant
//! - [`HttpCommentService`] - reqwest-backed implementation
//! - [`AntiForgery`] - Header attached to state-changing requests
//! - `FakeCommentService` - Scriptable in-memory service (`test-helpers` feature)

pub mod http;
pub mod service;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use http::HttpCommentService;
pub use service::{AntiForgery, CommentService, LocalCommentService};
