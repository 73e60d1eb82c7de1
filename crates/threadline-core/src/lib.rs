//! # threadline-core - Core Domain Types
//!
//! Foundation crate for threadline. Provides the comment data model, the
//! thread aggregate with its observer registry, request descriptors for the
//! remote comment service, and shared error handling and logging.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, regex, url, tracing).
//!
//! ## Public API
//!
//! ### Model (`comment`, `thread`)
//! - [`Comment`] - One comment, or a draft owned by a form
//! - [`Thread`] - Ordered, append-only comment collection
//! - [`CommentKey`] - Stable local identity of a comment in a thread
//! - [`ThreadEndpoints`] - Service endpoints for a thread
//!
//! ### Wire Shapes (`record`, `request`)
//! - [`CommentRecord`] - JSON comment as returned by the service
//! - [`CreateRequest`], [`UpdateRequest`], [`DestroyRequest`] - Validated requests
//!
//! ### Observers (`observer`)
//! - [`Subscription`] - Disposer returned by [`Thread::subscribe`]
//! - [`Topic`], [`Notification`] - What changed and who listens
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use threadline_core::prelude::*;
//! ```

pub mod anchor;
pub mod comment;
pub mod error;
pub mod logging;
pub mod observer;
pub mod prelude;
pub mod record;
pub mod request;
pub mod thread;

pub use anchor::parse_fragment;
pub use comment::{
    validate_body, Author, AuthorId, Comment, CommentId, DELETED_PLACEHOLDER, EMPTY_BODY_MESSAGE,
};
pub use error::{Error, Result, ResultExt};
pub use observer::{Subscribers, Subscription, SubscriptionId};
pub use record::{AuthorRecord, CommentRecord, DeleteConfirmation};
pub use request::{CreateRequest, DestroyRequest, UpdateRequest};
pub use thread::{CommentKey, Notification, Thread, ThreadEndpoints, ThreadEvent, Topic};
