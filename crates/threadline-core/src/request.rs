//! Prepared remote operations
//!
//! A request descriptor is only built after client-side validation passed,
//! so holding one means the request may be sent as-is.

use url::Url;

use crate::comment::CommentId;

/// `POST <thread-endpoint>` with `body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub url: Url,
    pub body: String,
}

/// `PUT <comment-endpoint>/<id>/` with `body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub url: Url,
    pub id: CommentId,
    pub body: String,
}

/// `DELETE <comment-endpoint>/<id>/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyRequest {
    pub url: Url,
    pub id: CommentId,
}
