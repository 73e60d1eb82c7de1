//! Comment service trait

use threadline_core::prelude::*;
use threadline_core::{
    CommentRecord, CreateRequest, DeleteConfirmation, DestroyRequest, UpdateRequest,
};

/// Anti-forgery header sent with every state-changing request.
///
/// The token value is produced outside this crate; it is only carried here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntiForgery {
    pub header: String,
    pub token: String,
}

impl AntiForgery {
    pub fn new(header: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            token: token.into(),
        }
    }
}

/// Remote comment operations
///
/// Any non-success outcome, transport or status, is reported as
/// [`Error::Request`]. Callers do not distinguish between them.
#[trait_variant::make(CommentService: Send)]
pub trait LocalCommentService {
    /// `POST` the body to the thread endpoint
    async fn create(&self, request: &CreateRequest) -> Result<CommentRecord>;

    /// `PUT` the body to the comment endpoint
    async fn update(&self, request: &UpdateRequest) -> Result<CommentRecord>;

    /// `DELETE` the comment
    async fn destroy(&self, request: &DestroyRequest) -> Result<DeleteConfirmation>;
}
