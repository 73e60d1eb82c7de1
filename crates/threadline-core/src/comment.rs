//! Comment entity and its validation rule

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::CommentRecord;

/// Rendered in place of the body once a comment is deleted
pub const DELETED_PLACEHOLDER: &str = "This comment has been deleted.";

/// Inline message shown when a submitted body is blank
pub const EMPTY_BODY_MESSAGE: &str = "Your comment can't be empty!";

/// Server-assigned comment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub u64);

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: Option<AuthorId>,
    pub display_name: String,
    /// Opaque link target for the author's profile
    pub profile_ref: String,
}

/// Check a body before any request is issued.
///
/// The trimmed body must be non-empty.
pub fn validate_body(body: &str) -> Result<()> {
    if body.trim().is_empty() {
        return Err(Error::validation(EMPTY_BODY_MESSAGE));
    }
    Ok(())
}

/// One comment in a thread, or a draft owned by a form.
///
/// Fields are read through accessors so the tombstone invariant cannot be
/// broken from outside: once deleted, a comment is not editable and its
/// body is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: Option<CommentId>,
    body: String,
    author: Author,
    is_owned_by_viewer: bool,
    is_editable: bool,
    is_deleted: bool,
    created_at: Option<String>,
}

impl Comment {
    /// An unsaved comment with an empty body
    pub fn draft() -> Self {
        Self {
            id: None,
            body: String::new(),
            author: Author::default(),
            is_owned_by_viewer: true,
            is_editable: true,
            is_deleted: false,
            created_at: None,
        }
    }

    /// Build a persisted comment from a server record.
    ///
    /// `owned` decides whether the viewer gets edit/delete affordances.
    pub fn from_record(record: &CommentRecord, owned: bool) -> Self {
        let mut comment = Self {
            id: Some(record.id),
            body: String::new(),
            author: Author::default(),
            is_owned_by_viewer: owned,
            is_editable: true,
            is_deleted: false,
            created_at: None,
        };
        comment.apply_record_fields(record);
        comment
    }

    /// Copy of this comment for a form to work on
    pub fn to_draft(&self) -> Self {
        self.clone()
    }

    pub fn id(&self) -> Option<CommentId> {
        self.id
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn is_owned_by_viewer(&self) -> bool {
        self.is_owned_by_viewer
    }

    pub fn is_editable(&self) -> bool {
        self.is_editable
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether edit/delete affordances are shown
    pub fn can_modify(&self) -> bool {
        self.is_owned_by_viewer && self.is_editable && !self.is_deleted
    }

    /// Text to display: the body, or the placeholder once deleted
    pub fn rendered_body(&self) -> &str {
        if self.is_deleted {
            DELETED_PLACEHOLDER
        } else {
            &self.body
        }
    }

    /// Fragment identifying this comment on the page (`comment-<id>`)
    pub fn anchor(&self) -> Option<String> {
        self.id.map(|id| format!("comment-{}", id))
    }

    /// Working text of a form's copy. Deleted comments keep no body.
    pub fn set_body(&mut self, body: impl Into<String>) {
        if !self.is_deleted {
            self.body = body.into();
        }
    }

    /// Merge a server response over this comment, keeping its identity.
    ///
    /// A tombstone is final: merging into a deleted comment fails with
    /// [`Error::NotEditable`] and leaves it untouched.
    pub fn merge_record(&mut self, record: &CommentRecord) -> Result<()> {
        match self.id {
            Some(id) if id != record.id => return Err(Error::UnknownComment),
            None => return Err(Error::NotPersisted),
            Some(_) => {}
        }
        if self.is_deleted {
            return Err(Error::NotEditable);
        }
        self.apply_record_fields(record);
        Ok(())
    }

    /// Tombstone transition. The original text is forgotten.
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.is_editable = false;
        self.body.clear();
    }

    fn apply_record_fields(&mut self, record: &CommentRecord) {
        self.body = record.body.clone();
        self.author = Author {
            id: Some(record.author.id),
            display_name: record.author.display_name(),
            profile_ref: record.author.profile_ref(),
        };
        if record.created_at.is_some() {
            self.created_at = record.created_at.clone();
        }
        if let Some(editable) = record.is_editable {
            self.is_editable = editable;
        }
        if record.is_deleted {
            self.mark_deleted();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AuthorRecord;

    fn record(id: u64, body: &str) -> CommentRecord {
        CommentRecord {
            id: CommentId(id),
            body: body.to_string(),
            author: AuthorRecord {
                id: AuthorId(4),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            },
            created_at: Some("2012-06-01 10:15:00".to_string()),
            is_deleted: false,
            is_editable: None,
            object_id: Some(3),
        }
    }

    #[test]
    fn test_validate_rejects_blank_bodies() {
        for body in ["", " ", "\n\t  ", "\u{3000}"] {
            let err = validate_body(body).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "{:?}", body);
            assert_eq!(err.to_string(), EMPTY_BODY_MESSAGE);
        }
    }

    #[test]
    fn test_validate_accepts_text() {
        assert!(validate_body("Hello").is_ok());
        assert!(validate_body("  padded  ").is_ok());
    }

    #[test]
    fn test_draft_has_no_id() {
        let draft = Comment::draft();
        assert!(!draft.is_persisted());
        assert_eq!(draft.body(), "");
        assert!(draft.can_modify());
    }

    #[test]
    fn test_from_record_fills_fields() {
        let comment = Comment::from_record(&record(7, "Hello"), true);
        assert_eq!(comment.id(), Some(CommentId(7)));
        assert_eq!(comment.body(), "Hello");
        assert_eq!(comment.author().display_name, "Ada Lovelace");
        assert_eq!(comment.author().profile_ref, "/users/4/");
        assert_eq!(comment.anchor().as_deref(), Some("comment-7"));
        assert!(comment.is_owned_by_viewer());
        assert!(comment.is_editable());
    }

    #[test]
    fn test_not_owned_comment_has_no_affordances() {
        let comment = Comment::from_record(&record(7, "Hello"), false);
        assert!(!comment.can_modify());
    }

    #[test]
    fn test_deleted_record_becomes_tombstone() {
        let mut rec = record(7, "secret");
        rec.is_deleted = true;
        let comment = Comment::from_record(&rec, true);
        assert!(comment.is_deleted());
        assert!(!comment.is_editable());
        assert_eq!(comment.body(), "");
        assert_eq!(comment.rendered_body(), DELETED_PLACEHOLDER);
    }

    #[test]
    fn test_merge_keeps_identity_and_ownership() {
        let mut comment = Comment::from_record(&record(3, "before"), true);
        comment.merge_record(&record(3, "after")).unwrap();
        assert_eq!(comment.id(), Some(CommentId(3)));
        assert_eq!(comment.body(), "after");
        assert!(comment.is_owned_by_viewer());
    }

    #[test]
    fn test_merge_rejects_other_identity() {
        let mut comment = Comment::from_record(&record(3, "before"), true);
        assert!(matches!(
            comment.merge_record(&record(4, "other")),
            Err(Error::UnknownComment)
        ));
        assert_eq!(comment.body(), "before");
    }

    #[test]
    fn test_merge_into_draft_is_rejected() {
        let mut draft = Comment::draft();
        assert!(matches!(
            draft.merge_record(&record(1, "x")),
            Err(Error::NotPersisted)
        ));
    }

    #[test]
    fn test_mark_deleted_forgets_body() {
        let mut comment = Comment::from_record(&record(3, "private words"), true);
        comment.mark_deleted();
        assert!(comment.is_deleted());
        assert!(!comment.is_editable());
        assert!(!comment.can_modify());
        assert_eq!(comment.body(), "");
        assert_ne!(comment.rendered_body(), "private words");
        assert_eq!(comment.rendered_body(), DELETED_PLACEHOLDER);
    }

    #[test]
    fn test_merge_with_deleted_flag_tombstones() {
        let mut comment = Comment::from_record(&record(3, "text"), true);
        let mut rec = record(3, "text");
        rec.is_deleted = true;
        comment.merge_record(&rec).unwrap();
        assert!(comment.is_deleted());
        assert_eq!(comment.body(), "");
    }

    #[test]
    fn test_to_draft_is_independent_copy() {
        let comment = Comment::from_record(&record(3, "text"), true);
        let mut draft = comment.to_draft();
        assert_eq!(draft, comment);
        draft.set_body("changed");
        assert_eq!(comment.body(), "text");
        assert_eq!(draft.id(), comment.id());
    }

    #[test]
    fn test_set_body_ignored_on_tombstone() {
        let mut comment = Comment::from_record(&record(3, "text"), true);
        comment.mark_deleted();
        comment.set_body("revived");
        assert_eq!(comment.body(), "");
    }
}
