//! Wire representations returned by the comment service
//!
//! The service answers create and edit requests with a JSON object:
//!
//! ```json
//! {
//!   "author": {"first_name": "Ada", "id": 4, "last_name": "Lovelace"},
//!   "body": "Hello",
//!   "created_at": "2012-06-01 10:15:00",
//!   "id": 7,
//!   "is_deleted": false,
//!   "object_id": 3
//! }
//! ```
//!
//! Delete requests answer with a bare `200`, optionally carrying
//! `{"is_deleted": true}`.

use serde::{Deserialize, Serialize};

use crate::comment::{AuthorId, CommentId};
use crate::error::Result;

/// Author fields as sent by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub id: AuthorId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl AuthorRecord {
    /// "First Last", collapsing missing halves
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Link target of the author's profile page
    pub fn profile_ref(&self) -> String {
        format!("/users/{}/", self.id)
    }
}

/// Canonical comment fields as sent by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: CommentId,
    #[serde(default)]
    pub body: String,
    pub author: AuthorRecord,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    /// Only present when the service overrides the default (editable unless deleted)
    #[serde(default)]
    pub is_editable: Option<bool>,
    #[serde(default)]
    pub object_id: Option<u64>,
}

impl CommentRecord {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Response to a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    #[serde(default = "confirmed")]
    pub is_deleted: bool,
}

fn confirmed() -> bool {
    true
}

impl DeleteConfirmation {
    /// Parse a delete response body. An empty body is a confirmation.
    pub fn parse(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self { is_deleted: true });
        }
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATED: &str = r#"{
        "author": {"first_name": "Ada", "id": 4, "last_name": "Lovelace"},
        "body": "Hello",
        "created_at": "2012-06-01 10:15:00",
        "id": 7,
        "is_deleted": false,
        "object_id": 3
    }"#;

    #[test]
    fn test_parse_created_record() {
        let record = CommentRecord::parse(CREATED).unwrap();
        assert_eq!(record.id, CommentId(7));
        assert_eq!(record.body, "Hello");
        assert_eq!(record.author.id, AuthorId(4));
        assert_eq!(record.object_id, Some(3));
        assert!(!record.is_deleted);
        assert_eq!(record.is_editable, None);
    }

    #[test]
    fn test_author_display_name_and_profile() {
        let record = CommentRecord::parse(CREATED).unwrap();
        assert_eq!(record.author.display_name(), "Ada Lovelace");
        assert_eq!(record.author.profile_ref(), "/users/4/");
    }

    #[test]
    fn test_display_name_without_last_name() {
        let author = AuthorRecord {
            id: AuthorId(1),
            first_name: "Ada".to_string(),
            last_name: String::new(),
        };
        assert_eq!(author.display_name(), "Ada");
    }

    #[test]
    fn test_minimal_record_uses_defaults() {
        let record = CommentRecord::parse(r#"{"id": 1, "author": {"id": 2}}"#).unwrap();
        assert_eq!(record.body, "");
        assert_eq!(record.created_at, None);
        assert!(!record.is_deleted);
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        assert!(CommentRecord::parse(r#"{"body": "x", "author": {"id": 2}}"#).is_err());
    }

    #[test]
    fn test_empty_delete_response_confirms() {
        assert!(DeleteConfirmation::parse("").unwrap().is_deleted);
        assert!(DeleteConfirmation::parse("  \n").unwrap().is_deleted);
    }

    #[test]
    fn test_delete_response_with_flag() {
        assert!(DeleteConfirmation::parse(r#"{"is_deleted": true}"#).unwrap().is_deleted);
        assert!(!DeleteConfirmation::parse(r#"{"is_deleted": false}"#).unwrap().is_deleted);
        assert!(DeleteConfirmation::parse("{}").unwrap().is_deleted);
    }
}
