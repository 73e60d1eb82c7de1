//! Presentation fragments
//!
//! These are the fields each rendered fragment consumes. Markup is left to
//! whoever draws them; runners serialize them as JSON.

use serde::Serialize;
use threadline_core::{Comment, CommentId, DELETED_PLACEHOLDER};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorView {
    pub name: String,
    /// Link target of the author's profile
    pub profile: String,
}

/// One comment, keyed by whether it is deleted and whether it is being edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CommentView {
    Populated {
        id: CommentId,
        body: String,
        author: AuthorView,
        /// Edit/delete controls shown
        controls: bool,
    },
    Tombstone {
        id: CommentId,
        placeholder: String,
    },
    Editing {
        id: CommentId,
        form: FormView,
    },
}

impl CommentView {
    /// Render a persisted comment. Drafts have nothing to show.
    pub fn from_comment(comment: &Comment) -> Option<Self> {
        let id = comment.id()?;
        if comment.is_deleted() {
            return Some(Self::Tombstone {
                id,
                placeholder: DELETED_PLACEHOLDER.to_string(),
            });
        }
        Some(Self::Populated {
            id,
            body: comment.body().to_string(),
            author: AuthorView {
                name: comment.author().display_name.clone(),
                profile: comment.author().profile_ref.clone(),
            },
            controls: comment.can_modify(),
        })
    }

    pub fn id(&self) -> CommentId {
        match self {
            Self::Populated { id, .. } | Self::Tombstone { id, .. } | Self::Editing { id, .. } => {
                *id
            }
        }
    }

    /// Same fragment with edit/delete controls hidden
    pub fn without_controls(mut self) -> Self {
        if let Self::Populated { controls, .. } = &mut self {
            *controls = false;
        }
        self
    }
}

/// Textarea with submit and cancel controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub body: String,
    /// "Add" for a new comment, "Save" for an edit
    pub submit_label: String,
    /// Input and buttons disabled while a request is in flight
    pub disabled: bool,
    pub error: Option<String>,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AddCommentView {
    /// The "add comment" entry point
    Affordance,
    Form { form: FormView },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadView {
    /// `None` while the thread is empty and no creation form is open
    pub list: Option<Vec<CommentView>>,
    pub add_comment: AddCommentView,
    /// Comment addressed by the page fragment at load time
    pub highlighted: Option<CommentId>,
}
