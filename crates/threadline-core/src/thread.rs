//! The ordered comment collection attached to one resource
//!
//! A [`Thread`] is the only owner of persisted comments. Remote operations are
//! split in two halves: a `prepare_*` call validates and builds the request
//! without touching state, and the matching `append_*`/`apply_*` call mutates
//! the thread once the service has answered. Each mutation returns a
//! [`Notification`] naming the subscriptions that should re-render.

use tracing::{debug, info};
use url::Url;

use crate::comment::{validate_body, AuthorId, Comment, CommentId};
use crate::error::{Error, Result};
use crate::observer::{Subscribers, Subscription, SubscriptionId};
use crate::record::CommentRecord;
use crate::request::{CreateRequest, DestroyRequest, UpdateRequest};

/// Stable local identity of a comment inside a thread.
///
/// This is the comment's position. Threads never shrink, so a key is never
/// reused or invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentKey(usize);

impl CommentKey {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Service endpoints for one thread, supplied by the embedding page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadEndpoints {
    thread_url: Url,
    comment_url: Url,
}

impl ThreadEndpoints {
    pub fn new(thread_url: Url, mut comment_url: Url) -> Self {
        if !comment_url.path().ends_with('/') {
            let path = format!("{}/", comment_url.path());
            comment_url.set_path(&path);
        }
        Self {
            thread_url,
            comment_url,
        }
    }

    /// Resolve both endpoints against `base`. Absolute inputs are kept as-is.
    pub fn resolve(base: &Url, thread_url: &str, comment_url: &str) -> Result<Self> {
        Ok(Self::new(base.join(thread_url)?, base.join(comment_url)?))
    }

    /// Endpoint accepting `POST` for new comments
    pub fn thread_url(&self) -> &Url {
        &self.thread_url
    }

    /// `<comment endpoint>/<id>/`
    pub fn comment_url(&self, id: CommentId) -> Result<Url> {
        Ok(self.comment_url.join(&format!("{}/", id))?)
    }
}

/// What a subscriber listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// A comment was appended to the thread
    CommentAdded,
    /// One comment changed in place
    Comment(CommentKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadEvent {
    CommentAdded { key: CommentKey },
    CommentChanged { key: CommentKey },
}

impl ThreadEvent {
    pub fn topic(&self) -> Topic {
        match self {
            ThreadEvent::CommentAdded { .. } => Topic::CommentAdded,
            ThreadEvent::CommentChanged { key } => Topic::Comment(*key),
        }
    }

    pub fn key(&self) -> CommentKey {
        match self {
            ThreadEvent::CommentAdded { key } | ThreadEvent::CommentChanged { key } => *key,
        }
    }
}

/// A thread mutation and the subscriptions registered for it at that moment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub event: ThreadEvent,
    pub recipients: Vec<SubscriptionId>,
}

#[derive(Debug)]
pub struct Thread {
    comments: Vec<Comment>,
    /// Bumped on every in-place change, parallel to `comments`
    revisions: Vec<u64>,
    endpoints: ThreadEndpoints,
    viewer: Option<AuthorId>,
    subscribers: Subscribers<Topic>,
}

impl Thread {
    pub fn new(endpoints: ThreadEndpoints, viewer: Option<AuthorId>) -> Self {
        Self {
            comments: Vec::new(),
            revisions: Vec::new(),
            endpoints,
            viewer,
            subscribers: Subscribers::new(),
        }
    }

    /// Build a thread from the comments already rendered by the server
    pub fn from_records(
        endpoints: ThreadEndpoints,
        viewer: Option<AuthorId>,
        records: &[CommentRecord],
    ) -> Result<Self> {
        let mut thread = Self::new(endpoints, viewer);
        for record in records {
            let owned = thread.viewer == Some(record.author.id);
            thread.push(Comment::from_record(record, owned))?;
        }
        debug!("Seeded thread with {} comments", thread.len());
        Ok(thread)
    }

    pub fn endpoints(&self) -> &ThreadEndpoints {
        &self.endpoints
    }

    pub fn viewer(&self) -> Option<AuthorId> {
        self.viewer
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn get(&self, key: CommentKey) -> Option<&Comment> {
        self.comments.get(key.0)
    }

    pub fn key_of(&self, id: CommentId) -> Option<CommentKey> {
        self.comments
            .iter()
            .position(|c| c.id() == Some(id))
            .map(CommentKey)
    }

    /// Comments in display order
    pub fn iter(&self) -> impl Iterator<Item = (CommentKey, &Comment)> {
        self.comments
            .iter()
            .enumerate()
            .map(|(i, c)| (CommentKey(i), c))
    }

    /// Number of in-place changes applied to the comment so far
    pub fn revision(&self, key: CommentKey) -> Option<u64> {
        self.revisions.get(key.0).copied()
    }

    // ─────────────────────────────────────────────────────────
    // Observers
    // ─────────────────────────────────────────────────────────

    pub fn subscribe(&mut self, topic: Topic) -> Subscription {
        self.subscribers.subscribe(topic)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ─────────────────────────────────────────────────────────
    // Create
    // ─────────────────────────────────────────────────────────

    /// Validate `body` and build the create request. The thread is untouched.
    pub fn prepare_create(&self, body: &str) -> Result<CreateRequest> {
        validate_body(body)?;
        Ok(CreateRequest {
            url: self.endpoints.thread_url.clone(),
            body: body.to_string(),
        })
    }

    /// Append the comment the service created, after everything present.
    ///
    /// Comments created in this session always belong to the viewer.
    pub fn append_created(&mut self, record: &CommentRecord) -> Result<Notification> {
        let key = self.push(Comment::from_record(record, true))?;
        info!("Comment {} added to thread", record.id);
        Ok(self.notify(ThreadEvent::CommentAdded { key }))
    }

    // ─────────────────────────────────────────────────────────
    // Edit
    // ─────────────────────────────────────────────────────────

    pub fn prepare_save(&self, key: CommentKey, body: &str) -> Result<UpdateRequest> {
        let comment = self.get(key).ok_or(Error::UnknownComment)?;
        let id = comment.id().ok_or(Error::NotPersisted)?;
        if !comment.is_editable() {
            return Err(Error::NotEditable);
        }
        validate_body(body)?;
        Ok(UpdateRequest {
            url: self.endpoints.comment_url(id)?,
            id,
            body: body.to_string(),
        })
    }

    /// Merge the saved record over the comment in place
    pub fn apply_saved(&mut self, key: CommentKey, record: &CommentRecord) -> Result<Notification> {
        let comment = self.comments.get_mut(key.0).ok_or(Error::UnknownComment)?;
        comment.merge_record(record)?;
        self.bump(key);
        info!("Comment {} saved", record.id);
        Ok(self.notify(ThreadEvent::CommentChanged { key }))
    }

    // ─────────────────────────────────────────────────────────
    // Delete
    // ─────────────────────────────────────────────────────────

    pub fn prepare_destroy(&self, key: CommentKey) -> Result<DestroyRequest> {
        let comment = self.get(key).ok_or(Error::UnknownComment)?;
        let id = comment.id().ok_or(Error::NotPersisted)?;
        if !comment.is_editable() {
            return Err(Error::NotEditable);
        }
        Ok(DestroyRequest {
            url: self.endpoints.comment_url(id)?,
            id,
        })
    }

    /// Tombstone the comment in place
    pub fn apply_deleted(&mut self, key: CommentKey) -> Result<Notification> {
        let comment = self.comments.get_mut(key.0).ok_or(Error::UnknownComment)?;
        if !comment.is_persisted() {
            return Err(Error::NotPersisted);
        }
        comment.mark_deleted();
        self.bump(key);
        info!("Comment at position {} deleted", key.0);
        Ok(self.notify(ThreadEvent::CommentChanged { key }))
    }

    fn push(&mut self, comment: Comment) -> Result<CommentKey> {
        if let Some(id) = comment.id() {
            if self.key_of(id).is_some() {
                return Err(Error::DuplicateComment { id });
            }
        }
        self.comments.push(comment);
        self.revisions.push(0);
        Ok(CommentKey(self.comments.len() - 1))
    }

    fn bump(&mut self, key: CommentKey) {
        if let Some(rev) = self.revisions.get_mut(key.0) {
            *rev += 1;
        }
    }

    fn notify(&self, event: ThreadEvent) -> Notification {
        Notification {
            event,
            recipients: self.subscribers.recipients(&event.topic()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::DELETED_PLACEHOLDER;
    use crate::record::AuthorRecord;

    fn endpoints() -> ThreadEndpoints {
        ThreadEndpoints::new(
            Url::parse("http://example.test/comments/thread/42/").unwrap(),
            Url::parse("http://example.test/comments").unwrap(),
        )
    }

    fn record(id: u64, author: u64, body: &str) -> CommentRecord {
        CommentRecord {
            id: CommentId(id),
            body: body.to_string(),
            author: AuthorRecord {
                id: AuthorId(author),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
            },
            created_at: None,
            is_deleted: false,
            is_editable: None,
            object_id: Some(42),
        }
    }

    fn seeded() -> Thread {
        Thread::from_records(
            endpoints(),
            Some(AuthorId(1)),
            &[record(10, 1, "mine"), record(11, 2, "theirs")],
        )
        .unwrap()
    }

    #[test]
    fn test_comment_url_keeps_endpoint_path() {
        let url = endpoints().comment_url(CommentId(7)).unwrap();
        assert_eq!(url.as_str(), "http://example.test/comments/7/");
    }

    #[test]
    fn test_resolve_relative_endpoints() {
        let base = Url::parse("http://example.test/").unwrap();
        let endpoints = ThreadEndpoints::resolve(&base, "/threads/3/", "/comments/").unwrap();
        assert_eq!(endpoints.thread_url().as_str(), "http://example.test/threads/3/");
        assert_eq!(
            endpoints.comment_url(CommentId(1)).unwrap().as_str(),
            "http://example.test/comments/1/"
        );
    }

    #[test]
    fn test_seed_ownership_follows_viewer() {
        let thread = seeded();
        let mine = thread.get(thread.key_of(CommentId(10)).unwrap()).unwrap();
        let theirs = thread.get(thread.key_of(CommentId(11)).unwrap()).unwrap();
        assert!(mine.can_modify());
        assert!(!theirs.can_modify());
    }

    #[test]
    fn test_seed_rejects_duplicate_ids() {
        let result = Thread::from_records(
            endpoints(),
            None,
            &[record(1, 1, "a"), record(1, 1, "b")],
        );
        assert!(matches!(
            result,
            Err(Error::DuplicateComment { id: CommentId(1) })
        ));
    }

    #[test]
    fn test_prepare_create_validates_without_mutation() {
        let thread = Thread::new(endpoints(), None);
        assert!(matches!(
            thread.prepare_create("   "),
            Err(Error::Validation { .. })
        ));
        let request = thread.prepare_create("Hello").unwrap();
        assert_eq!(request.body, "Hello");
        assert_eq!(
            request.url.as_str(),
            "http://example.test/comments/thread/42/"
        );
        assert!(thread.is_empty());
    }

    #[test]
    fn test_append_created_orders_by_completion() {
        let mut thread = Thread::new(endpoints(), Some(AuthorId(1)));
        thread.append_created(&record(2, 1, "B")).unwrap();
        thread.append_created(&record(1, 1, "A")).unwrap();
        let bodies: Vec<_> = thread.iter().map(|(_, c)| c.body().to_string()).collect();
        assert_eq!(bodies, vec!["B", "A"]);
    }

    #[test]
    fn test_append_created_rejects_duplicate() {
        let mut thread = seeded();
        assert!(matches!(
            thread.append_created(&record(10, 1, "again")),
            Err(Error::DuplicateComment { .. })
        ));
        assert_eq!(thread.len(), 2);
    }

    #[test]
    fn test_append_notifies_added_subscribers_only() {
        let mut thread = Thread::new(endpoints(), None);
        let added = thread.subscribe(Topic::CommentAdded);
        let other = thread.subscribe(Topic::Comment(CommentKey(0)));

        let note = thread.append_created(&record(5, 1, "x")).unwrap();
        assert_eq!(note.event, ThreadEvent::CommentAdded { key: CommentKey(0) });
        assert_eq!(note.recipients, vec![added.id()]);
        assert!(!note.recipients.contains(&other.id()));
    }

    #[test]
    fn test_prepare_save_builds_put_url() {
        let thread = seeded();
        let key = thread.key_of(CommentId(10)).unwrap();
        let request = thread.prepare_save(key, "edited").unwrap();
        assert_eq!(request.id, CommentId(10));
        assert_eq!(request.url.as_str(), "http://example.test/comments/10/");
    }

    #[test]
    fn test_prepare_save_rejects_blank_body() {
        let thread = seeded();
        let key = thread.key_of(CommentId(10)).unwrap();
        assert!(matches!(
            thread.prepare_save(key, ""),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_apply_saved_merges_in_place() {
        let mut thread = seeded();
        let key = thread.key_of(CommentId(10)).unwrap();
        let sub = thread.subscribe(Topic::Comment(key));

        let note = thread.apply_saved(key, &record(10, 1, "edited")).unwrap();
        assert_eq!(note.recipients, vec![sub.id()]);
        assert_eq!(thread.get(key).unwrap().body(), "edited");
        assert_eq!(thread.revision(key), Some(1));
        assert_eq!(thread.len(), 2);
    }

    #[test]
    fn test_delete_tombstones_and_blocks_further_changes() {
        let mut thread = seeded();
        let key = thread.key_of(CommentId(10)).unwrap();
        thread.prepare_destroy(key).unwrap();
        thread.apply_deleted(key).unwrap();

        let comment = thread.get(key).unwrap();
        assert!(comment.is_deleted());
        assert_eq!(comment.rendered_body(), DELETED_PLACEHOLDER);
        assert_eq!(thread.len(), 2);
        assert!(matches!(thread.prepare_destroy(key), Err(Error::NotEditable)));
        assert!(matches!(
            thread.prepare_save(key, "revive"),
            Err(Error::NotEditable)
        ));
    }

    #[test]
    fn test_late_save_does_not_revive_tombstone() {
        let mut thread = seeded();
        let key = thread.key_of(CommentId(10)).unwrap();
        thread.apply_deleted(key).unwrap();

        let late = CommentRecord {
            is_editable: Some(true),
            ..record(10, 1, "secret")
        };
        assert!(matches!(
            thread.apply_saved(key, &late),
            Err(Error::NotEditable)
        ));

        let comment = thread.get(key).unwrap();
        assert!(comment.is_deleted());
        assert!(!comment.is_editable());
        assert_eq!(comment.body(), "");
        assert_eq!(comment.rendered_body(), DELETED_PLACEHOLDER);
        assert_eq!(thread.revision(key), Some(1));
    }

    #[test]
    fn test_unsubscribed_presenter_is_not_notified() {
        let mut thread = seeded();
        let key = thread.key_of(CommentId(10)).unwrap();
        let sub = thread.subscribe(Topic::Comment(key));
        let id = sub.id();
        assert!(thread.unsubscribe(sub));

        let note = thread.apply_deleted(key).unwrap();
        assert!(!note.recipients.contains(&id));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut thread = seeded();
        assert!(matches!(
            thread.apply_deleted(CommentKey(99)),
            Err(Error::UnknownComment)
        ));
    }
}
