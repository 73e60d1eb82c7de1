//! Renders one comment and owns its edit form

use threadline_core::prelude::*;
use threadline_core::{CommentKey, Subscription, SubscriptionId, Thread, Topic};

use crate::form::{CloseReason, FormController};
use crate::message::RequestId;
use crate::view::CommentView;

/// Shown as a blocking alert when a delete request fails
pub const DELETE_FAILED_MESSAGE: &str = "Something broke and your comment couldn't be deleted.";

#[derive(Debug)]
pub struct CommentPresenter {
    key: CommentKey,
    subscription: Subscription,
    /// Last rendered fragment, refreshed on notification
    rendered: Option<CommentView>,
    /// Content set aside while the edit form occupies the slot
    detached: Option<Option<CommentView>>,
    form: Option<FormController>,
    pending_delete: Option<RequestId>,
}

impl CommentPresenter {
    /// Subscribe to the comment at `key` and render it
    pub fn mount(thread: &mut Thread, key: CommentKey) -> Self {
        let subscription = thread.subscribe(Topic::Comment(key));
        let rendered = thread.get(key).and_then(CommentView::from_comment);
        Self {
            key,
            subscription,
            rendered,
            detached: None,
            form: None,
            pending_delete: None,
        }
    }

    pub fn key(&self) -> CommentKey {
        self.key
    }

    pub fn subscription_id(&self) -> SubscriptionId {
        self.subscription.id()
    }

    /// Re-render from the thread after a change notification
    pub fn refresh(&mut self, thread: &Thread) {
        self.rendered = thread.get(self.key).and_then(CommentView::from_comment);
    }

    pub fn view(&self) -> Option<CommentView> {
        if let Some(form) = &self.form {
            let id = self.detached.as_ref()?.as_ref()?.id();
            return Some(CommentView::Editing {
                id,
                form: form.view(),
            });
        }
        let view = self.rendered.clone()?;
        if self.pending_delete.is_some() {
            Some(view.without_controls())
        } else {
            Some(view)
        }
    }

    // ─────────────────────────────────────────────────────────
    // Edit
    // ─────────────────────────────────────────────────────────

    pub fn form(&self) -> Option<&FormController> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormController> {
        self.form.as_mut()
    }

    /// Swap the rendered content for an edit form.
    ///
    /// Returns false if a form was already mounted; the existing one is kept.
    pub fn open_edit(&mut self, thread: &Thread) -> Result<bool> {
        if self.form.is_some() {
            return Ok(false);
        }
        let comment = thread.get(self.key).ok_or(Error::UnknownComment)?;
        if !comment.can_modify() || self.pending_delete.is_some() {
            return Err(Error::NotEditable);
        }
        self.detached = Some(self.rendered.take());
        self.form = Some(FormController::for_edit(self.key, comment));
        Ok(true)
    }

    /// Unmount the edit form.
    ///
    /// A cancel puts the detached content back untouched. A successful save
    /// drops it and renders the updated comment instead.
    pub fn close_edit(&mut self, reason: CloseReason, thread: &Thread) {
        if self.form.take().is_none() {
            return;
        }
        let detached = self.detached.take().flatten();
        match reason {
            CloseReason::Cancelled => self.rendered = detached,
            CloseReason::Submitted => self.refresh(thread),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Delete
    // ─────────────────────────────────────────────────────────

    pub fn pending_delete(&self) -> Option<RequestId> {
        self.pending_delete
    }

    /// Hide the controls while the delete request is in flight
    pub fn begin_delete(&mut self, request: RequestId) {
        self.pending_delete = Some(request);
    }

    pub fn finish_delete(&mut self, request: RequestId) -> bool {
        if self.pending_delete != Some(request) {
            return false;
        }
        self.pending_delete = None;
        true
    }

    /// Restore the pre-delete appearance. Returns false for a stale request.
    pub fn rollback_delete(&mut self, request: RequestId) -> bool {
        self.finish_delete(request)
    }

    /// Unsubscribe on teardown
    pub fn dispose(self, thread: &mut Thread) {
        thread.unsubscribe(self.subscription);
    }
}
