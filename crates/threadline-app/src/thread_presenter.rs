//! Renders the thread and keeps the list in step with its notifications

use threadline_core::prelude::*;
use threadline_core::{
    parse_fragment, CommentId, CommentKey, Notification, Subscription, Thread, ThreadEvent, Topic,
};

use crate::comment_presenter::CommentPresenter;
use crate::form::{CloseReason, FormController, FormSlot};
use crate::view::{AddCommentView, CommentView, ThreadView};

#[derive(Debug)]
pub struct ThreadPresenter {
    added: Subscription,
    comments: Vec<CommentPresenter>,
    add_form: Option<FormController>,
    /// Decided once at construction from the page fragment
    highlighted: Option<CommentId>,
    focused: Option<FormSlot>,
}

impl ThreadPresenter {
    /// Mount presenters for the comments already in `thread`.
    ///
    /// `fragment` is the page's addressed fragment, e.g. `#comment-12`. The
    /// highlight only applies if that comment is part of this thread.
    pub fn new(thread: &mut Thread, fragment: Option<&str>) -> Self {
        let added = thread.subscribe(Topic::CommentAdded);
        let keys: Vec<CommentKey> = thread.iter().map(|(key, _)| key).collect();
        let comments = keys
            .into_iter()
            .map(|key| CommentPresenter::mount(thread, key))
            .collect();
        let highlighted = fragment
            .and_then(parse_fragment)
            .filter(|id| thread.key_of(*id).is_some());
        if let Some(id) = highlighted {
            debug!("Highlighting comment {} from page fragment", id);
        }
        Self {
            added,
            comments,
            add_form: None,
            highlighted,
            focused: None,
        }
    }

    pub fn highlighted(&self) -> Option<CommentId> {
        self.highlighted
    }

    pub fn presenters(&self) -> &[CommentPresenter] {
        &self.comments
    }

    pub fn presenter(&self, key: CommentKey) -> Option<&CommentPresenter> {
        self.comments.iter().find(|p| p.key() == key)
    }

    pub fn presenter_mut(&mut self, key: CommentKey) -> Option<&mut CommentPresenter> {
        self.comments.iter_mut().find(|p| p.key() == key)
    }

    /// Route a thread notification to its recipients
    pub fn handle_notification(&mut self, thread: &mut Thread, notification: &Notification) {
        match notification.event {
            ThreadEvent::CommentAdded { key } => {
                if notification.recipients.contains(&self.added.id()) {
                    // Appending is the only insertion point
                    self.comments.push(CommentPresenter::mount(thread, key));
                }
            }
            ThreadEvent::CommentChanged { .. } => {
                for presenter in &mut self.comments {
                    if notification.recipients.contains(&presenter.subscription_id()) {
                        presenter.refresh(thread);
                    }
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // Forms
    // ─────────────────────────────────────────────────────────

    /// Open the creation form, or refocus it if it is already open.
    ///
    /// Returns true if a new form was opened.
    pub fn open_add_form(&mut self) -> bool {
        let opened = if self.add_form.is_none() {
            self.add_form = Some(FormController::for_create());
            true
        } else {
            false
        };
        self.focus(FormSlot::AddComment);
        opened
    }

    /// Open the edit form of a comment, or refocus the one already open
    pub fn open_edit_form(&mut self, thread: &Thread, key: CommentKey) -> Result<bool> {
        let presenter = self.presenter_mut(key).ok_or(Error::UnknownComment)?;
        let opened = presenter.open_edit(thread)?;
        self.focus(FormSlot::Edit(key));
        Ok(opened)
    }

    pub fn form(&self, slot: FormSlot) -> Option<&FormController> {
        match slot {
            FormSlot::AddComment => self.add_form.as_ref(),
            FormSlot::Edit(key) => self.presenter(key)?.form(),
        }
    }

    pub fn form_mut(&mut self, slot: FormSlot) -> Option<&mut FormController> {
        match slot {
            FormSlot::AddComment => self.add_form.as_mut(),
            FormSlot::Edit(key) => self.presenter_mut(key)?.form_mut(),
        }
    }

    /// Slots with a mounted form, creation form first
    pub fn open_slots(&self) -> Vec<FormSlot> {
        let mut slots = Vec::new();
        if self.add_form.is_some() {
            slots.push(FormSlot::AddComment);
        }
        slots.extend(
            self.comments
                .iter()
                .filter(|p| p.form().is_some())
                .map(|p| FormSlot::Edit(p.key())),
        );
        slots
    }

    /// Unmount a form. Focus moves to another open form, if any.
    pub fn close_form(&mut self, slot: FormSlot, reason: CloseReason, thread: &Thread) {
        match slot {
            FormSlot::AddComment => {
                self.add_form = None;
            }
            FormSlot::Edit(key) => {
                if let Some(presenter) = self.presenter_mut(key) {
                    presenter.close_edit(reason, thread);
                }
            }
        }
        debug!("Form {:?} closed ({:?})", slot, reason);
        if self.focused == Some(slot) {
            self.focused = None;
            if let Some(next) = self.open_slots().first().copied() {
                self.focus(next);
            }
        }
    }

    pub fn focused_slot(&self) -> Option<FormSlot> {
        self.focused
    }

    /// Focus one form and blur every other
    pub fn focus(&mut self, slot: FormSlot) {
        for other in self.open_slots() {
            if let Some(form) = self.form_mut(other) {
                if other == slot {
                    form.focus();
                } else {
                    form.blur();
                }
            }
        }
        if self.form(slot).is_some() {
            self.focused = Some(slot);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────

    pub fn render(&self, thread: &Thread) -> ThreadView {
        // The empty-list scaffold only exists while there is something to put in it
        let list = if thread.is_empty() && self.add_form.is_none() {
            None
        } else {
            Some(
                self.comments
                    .iter()
                    .filter_map(CommentPresenter::view)
                    .collect::<Vec<CommentView>>(),
            )
        };
        let add_comment = match &self.add_form {
            Some(form) => AddCommentView::Form { form: form.view() },
            None => AddCommentView::Affordance,
        };
        ThreadView {
            list,
            add_comment,
            highlighted: self.highlighted,
        }
    }

    /// Unsubscribe everything on teardown
    pub fn dispose(self, thread: &mut Thread) {
        thread.unsubscribe(self.added);
        for presenter in self.comments {
            presenter.dispose(thread);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadline_core::{AuthorId, AuthorRecord, CommentRecord, ThreadEndpoints};
    use url::Url;

    fn record(id: u64, body: &str) -> CommentRecord {
        CommentRecord {
            id: CommentId(id),
            body: body.to_string(),
            author: AuthorRecord {
                id: AuthorId(1),
                first_name: "Ada".to_string(),
                last_name: String::new(),
            },
            created_at: None,
            is_deleted: false,
            is_editable: None,
            object_id: None,
        }
    }

    fn thread_with(records: &[CommentRecord]) -> Thread {
        Thread::from_records(
            ThreadEndpoints::new(
                Url::parse("http://example.test/t/").unwrap(),
                Url::parse("http://example.test/c/").unwrap(),
            ),
            Some(AuthorId(1)),
            records,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_thread_has_no_scaffold() {
        let mut thread = thread_with(&[]);
        let presenter = ThreadPresenter::new(&mut thread, None);
        let view = presenter.render(&thread);
        assert!(view.list.is_none());
        assert_eq!(view.add_comment, AddCommentView::Affordance);
    }

    #[test]
    fn test_opening_form_materializes_scaffold_and_closing_reverts() {
        let mut thread = thread_with(&[]);
        let mut presenter = ThreadPresenter::new(&mut thread, None);

        presenter.open_add_form();
        let view = presenter.render(&thread);
        assert_eq!(view.list, Some(Vec::new()));
        assert!(matches!(view.add_comment, AddCommentView::Form { .. }));

        presenter.close_form(FormSlot::AddComment, CloseReason::Cancelled, &thread);
        let view = presenter.render(&thread);
        assert!(view.list.is_none());
        assert_eq!(view.add_comment, AddCommentView::Affordance);
    }

    #[test]
    fn test_add_form_opened_twice_is_one_focused_form() {
        let mut thread = thread_with(&[]);
        let mut presenter = ThreadPresenter::new(&mut thread, None);

        assert!(presenter.open_add_form());
        presenter
            .form_mut(FormSlot::AddComment)
            .unwrap()
            .set_body("draft");
        assert!(!presenter.open_add_form());

        assert_eq!(presenter.open_slots(), vec![FormSlot::AddComment]);
        assert_eq!(presenter.focused_slot(), Some(FormSlot::AddComment));
        let form = presenter.form(FormSlot::AddComment).unwrap();
        assert!(form.is_focused());
        assert_eq!(form.body(), "draft");
    }

    #[test]
    fn test_added_notification_appends_presenter() {
        let mut thread = thread_with(&[record(1, "first")]);
        let mut presenter = ThreadPresenter::new(&mut thread, None);

        let note = thread.append_created(&record(2, "second")).unwrap();
        presenter.handle_notification(&mut thread, &note);

        let ids: Vec<_> = presenter
            .render(&thread)
            .list
            .unwrap()
            .iter()
            .map(CommentView::id)
            .collect();
        assert_eq!(ids, vec![CommentId(1), CommentId(2)]);
    }

    #[test]
    fn test_changed_notification_refreshes_only_target() {
        let mut thread = thread_with(&[record(1, "first"), record(2, "second")]);
        let mut presenter = ThreadPresenter::new(&mut thread, None);
        let key = thread.key_of(CommentId(2)).unwrap();

        let note = thread.apply_deleted(key).unwrap();
        presenter.handle_notification(&mut thread, &note);

        let list = presenter.render(&thread).list.unwrap();
        assert!(matches!(list[0], CommentView::Populated { .. }));
        assert!(matches!(list[1], CommentView::Tombstone { .. }));
    }

    #[test]
    fn test_focus_moves_between_forms() {
        let mut thread = thread_with(&[record(1, "first")]);
        let mut presenter = ThreadPresenter::new(&mut thread, None);
        let key = thread.key_of(CommentId(1)).unwrap();

        presenter.open_add_form();
        presenter.open_edit_form(&thread, key).unwrap();
        assert_eq!(presenter.focused_slot(), Some(FormSlot::Edit(key)));
        assert!(!presenter.form(FormSlot::AddComment).unwrap().is_focused());

        presenter.close_form(FormSlot::Edit(key), CloseReason::Cancelled, &thread);
        assert_eq!(presenter.focused_slot(), Some(FormSlot::AddComment));
        assert!(presenter.form(FormSlot::AddComment).unwrap().is_focused());
    }

    #[test]
    fn test_deep_link_highlight_is_evaluated_once() {
        let mut thread = thread_with(&[record(1, "first")]);
        let presenter = ThreadPresenter::new(&mut thread, Some("#comment-1"));
        assert_eq!(presenter.highlighted(), Some(CommentId(1)));
        assert_eq!(presenter.render(&thread).highlighted, Some(CommentId(1)));
    }

    #[test]
    fn test_deep_link_to_other_thread_is_ignored() {
        let mut thread = thread_with(&[record(1, "first")]);
        let mut presenter = ThreadPresenter::new(&mut thread, Some("#comment-9"));
        assert_eq!(presenter.highlighted(), None);

        // A later comment with the addressed id does not trigger the highlight
        let note = thread.append_created(&record(9, "late")).unwrap();
        presenter.handle_notification(&mut thread, &note);
        assert_eq!(presenter.render(&thread).highlighted, None);
    }

    #[test]
    fn test_dispose_releases_all_subscriptions() {
        let mut thread = thread_with(&[record(1, "a"), record(2, "b")]);
        let presenter = ThreadPresenter::new(&mut thread, None);
        assert_eq!(thread.subscriber_count(), 3);
        presenter.dispose(&mut thread);
        assert_eq!(thread.subscriber_count(), 0);
    }
}
