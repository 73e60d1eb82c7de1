//! Test utilities for the remote boundary
//!
//! [`FakeCommentService`] answers in memory. By default every call succeeds
//! immediately; individual calls can be scripted to fail or to wait on a
//! [`Gate`] so tests control the order in which completions arrive.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use threadline_core::prelude::*;
use threadline_core::{
    AuthorId, AuthorRecord, CommentId, CommentRecord, CreateRequest, DeleteConfirmation,
    DestroyRequest, UpdateRequest,
};
use tokio::sync::oneshot;

use crate::service::CommentService;

/// One request as seen by the fake service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Create { url: String, body: String },
    Update { url: String, id: CommentId, body: String },
    Destroy { url: String, id: CommentId },
}

#[derive(Debug)]
enum Outcome {
    Succeed,
    Fail(String),
}

#[derive(Debug)]
enum Script {
    Fail(String),
    Gated(oneshot::Receiver<Outcome>),
}

/// Holds one scripted call until released
#[derive(Debug)]
pub struct Gate {
    tx: oneshot::Sender<Outcome>,
}

impl Gate {
    /// Let the call complete successfully
    pub fn succeed(self) {
        let _ = self.tx.send(Outcome::Succeed);
    }

    /// Let the call fail with `message`
    pub fn fail(self, message: impl Into<String>) {
        let _ = self.tx.send(Outcome::Fail(message.into()));
    }
}

#[derive(Debug)]
struct FakeState {
    next_id: u64,
    author: AuthorRecord,
    records: HashMap<CommentId, CommentRecord>,
    scripts: VecDeque<Script>,
    calls: Vec<ServiceCall>,
}

/// In-memory comment service
#[derive(Debug)]
pub struct FakeCommentService {
    state: Mutex<FakeState>,
}

impl Default for FakeCommentService {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCommentService {
    /// Service whose created comments are written by author 1, ids from 1
    pub fn new() -> Self {
        Self::with_author(test_author(1))
    }

    pub fn with_author(author: AuthorRecord) -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 1,
                author,
                records: HashMap::new(),
                scripts: VecDeque::new(),
                calls: Vec::new(),
            }),
        }
    }

    /// First id handed out on create
    pub fn starting_at(self, id: u64) -> Self {
        self.lock().next_id = id;
        self
    }

    /// Make existing comments known so updates answer with their full record
    pub fn seed(&self, records: &[CommentRecord]) {
        let mut state = self.lock();
        for record in records {
            state.records.insert(record.id, record.clone());
        }
    }

    /// The next call fails immediately
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().scripts.push_back(Script::Fail(message.into()));
    }

    /// The next call waits until the returned gate is released
    pub fn gate_next(&self) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.lock().scripts.push_back(Script::Gated(rx));
        Gate { tx }
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call and take its script. The lock is released on return.
    fn begin(&self, call: ServiceCall) -> Option<Script> {
        let mut state = self.lock();
        state.calls.push(call);
        state.scripts.pop_front()
    }
}

async fn resolve(script: Option<Script>) -> Result<()> {
    match script {
        None => Ok(()),
        Some(Script::Fail(message)) => Err(Error::request(message)),
        Some(Script::Gated(rx)) => match rx.await {
            Ok(Outcome::Succeed) => Ok(()),
            Ok(Outcome::Fail(message)) => Err(Error::request(message)),
            Err(_) => Err(Error::request("gate dropped")),
        },
    }
}

impl CommentService for FakeCommentService {
    async fn create(&self, request: &CreateRequest) -> Result<CommentRecord> {
        let script = self.begin(ServiceCall::Create {
            url: request.url.to_string(),
            body: request.body.clone(),
        });
        // Ids follow request order, not completion order
        let record = {
            let mut state = self.lock();
            let id = CommentId(state.next_id);
            state.next_id += 1;
            CommentRecord {
                id,
                body: request.body.clone(),
                author: state.author.clone(),
                created_at: Some("2012-06-01 10:15:00".to_string()),
                is_deleted: false,
                is_editable: None,
                object_id: None,
            }
        };
        resolve(script).await?;
        self.lock().records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, request: &UpdateRequest) -> Result<CommentRecord> {
        let script = self.begin(ServiceCall::Update {
            url: request.url.to_string(),
            id: request.id,
            body: request.body.clone(),
        });
        resolve(script).await?;

        let mut state = self.lock();
        let author = state.author.clone();
        let record = state
            .records
            .entry(request.id)
            .or_insert_with(|| CommentRecord {
                id: request.id,
                body: String::new(),
                author,
                created_at: None,
                is_deleted: false,
                is_editable: None,
                object_id: None,
            });
        record.body = request.body.clone();
        Ok(record.clone())
    }

    async fn destroy(&self, request: &DestroyRequest) -> Result<DeleteConfirmation> {
        let script = self.begin(ServiceCall::Destroy {
            url: request.url.to_string(),
            id: request.id,
        });
        resolve(script).await?;
        if let Some(record) = self.lock().records.get_mut(&request.id) {
            record.is_deleted = true;
            record.body.clear();
        }
        Ok(DeleteConfirmation { is_deleted: true })
    }
}

/// Author record with a fixed name
pub fn test_author(id: u64) -> AuthorRecord {
    AuthorRecord {
        id: AuthorId(id),
        first_name: "Test".to_string(),
        last_name: format!("User{}", id),
    }
}

/// Persisted comment record written by `author`
pub fn test_record(id: u64, author: u64, body: &str) -> CommentRecord {
    CommentRecord {
        id: CommentId(id),
        body: body.to_string(),
        author: test_author(author),
        created_at: Some("2012-06-01 10:15:00".to_string()),
        is_deleted: false,
        is_editable: None,
        object_id: Some(1),
    }
}
