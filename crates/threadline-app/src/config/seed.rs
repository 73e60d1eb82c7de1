//! Thread seed files
//!
//! A seed carries what the embedding page knows when the thread is built:
//!
//! ```json
//! {
//!   "thread_url": "/comments/thread/42/",
//!   "comment_url": "/comments/",
//!   "viewer_id": 4,
//!   "comments": [{"id": 7, "body": "Hello", "author": {"id": 4}}]
//! }
//! ```
//!
//! Endpoints may be relative; they are resolved against the configured
//! service base URL.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use threadline_core::prelude::*;
use threadline_core::{AuthorId, CommentRecord, Thread, ThreadEndpoints};
use url::Url;

use super::settings::THREADLINE_DIR;
use super::types::Settings;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThreadSeed {
    pub thread_url: String,
    pub comment_url: String,
    /// Signed-in user; comments by this author get edit/delete controls
    #[serde(default)]
    pub viewer_id: Option<AuthorId>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
}

impl ThreadSeed {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn endpoints(&self, base: &Url) -> Result<ThreadEndpoints> {
        ThreadEndpoints::resolve(base, &self.thread_url, &self.comment_url)
    }

    pub fn into_thread(self, base: &Url) -> Result<Thread> {
        let endpoints = self.endpoints(base)?;
        Thread::from_records(endpoints, self.viewer_id, &self.comments)
    }
}

pub fn load_seed(path: &Path) -> Result<ThreadSeed> {
    if !path.exists() {
        return Err(Error::seed_not_found(path));
    }
    let content = std::fs::read_to_string(path)?;
    let seed = ThreadSeed::parse(&content)
        .map_err(|e| Error::config(format!("Invalid seed {}: {}", path.display(), e)))?;
    info!(
        "Loaded seed {} with {} comments",
        path.display(),
        seed.comments.len()
    );
    Ok(seed)
}

/// Seed path from the command line, or from the config relative to `.threadline/`
pub fn resolve_seed_path(
    project_path: &Path,
    settings: &Settings,
    cli_override: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = cli_override {
        return Some(path.to_path_buf());
    }
    settings
        .thread
        .seed
        .as_ref()
        .map(|seed| project_path.join(THREADLINE_DIR).join(seed))
}
