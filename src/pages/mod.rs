//! Per-page view controllers.
//!
//! A controller owns the transient state of one page. Methods that need the
//! backend hand back a [`Pending`](crate::client::Pending) call for the
//! caller to await; the result is fed back through the matching
//! `*_loaded`/`*_done` method, which reconciles it into page state.

pub mod auth;
pub mod home;
pub mod my_videos;
pub mod nav;
pub mod profile;
pub mod upload;

use crate::client::Backend;
use crate::error::ApiResult;
use crate::models::Session;
use crate::storage::SessionStore;
use std::sync::Arc;

/// Dependencies handed to every page at mount.
#[derive(Clone)]
pub struct Context {
    pub backend: Arc<dyn Backend>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Context {
    pub fn new(backend: Arc<dyn Backend>, sessions: Arc<dyn SessionStore>) -> Self {
        Context { backend, sessions }
    }

    pub fn session(&self) -> Option<Session> {
        self.sessions.load()
    }
}

/// Fetch lifecycle of a page.
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Loading,
    Ready,
    Empty,
    Error(String),
    /// The page needs a session and none exists; nothing was fetched.
    SignedOut,
}

impl Phase {
    pub fn for_list<T>(items: &[T]) -> Phase {
        if items.is_empty() {
            Phase::Empty
        } else {
            Phase::Ready
        }
    }
}

/// Replaces `slot` with a successful result, or returns the text to show.
pub fn reconcile<T>(slot: &mut T, result: ApiResult<T>) -> Result<(), String> {
    match result {
        Ok(value) => {
            *slot = value;
            Ok(())
        }
        Err(e) => {
            log::warn!("request failed: {:?}", e);
            Err(e.user_message())
        }
    }
}

/// Reconciles a list fetch into `items` and returns the resulting phase.
pub fn reconcile_list<T>(items: &mut Vec<T>, result: ApiResult<Vec<T>>) -> Phase {
    match reconcile(items, result) {
        Ok(()) => Phase::for_list(items),
        Err(message) => {
            items.clear();
            Phase::Error(message)
        }
    }
}

/// Returns `Err(Missing(label))` when `value` is blank.
pub(crate) fn require(value: &str, label: &'static str) -> Result<(), crate::error::Precondition> {
    if value.trim().is_empty() {
        Err(crate::error::Precondition::Missing(label))
    } else {
        Ok(())
    }
}
