//! HTTP API for the victory path analyst
//!
//! A thin display facade over the conversation runtime: JSON snapshots,
//! an SSE stream of changes and the user actions.

mod handlers;
mod sample;
mod sse;
mod types;

pub use handlers::create_router;

use crate::activity::ActivityTracker;
use crate::runtime::ConversationHandle;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub conversation: ConversationHandle,
    pub activity: Arc<ActivityTracker>,
}
