//! Agent activity tracking
//!
//! The conversation runtime toggles processing state around every agent
//! call through [`ActivityObserver`]. [`ActivityTracker`] is the in-process
//! implementation: it keeps a bounded log of activity events and the most
//! recent "thinking" line for display while a request is in flight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

const MAX_EVENTS: usize = 200;

/// Hooks invoked by the runtime at fixed lifecycle points
pub trait ActivityObserver: Send + Sync {
    /// Called with `true` when a request is issued and `false` when it resolves
    fn on_processing_changed(&self, processing: bool);

    /// Called when the session is discarded
    fn on_reset(&self);
}

impl<T: ActivityObserver + ?Sized> ActivityObserver for Arc<T> {
    fn on_processing_changed(&self, processing: bool) {
        (**self).on_processing_changed(processing);
    }

    fn on_reset(&self) {
        (**self).on_reset();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Thinking,
    ToolCall,
    Status,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub message: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// Point-in-time view of the tracker
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivitySnapshot {
    pub connected: bool,
    pub processing: bool,
    pub last_thinking_message: Option<String>,
    pub events: Vec<ActivityEvent>,
}

#[derive(Debug, Default)]
struct ActivityState {
    connected: bool,
    processing: bool,
    last_thinking_message: Option<String>,
    events: VecDeque<ActivityEvent>,
}

#[derive(Debug, Default)]
pub struct ActivityTracker {
    state: Mutex<ActivityState>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ActivityState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Record an event reported by the agent runtime
    pub fn record(&self, event: ActivityEvent) {
        self.with_state(|state| {
            state.connected = true;
            if event.kind == ActivityKind::Thinking {
                state.last_thinking_message = Some(event.message.clone());
            }
            if state.events.len() == MAX_EVENTS {
                state.events.pop_front();
            }
            state.events.push_back(event);
        });
    }

    pub fn snapshot(&self) -> ActivitySnapshot {
        self.with_state(|state| ActivitySnapshot {
            connected: state.connected,
            processing: state.processing,
            last_thinking_message: state.last_thinking_message.clone(),
            events: state.events.iter().cloned().collect(),
        })
    }
}

impl ActivityObserver for ActivityTracker {
    fn on_processing_changed(&self, processing: bool) {
        self.with_state(|state| {
            state.processing = processing;
            if processing {
                state.last_thinking_message = None;
            }
        });
    }

    fn on_reset(&self) {
        self.with_state(|state| {
            let connected = state.connected;
            *state = ActivityState {
                connected,
                ..ActivityState::default()
            };
        });
        tracing::debug!("Activity log cleared");
    }
}
