//! Conversation runtime
//!
//! A single task owns the [`Session`]. Everything else talks to it through a
//! [`ConversationHandle`]: events go in over an mpsc channel and snapshots
//! come out over a watch channel.

mod executor;


pub use executor::ConversationRuntime;

use crate::state_machine::{Event, Session};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// Tournament headline figures shown next to the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewStats {
    pub position: String,
    pub points: String,
    pub nrr: String,
    pub next_match: String,
    pub qualification: String,
}

impl Default for OverviewStats {
    fn default() -> Self {
        Self {
            position: "#2 in Group".to_string(),
            points: "8 pts".to_string(),
            nrr: "+1.245".to_string(),
            next_match: "vs Australia".to_string(),
            qualification: "78%".to_string(),
        }
    }
}

/// Everything a client needs to render the current conversation
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session: Session,
    pub overview: OverviewStats,
    pub agent_name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("conversation runtime has stopped")]
pub struct RuntimeStopped;

/// Cloneable entry point into a running [`ConversationRuntime`]
#[derive(Clone)]
pub struct ConversationHandle {
    event_tx: mpsc::Sender<Event>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl ConversationHandle {
    pub(crate) fn new(
        event_tx: mpsc::Sender<Event>,
        snapshot_rx: watch::Receiver<SessionSnapshot>,
    ) -> Self {
        Self {
            event_tx,
            snapshot_rx,
        }
    }

    pub async fn send(&self, event: Event) -> Result<(), RuntimeStopped> {
        self.event_tx.send(event).await.map_err(|_| RuntimeStopped)
    }

    pub async fn submit(&self, text: impl Into<String>) -> Result<(), RuntimeStopped> {
        self.send(Event::Submit { text: text.into() }).await
    }

    pub async fn retry(&self, text: impl Into<String>) -> Result<(), RuntimeStopped> {
        self.send(Event::Retry { text: text.into() }).await
    }

    pub async fn reset(&self) -> Result<(), RuntimeStopped> {
        self.send(Event::Reset).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that observes every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }
}
