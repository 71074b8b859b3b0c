//! Server-Sent Events support

use super::types::SessionView;
use crate::runtime::SessionSnapshot;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

/// Stream the current snapshot as `init`, then every published change as `snapshot`
pub fn sse_stream(
    mut snapshots: watch::Receiver<SessionSnapshot>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Marking the current value seen means the change stream starts after it
    let init_snapshot = snapshots.borrow_and_update().clone();
    let init = futures::stream::once(async move { Ok(snapshot_event("init", &init_snapshot)) });

    let changes = WatchStream::from_changes(snapshots)
        .map(|snapshot| Ok(snapshot_event("snapshot", &snapshot)));

    Sse::new(init.chain(changes)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn snapshot_event(event_type: &str, snapshot: &SessionSnapshot) -> Event {
    let data = json!({
        "type": event_type,
        "session": SessionView::from(snapshot),
    });
    Event::default().event(event_type).data(data.to_string())
}
