//! Controller: the one place dashboard data enters the system.

use std::sync::Arc;

use tracing::{debug, warn};

use guildpulse_api::FeedClient;

use crate::error::CoreError;
use crate::store::{SeriesStore, Snapshot};

/// Facade over the feed client and the series store.
///
/// Cheap to clone (shared internals); clones see the same store. The UI
/// holds one clone and hands others to background refresh tasks.
#[derive(Clone)]
pub struct Controller {
    client: Arc<FeedClient>,
    store: Arc<SeriesStore>,
}

impl Controller {
    pub fn new(client: FeedClient) -> Self {
        Self {
            client: Arc::new(client),
            store: Arc::new(SeriesStore::new()),
        }
    }

    /// Fetch both feeds, sort each series ascending by timestamp, and
    /// replace the stored series. Returns the new snapshot.
    ///
    /// On any failure the store is untouched: the previous series, and
    /// whatever the UI rendered from them, remain valid. Sorting is stable,
    /// so samples with equal timestamps keep their feed order.
    pub async fn refresh(&self) -> Result<Snapshot, CoreError> {
        let (mut members, mut messages) = match self.client.fetch_all().await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "feed refresh failed; keeping stale series");
                return Err(e.into());
            }
        };

        // `sort_by_key` is stable: equal timestamps keep their feed order.
        members.sort_by_key(|s| s.timestamp);
        messages.sort_by_key(|s| s.timestamp);

        debug!(
            members = members.len(),
            messages = messages.len(),
            "feed refresh applied"
        );
        self.store.replace(members, messages);
        Ok(self.store.snapshot())
    }

    /// The current series snapshot, without fetching anything.
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }
}
