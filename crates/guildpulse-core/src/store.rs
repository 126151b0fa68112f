// ── Series storage ──
//
// Lock-free storage for the two history series. Series never merge
// incrementally: a successful refresh swaps each one in wholesale, and a
// failed refresh swaps nothing. Readers take `Snapshot`s — cheap Arc clones
// that stay coherent for the duration of a render pass.

use std::sync::Arc;

use arc_swap::ArcSwap;

use guildpulse_api::{MemberSample, MessageSample};

/// Sole owner of the dashboard's two series.
///
/// The single-writer invariant lives here: only
/// [`Controller::refresh`](crate::Controller::refresh) calls [`replace`],
/// everything else reads through [`snapshot`].
///
/// [`replace`]: SeriesStore::replace
/// [`snapshot`]: SeriesStore::snapshot
pub struct SeriesStore {
    members: ArcSwap<Vec<MemberSample>>,
    messages: ArcSwap<Vec<MessageSample>>,
}

impl SeriesStore {
    pub(crate) fn new() -> Self {
        Self {
            members: ArcSwap::from_pointee(Vec::new()),
            messages: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Replace both series wholesale. Inputs must already be sorted
    /// ascending by timestamp — the store does not re-check.
    pub(crate) fn replace(&self, members: Vec<MemberSample>, messages: Vec<MessageSample>) {
        self.members.store(Arc::new(members));
        self.messages.store(Arc::new(messages));
    }

    /// A coherent view of both series as currently stored.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            members: self.members.load_full(),
            messages: self.messages.load_full(),
        }
    }
}

/// Immutable view of both series, taken at one point in time.
///
/// Cloning is two `Arc` bumps; renders and background tasks can hold one
/// without blocking the writer.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub members: Arc<Vec<MemberSample>>,
    pub messages: Arc<Vec<MessageSample>>,
}

impl Snapshot {
    /// The most recent member sample (last element in stored order), if any.
    ///
    /// Status display reads this directly from the raw series — the
    /// time-range selector never affects it.
    pub fn latest_member(&self) -> Option<&MemberSample> {
        self.members.last()
    }

    /// The most recent message sample (last element in stored order), if any.
    pub fn latest_message(&self) -> Option<&MessageSample> {
        self.messages.last()
    }

    /// `true` while either series has no data yet.
    pub fn is_incomplete(&self) -> bool {
        self.members.is_empty() || self.messages.is_empty()
    }
}
