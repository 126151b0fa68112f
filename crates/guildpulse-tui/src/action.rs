//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::time::{Duration, Instant};

use guildpulse_core::{Snapshot, TimeRange};

/// How long an error toast stays visible before auto-dismissing.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

/// Display window choices offered by the range selector.
///
/// Each maps to a [`TimeRange`] applied at render time; stored series are
/// never affected by the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeChoice {
    LastHour,
    SixHours,
    Day,
    Week,
    #[default]
    All,
}

impl RangeChoice {
    /// All choices in selector order.
    pub const ALL: [RangeChoice; 5] = [
        Self::LastHour,
        Self::SixHours,
        Self::Day,
        Self::Week,
        Self::All,
    ];

    /// Selector label.
    pub fn label(self) -> &'static str {
        match self {
            Self::LastHour => "1h",
            Self::SixHours => "6h",
            Self::Day => "24h",
            Self::Week => "7d",
            Self::All => "all",
        }
    }

    /// The core filter window for this choice.
    pub fn time_range(self) -> TimeRange {
        match self {
            Self::LastHour => TimeRange::Hours(1),
            Self::SixHours => TimeRange::Hours(6),
            Self::Day => TimeRange::Hours(24),
            Self::Week => TimeRange::Hours(7 * 24),
            Self::All => TimeRange::All,
        }
    }

    /// Choice from a number key (1-5). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::LastHour),
            2 => Some(Self::SixHours),
            3 => Some(Self::Day),
            4 => Some(Self::Week),
            5 => Some(Self::All),
            _ => None,
        }
    }

    /// Next choice in selector order, wrapping.
    pub fn next(self) -> Self {
        match self {
            Self::LastHour => Self::SixHours,
            Self::SixHours => Self::Day,
            Self::Day => Self::Week,
            Self::Week => Self::All,
            Self::All => Self::LastHour,
        }
    }
}

/// A transient error notice. Toasts stack — a new failure never replaces a
/// visible one — and each dismisses itself [`TOAST_TTL`] after creation.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub created: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created: Instant::now(),
        }
    }

    pub fn expired(&self) -> bool {
        self.created.elapsed() >= TOAST_TTL
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Refresh cycle ──────────────────────────────────────────────
    /// Start a load cycle (initial, manual `r`, or auto-refresh timer).
    /// Coalesced if a cycle is already in flight.
    Refresh,
    /// A load cycle finished successfully with fresh series.
    SeriesUpdated(Snapshot),
    /// A load cycle failed; stored series are unchanged.
    LoadFailed(String),

    // ── Display controls ───────────────────────────────────────────
    SetRange(RangeChoice),
    CycleRange,
    ToggleAutoRefresh,
}
