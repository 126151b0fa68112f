//! Data layer between `guildpulse-api` and the terminal UI.
//!
//! This crate owns the dashboard's state and the rules for changing it:
//!
//! - **[`Controller`]** — facade over the feed client and the series store.
//!   [`refresh()`](Controller::refresh) fetches both feeds as a unit, sorts
//!   each series ascending by timestamp, and replaces the stored series
//!   wholesale. On any failure the store is left untouched, so the UI always
//!   keeps its last-known-good data.
//!
//! - **[`SeriesStore`]** — sole owner of the two series, built on
//!   `arc_swap::ArcSwap`. Readers take cheap [`Snapshot`]s; the only writer
//!   is `Controller::refresh`.
//!
//! - **[`TimeRange`]** — the render-time window selection. Filtering is a
//!   pure function over a snapshot; it never mutates what is stored.
//!
//! - **Label formatting** ([`labels`]) — the fixed-locale timestamp formats
//!   used for chart axes and the status bar clock.

pub mod controller;
pub mod error;
pub mod labels;
pub mod range;
pub mod store;

pub use controller::Controller;
pub use error::CoreError;
pub use range::{TimeRange, Timestamped, filter_by_range};
pub use store::{SeriesStore, Snapshot};

// Re-export the wire types so UI code needs only one import path.
pub use guildpulse_api::{MemberSample, MessageSample};
