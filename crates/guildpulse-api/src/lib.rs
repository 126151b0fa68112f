//! Async client for the guildpulse community stats feeds.
//!
//! The feeds are two static JSON documents published alongside the
//! community's data collector:
//!
//! - **member feed** — an array of [`MemberSample`] (total / online member
//!   counts over time)
//! - **message feed** — an array of [`MessageSample`] (messages seen in the
//!   trailing ten minutes, sampled over time)
//!
//! Both are plain unauthenticated HTTP GETs. [`FeedClient::fetch_all`] is the
//! primary entry point: it issues both requests concurrently and fails as a
//! unit if either feed cannot be fetched or parsed, so callers never observe
//! a half-updated pair.

mod client;
mod error;
mod types;

pub use client::{DEFAULT_MEMBER_FEED, DEFAULT_MESSAGE_FEED, FeedClient, FeedConfig};
pub use error::Error;
pub use types::{MemberSample, MessageSample};
