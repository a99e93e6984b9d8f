//! Typed client for the YouTube Data API v3.
//!
//! Covers the four operations the placement pipeline needs: video search,
//! channel search, batched channel details (snippet + statistics), and a
//! channel's recent uploads. Transient failures are retried with jittered
//! exponential back-off; quota exhaustion is surfaced as a hard stop.

pub mod client;
pub mod error;
pub mod types;

mod retry;

pub use client::YouTubeClient;
pub use error::YouTubeError;
pub use types::{ChannelRecord, ChannelResult, VideoResult};
