//! Audience-match discovery pipeline for the Placement Finder.
//!
//! Given a source channel's profile, the pipeline finds other channels with
//! the same *audience* in four forward-only stages:
//!
//! 1. Classify the channel's primary topic (audience-defining subject),
//!    kept strictly apart from its presentation style.
//! 2. Synthesize a bounded, deduplicated set of search queries from the
//!    primary topic.
//! 3. Aggregate candidate channels from video search, deduplicating by
//!    channel id, with a channel-search fallback for thin niches.
//! 4. Score candidates by primary-topic keyword overlap (optionally
//!    re-ranked by a text generator) and rank them deterministically.
//!
//! External capabilities (search, generation, detail fetch) sit behind the
//! traits in [`capabilities`], so the whole pipeline runs against in-memory
//! fakes in tests. Transient failures degrade; only exhausting every
//! fallback produces a terminal [`DiscoveryError`].

pub mod aggregate;
pub mod capabilities;
pub mod classify;
pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod queries;
pub mod score;
pub mod source;
pub mod topics;
pub mod types;

mod adapters;

pub use classify::classify;
pub use error::DiscoveryError;
pub use pipeline::{run_discovery, DiscoveryOutcome};
pub use source::{load_profile, SourceError};
pub use topics::KeywordSet;
pub use types::{
    CandidateChannel, ChannelProfile, DiscoveryLimits, EnrichedChannel, FoundVideo,
    RankedChannel, TopicAnalysis,
};
