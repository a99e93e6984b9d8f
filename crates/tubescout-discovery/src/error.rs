use thiserror::Error;

/// Terminal failures of a discovery run.
///
/// Transient per-item failures (one query, one detail fetch, one generation
/// call) are absorbed and logged inside the stages; only exhausting every
/// fallback path surfaces here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    /// Zero candidate channels after both aggregation passes. The
    /// user-facing advice is to try a different channel.
    #[error("no similar channels found")]
    NoCandidatesFound,

    /// Candidates were found but none survived enrichment with complete
    /// detail data. The source channel may be too niche.
    #[error("no candidate channels with usable detail data")]
    NoQualityCandidates,
}
