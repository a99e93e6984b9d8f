use std::time::Duration;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use tubescout_discovery::{
    load_profile, run_discovery, ChannelProfile, DiscoveryError, DiscoveryLimits, RankedChannel,
    SourceError, TopicAnalysis,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlacementsRequest {
    /// Source channel id; the profile is built from channel details and
    /// recent uploads.
    pub channel_id: Option<String>,
    /// Inline profile, for callers that already hold the channel sample.
    pub profile: Option<InlineProfile>,
    /// Overrides generator-based scoring; deterministic keyword scoring is
    /// always the fallback.
    pub llm_scoring: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InlineProfile {
    #[serde(default)]
    pub channel_id: String,
    pub name: String,
    #[serde(default)]
    pub video_titles: Vec<String>,
    #[serde(default)]
    pub video_descriptions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlacementsData {
    pub analysis: TopicAnalysis,
    pub placements: Vec<RankedChannel>,
}

pub(super) async fn find_placements(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<PlacementsRequest>,
) -> Result<Json<ApiResponse<PlacementsData>>, ApiError> {
    let deadline = Duration::from_secs(state.config.request_deadline_secs);
    match timeout(deadline, run_for_request(&state, &req_id.0, request)).await {
        Ok(result) => result.map(|data| {
            Json(ApiResponse {
                data,
                meta: ResponseMeta::new(req_id.0),
            })
        }),
        Err(_) => {
            tracing::warn!(request_id = %req_id.0, "placement discovery hit the request deadline");
            Err(ApiError::new(
                req_id.0,
                "timeout",
                "placement discovery exceeded the request deadline",
            ))
        }
    }
}

async fn run_for_request(
    state: &AppState,
    req_id: &str,
    request: PlacementsRequest,
) -> Result<PlacementsData, ApiError> {
    let llm_scoring = state.gemini.is_some() && request.llm_scoring.unwrap_or(true);
    let profile = resolve_profile(state, req_id, &request).await?;

    let limits = DiscoveryLimits {
        llm_scoring,
        ..DiscoveryLimits::default()
    };

    match run_discovery(&state.gemini, &state.youtube, &profile, &limits).await {
        Ok(outcome) => Ok(PlacementsData {
            analysis: outcome.analysis,
            placements: outcome.placements,
        }),
        Err(DiscoveryError::NoCandidatesFound) => Err(ApiError::new(
            req_id,
            "not_found",
            "no similar channels found; try a different channel",
        )),
        Err(DiscoveryError::NoQualityCandidates) => Err(ApiError::new(
            req_id,
            "too_niche",
            "candidates could not be enriched; the channel may be too niche",
        )),
    }
}

async fn resolve_profile(
    state: &AppState,
    req_id: &str,
    request: &PlacementsRequest,
) -> Result<ChannelProfile, ApiError> {
    match (&request.channel_id, &request.profile) {
        (Some(_), Some(_)) | (None, None) => Err(ApiError::new(
            req_id,
            "bad_request",
            "provide exactly one of channelId or profile",
        )),
        (Some(channel_id), None) => {
            if channel_id.trim().is_empty() {
                return Err(ApiError::new(
                    req_id,
                    "bad_request",
                    "channelId must not be empty",
                ));
            }
            load_profile(&state.youtube, channel_id)
                .await
                .map_err(|e| match e {
                    SourceError::NotFound => {
                        ApiError::new(req_id, "not_found", "source channel not found")
                    }
                    SourceError::Capability(e) => {
                        tracing::error!(error = %e, "source profile lookup failed");
                        ApiError::new(req_id, "internal_error", "source channel lookup failed")
                    }
                })
        }
        (None, Some(profile)) => {
            if profile.name.trim().is_empty() {
                return Err(ApiError::new(
                    req_id,
                    "bad_request",
                    "profile.name must not be empty",
                ));
            }
            Ok(ChannelProfile::sampled(
                profile.channel_id.clone(),
                profile.name.clone(),
                profile.video_titles.clone(),
                profile.video_descriptions.clone(),
                profile.tags.clone(),
            ))
        }
    }
}
