//! Source-channel profile loading.
//!
//! The operational surfaces accept either an inline profile or a bare
//! channel id; this module turns a channel id into a [`ChannelProfile`]
//! using the same directory capability the pipeline runs against, so it is
//! testable with the same in-memory fakes.

use thiserror::Error;

use crate::capabilities::{CapabilityError, ChannelDirectory};
use crate::types::{ChannelProfile, PROFILE_SAMPLE};

/// Failures while resolving a source channel into a profile.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The directory returned no detail record for the channel id.
    #[error("source channel not found")]
    NotFound,

    /// The detail lookup itself failed.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// Builds a [`ChannelProfile`] for `channel_id` from its detail record and
/// recent uploads.
///
/// A failed uploads fetch degrades to a profile without a title sample
/// (the classifier still has the channel name and description to work
/// with); a missing detail record is terminal.
///
/// # Errors
///
/// - [`SourceError::NotFound`] when no detail record exists for the id.
/// - [`SourceError::Capability`] when the detail lookup fails.
pub async fn load_profile<D: ChannelDirectory>(
    directory: &D,
    channel_id: &str,
) -> Result<ChannelProfile, SourceError> {
    let details = directory.channel_details(&[channel_id.to_owned()]).await?;
    let detail = details
        .into_iter()
        .find(|d| d.channel_id == channel_id)
        .ok_or(SourceError::NotFound)?;

    #[allow(clippy::cast_possible_truncation)]
    let sample = PROFILE_SAMPLE as u32;
    let titles = match directory.recent_video_titles(channel_id, sample).await {
        Ok(titles) => titles,
        Err(e) => {
            tracing::warn!(
                channel = %channel_id,
                error = %e,
                "recent uploads fetch failed — classifying from channel metadata only"
            );
            Vec::new()
        }
    };

    let descriptions = if detail.description.trim().is_empty() {
        Vec::new()
    } else {
        vec![detail.description.clone()]
    };

    Ok(ChannelProfile::sampled(
        channel_id,
        detail.title,
        titles,
        descriptions,
        Vec::new(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{ChannelDetail, ChannelHit, VideoHit};

    struct FakeDirectory {
        detail: Option<ChannelDetail>,
        details_fail: bool,
        titles_fail: bool,
    }

    impl ChannelDirectory for FakeDirectory {
        async fn search_videos(
            &self,
            _query: &str,
            _max_results: u32,
        ) -> Result<Vec<VideoHit>, CapabilityError> {
            Ok(Vec::new())
        }

        async fn search_channels(
            &self,
            _query: &str,
            _max_results: u32,
        ) -> Result<Vec<ChannelHit>, CapabilityError> {
            Ok(Vec::new())
        }

        async fn channel_details(
            &self,
            _channel_ids: &[String],
        ) -> Result<Vec<ChannelDetail>, CapabilityError> {
            if self.details_fail {
                return Err(CapabilityError::new("details backend unavailable"));
            }
            Ok(self.detail.clone().into_iter().collect())
        }

        async fn recent_video_titles(
            &self,
            _channel_id: &str,
            max_results: u32,
        ) -> Result<Vec<String>, CapabilityError> {
            if self.titles_fail {
                return Err(CapabilityError::new("uploads lookup failed"));
            }
            Ok((0..max_results).map(|i| format!("Upload {i}")).collect())
        }
    }

    fn source_detail() -> ChannelDetail {
        ChannelDetail {
            channel_id: "UCsrc".to_owned(),
            title: "HolidayBeats".to_owned(),
            description: "Christmas rock covers".to_owned(),
            custom_url: Some("@holidaybeats".to_owned()),
            thumbnail_url: None,
            subscriber_count: Some(12_000),
            view_count: None,
            video_count: None,
        }
    }

    #[tokio::test]
    async fn load_profile_builds_bounded_sample() {
        let fake = FakeDirectory {
            detail: Some(source_detail()),
            details_fail: false,
            titles_fail: false,
        };
        let profile = load_profile(&fake, "UCsrc").await.unwrap();
        assert_eq!(profile.channel_id, "UCsrc");
        assert_eq!(profile.name, "HolidayBeats");
        assert_eq!(profile.video_titles.len(), PROFILE_SAMPLE);
        assert_eq!(
            profile.video_descriptions,
            vec!["Christmas rock covers".to_owned()]
        );
    }

    #[tokio::test]
    async fn load_profile_missing_detail_is_not_found() {
        let fake = FakeDirectory {
            detail: None,
            details_fail: false,
            titles_fail: false,
        };
        let err = load_profile(&fake, "UCsrc").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound));
    }

    #[tokio::test]
    async fn load_profile_surfaces_detail_lookup_failure() {
        let fake = FakeDirectory {
            detail: None,
            details_fail: true,
            titles_fail: false,
        };
        let err = load_profile(&fake, "UCsrc").await.unwrap_err();
        assert!(matches!(err, SourceError::Capability(_)));
    }

    #[tokio::test]
    async fn load_profile_tolerates_uploads_failure() {
        let fake = FakeDirectory {
            detail: Some(source_detail()),
            details_fail: false,
            titles_fail: true,
        };
        let profile = load_profile(&fake, "UCsrc").await.unwrap();
        assert!(profile.video_titles.is_empty());
        assert_eq!(profile.name, "HolidayBeats");
    }
}
