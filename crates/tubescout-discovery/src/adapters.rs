//! Capability impls for the vendor clients.

use tubescout_gemini::GeminiClient;
use tubescout_youtube::YouTubeClient;

use crate::capabilities::{
    CapabilityError, ChannelDetail, ChannelDirectory, ChannelHit, TextGenerator, VideoHit,
};

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError> {
        GeminiClient::generate(self, prompt)
            .await
            .map_err(|e| CapabilityError::new(e.to_string()))
    }
}

impl ChannelDirectory for YouTubeClient {
    async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<VideoHit>, CapabilityError> {
        let results = YouTubeClient::search_videos(self, query, max_results)
            .await
            .map_err(|e| CapabilityError::new(e.to_string()))?;
        Ok(results
            .into_iter()
            .map(|v| VideoHit {
                video_title: v.video_title,
                video_description: v.video_description,
                channel_id: v.channel_id,
                channel_title: v.channel_title,
            })
            .collect())
    }

    async fn search_channels(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<ChannelHit>, CapabilityError> {
        let results = YouTubeClient::search_channels(self, query, max_results)
            .await
            .map_err(|e| CapabilityError::new(e.to_string()))?;
        Ok(results
            .into_iter()
            .map(|c| ChannelHit {
                channel_id: c.channel_id,
                channel_title: c.channel_title,
            })
            .collect())
    }

    async fn channel_details(
        &self,
        channel_ids: &[String],
    ) -> Result<Vec<ChannelDetail>, CapabilityError> {
        let records = YouTubeClient::channel_details(self, channel_ids)
            .await
            .map_err(|e| CapabilityError::new(e.to_string()))?;
        Ok(records
            .into_iter()
            .map(|r| ChannelDetail {
                channel_id: r.channel_id,
                title: r.title,
                description: r.description,
                custom_url: r.custom_url,
                thumbnail_url: r.thumbnail_url,
                subscriber_count: r.subscriber_count,
                view_count: r.view_count,
                video_count: r.video_count,
            })
            .collect())
    }

    async fn recent_video_titles(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<String>, CapabilityError> {
        let videos = YouTubeClient::recent_videos(self, channel_id, max_results)
            .await
            .map_err(|e| CapabilityError::new(e.to_string()))?;
        Ok(videos.into_iter().map(|v| v.video_title).collect())
    }
}
