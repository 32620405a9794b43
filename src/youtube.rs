use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use regex::Regex;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::duration::parse_iso8601_duration;

pub static PLAYLIST_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([a-zA-Z0-9_-]+)").unwrap());

const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const PAGE_SIZE: &str = "50";

/// Extracts the playlist ID out from a user-inputted URL string
// TODO: the captured ID's internal shape is never validated
#[must_use]
pub fn extract_playlist_id(url: &str) -> Option<&str> {
    PLAYLIST_ID_REGEX
        .captures(url)
        .map(|c| c.get(1).unwrap().as_str())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct VideoListPage {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    content_details: VideoContentDetails,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: String,
}

/// Data API v3 client. Holds the key explicitly so nothing reads it from
/// ambient process state.
#[derive(Debug, Clone)]
pub struct YoutubeApi {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YoutubeApi {
    #[must_use]
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self::with_base_url(client, api_key, YOUTUBE_API_BASE_URL.to_string())
    }

    /// Points the client at an alternative API root. Tests use this.
    #[must_use]
    pub fn with_base_url(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Fetches every video ID in a playlist, following pagination until the
    /// API stops returning a continuation token.
    ///
    /// # Errors
    /// Errors when any page fetch fails or its JSON body is malformed; no
    /// partial result is returned
    #[instrument(skip(self))]
    pub async fn list_playlist_video_ids(&self, playlist_id: &str) -> Result<Vec<String>> {
        let mut video_ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("part", "contentDetails"),
                ("playlistId", playlist_id),
                ("maxResults", PAGE_SIZE),
                ("key", self.api_key.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let req = self
                .client
                .get(format!("{}/playlistItems", self.base_url))
                .query(&query)
                .send()
                .await
                .context("Fetching playlist items page")?;

            ensure!(
                req.status().is_success(),
                "Playlist listing failed with status {}",
                req.status()
            );

            let page = req
                .json::<PlaylistItemsPage>()
                .await
                .context("Parsing playlist items page")?;

            video_ids.extend(page.items.into_iter().map(|i| i.content_details.video_id));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(video_ids)
    }

    /// Fetches one video's duration from the videos endpoint.
    ///
    /// The API answers with a list; an empty list means the video is
    /// deleted, private or otherwise gone.
    ///
    /// # Errors
    /// Errors on network failure, a malformed body, an empty item list or an
    /// unrecognized duration encoding
    #[instrument(skip(self))]
    pub async fn video_duration(&self, video_id: &str) -> Result<Duration> {
        let req = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "contentDetails"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Fetching video details")?;

        ensure!(
            req.status().is_success(),
            "Video details failed with status {}",
            req.status()
        );

        let page = req
            .json::<VideoListPage>()
            .await
            .context("Parsing video details")?;

        let Some(video) = page.items.first() else {
            bail!("no video details found for ID {video_id}");
        };

        parse_iso8601_duration(&video.content_details.duration)
    }

    /// Sums the durations of every listed video, one request at a time.
    ///
    /// A video whose details cannot be fetched or decoded is logged and
    /// skipped; it contributes nothing to the total.
    pub async fn total_duration(&self, video_ids: &[String]) -> Duration {
        let mut total = Duration::ZERO;
        for video_id in video_ids {
            match self.video_duration(video_id).await {
                Ok(duration) => total += duration,
                Err(e) => warn!("Error fetching video duration for {video_id}: {e:#}"),
            }
        }
        total
    }
}
