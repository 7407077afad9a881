//! Comment store API client

use crate::client::{build_client, decode, normalize_base, transport_error};
use crate::types::{LogoutResponse, User, VideoFetchSummary, VideoList};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use tubemod_core::config::StoreConfig;
use tubemod_core::session::COMMAND_FAILED_MESSAGE;
use tubemod_core::store::{CommentPage, CommentQuery, CommentStore, ModerationRequest, ModerationResponse};
use tubemod_core::{Result, TubemodError, VideoId};

const REFRESH_FAILED_MESSAGE: &str = "failed to refresh videos";
const LOGOUT_FAILED_MESSAGE: &str = "failed to log out";

/// HTTP client for the comment store.
///
/// Authenticates with the `session_id` cookie issued at login.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = build_client(
            config.session_cookie.as_deref(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            client,
            base_url: normalize_base(&config.base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Comment page URL of one video, with the id escaped as a single path segment
    pub(crate) fn video_url(&self, video_id: &VideoId) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| TubemodError::Config(format!("invalid store.base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| {
                TubemodError::Config(format!("store.base_url cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["content", "video", video_id.as_str()]);
        Ok(url)
    }

    /// The channel owner the session cookie belongs to
    pub async fn current_user(&self) -> Result<User> {
        let response = self
            .client
            .get(self.url("/content/users"))
            .send()
            .await
            .map_err(transport_error)?;
        let user: User = decode(response, None).await?;
        if user.user_id.trim().is_empty() {
            return Err(TubemodError::Unauthenticated(
                "session has no signed-in user".to_string(),
            ));
        }
        debug!(user_id = %user.user_id, "Resolved current user");
        Ok(user)
    }

    /// One page of the stored videos of a playlist
    pub async fn list_videos(&self, playlist_id: &str, page: u32, page_size: u32) -> Result<VideoList> {
        if playlist_id.trim().is_empty() {
            return Err(TubemodError::Validation(
                "Playlist id cannot be empty".to_string(),
            ));
        }
        let response = self
            .client
            .get(self.url("/content/user_videos"))
            .query(&[
                ("playlist_id", playlist_id.to_string()),
                ("page", page.to_string()),
                ("page_size", page_size.to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;
        decode(response, None).await
    }

    /// Pull the newest uploads of a playlist and their comments into the store
    pub async fn fetch_latest_videos(&self, playlist_id: &str) -> Result<Vec<VideoFetchSummary>> {
        if playlist_id.trim().is_empty() {
            return Err(TubemodError::Validation(
                "Playlist id cannot be empty".to_string(),
            ));
        }
        let response = self
            .client
            .get(self.url("/content/fetch-latest-videos"))
            .query(&[("playlist_id", playlist_id)])
            .send()
            .await
            .map_err(transport_error)?;
        let summaries: Vec<VideoFetchSummary> = decode(response, Some(REFRESH_FAILED_MESSAGE)).await?;
        info!(playlist_id, videos = summaries.len(), "Refreshed latest videos");
        Ok(summaries)
    }

    /// End the session on the store side; the cookie is useless afterwards
    pub async fn logout(&self) -> Result<LogoutResponse> {
        let response = self
            .client
            .post(self.url("/auth/logout"))
            .send()
            .await
            .map_err(transport_error)?;
        let result: LogoutResponse = decode(response, Some(LOGOUT_FAILED_MESSAGE)).await?;
        if !result.logout_status {
            return Err(TubemodError::Unsuccessful(
                result
                    .message
                    .unwrap_or_else(|| LOGOUT_FAILED_MESSAGE.to_string()),
            ));
        }
        info!("Logged out of the comment store");
        Ok(result)
    }
}

#[async_trait]
impl CommentStore for HttpStore {
    async fn fetch_comments(&self, query: &CommentQuery) -> Result<CommentPage> {
        let response = self
            .client
            .get(self.video_url(&query.video_id)?)
            .query(&[("page", query.page), ("limit", query.page_size)])
            .send()
            .await
            .map_err(transport_error)?;
        decode(response, None).await
    }

    async fn moderate(&self, request: &ModerationRequest) -> Result<ModerationResponse> {
        let response = self
            .client
            .post(self.url("/content/comments/delete"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response, Some(COMMAND_FAILED_MESSAGE)).await
    }
}
