//! Dashboard payloads served by the comment store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tubemod_core::comment::{timestamp, Video};
use tubemod_core::pagination::Pagination;
use tubemod_core::VideoId;

/// The signed-in channel owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub custom_url: Option<String>,
    /// Uploads playlist of the channel
    #[serde(default)]
    pub playlist_id: Option<String>,
}

/// One page of the channel's stored videos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub items: Vec<Video>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub has_next: Option<bool>,
}

impl VideoList {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_counts(self.total, self.page.max(1), self.page_size)
    }
}

/// Per-video result of pulling the latest uploads and their comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFetchSummary {
    pub video_id: VideoId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub published_at: Option<DateTime<Utc>>,
    /// Comments pulled for this video
    #[serde(default)]
    pub new_comment_count: Option<u64>,
    /// Why this video could not be refreshed
    #[serde(default)]
    pub error: Option<String>,
}

impl VideoFetchSummary {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Answer of the store's logout endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub logout_status: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_video_list_derives_has_next() {
        let list: VideoList = serde_json::from_value(serde_json::json!({
            "items": [],
            "total": 25,
            "page": 2,
            "page_size": 10,
            "has_next": false
        }))
        .unwrap();
        assert!(list.pagination().has_next);
        assert_eq!(list.pagination().total_pages(), 3);
    }

    #[test]
    fn test_summary_with_error() {
        let summary: VideoFetchSummary = serde_json::from_value(serde_json::json!({
            "video_id": "abc",
            "title": "Launch",
            "error": "quota exceeded"
        }))
        .unwrap();
        assert!(!summary.is_ok());
        assert_eq!(summary.published_at, None);
        assert_eq!(summary.new_comment_count, None);
    }
}
