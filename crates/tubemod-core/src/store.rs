//! Remote collaborator interfaces
//!
//! The comment store serves paginated comment listings and accepts batch
//! moderation commands; the classifier predicts which comments of a video
//! promote gambling. Both are reached over the network, so the traits are
//! async and every call may fail with a transport, HTTP or authentication
//! error.

use crate::comment::{Comment, Video};
use crate::error::Result;
use crate::pagination::Pagination;
use crate::types::{CommentId, ModerationStatus, VideoId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Paginated comment query for one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentQuery {
    pub video_id: VideoId,
    pub page: u32,
    pub page_size: u32,
}

/// One page of comments plus the video they belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentPage {
    #[serde(rename = "videoDetail", default)]
    pub video: Option<Video>,
    #[serde(default)]
    pub items: Vec<Comment>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub has_next: Option<bool>,
}

impl CommentPage {
    /// Pagination metadata with `has_next` derived from the counts
    pub fn pagination(&self) -> Pagination {
        Pagination::from_counts(self.total, self.page.max(1), self.page_size)
    }
}

/// Batch moderation command body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationRequest {
    pub comment_ids: Vec<CommentId>,
    #[serde(default)]
    pub moderation_status: ModerationStatus,
    #[serde(default)]
    pub ban_author: bool,
}

impl ModerationRequest {
    /// Build a request for the given ids
    pub fn new(comment_ids: Vec<CommentId>, moderation_status: ModerationStatus, ban_author: bool) -> Self {
        Self {
            comment_ids,
            moderation_status,
            ban_author,
        }
    }
}

/// Batch moderation command result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationResponse {
    pub success: bool,
    #[serde(default)]
    pub updated: u64,
}

/// Classification request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub video_id: VideoId,
}

/// A single classifier prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub comment_id: CommentId,
    pub is_judi: bool,
    #[serde(default)]
    pub confidence: f64,
}

/// Classifier output for a video
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    /// Any additional fields the classifier returns
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Error payload carried by non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Server message, preferring `error` over `detail`
    pub fn message(&self) -> Option<String> {
        [&self.error, &self.detail]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                serde_json::Value::Null | serde_json::Value::String(_) => None,
                other => Some(other.to_string()),
            })
    }
}

/// Paginated comment listing and batch moderation
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Fetch one page of comments with the video detail
    async fn fetch_comments(&self, query: &CommentQuery) -> Result<CommentPage>;

    /// Apply a moderation status to a batch of comments
    async fn moderate(&self, request: &ModerationRequest) -> Result<ModerationResponse>;
}

/// Gambling-promotion classifier
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify every stored comment of a video
    async fn classify(&self, video_id: &VideoId) -> Result<ClassificationResponse>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_moderation_request_wire_shape() {
        let request = ModerationRequest::new(
            vec!["c1".into(), "c2".into()],
            ModerationStatus::Rejected,
            true,
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "comment_ids": ["c1", "c2"],
                "moderation_status": "rejected",
                "ban_author": true
            })
        );
    }

    #[test]
    fn test_moderation_request_defaults() {
        let request: ModerationRequest =
            serde_json::from_value(serde_json::json!({ "comment_ids": ["c1"] })).unwrap();
        assert_eq!(request.moderation_status, ModerationStatus::HeldForReview);
        assert!(!request.ban_author);
    }

    #[test]
    fn test_comment_page_uses_video_detail_key() {
        let json = serde_json::json!({
            "videoDetail": {
                "video_id": "v1",
                "playlist_id": "UU1",
                "title": "Hello"
            },
            "items": [],
            "total": 15,
            "page": 1,
            "page_size": 10,
            "has_next": true
        });
        let page: CommentPage = serde_json::from_value(json).unwrap();
        assert_eq!(page.video.as_ref().unwrap().title, "Hello");
        assert!(page.pagination().has_next);
    }

    #[test]
    fn test_pagination_ignores_wrong_has_next() {
        let json = serde_json::json!({
            "items": [],
            "total": 15,
            "page": 2,
            "page_size": 10,
            "has_next": true
        });
        let page: CommentPage = serde_json::from_value(json).unwrap();
        assert!(!page.pagination().has_next);
    }

    #[test]
    fn test_classification_response_keeps_extra_fields() {
        let json = serde_json::json!({
            "predictions": [
                { "comment_id": "c1", "is_judi": true, "confidence": 0.93 }
            ],
            "model_version": "indobert-v2"
        });
        let response: ClassificationResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.predictions.len(), 1);
        assert_eq!(response.extra["model_version"], "indobert-v2");
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "db unavailable"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("db unavailable"));

        let body: ErrorBody = serde_json::from_str(r#"{"detail": "playlist_id is required"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("playlist_id is required"));

        let body: ErrorBody = serde_json::from_str(r#"{"error": "", "detail": null}"#).unwrap();
        assert_eq!(body.message(), None);
    }
}
