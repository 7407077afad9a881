//! Comment and video data models

use crate::types::{CommentId, ModerationStatus, VideoId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A video as stored by the comment store.
///
/// Replaced wholesale on every comment-page fetch; never edited locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Video identifier
    pub video_id: VideoId,
    /// Owning channel
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Uploads playlist the video belongs to
    #[serde(default)]
    pub playlist_id: String,
    /// Video title
    pub title: String,
    /// Video description
    #[serde(default)]
    pub description: Option<String>,
    /// When the video was published
    #[serde(default, with = "timestamp::option")]
    pub published_at: Option<DateTime<Utc>>,
    /// When comments were last pulled from YouTube
    #[serde(default, with = "timestamp::option")]
    pub last_fetch_comment: Option<DateTime<Utc>>,
}

/// An immutable comment snapshot returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier, unique within the video
    pub comment_id: CommentId,
    /// Back-reference to the video
    pub video_id: VideoId,
    /// Author display name
    pub author_display_name: String,
    /// Comment text
    pub text: String,
    /// When the comment was posted
    #[serde(with = "timestamp")]
    pub published_at: DateTime<Utc>,
    /// When the comment was last edited
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    /// Classifier verdict: gambling promotion
    #[serde(default)]
    pub is_judi: bool,
    /// Classifier confidence in [0, 1]
    #[serde(default)]
    pub confidence: f64,
    /// Current moderation status
    #[serde(default)]
    pub moderation_status: ModerationStatus,
}

impl Comment {
    /// Whether the classifier flagged this comment
    pub fn is_flagged(&self) -> bool {
        self.is_judi
    }

    /// First `max` characters of the text on a single line
    pub fn preview(&self, max: usize) -> String {
        let line: String = self
            .text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        if line.chars().count() <= max {
            line
        } else {
            let mut cut: String = line.chars().take(max.saturating_sub(1)).collect();
            cut.push('…');
            cut
        }
    }
}

/// Timestamps as sent by the store.
///
/// The store emits RFC 3339 when it knows the offset and naive ISO 8601
/// otherwise; naive values are taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp: {}", raw))
                }),
                None => Ok(None),
            }
        }
    }
}
