//! Core type definitions for tubemod

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create a VideoId from a string
    pub fn from_string(s: impl Into<String>) -> Self {
        VideoId(s.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// YouTube comment identifier, unique within a video
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    /// Create a CommentId from a string
    pub fn from_string(s: impl Into<String>) -> Self {
        CommentId(s.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        CommentId(s.to_string())
    }
}

/// Lifecycle state of a comment in the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModerationStatus {
    /// Pending review
    #[default]
    HeldForReview,
    /// Removed from display
    Rejected,
    /// Visible and cleared
    Published,
}

impl ModerationStatus {
    /// Wire name used by the store
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::HeldForReview => "heldForReview",
            ModerationStatus::Rejected => "rejected",
            ModerationStatus::Published => "published",
        }
    }

    /// Statuses the console should confirm before sending
    pub fn is_destructive(&self) -> bool {
        matches!(self, ModerationStatus::Rejected)
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModerationStatus {
    type Err = crate::TubemodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heldforreview" | "held" | "hold" => Ok(ModerationStatus::HeldForReview),
            "rejected" | "reject" => Ok(ModerationStatus::Rejected),
            "published" | "publish" => Ok(ModerationStatus::Published),
            other => Err(crate::TubemodError::Validation(format!(
                "Unknown moderation status: {}",
                other
            ))),
        }
    }
}

/// Independent asynchronous lanes of a moderation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Paginated comment retrieval
    Fetch,
    /// Classifier run
    Classify,
    /// Batch moderation command
    Command,
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lane::Fetch => "comment fetch",
            Lane::Classify => "classification",
            Lane::Command => "moderation command",
        };
        write!(f, "{}", name)
    }
}
