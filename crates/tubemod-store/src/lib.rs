//! tubemod-store - HTTP clients for the tubemod collaborators
//!
//! [`HttpStore`] talks to the comment store API (comment listings, batch
//! moderation, logout, and the dashboard endpoints for the signed-in channel);
//! [`HttpClassifier`] talks to the gambling-promotion classifier. Both
//! map transport failures, non-2xx responses and HTTP 401 onto
//! [`tubemod_core::TubemodError`]. Requests are never retried.

mod classifier;
mod client;
mod store;
mod types;

pub use classifier::HttpClassifier;
pub use store::HttpStore;
pub use types::{LogoutResponse, User, VideoFetchSummary, VideoList};
