//! tubemod-core - Core library for tubemod
//!
//! This crate provides the moderation logic for the tubemod console:
//! the comment and video data model, pagination, selection bookkeeping,
//! the collaborator traits for the remote comment store and classifier,
//! and the moderation session that keeps the displayed view consistent
//! while fetches, classifier runs and moderation commands overlap.

pub mod error;
pub mod types;
pub mod config;
pub mod pagination;
pub mod comment;
pub mod store;
pub mod session;

pub use error::{Result, TubemodError};
pub use types::*;
