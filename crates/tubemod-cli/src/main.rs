//! tubemod - YouTube comment moderation console
//!
//! Browse the comments of your videos, let the classifier flag gambling
//! promotion, and reject, hold or publish comments in batches.
//!
//! ## Quick Start
//!
//! ```bash
//! # Point tubemod at the comment store and sign in
//! tubemod config init
//! export TUBEMOD_SESSION=<session_id cookie>
//! tubemod whoami
//!
//! # Pick a video and review its comments
//! tubemod videos list
//! tubemod review <VIDEO_ID>
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(commands::exit_code(&err));
    }
}
