//! Shared request plumbing

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tubemod_core::store::ErrorBody;
use tubemod_core::{Result, TubemodError};

/// Build a client with the session cookie attached to every request
pub(crate) fn build_client(session_cookie: Option<&str>, timeout: Duration) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    if let Some(session) = session_cookie.filter(|s| !s.trim().is_empty()) {
        let value = HeaderValue::from_str(&format!("session_id={}", session.trim()))
            .map_err(|e| TubemodError::Config(format!("invalid session cookie: {e}")))?;
        headers.insert(COOKIE, value);
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| TubemodError::Config(format!("failed to build HTTP client: {e}")))
}

/// Strip trailing slashes so paths can be appended with `format!`
pub(crate) fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

pub(crate) fn transport_error(err: reqwest::Error) -> TubemodError {
    TubemodError::Network(err.to_string())
}

/// Turn a response into `T`, or into the error its status implies.
///
/// Non-2xx bodies are searched for an `error` or `detail` message; when
/// none is present `fallback` is used, or `HTTP error <status>` if that is
/// unset too.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response, fallback: Option<&str>) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from(response, fallback).await);
    }
    let body = response.text().await.map_err(transport_error)?;
    serde_json::from_str(&body)
        .map_err(|e| TubemodError::Decode(format!("unexpected response body: {e}")))
}

pub(crate) async fn error_from(response: Response, fallback: Option<&str>) -> TubemodError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message())
        .unwrap_or_else(|| match fallback {
            Some(text) => text.to_string(),
            None => format!("HTTP error {}", status.as_u16()),
        });

    if status == StatusCode::UNAUTHORIZED {
        TubemodError::Unauthenticated(message)
    } else {
        TubemodError::Http {
            status: status.as_u16(),
            message,
        }
    }
}
