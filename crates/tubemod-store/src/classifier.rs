//! Classifier service client

use crate::client::{build_client, decode, normalize_base, transport_error};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use tubemod_core::config::ClassifierConfig;
use tubemod_core::store::{ClassificationRequest, ClassificationResponse, Classifier};
use tubemod_core::{Result, VideoId};

const CLASSIFY_FAILED_MESSAGE: &str = "failed to classify comments";

/// HTTP client for the gambling-promotion classifier.
///
/// Carries the same `session_id` cookie as the comment store.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
}

impl HttpClassifier {
    pub fn new(
        config: &ClassifierConfig,
        session_cookie: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = config.endpoint.trim();
        let url = if endpoint.starts_with('/') {
            format!("{}{}", normalize_base(&config.base_url), endpoint)
        } else {
            format!("{}/{}", normalize_base(&config.base_url), endpoint)
        };
        Ok(Self {
            client: build_client(session_cookie, timeout)?,
            url,
        })
    }

    /// Full URL of the classification endpoint
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, video_id: &VideoId) -> Result<ClassificationResponse> {
        let body = ClassificationRequest {
            video_id: video_id.clone(),
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let result: ClassificationResponse = decode(response, Some(CLASSIFY_FAILED_MESSAGE)).await?;
        debug!(video_id = %video_id, predictions = result.predictions.len(), "Classifier responded");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_classifier(base_url: &str) -> HttpClassifier {
        HttpClassifier::new(
            &ClassifierConfig {
                base_url: base_url.to_string(),
                endpoint: "/predict".to_string(),
            },
            Some("sess-123"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_joined_once() {
        let classifier = HttpClassifier::new(
            &ClassifierConfig {
                base_url: "http://localhost:8001/".to_string(),
                endpoint: "predict".to_string(),
            },
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(classifier.url(), "http://localhost:8001/predict");
    }

    #[tokio::test]
    async fn test_classify() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_json(json!({"video_id": "v1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "predictions": [
                    {"comment_id": "c3", "is_judi": true, "confidence": 0.97},
                    {"comment_id": "c4", "is_judi": false, "confidence": 0.12}
                ],
                "model_version": "2024-05"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = test_classifier(&server.uri())
            .classify(&VideoId::from_string("v1"))
            .await
            .unwrap();
        assert_eq!(result.predictions.len(), 2);
        assert!(result.predictions[0].is_judi);
        assert_eq!(result.extra["model_version"], "2024-05");
    }

    #[tokio::test]
    async fn test_classify_sends_session_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(header("cookie", "session_id=sess-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"predictions": []})))
            .expect(1)
            .mount(&server)
            .await;

        let result = test_classifier(&server.uri())
            .classify(&VideoId::from_string("v1"))
            .await
            .unwrap();
        assert!(result.predictions.is_empty());
    }

    #[tokio::test]
    async fn test_classify_failure_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = test_classifier(&server.uri())
            .classify(&VideoId::from_string("v1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to classify comments");
        assert_eq!(err.status(), Some(503));
    }
}
