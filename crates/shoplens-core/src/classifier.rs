//! The segmentation adapter: one image in, one label (or error) out.
//!
//! A call moves `Idle -> InFlight -> {Succeeded, Failed}`. There are no
//! retries and no caching; each invocation sends at most one request and
//! shares nothing with other invocations except the cloneable HTTP client.

use crate::asset::{ImageAsset, MediaTypePolicy};
use crate::config::{ApiConfig, Config, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::error::{ClassificationError, ClassificationResult};
use crate::request::{ChatRequest, ChatResponse, ClassificationRequest};
use crate::segment::Label;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Status code and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// The network seam under the adapter.
///
/// Uses `async_trait` so the classifier can hold an `Arc<dyn ChatTransport>`.
/// Implementations map their own timeout and connection failures onto
/// `ClassificationError::Timeout` and `ClassificationError::Transport`.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &ChatRequest,
        timeout: Duration,
    ) -> ClassificationResult<TransportResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxy settings, custom TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn map_reqwest_error(e: reqwest::Error, timeout: Duration) -> ClassificationError {
    if e.is_timeout() {
        ClassificationError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        ClassificationError::Transport {
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &ChatRequest,
        timeout: Duration,
    ) -> ClassificationResult<TransportResponse> {
        let resp = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, timeout))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, timeout))?;

        Ok(TransportResponse { status, body })
    }
}

/// A successful segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Validated label
    pub label: Label,
    /// The model's text with surrounding whitespace trimmed
    pub raw: String,
    /// Model identifier reported by the endpoint, or the requested one
    pub model: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Sends segmentation requests to a chat-completions endpoint.
#[derive(Clone)]
pub struct Classifier {
    transport: Arc<dyn ChatTransport>,
    endpoint: String,
    model: String,
    timeout: Duration,
    media_type: MediaTypePolicy,
}

impl Classifier {
    /// Classifier with the default endpoint, model, and 30 second timeout.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    /// Classifier using the given transport and default settings.
    pub fn with_transport(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            media_type: MediaTypePolicy::default(),
        }
    }

    /// Classifier configured from the `[api]` and `[image]` sections.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_api(&config.api)
            .with_media_type(config.image.media_type)
    }

    pub fn with_api(self, api: &ApiConfig) -> Self {
        self.with_endpoint(&api.endpoint)
            .with_model(&api.model)
            .with_timeout(api.timeout())
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_media_type(mut self, media_type: MediaTypePolicy) -> Self {
        self.media_type = media_type;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Segment one image.
    ///
    /// A missing or blank `api_key` fails with `MissingCredential` before
    /// anything is sent.
    pub async fn classify(
        &self,
        image: &ImageAsset,
        api_key: &str,
    ) -> ClassificationResult<Classification> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ClassificationError::MissingCredential);
        }

        let request = ClassificationRequest::new(image, self.media_type);
        let body = request.to_body(&self.model);

        tracing::debug!(
            model = %self.model,
            bytes = image.len(),
            format = %image.format(),
            "classification in flight"
        );
        let start = Instant::now();

        let sent = self
            .transport
            .post_json(&self.endpoint, api_key, &body, self.timeout);
        let outcome = match tokio::time::timeout(self.timeout, sent).await {
            Ok(result) => result,
            Err(_) => Err(ClassificationError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
        .and_then(|resp| self.parse(resp));

        let latency_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok((raw, model)) => {
                let label = Label::from_model_output(&raw);
                if !label.is_known() {
                    tracing::warn!("Model returned a label outside the segment set: {raw:?}");
                }
                tracing::debug!(latency_ms, label = %label, "classification succeeded");
                Ok(Classification {
                    label,
                    raw,
                    model,
                    latency_ms,
                })
            }
            Err(e) => {
                tracing::debug!(latency_ms, kind = e.kind(), "classification failed");
                Err(e)
            }
        }
    }

    /// Segment raw image bytes and return only the label.
    pub async fn classify_bytes(&self, bytes: &[u8], api_key: &str) -> ClassificationResult<Label> {
        if api_key.trim().is_empty() {
            return Err(ClassificationError::MissingCredential);
        }
        let image = ImageAsset::from_bytes(bytes.to_vec())?;
        self.classify(&image, api_key).await.map(|c| c.label)
    }

    fn parse(&self, resp: TransportResponse) -> ClassificationResult<(String, String)> {
        if resp.status != 200 {
            return Err(ClassificationError::Remote {
                status: resp.status,
                body: resp.body,
            });
        }

        let chat: ChatResponse =
            serde_json::from_str(&resp.body).map_err(|e| ClassificationError::MalformedResponse {
                message: e.to_string(),
            })?;

        let text = chat
            .first_content()
            .map(str::trim)
            .ok_or_else(|| ClassificationError::MalformedResponse {
                message: "response has no choices[0].message.content".to_string(),
            })?;
        if text.is_empty() {
            return Err(ClassificationError::MalformedResponse {
                message: "model returned an empty label".to_string(),
            });
        }

        let model = chat.model.clone().unwrap_or_else(|| self.model.clone());
        Ok((text.to_string(), model))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Segment raw image bytes against the default OpenRouter endpoint.
pub async fn classify(
    image_bytes: &[u8],
    api_key: &str,
    timeout: Duration,
) -> ClassificationResult<Label> {
    Classifier::new()
        .with_timeout(timeout)
        .classify_bytes(image_bytes, api_key)
        .await
}
