//! JSON-over-HTTP adapter for the remote render service.
//!
//! Endpoints (relative to `render.base_url`):
//!   POST /generate_logo     ImageRequest  -> {"images": [base64, ...]}
//!   POST /generate_imagery  ImageRequest  -> {"images": [base64, ...]}
//!   POST /render_mockup     MockupRequest -> {"image": base64}

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{
    with_timeout, ImageGenerator, ImagePurpose, ImageRequest, MockupRenderer, MockupRequest,
};
use crate::brand::ImageBlob;
use crate::config::{RenderConfig, TimeoutConfig};
use crate::error::{AdapterError, ConfigError};

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    images: Vec<ImageBlob>,
}

#[derive(Debug, Deserialize)]
struct MockupResponse {
    image: ImageBlob,
}

pub struct RemoteRenderer {
    base_url: String,
    auth_token: Option<String>,
    logo_timeout: Duration,
    imagery_timeout: Duration,
    mockup_timeout: Duration,
    http: reqwest::Client,
}

impl RemoteRenderer {
    pub fn new(config: &RenderConfig, timeouts: &TimeoutConfig) -> Result<Self, ConfigError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::Missing("render.base_url"))?;

        Ok(Self {
            base_url,
            auth_token: config.auth_token.clone(),
            logo_timeout: timeouts.logo(),
            imagery_timeout: timeouts.imagery(),
            mockup_timeout: timeouts.mockup(),
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, AdapterError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut req = self.http.post(self.endpoint(path)).json(body);
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        tracing::debug!(endpoint = path, status = %status, "Render service replied");
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(AdapterError::Transport(format!(
                "render service {} returned {}: {}",
                path, status, detail
            )));
        }

        resp.json::<R>()
            .await
            .map_err(|e| AdapterError::MalformedOutput(format!("{} response: {}", path, e)))
    }
}

#[async_trait]
impl ImageGenerator for RemoteRenderer {
    fn producer_id(&self) -> &'static str {
        "remote-render"
    }

    async fn generate(&self, request: &ImageRequest) -> Result<Vec<ImageBlob>, AdapterError> {
        let (path, limit) = match request.purpose {
            ImagePurpose::Logo => ("generate_logo", self.logo_timeout),
            _ => ("generate_imagery", self.imagery_timeout),
        };

        let resp: ImagesResponse = with_timeout(limit, self.post(path, request)).await?;
        if resp.images.is_empty() || resp.images.iter().any(ImageBlob::is_empty) {
            return Err(AdapterError::MalformedOutput(format!("{} returned no image data", path)));
        }
        Ok(resp.images)
    }
}

#[async_trait]
impl MockupRenderer for RemoteRenderer {
    async fn render(&self, request: &MockupRequest) -> Result<ImageBlob, AdapterError> {
        let resp: MockupResponse =
            with_timeout(self.mockup_timeout, self.post("render_mockup", request)).await?;
        if resp.image.is_empty() {
            return Err(AdapterError::MalformedOutput(
                "render_mockup returned an empty image".into(),
            ));
        }
        Ok(resp.image)
    }
}
