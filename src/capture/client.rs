use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use super::bundle::CaptureBundle;
use crate::error::PipelineError;

const PROCESS_PATH: &str = "/process_audio_and_image";

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the interpretation service
    pub base_url: String,
    /// Whole-request timeout
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Response body as sent by the backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseBody {
    /// Base64-encoded MP3
    pub audio: Option<String>,
    pub is_navigation: Option<bool>,
    pub is_searching: Option<bool>,
    pub location: Option<String>,
    /// Text of the spoken answer
    pub response: Option<String>,
    pub error: Option<String>,
}

/// What the client should do besides playing the audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseIntent {
    Speak,
    Search,
    Navigate { location: String },
}

/// Validated backend response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerResponse {
    pub audio: String,
    pub intent: ResponseIntent,
    pub text: Option<String>,
}

impl ServerResponse {
    pub fn from_body(body: ResponseBody) -> Result<Self, PipelineError> {
        let audio = match body.audio {
            Some(audio) if !audio.is_empty() => audio,
            _ => return Err(PipelineError::MissingAudio),
        };

        let intent = if body.is_navigation.unwrap_or(false) {
            match body.location.filter(|l| !l.trim().is_empty()) {
                Some(location) => ResponseIntent::Navigate { location },
                None => {
                    warn!("Navigation response without a location, playing audio only");
                    ResponseIntent::Speak
                }
            }
        } else if body.is_searching.unwrap_or(false) {
            ResponseIntent::Search
        } else {
            ResponseIntent::Speak
        };

        Ok(Self {
            audio,
            intent,
            text: body.response,
        })
    }
}

/// HTTP client for the interpretation backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    endpoint: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), PROCESS_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the bundle and validate the response
    pub async fn submit(&self, bundle: CaptureBundle) -> Result<ServerResponse, PipelineError> {
        let audio_len = bundle.audio.len();
        let image_len = bundle.image.len();

        let form = Form::new()
            .part(
                "audio",
                Part::bytes(bundle.audio)
                    .file_name("recording.wav")
                    .mime_str("audio/wav")?,
            )
            .part(
                "image",
                Part::bytes(bundle.image)
                    .file_name("capture.jpg")
                    .mime_str("image/jpeg")?,
            );

        info!(
            "Submitting capture to {} (audio={} bytes, image={} bytes)",
            self.endpoint, audio_len, image_len
        );

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let body: ResponseBody =
            serde_json::from_str(&text).map_err(|e| PipelineError::Malformed(e.to_string()))?;

        if let Some(error) = &body.error {
            warn!("Backend reported an error: {}", error);
        }

        ServerResponse::from_body(body)
    }
}
