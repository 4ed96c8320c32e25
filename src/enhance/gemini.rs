use super::{ContentPart, GenerateRequest, GenerateResponse, GenerativeTransport, InlineImage, Modality};
use crate::settings::Settings;
use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set.")]
    MissingCredential(String),
    #[error("invalid service endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Transport for the Gemini `generateContent` API.
pub struct GeminiTransport {
    client: Client,
    api_key: String,
    url: Url,
}

impl GeminiTransport {
    pub fn new(api_key: String, endpoint: &str, model: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let base = endpoint.trim_end_matches('/');
        let url = Url::parse(&format!("{base}/models/{model}:generateContent")).map_err(|source| {
            ConfigError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;
        let mut builder = Client::builder().user_agent("photo-enhancer");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_key,
            url,
        })
    }

    /// Build the transport from settings, reading the credential from the
    /// configured environment variable. A missing credential is fatal.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredential(settings.api_key_env.clone()))?;
        Self::new(
            api_key,
            &settings.endpoint,
            &settings.model,
            settings.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl GenerativeTransport for GeminiTransport {
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let body = WireRequest::from(request);
        let resp = self
            .client
            .post(self.url.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .context("send request")?;
        let status = resp.status();
        let text = resp.text().context("read response body")?;
        if !status.is_success() {
            bail!(service_error_message(&text).unwrap_or_else(|| format!("HTTP {status}")));
        }
        let parsed: WireResponse = serde_json::from_str(&text).context("parse response")?;
        Ok(parsed.into())
    }
}

fn service_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<WireErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    contents: Vec<WireContent>,
    generation_config: WireGenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireBlob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBlob {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Deserialize)]
struct WireCandidate {
    #[serde(default)]
    content: WireContent,
}

#[derive(Deserialize)]
struct WireErrorEnvelope {
    error: WireError,
}

#[derive(Deserialize)]
struct WireError {
    #[serde(default)]
    message: String,
}

impl From<&GenerateRequest> for WireRequest {
    fn from(req: &GenerateRequest) -> Self {
        WireRequest {
            contents: vec![WireContent {
                parts: vec![
                    WirePart {
                        inline_data: Some(WireBlob {
                            mime_type: req.media_type.clone(),
                            data: req.image_payload.clone(),
                        }),
                        text: None,
                    },
                    WirePart {
                        inline_data: None,
                        text: Some(req.instruction.clone()),
                    },
                ],
            }],
            generation_config: WireGenerationConfig {
                response_modalities: req
                    .modalities
                    .iter()
                    .map(|m| match m {
                        Modality::Image => "IMAGE",
                        Modality::Text => "TEXT",
                    })
                    .collect(),
            },
        }
    }
}

impl From<WireResponse> for GenerateResponse {
    fn from(resp: WireResponse) -> Self {
        // Only the first candidate is considered.
        let parts = resp
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts)
            .unwrap_or_default()
            .into_iter()
            .map(|p| ContentPart {
                inline_image: p.inline_data.map(|b| InlineImage {
                    data: b.data,
                    media_type: b.mime_type,
                }),
                text: p.text,
            })
            .collect();
        GenerateResponse { parts }
    }
}
