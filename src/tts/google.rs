use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use serde::{Deserialize, Serialize};

use super::{ProviderError, SpeechProvider, SpeechRequest};

const SYNTHESIZE_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
const SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeBody<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfig<'a>,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig<'a> {
    audio_encoding: &'a str,
    sample_rate_hertz: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

impl<'a> From<&'a SpeechRequest> for SynthesizeBody<'a> {
    fn from(request: &'a SpeechRequest) -> Self {
        Self {
            input: SynthesisInput {
                text: &request.text,
            },
            voice: VoiceSelectionParams {
                language_code: &request.language_code,
                name: &request.voice_name,
            },
            audio_config: AudioConfig {
                audio_encoding: request.audio_encoding,
                sample_rate_hertz: request.sample_rate_hertz,
            },
        }
    }
}

/// Google Cloud Text-to-Speech over the v1 REST API.
#[derive(Clone)]
pub struct GoogleTts {
    client: reqwest::Client,
    auth: Arc<dyn TokenProvider>,
}

impl GoogleTts {
    /// Build a client from a service account JSON blob, or from application
    /// default credentials when none is given.
    pub async fn new(
        credentials_json: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let auth: Arc<dyn TokenProvider> = match credentials_json {
            Some(json) => Arc::new(CustomServiceAccount::from_json(json)?),
            None => gcp_auth::provider().await?,
        };

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            auth,
        })
    }
}

#[async_trait]
impl SpeechProvider for GoogleTts {
    #[tracing::instrument(skip_all, fields(voice = %request.voice_name, rate = request.sample_rate_hertz))]
    async fn synthesize(&self, request: SpeechRequest) -> Result<Bytes, ProviderError> {
        let token = self.auth.token(SCOPES).await?;

        let response = self
            .client
            .post(SYNTHESIZE_URL)
            .bearer_auth(token.as_str())
            .json(&SynthesizeBody::from(&request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let body: SynthesizeResponse = response.json().await?;
        decode_audio(&body.audio_content)
    }
}

fn decode_audio(content: &str) -> Result<Bytes, ProviderError> {
    Ok(Bytes::from(STANDARD.decode(content)?))
}
