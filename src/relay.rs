use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::config::VoiceConfig;
use crate::error::AppError;
use crate::tts::{ProviderError, SpeechProvider, SpeechRequest, LINEAR16};

/// Discriminator the caller must put in `message.type`.
pub const VOICE_REQUEST: &str = "voice-request";

const INVALID_REQUEST: &str = "Invalid request";
const INVALID_TEXT: &str = "Invalid or missing text";

/// Output sample rate, restricted to the rates callers are known to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRate(u32);

impl SampleRate {
    pub const ALLOWED: [u32; 5] = [8000, 16000, 22050, 24000, 44100];
    pub const DEFAULT: SampleRate = SampleRate(24000);

    /// Resolve a raw JSON value, falling back to the default for anything
    /// that is not an allowed integer rate.
    pub fn resolve(value: Option<&Value>) -> Self {
        value
            .and_then(as_integer)
            .and_then(|rate| u32::try_from(rate).ok())
            .filter(|rate| Self::ALLOWED.contains(rate))
            .map(SampleRate)
            .unwrap_or(Self::DEFAULT)
    }

    pub fn hertz(self) -> u32 {
        self.0
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn as_integer(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
            .map(|f| f as u64)
    })
}

/// A validated voice request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    /// Trimmed, never empty.
    pub text: String,
    pub sample_rate: SampleRate,
}

impl SynthesisRequest {
    /// Validate an inbound envelope `{ "message": { "type", "text", "sampleRate" } }`.
    pub fn from_envelope(body: &Value) -> Result<Self, AppError> {
        let message = body
            .get("message")
            .filter(|m| !m.is_null())
            .ok_or_else(|| AppError::BadRequest(INVALID_REQUEST.into()))?;

        if message.get("type").and_then(Value::as_str) != Some(VOICE_REQUEST) {
            return Err(AppError::BadRequest(INVALID_REQUEST.into()));
        }

        let text = message
            .get("text")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::BadRequest(INVALID_TEXT.into()))?;

        Ok(Self {
            text: text.to_string(),
            sample_rate: SampleRate::resolve(message.get("sampleRate")),
        })
    }

    /// Parse and validate a raw request body. Bodies that are not JSON are
    /// rejected like a missing envelope.
    pub fn from_slice(raw: &[u8]) -> Result<Self, AppError> {
        let body: Value = serde_json::from_slice(raw)
            .map_err(|_| AppError::BadRequest(INVALID_REQUEST.into()))?;
        Self::from_envelope(&body)
    }
}

/// Forwards validated requests to the provider with the process-wide voice.
pub struct SynthesisRelay {
    provider: Arc<dyn SpeechProvider>,
    voice: VoiceConfig,
}

impl SynthesisRelay {
    pub fn new(provider: Arc<dyn SpeechProvider>, voice: VoiceConfig) -> Self {
        Self { provider, voice }
    }

    pub fn voice(&self) -> &VoiceConfig {
        &self.voice
    }

    pub async fn synthesize(&self, request: SynthesisRequest) -> Result<Bytes, AppError> {
        let speech = SpeechRequest {
            text: request.text,
            language_code: self.voice.language_code.clone(),
            voice_name: self.voice.name.clone(),
            audio_encoding: LINEAR16,
            sample_rate_hertz: request.sample_rate.hertz(),
        };

        let audio = self
            .provider
            .synthesize(speech)
            .await
            .and_then(|audio| {
                if audio.is_empty() {
                    Err(ProviderError::EmptyAudio)
                } else {
                    Ok(audio)
                }
            })
            .map_err(|source| AppError::SynthesisFailed {
                message: self.voice.failure_message.clone(),
                source,
            })?;

        tracing::debug!(bytes = audio.len(), "Synthesized audio");
        Ok(audio)
    }
}
