pub mod google;

use async_trait::async_trait;
use bytes::Bytes;

pub use google::GoogleTts;

/// Audio encoding requested from the provider. Only raw 16-bit PCM is relayed.
pub const LINEAR16: &str = "LINEAR16";

/// Parameters for a single provider synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub language_code: String,
    pub voice_name: String,
    pub audio_encoding: &'static str,
    pub sample_rate_hertz: u32,
}

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] gcp_auth::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid audio content: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Empty audio from provider")]
    EmptyAudio,
}

/// A text-to-speech backend that returns raw audio for a request.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn synthesize(&self, request: SpeechRequest) -> Result<Bytes, ProviderError>;
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every request and answers with a canned result.
    pub struct RecordingProvider {
        calls: Mutex<Vec<SpeechRequest>>,
        respond: Box<dyn Fn() -> Result<Bytes, ProviderError> + Send + Sync>,
    }

    impl RecordingProvider {
        pub fn returning(audio: &'static [u8]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                respond: Box::new(move || Ok(Bytes::from_static(audio))),
            }
        }

        pub fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                respond: Box::new(|| {
                    Err(ProviderError::Status {
                        status: reqwest::StatusCode::FORBIDDEN,
                        body: "PERMISSION_DENIED: secret project details".to_string(),
                    })
                }),
            }
        }

        pub fn calls(&self) -> Vec<SpeechRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SpeechProvider for RecordingProvider {
        async fn synthesize(&self, request: SpeechRequest) -> Result<Bytes, ProviderError> {
            self.calls.lock().unwrap().push(request);
            (self.respond)()
        }
    }
}
