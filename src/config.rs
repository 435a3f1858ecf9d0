use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 10000;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("Unknown voice preset '{0}' (expected 'thai' or 'generic')")]
    UnknownPreset(String),

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Cannot derive a language code from voice name '{0}', set TTS_LANGUAGE_CODE")]
    MissingLanguageCode(String),
}

/// Built-in voice deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoicePreset {
    Thai,
    #[default]
    Generic,
}

impl VoicePreset {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "thai" | "th" => Ok(Self::Thai),
            "generic" | "english" | "en" => Ok(Self::Generic),
            _ => Err(ConfigError::UnknownPreset(value.to_string())),
        }
    }

    fn default_voice_name(self) -> &'static str {
        match self {
            Self::Thai => "th-TH-Neural2-C",
            Self::Generic => "en-US-Neural2-F",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::Thai => "Thai TTS failed",
            Self::Generic => "TTS failed",
        }
    }
}

/// Voice used for every synthesis call made by this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfig {
    pub language_code: String,
    pub name: String,
    /// Message returned to callers when synthesis fails.
    pub failure_message: String,
}

impl VoiceConfig {
    pub fn from_preset(preset: VoicePreset) -> Self {
        let name = preset.default_voice_name();
        Self {
            // Preset names always carry a language prefix
            language_code: language_code_from_voice(name).unwrap_or_default(),
            name: name.to_string(),
            failure_message: preset.failure_message().to_string(),
        }
    }
}

/// Startup configuration, read once from the environment.
#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub voice: VoiceConfig,
    /// Service account JSON. Falls back to application default credentials when unset.
    pub credentials_json: Option<String>,
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("voice", &self.voice)
            .field(
                "credentials_json",
                &self.credentials_json.as_ref().map(|_| "<redacted>"),
            )
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", host, port)))?;

        let preset = match var("TTS_VOICE_PRESET") {
            Some(value) => VoicePreset::parse(&value)?,
            None => VoicePreset::default(),
        };

        let mut voice = VoiceConfig::from_preset(preset);
        if let Some(name) = var("TTS_VOICE_NAME") {
            voice.language_code = match language_code_from_voice(&name) {
                Some(code) => code,
                None => voice.language_code,
            };
            voice.name = name;
        }
        if let Some(code) = var("TTS_LANGUAGE_CODE") {
            voice.language_code = code;
        } else if language_code_from_voice(&voice.name).is_none() {
            return Err(ConfigError::MissingLanguageCode(voice.name));
        }

        let request_timeout = match var("TTS_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value.trim().parse::<u64>().map_err(|_| {
                    ConfigError::InvalidNumber {
                        name: "TTS_TIMEOUT_SECS",
                        value,
                    }
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            addr,
            voice,
            credentials_json: var("GOOGLE_APPLICATION_CREDENTIALS_JSON"),
            request_timeout,
        })
    }
}

/// Extract the language code from a Google voice name (e.g. `th-TH-Neural2-C` -> `th-TH`).
pub fn language_code_from_voice(name: &str) -> Option<String> {
    let mut parts = name.split('-');
    let language = parts.next().filter(|p| !p.is_empty())?;
    let region = parts.next().filter(|p| !p.is_empty())?;
    // Voice names always carry a model segment after the region
    parts.next()?;
    Some(format!("{}-{}", language, region))
}
