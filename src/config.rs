//! Server configuration loaded from the environment
//!
//! Every value has a default so the server starts with no configuration at
//! all; unparseable numbers fall back to their defaults.

use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_BLOCKING_WORKERS: usize = 4;
const DEFAULT_INBOUND_QUEUE: usize = 8;

/// Configuration for the reasoning backend
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Full chat-completions endpoint URL
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434/v1/chat/completions".to_string(),
            model: "local-model".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            max_tokens: 50,
            temperature: 0.7,
        }
    }
}

/// Symmetric bounds for the affect deltas carried by a reply
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffectBounds {
    pub valence: f64,
    pub arousal: f64,
}

impl Default for AffectBounds {
    fn default() -> Self {
        Self {
            valence: 0.3,
            arousal: 0.2,
        }
    }
}

/// Configuration for the transcription collaborator
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    /// Base URL of an OpenAI-compatible audio API, without trailing slash
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// RMS level below which decoded WAV input is treated as silence
    pub silence_rms: f32,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/v1".to_string(),
            api_key: None,
            model: "whisper-1".to_string(),
            silence_rms: 0.01,
        }
    }
}

/// Configuration for the speech-synthesis collaborator
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Synthesis is disabled when no key is configured
    pub api_key: Option<String>,
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
    pub output_format: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.elevenlabs.io".to_string(),
            voice_id: "JBFqnCBsd6RMkjVDRZzb".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            output_format: "mp3_44100_128".to_string(),
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Upper bound on concurrent blocking collaborator calls across all sessions
    pub blocking_workers: usize,
    /// Inbound frames buffered per session while a turn is running
    pub inbound_queue: usize,
    pub llm: LlmConfig,
    pub affect: AffectBounds,
    pub transcription: TranscriptionConfig,
    pub synthesis: SynthesisConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            blocking_workers: DEFAULT_BLOCKING_WORKERS,
            inbound_queue: DEFAULT_INBOUND_QUEUE,
            llm: LlmConfig::default(),
            affect: AffectBounds::default(),
            transcription: TranscriptionConfig::default(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm = LlmConfig {
            url: lookup("LLM_URL").unwrap_or(defaults.llm.url),
            model: lookup("LLM_MODEL").unwrap_or(defaults.llm.model),
            api_key: non_empty("LLM_API_KEY"),
            timeout: parse_var(&lookup, "LLM_TIMEOUT_SECS")
                .map_or(defaults.llm.timeout, Duration::from_secs),
            max_tokens: parse_var(&lookup, "LLM_MAX_TOKENS").unwrap_or(defaults.llm.max_tokens),
            temperature: parse_var(&lookup, "LLM_TEMPERATURE")
                .unwrap_or(defaults.llm.temperature),
        };

        let affect = AffectBounds {
            valence: parse_var(&lookup, "IRIS_VALENCE_BOUND")
                .filter(|b: &f64| b.is_finite())
                .map_or(defaults.affect.valence, f64::abs),
            arousal: parse_var(&lookup, "IRIS_AROUSAL_BOUND")
                .filter(|b: &f64| b.is_finite())
                .map_or(defaults.affect.arousal, f64::abs),
        };

        let transcription = TranscriptionConfig {
            base_url: lookup("STT_API_URL").unwrap_or(defaults.transcription.base_url),
            api_key: non_empty("STT_API_KEY"),
            model: lookup("STT_MODEL").unwrap_or(defaults.transcription.model),
            silence_rms: parse_var(&lookup, "STT_SILENCE_RMS")
                .unwrap_or(defaults.transcription.silence_rms),
        };

        let synthesis = SynthesisConfig {
            api_key: non_empty("ELEVENLABS_API_KEY"),
            base_url: lookup("ELEVENLABS_BASE_URL").unwrap_or(defaults.synthesis.base_url),
            voice_id: lookup("ELEVENLABS_VOICE_ID").unwrap_or(defaults.synthesis.voice_id),
            model_id: lookup("ELEVENLABS_MODEL_ID").unwrap_or(defaults.synthesis.model_id),
            output_format: lookup("ELEVENLABS_OUTPUT_FORMAT")
                .unwrap_or(defaults.synthesis.output_format),
        };

        Self {
            port: parse_var(&lookup, "IRIS_PORT").unwrap_or(defaults.port),
            blocking_workers: parse_var(&lookup, "IRIS_BLOCKING_WORKERS")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.blocking_workers),
            inbound_queue: parse_var(&lookup, "IRIS_INBOUND_QUEUE")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.inbound_queue),
            llm,
            affect,
            transcription,
            synthesis,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
