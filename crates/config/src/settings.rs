//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ConfigError, ScoringConfig};

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Metric weights and thresholds
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Embedding backend
    #[serde(default)]
    pub embedding: EmbeddingSettings,

    /// Speaker classification and empathy grading
    #[serde(default)]
    pub llm: LlmConfig,

    /// Speech-to-text service
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "port must be non-zero"));
        }

        self.scoring.validate()?;
        self.validate_model_paths()?;

        if self.llm.temperature < 0.0 {
            return Err(ConfigError::invalid(
                "llm.temperature",
                "temperature must not be negative",
            ));
        }

        if self.transcription.poll_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "transcription.poll_interval_ms",
                "poll interval must be non-zero",
            ));
        }

        Ok(())
    }

    /// ONNX backend needs both model files; missing files only warn
    fn validate_model_paths(&self) -> Result<(), ConfigError> {
        if self.embedding.backend != EmbeddingBackend::Onnx {
            return Ok(());
        }

        let checks = [
            ("embedding.model_path", &self.embedding.model_path, ".onnx"),
            ("embedding.tokenizer_path", &self.embedding.tokenizer_path, ".json"),
        ];

        for (field, path, ext) in checks {
            if path.is_empty() {
                return Err(ConfigError::MissingField(field.to_string()));
            }
            if !path.ends_with(ext) {
                tracing::warn!("{}: expected {} extension, got '{}'", field, ext, path);
            }
            if !Path::new(path).exists() {
                tracing::warn!("Model not found: {} = {}", field, path);
            }
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_timeout() -> u64 {
    600
}
fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
        }
    }
}

/// Embedding backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Deterministic feature hashing, no model files
    #[default]
    Hashing,
    /// Sentence-transformer through ONNX Runtime
    Onnx,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Vector dimension
    #[serde(default = "default_embedding_dim")]
    pub dim: usize,

    /// ONNX model path
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Tokenizer path
    #[serde(default = "default_tokenizer_path")]
    pub tokenizer_path: String,

    /// Maximum tokens per text
    #[serde(default = "default_max_seq_len")]
    pub max_seq_len: usize,
}

fn default_embedding_dim() -> usize {
    384
}
fn default_model_path() -> String {
    "models/embeddings/all-MiniLM-L6-v2.onnx".to_string()
}
fn default_tokenizer_path() -> String {
    "models/embeddings/tokenizer.json".to_string()
}
fn default_max_seq_len() -> usize {
    256
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            dim: default_embedding_dim(),
            model_path: default_model_path(),
            tokenizer_path: default_tokenizer_path(),
            max_seq_len: default_max_seq_len(),
        }
    }
}

/// Speaker classification providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerProvider {
    /// Ask the LLM
    #[default]
    Ollama,
    /// Fixed mapping from configuration
    Static,
}

/// Empathy grading providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmpathyProvider {
    /// Ask the LLM
    #[default]
    Ollama,
    /// Fixed scores from configuration
    Fixed,
}

/// Scores returned by the fixed empathy grader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedEmpathyConfig {
    #[serde(default = "default_half")]
    pub emotion_recognition: f64,
    #[serde(default = "default_half")]
    pub emotion_validation: f64,
    #[serde(default = "default_half")]
    pub support_intent: f64,
}

fn default_half() -> f64 {
    0.5
}

impl Default for FixedEmpathyConfig {
    fn default() -> Self {
        Self {
            emotion_recognition: default_half(),
            emotion_validation: default_half(),
            support_intent: default_half(),
        }
    }
}

/// LLM collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub speaker_provider: SpeakerProvider,

    #[serde(default)]
    pub empathy_provider: EmpathyProvider,

    /// Diarization tag of the agent for the static classifier
    #[serde(default = "default_agent_tag")]
    pub static_agent_tag: String,

    #[serde(default)]
    pub fixed_empathy: FixedEmpathyConfig,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "llama3".to_string()
}
fn default_llm_timeout() -> u64 {
    120
}
fn default_agent_tag() -> String {
    "A".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_model(),
            temperature: 0.0,
            timeout_secs: default_llm_timeout(),
            speaker_provider: SpeakerProvider::default(),
            empathy_provider: EmpathyProvider::default(),
            static_agent_tag: default_agent_tag(),
            fixed_empathy: FixedEmpathyConfig::default(),
        }
    }
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// AssemblyAI API base URL
    #[serde(default = "default_assemblyai_url")]
    pub base_url: String,

    /// API key; audio evaluation is disabled without it
    #[serde(default)]
    pub api_key: Option<String>,

    /// Delay between status polls (ms)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Give up after this many seconds
    #[serde(default = "default_transcription_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_min_speakers")]
    pub min_speakers: u32,

    #[serde(default = "default_max_speakers")]
    pub max_speakers: u32,
}

fn default_assemblyai_url() -> String {
    "https://api.assemblyai.com".to_string()
}
fn default_poll_interval() -> u64 {
    3000
}
fn default_transcription_timeout() -> u64 {
    300
}
fn default_min_speakers() -> u32 {
    2
}
fn default_max_speakers() -> u32 {
    5
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: default_assemblyai_url(),
            api_key: None,
            poll_interval_ms: default_poll_interval(),
            timeout_secs: default_transcription_timeout(),
            min_speakers: default_min_speakers(),
            max_speakers: default_max_speakers(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (CALL_EVAL__ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("CALL_EVAL")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.llm.model, "llama3");
        assert_eq!(settings.transcription.poll_interval_ms, 3000);
        assert_eq!(settings.embedding.backend, EmbeddingBackend::Hashing);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        settings.server.port = 8000;
        settings.scoring.weights.satisfaction = 0.9;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_onnx_requires_paths() {
        let mut settings = Settings::default();
        settings.embedding.backend = EmbeddingBackend::Onnx;
        settings.embedding.model_path.clear();
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let json = r#"{"llm": {"empathy_provider": "fixed"}, "scoring": {"satisfaction_portion": 0.35}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.llm.empathy_provider, EmpathyProvider::Fixed);
        assert_eq!(settings.llm.base_url, "http://localhost:11434");
        assert_eq!(settings.scoring.satisfaction_portion, 0.35);
        assert_eq!(settings.scoring.interruption_tolerance_ms, 300);
    }

    #[test]
    fn test_load_without_files() {
        let settings = load_settings(Some("nonexistent-env")).unwrap();
        assert!(settings.validate().is_ok());
    }
}
