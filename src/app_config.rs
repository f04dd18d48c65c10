use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory receiving generated scene media
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Screenplay generation service
    #[serde(default)]
    pub script_writer: ScriptWriterConfig,

    /// Media generation service
    #[serde(default)]
    pub media: MediaServiceConfig,

    /// Job polling budgets and prompt limits
    #[serde(default)]
    pub polling: PollingConfig,

    /// Scenes rendered at the same time
    #[serde(default = "default_concurrent_scenes")]
    pub concurrent_scenes: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Screenplay generation (Anthropic) configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScriptWriterConfig {
    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_anthropic_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_anthropic_model")]
    pub model: String,

    /// Maximum tokens per screenplay
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_script_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ScriptWriterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_anthropic_endpoint(),
            model: default_anthropic_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_script_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Media generation (Runway) configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MediaServiceConfig {
    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_runway_endpoint")]
    pub endpoint: String,

    /// API version header value
    #[serde(default = "default_runway_api_version")]
    pub api_version: String,

    /// Text-to-image model
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Image-to-video model
    #[serde(default = "default_video_model")]
    pub video_model: String,

    /// Aspect ratio for generated keyframes
    #[serde(default = "default_image_ratio")]
    pub image_ratio: String,

    /// Aspect ratio for generated clips
    #[serde(default = "default_video_ratio")]
    pub video_ratio: String,

    /// Per-request HTTP timeout in seconds for submits and polls
    #[serde(default = "default_media_timeout_secs")]
    pub timeout_secs: u64,

    /// HTTP timeout in seconds for downloading a finished clip
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for MediaServiceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_runway_endpoint(),
            api_version: default_runway_api_version(),
            image_model: default_image_model(),
            video_model: default_video_model(),
            image_ratio: default_image_ratio(),
            video_ratio: default_video_ratio(),
            timeout_secs: default_media_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

/// Polling budgets and service-imposed limits for scene jobs
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PollingConfig {
    /// Seconds between image task polls
    #[serde(default = "default_image_interval_secs")]
    pub image_interval_secs: u64,

    /// Maximum seconds to wait for an image task
    #[serde(default = "default_image_max_wait_secs")]
    pub image_max_wait_secs: u64,

    /// Seconds between video task polls
    #[serde(default = "default_video_interval_secs")]
    pub video_interval_secs: u64,

    /// Maximum seconds to wait for a video task
    #[serde(default = "default_video_max_wait_secs")]
    pub video_max_wait_secs: u64,

    /// Maximum characters in an image prompt
    #[serde(default = "default_image_prompt_limit")]
    pub image_prompt_limit: usize,

    /// Maximum characters in a video prompt
    #[serde(default = "default_video_prompt_limit")]
    pub video_prompt_limit: usize,

    /// Longest clip the video model accepts
    #[serde(default = "default_max_clip_seconds")]
    pub max_clip_seconds: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            image_interval_secs: default_image_interval_secs(),
            image_max_wait_secs: default_image_max_wait_secs(),
            video_interval_secs: default_video_interval_secs(),
            video_max_wait_secs: default_video_max_wait_secs(),
            image_prompt_limit: default_image_prompt_limit(),
            video_prompt_limit: default_video_prompt_limit(),
            max_clip_seconds: default_max_clip_seconds(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_concurrent_scenes() -> usize {
    2
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_max_tokens() -> u32 {
    6000
}

fn default_script_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.7
}

fn default_runway_endpoint() -> String {
    "https://api.dev.runwayml.com".to_string()
}

fn default_runway_api_version() -> String {
    "2024-11-06".to_string()
}

fn default_image_model() -> String {
    "gen4_image".to_string()
}

fn default_video_model() -> String {
    "gen3a_turbo".to_string()
}

fn default_image_ratio() -> String {
    "1920:1080".to_string()
}

fn default_video_ratio() -> String {
    "1280:768".to_string()
}

fn default_media_timeout_secs() -> u64 {
    60
}

fn default_download_timeout_secs() -> u64 {
    300
}

fn default_image_interval_secs() -> u64 {
    5
}

fn default_image_max_wait_secs() -> u64 {
    120
}

fn default_video_interval_secs() -> u64 {
    10
}

fn default_video_max_wait_secs() -> u64 {
    300
}

fn default_image_prompt_limit() -> usize {
    1000
}

fn default_video_prompt_limit() -> usize {
    512
}

fn default_max_clip_seconds() -> u32 {
    10
}

impl PollingConfig {
    /// Image poll interval
    pub fn image_interval(&self) -> Duration {
        Duration::from_secs(self.image_interval_secs)
    }

    /// Image wait budget
    pub fn image_max_wait(&self) -> Duration {
        Duration::from_secs(self.image_max_wait_secs)
    }

    /// Video poll interval
    pub fn video_interval(&self) -> Duration {
        Duration::from_secs(self.video_interval_secs)
    }

    /// Video wait budget
    pub fn video_max_wait(&self) -> Duration {
        Duration::from_secs(self.video_max_wait_secs)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.image_interval_secs == 0 || self.image_interval_secs > self.image_max_wait_secs {
            return Err(AppError::Config(
                "image_interval_secs must be positive and not exceed image_max_wait_secs".to_string(),
            ));
        }
        if self.video_interval_secs == 0 || self.video_interval_secs > self.video_max_wait_secs {
            return Err(AppError::Config(
                "video_interval_secs must be positive and not exceed video_max_wait_secs".to_string(),
            ));
        }
        if self.video_prompt_limit == 0 || self.image_prompt_limit <= self.video_prompt_limit {
            return Err(AppError::Config(
                "image_prompt_limit must exceed video_prompt_limit, which must be positive".to_string(),
            ));
        }
        if self.max_clip_seconds == 0 {
            return Err(AppError::Config("max_clip_seconds must be positive".to_string()));
        }
        Ok(())
    }
}

impl Config {
    /// Load a configuration file, creating it with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;
        Ok((config, true))
    }

    /// Fill empty API keys from the environment
    ///
    /// Reads `ANTHROPIC_API_KEY` and `RUNWAY_API_KEY`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Fill empty API keys using a custom lookup
    pub fn apply_overrides_from<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if self.script_writer.api_key.is_empty() {
            if let Some(key) = lookup("ANTHROPIC_API_KEY").filter(|k| !k.is_empty()) {
                self.script_writer.api_key = key;
            }
        }
        if self.media.api_key.is_empty() {
            if let Some(key) = lookup("RUNWAY_API_KEY").filter(|k| !k.is_empty()) {
                self.media.api_key = key;
            }
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, endpoint) in [
            ("script_writer.endpoint", &self.script_writer.endpoint),
            ("media.endpoint", &self.media.endpoint),
        ] {
            Url::parse(endpoint)
                .map_err(|e| AppError::Config(format!("{} is not a valid URL ({}): {}", name, e, endpoint)))?;
        }

        if self.concurrent_scenes == 0 {
            return Err(AppError::Config("concurrent_scenes must be at least 1".to_string()));
        }

        self.polling.validate()
    }

    /// Validate everything needed to render scenes
    pub fn validate_for_render(&self) -> Result<(), AppError> {
        self.validate()?;
        if self.media.api_key.is_empty() {
            return Err(AppError::Config(
                "Media API key is required for rendering (set media.api_key or RUNWAY_API_KEY)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: default_output_dir(),
            script_writer: ScriptWriterConfig::default(),
            media: MediaServiceConfig::default(),
            polling: PollingConfig::default(),
            concurrent_scenes: default_concurrent_scenes(),
            log_level: LogLevel::default(),
        }
    }
}
