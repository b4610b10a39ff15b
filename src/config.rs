//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: SQLite connection string, defaults to `sqlite://face_login.db?mode=rwc`
/// - `SERVER_PORT`: HTTP server port, defaults to 5000
/// - `FACE_RECOGNITION_TOLERANCE`: similarity a stored face needs to become a candidate
/// - `MIN_CONFIDENCE_THRESHOLD`: similarity a candidate needs to log in
/// - `PHOTO_DIR`: optional directory for registration photos
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    /// Candidates below this similarity are ignored entirely.
    #[serde(default = "default_tolerance")]
    pub face_recognition_tolerance: f32,

    /// Acceptance threshold. A login succeeds only when the best candidate's
    /// similarity is strictly greater than this value.
    #[serde(default = "default_min_confidence")]
    pub min_confidence_threshold: f32,

    /// Side length of the square grayscale sample an embedding is built from.
    #[serde(default = "default_sample_size")]
    pub face_sample_size: u32,

    /// Captures smaller than this on either side are rejected.
    #[serde(default = "default_min_face_size")]
    pub min_face_size: u32,

    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    #[serde(default)]
    pub photo_dir: Option<PathBuf>,

    /// Comma separated in the environment.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_database_url() -> String {
    "sqlite://face_login.db?mode=rwc".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    5000
}

fn default_max_connections() -> u32 {
    5
}

fn default_tolerance() -> f32 {
    0.6
}

fn default_min_confidence() -> f32 {
    0.7
}

fn default_sample_size() -> u32 {
    100
}

fn default_min_face_size() -> u32 {
    100
}

fn default_max_image_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_cors_origins() -> Vec<String> {
    [
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5000",
        "http://127.0.0.1:5000",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            server_port: default_port(),
            database_max_connections: default_max_connections(),
            face_recognition_tolerance: default_tolerance(),
            min_confidence_threshold: default_min_confidence(),
            face_sample_size: default_sample_size(),
            min_face_size: default_min_face_size(),
            max_image_bytes: default_max_image_bytes(),
            photo_dir: None,
            cors_origins: default_cors_origins(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable cannot be parsed into the
    /// expected type, or if the parsed values fail [`Config::validate`].
    pub fn from_env() -> anyhow::Result<Self> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: min_confidence_threshold -> MIN_CONFIDENCE_THRESHOLD
        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make recognition meaningless.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("FACE_RECOGNITION_TOLERANCE", self.face_recognition_tolerance),
            ("MIN_CONFIDENCE_THRESHOLD", self.min_confidence_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{name} must be between 0 and 1, got {value}");
            }
        }
        if self.face_sample_size == 0 {
            anyhow::bail!("FACE_SAMPLE_SIZE must be positive");
        }
        if self.max_image_bytes == 0 {
            anyhow::bail!("MAX_IMAGE_BYTES must be positive");
        }
        Ok(())
    }
}
