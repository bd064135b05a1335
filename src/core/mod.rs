// webpify/src/core/mod.rs
pub mod journal;
pub mod settings;
pub mod transformer;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub use journal::{FileJournal, Journal, NullJournal};
pub use settings::{ConfigProvider, MemoryConfig, SettingValue, Settings, TomlConfig};
pub use transformer::{Outcome, UploadTransformer};

/// MIME types accepted by the transformer. Matched case-sensitively.
pub const SUPPORTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Suffix appended to the stem of a kept original.
pub const ORIGINAL_SUFFIX: &str = "_original";

pub const DEFAULT_MAX_WIDTH: u32 = 2300;
pub const DEFAULT_MAX_HEIGHT: u32 = 2300;
pub const DEFAULT_QUALITY: u8 = 90;
pub const DEFAULT_DELETE_ORIGINALS: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is larger than the matching bound.
    pub fn exceeds(&self, max_width: u32, max_height: u32) -> bool {
        self.width > max_width || self.height > max_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    WebP,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
        }
    }
}

/// One just-uploaded file as handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDescriptor {
    pub file: PathBuf,
    pub url: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadDescriptor {
    pub fn new(file: impl Into<PathBuf>, url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            url: url.into(),
            mime_type: mime_type.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// The upload already failed upstream.
    pub fn has_error(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    pub fn is_supported_type(&self) -> bool {
        SUPPORTED_MIME_TYPES.contains(&self.mime_type.as_str())
    }
}

#[derive(Error, Debug)]
pub enum WebpifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Memory limit exceeded: {0}")]
    MemoryLimitExceeded(String),
}

pub type Result<T> = std::result::Result<T, WebpifyError>;
