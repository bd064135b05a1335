mod cli;
mod core;
mod processors;
mod utils;

pub use cli::{Cli, Commands, SettingsAction};
pub use crate::core::{
    ConfigProvider, Dimensions, FileJournal, Journal, MemoryConfig, NullJournal, Outcome,
    OutputFormat, Result, SettingValue, Settings, TomlConfig, UploadDescriptor, UploadTransformer,
    WebpifyError, DEFAULT_DELETE_ORIGINALS, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH,
    DEFAULT_QUALITY, ORIGINAL_SUFFIX, SUPPORTED_MIME_TYPES,
};
pub use crate::core::journal::{DEFAULT_JOURNAL_NAME, Level};
pub use crate::core::settings::{
    sanitize_dimension, sanitize_quality, sanitize_value, KEY_DELETE_ORIGINALS, KEY_MAX_HEIGHT,
    KEY_MAX_WIDTH, KEY_QUALITY, KNOWN_KEYS,
};
pub use processors::{
    fit_within, Compressor, ImageEditor, LocalStorage, Loader, RasterEditor, RasterImage,
    ResizeAlgorithm, Resizer, Storage,
};
pub use utils::{format_file_size, rewrite_url, sibling_with_extension, sibling_with_suffix};

pub mod prelude {
    pub use crate::{
        ConfigProvider, FileJournal, ImageEditor, LocalStorage, RasterEditor, Storage,
        UploadDescriptor, UploadTransformer,
    };
}

/// Transformer wired to the local filesystem and the `image` crate.
pub type LocalTransformer = UploadTransformer<RasterEditor, LocalStorage, FileJournal>;

// Re-export commonly used types
pub use image::DynamicImage;
