// webpify/src/core/transformer.rs
use super::journal::Journal;
use super::settings::{ConfigProvider, Settings};
use super::{ORIGINAL_SUFFIX, OutputFormat, UploadDescriptor};
use crate::processors::{ImageEditor, Storage};
use crate::utils::{file_name, rewrite_url, sibling_with_extension, sibling_with_suffix};

/// Terminal state reached by one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The upload had already failed upstream.
    PassedThrough,
    /// Not a JPEG or PNG.
    Skipped,
    LoadFailed,
    EncodeFailed,
    Deleted,
    Renamed,
    /// Converted, but the original could not be renamed and stays where it was.
    RenameSkipped,
    /// The upload already had the output name, so the encode replaced it in place.
    Overwritten,
}

impl Outcome {
    pub fn converted(&self) -> bool {
        matches!(
            self,
            Self::Deleted | Self::Renamed | Self::RenameSkipped | Self::Overwritten
        )
    }
}

/// Resizes and transcodes freshly uploaded images to WebP.
pub struct UploadTransformer<E, S, J> {
    editor: E,
    storage: S,
    journal: J,
    format: OutputFormat,
}

impl<E, S, J> UploadTransformer<E, S, J>
where
    E: ImageEditor,
    S: Storage,
    J: Journal,
{
    pub fn new(editor: E, storage: S, journal: J) -> Self {
        Self {
            editor,
            storage,
            journal,
            format: OutputFormat::WebP,
        }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn journal(&self) -> &J {
        &self.journal
    }

    /// Always returns a descriptor pointing at a file that exists.
    pub fn transform(&self, descriptor: UploadDescriptor, config: &dyn ConfigProvider) -> UploadDescriptor {
        self.transform_with_outcome(descriptor, config).0
    }

    pub fn transform_with_outcome(
        &self,
        descriptor: UploadDescriptor,
        config: &dyn ConfigProvider,
    ) -> (UploadDescriptor, Outcome) {
        if descriptor.has_error() {
            self.journal.warn(&format!(
                "Upload error for file: {}. Error: {}",
                descriptor.file.display(),
                descriptor.error.as_deref().unwrap_or_default()
            ));
            return (descriptor, Outcome::PassedThrough);
        }

        if !descriptor.is_supported_type() {
            return (descriptor, Outcome::Skipped);
        }

        let original = descriptor.file.clone();
        let original_name = file_name(&original);
        self.journal
            .info(&format!("Starting processing for image: {}", original_name));

        let mut handle = match self.editor.load(&original) {
            Ok(handle) => handle,
            Err(e) => {
                self.journal.warn(&format!(
                    "Failed to load image editor for: {}. Error: {}",
                    original_name, e
                ));
                return (descriptor, Outcome::LoadFailed);
            }
        };

        let settings = Settings::from_provider(config);

        let size = self.editor.size(&handle);
        if size.exceeds(settings.max_width, settings.max_height) {
            self.journal.info(&format!(
                "Resizing image. Original: {}x{}. Max: {}x{}.",
                size.width, size.height, settings.max_width, settings.max_height
            ));
            self.editor
                .resize(&mut handle, settings.max_width, settings.max_height, false);
        } else {
            self.journal.info(&format!(
                "No resizing needed. Dimensions: {}x{} are within limits.",
                size.width, size.height
            ));
        }

        self.editor.set_quality(&mut handle, settings.quality);

        let encoded = sibling_with_extension(&original, self.format.extension());
        let encoded_name = file_name(&encoded);

        if let Err(e) = self.editor.encode(&handle, &encoded, self.format) {
            self.journal.warn(&format!(
                "Failed to save WebP to: {}. Error: {}",
                encoded_name, e
            ));
            return (descriptor, Outcome::EncodeFailed);
        }
        drop(handle);

        self.journal
            .info(&format!("Successfully converted to WebP: {}", encoded_name));

        // Deleting or moving here would take the freshly encoded file with it
        let outcome = if encoded == original {
            self.journal.info(&format!(
                "Original file was replaced by the WebP output: {}",
                encoded_name
            ));
            Outcome::Overwritten
        } else {
            self.dispose_of_original(&original, &original_name, &settings)
        };

        let url = rewrite_url(&descriptor.url, &original_name, &encoded_name);
        let rewritten = UploadDescriptor {
            file: encoded,
            url,
            mime_type: self.format.mime_type().to_string(),
            error: descriptor.error,
        };

        (rewritten, outcome)
    }

    fn dispose_of_original(
        &self,
        original: &std::path::Path,
        original_name: &str,
        settings: &Settings,
    ) -> Outcome {
        if settings.delete_originals {
            self.storage.delete(original);
            self.journal
                .info(&format!("Deleted original file: {}", original_name));
            return Outcome::Deleted;
        }

        let renamed = sibling_with_suffix(original, ORIGINAL_SUFFIX);
        let renamed_name = file_name(&renamed);

        if self.storage.move_file(original, &renamed) {
            self.journal
                .info(&format!("Renamed original file to: {}", renamed_name));
            Outcome::Renamed
        } else {
            self.journal.warn(&format!(
                "Storage not available. Failed to rename original file: {}",
                renamed_name
            ));
            Outcome::RenameSkipped
        }
    }
}
