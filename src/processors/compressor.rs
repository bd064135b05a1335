// webpify/src/processors/compressor.rs
use crate::core::{OutputFormat, Result, WebpifyError};
use crate::utils::format_file_size;
use image::DynamicImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Compressor {
    quality: u8,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.min(100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encodes `image` into `path`. A partially written file is removed on failure.
    pub fn save(&self, image: &DynamicImage, path: &Path, format: OutputFormat) -> Result<()> {
        log::debug!(
            "Saving image to {} with format {:?}, quality: {}",
            path.display(),
            format,
            self.quality
        );

        let data = self.compress_to_bytes(image, format)?;

        let written = File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            writer.write_all(&data)?;
            writer.flush()
        });

        if let Err(e) = written {
            let _ = std::fs::remove_file(path);
            return Err(WebpifyError::Io(e));
        }

        log::info!("Saved image: {} ({})", path.display(), format_file_size(data.len() as u64));
        Ok(())
    }

    pub fn compress_to_bytes(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::WebP => {
                let (width, height) = (image.width(), image.height());
                if width == 0 || height == 0 {
                    return Err(WebpifyError::InvalidParameter(format!(
                        "cannot encode an empty {}x{} image",
                        width, height
                    )));
                }

                // Lossy libwebp encode, quality maps straight onto its 0-100 scale
                let encoded = if image.color().has_alpha() {
                    let rgba = image.to_rgba8();
                    webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode(self.quality as f32)
                } else {
                    let rgb = image.to_rgb8();
                    webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode(self.quality as f32)
                };

                Ok(encoded.to_vec())
            }
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(crate::core::DEFAULT_QUALITY)
    }
}
