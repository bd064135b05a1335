// webpify/src/processors/loader.rs
use crate::core::{Dimensions, Result, WebpifyError};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        // Reject before decoding the full pixel buffer
        let header = self.dimensions(path)?;
        self.check_dimensions(header.width, header.height)?;

        let image = ImageReader::open(path)?.with_guessed_format()?.decode().map_err(|e| {
            WebpifyError::ProcessingError(format!("Failed to decode image: {}", e))
        })?;

        let (width, height) = image.dimensions();
        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    pub fn dimensions(&self, path: &Path) -> Result<Dimensions> {
        let (width, height) = ImageReader::open(path)?.with_guessed_format()?.into_dimensions()?;
        Ok(Dimensions::new(width, height))
    }

    fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if let Some((max_w, max_h)) = self.max_dimensions {
            if width > max_w || height > max_h {
                return Err(WebpifyError::MemoryLimitExceeded(format!(
                    "Image dimensions {}x{} exceed maximum {}x{}",
                    width, height, max_w, max_h
                )));
            }
        }
        Ok(())
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(WebpifyError::InvalidParameter(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let metadata = path.metadata()?;
        if metadata.len() == 0 {
            return Err(WebpifyError::InvalidParameter(format!(
                "File is empty: {}",
                path.display()
            )));
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
