// webpify/src/processors/editor.rs
use super::{Compressor, Loader, Resizer};
use crate::core::{Dimensions, OutputFormat, Result};
use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};

/// Decode, resize and encode operations on one image.
///
/// The handle is owned by a single transform call and never shared.
pub trait ImageEditor {
    type Handle;

    fn load(&self, path: &Path) -> Result<Self::Handle>;

    fn size(&self, handle: &Self::Handle) -> Dimensions;

    /// With `crop == false` the image is fitted inside the bounds.
    fn resize(&self, handle: &mut Self::Handle, max_width: u32, max_height: u32, crop: bool);

    fn set_quality(&self, handle: &mut Self::Handle, quality: u8);

    fn encode(&self, handle: &Self::Handle, output: &Path, format: OutputFormat) -> Result<()>;
}

/// Decoded image plus its pending encode settings.
#[derive(Debug, Clone)]
pub struct RasterImage {
    image: DynamicImage,
    quality: u8,
    source: PathBuf,
}

impl RasterImage {
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// [`ImageEditor`] backed by the `image` crate.
#[derive(Debug, Clone)]
pub struct RasterEditor {
    loader: Loader,
    resizer: Resizer,
}

impl RasterEditor {
    pub fn new(loader: Loader, resizer: Resizer) -> Self {
        Self { loader, resizer }
    }
}

impl Default for RasterEditor {
    fn default() -> Self {
        Self::new(Loader::default(), Resizer::default())
    }
}

impl ImageEditor for RasterEditor {
    type Handle = RasterImage;

    fn load(&self, path: &Path) -> Result<RasterImage> {
        let image = self.loader.load(path)?;
        Ok(RasterImage {
            image,
            quality: crate::core::DEFAULT_QUALITY,
            source: path.to_path_buf(),
        })
    }

    fn size(&self, handle: &RasterImage) -> Dimensions {
        let (width, height) = handle.image.dimensions();
        Dimensions::new(width, height)
    }

    fn resize(&self, handle: &mut RasterImage, max_width: u32, max_height: u32, crop: bool) {
        handle.image = self.resizer.resize(&handle.image, max_width, max_height, crop);
    }

    fn set_quality(&self, handle: &mut RasterImage, quality: u8) {
        handle.quality = quality.min(100);
    }

    fn encode(&self, handle: &RasterImage, output: &Path, format: OutputFormat) -> Result<()> {
        log::debug!(
            "Encoding {} as {} (quality {})",
            handle.source().display(),
            output.display(),
            handle.quality
        );
        Compressor::new(handle.quality).save(&handle.image, output, format)
    }
}
