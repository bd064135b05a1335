// webpify/src/processors/resizer.rs
use image::{DynamicImage, GenericImageView, imageops::FilterType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

#[derive(Debug, Clone)]
pub struct Resizer {
    algorithm: ResizeAlgorithm,
}

impl Resizer {
    pub fn new(algorithm: ResizeAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Resizes into the `max_width` x `max_height` box.
    ///
    /// Without `crop` the image is scaled to fit inside the box, keeping its
    /// aspect ratio and never enlarging; a zero bound leaves that axis
    /// unconstrained. With `crop` the result covers the box exactly.
    pub fn resize(&self, image: &DynamicImage, max_width: u32, max_height: u32, crop: bool) -> DynamicImage {
        let (orig_width, orig_height) = image.dimensions();
        let filter = self.get_filter_type();

        if crop {
            if max_width == 0 || max_height == 0 {
                log::debug!("Crop requested without both bounds, skipping resize");
                return image.clone();
            }
            log::debug!(
                "Cropping image from {}x{} to {}x{}",
                orig_width,
                orig_height,
                max_width,
                max_height
            );
            return image.resize_to_fill(max_width, max_height, filter);
        }

        let (width, height) = fit_within(orig_width, orig_height, max_width, max_height);

        if width == orig_width && height == orig_height {
            log::debug!("Image dimensions unchanged, skipping resize");
            return image.clone();
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            orig_width,
            orig_height,
            width,
            height
        );

        image.resize_exact(width, height, filter)
    }

    fn get_filter_type(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new(ResizeAlgorithm::Lanczos3)
    }
}

/// Largest size with the original aspect ratio that fits the bounds.
pub fn fit_within(orig_w: u32, orig_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if orig_w == 0 || orig_h == 0 {
        return (orig_w, orig_h);
    }

    let ratio_w = if max_w == 0 { f64::INFINITY } else { max_w as f64 / orig_w as f64 };
    let ratio_h = if max_h == 0 { f64::INFINITY } else { max_h as f64 / orig_h as f64 };
    let ratio = ratio_w.min(ratio_h).min(1.0);

    if ratio >= 1.0 {
        return (orig_w, orig_h);
    }

    let new_w = (orig_w as f64 * ratio).round() as u32;
    let new_h = (orig_h as f64 * ratio).round() as u32;

    (new_w.clamp(1, orig_w), new_h.clamp(1, orig_h))
}
