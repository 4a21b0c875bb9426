//! Image loading utilities

use crate::{Error, Result};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

/// Loaded image in RGBA format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// RGBA pixel data
    pub data: Vec<u8>,
}

impl LoadedImage {
    /// Load an image from a file path
    ///
    /// The format is guessed from the file contents, so a JPEG saved as
    /// `.png` still loads.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let img = ImageReader::open(path)
            .map_err(Error::Io)?
            .with_guessed_format()
            .map_err(Error::Io)?
            .decode()?;

        Ok(Self::from_dynamic_image(img))
    }

    /// Load an image and stretch it to exactly `width` x `height`
    pub fn load_resized<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Self> {
        let img = ImageReader::open(path.as_ref())
            .map_err(Error::Io)?
            .with_guessed_format()
            .map_err(Error::Io)?
            .decode()?;

        if img.dimensions() == (width, height) {
            return Ok(Self::from_dynamic_image(img));
        }

        let resized = img.resize_exact(width, height, image::imageops::FilterType::Triangle);
        Ok(Self::from_dynamic_image(resized))
    }

    /// Create from a DynamicImage
    pub fn from_dynamic_image(img: DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        let data = rgba.into_raw();

        Self {
            width,
            height,
            data,
        }
    }

    /// Resize the image to exactly the given dimensions (no crop, no padding)
    pub fn resize(&self, target_width: u32, target_height: u32) -> Result<Self> {
        if self.width == target_width && self.height == target_height {
            return Ok(self.clone());
        }

        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| {
                Error::Decode(format!(
                    "RGBA buffer of {} bytes does not match {}x{}",
                    self.data.len(),
                    self.width,
                    self.height
                ))
            })?;

        let resized = DynamicImage::ImageRgba8(img).resize_exact(
            target_width,
            target_height,
            image::imageops::FilterType::Triangle,
        );

        Ok(Self::from_dynamic_image(resized))
    }

    /// Size in bytes of one raw frame of this image
    pub fn frame_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}
