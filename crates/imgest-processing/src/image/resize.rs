use image::error::{ImageFormatHint, UnsupportedError};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageError, ImageFormat, ImageReader};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Bicubic resampling
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Largest output a resize may allocate, in pixels (about 200 MB as RGBA8).
pub const MAX_OUTPUT_PIXELS: u64 = 50_000_000;

/// Resize failures, split by whose fault they are.
#[derive(Debug, Error)]
pub enum ResizeError {
    /// The input is not a decodable image.
    #[error("Failed to decode image: {0}")]
    Decode(#[source] ImageError),

    /// The image decoded but has no pixels along one axis.
    #[error("Image has invalid dimensions {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// Normalizing the width would produce an image larger than [`MAX_OUTPUT_PIXELS`].
    #[error("Resized image would be {width}x{height}, above the {max} pixel limit", max = MAX_OUTPUT_PIXELS)]
    TooLarge { width: u32, height: u64 },

    /// The resized image could not be encoded in the requested format.
    #[error("Failed to encode image: {0}")]
    Encode(#[source] ImageError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ResizeError {
    /// The upload itself is unreadable or not an image we can reproduce.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(self, ResizeError::Decode(_) | ResizeError::Encode(_))
    }

    /// The upload is structurally invalid (e.g. zero width, extreme aspect ratio).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ResizeError::EmptyImage { .. } | ResizeError::TooLarge { .. }
        )
    }
}

/// Width-normalizing resize operations
pub struct ImageResize;

impl ImageResize {
    /// Output dimensions for `target_width`, keeping the aspect ratio.
    ///
    /// Height is `round(target_width * orig_height / orig_width)`, at least 1. Fails with
    /// [`ResizeError::TooLarge`] when the result exceeds [`MAX_OUTPUT_PIXELS`].
    pub fn target_dimensions(
        orig_width: u32,
        orig_height: u32,
        target_width: u32,
    ) -> Result<(u32, u32), ResizeError> {
        if orig_width == 0 || orig_height == 0 || target_width == 0 {
            return Err(ResizeError::EmptyImage {
                width: orig_width,
                height: orig_height,
            });
        }

        // Integer rounding, half away from zero
        let numerator = u64::from(target_width) * u64::from(orig_height);
        let width = u64::from(orig_width);
        let height = ((2 * numerator + width) / (2 * width)).max(1);

        if u64::from(target_width) * height > MAX_OUTPUT_PIXELS {
            return Err(ResizeError::TooLarge {
                width: target_width,
                height,
            });
        }
        let height = u32::try_from(height).map_err(|_| ResizeError::TooLarge {
            width: target_width,
            height,
        })?;

        Ok((target_width, height))
    }

    /// Resize `img` to `target_width`, preserving the aspect ratio. Narrower images are upscaled.
    pub fn resize_to_width(
        img: &DynamicImage,
        target_width: u32,
    ) -> Result<DynamicImage, ResizeError> {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::target_dimensions(orig_width, orig_height, target_width)?;
        Ok(img.resize_exact(width, height, RESIZE_FILTER))
    }

    /// Decode `source`, resize it to `target_width` and write the result to `destination`.
    ///
    /// The output format follows the destination extension, falling back to the format
    /// sniffed from the source bytes. Returns the written dimensions.
    pub fn resize_file(
        source: &Path,
        destination: &Path,
        target_width: u32,
    ) -> Result<(u32, u32), ResizeError> {
        let reader = ImageReader::open(source)?.with_guessed_format()?;
        let source_format = reader.format();
        let img = reader.decode().map_err(ResizeError::Decode)?;

        let resized = Self::resize_to_width(&img, target_width)?;

        let format = ImageFormat::from_path(destination)
            .ok()
            .or(source_format)
            .ok_or_else(|| {
                ResizeError::Encode(ImageError::Unsupported(UnsupportedError::from(
                    ImageFormatHint::PathExtension(destination.to_path_buf()),
                )))
            })?;

        // JPEG has no alpha channel
        let resized = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(resized.to_rgb8())
        } else {
            resized
        };

        let dimensions = resized.dimensions();
        resized
            .save_with_format(destination, format)
            .map_err(|e| match e {
                ImageError::IoError(io) => ResizeError::Io(io),
                other => ResizeError::Encode(other),
            })?;

        tracing::debug!(
            source = %source.display(),
            destination = %destination.display(),
            original_width = img.width(),
            original_height = img.height(),
            width = dimensions.0,
            height = dimensions.1,
            format = ?format,
            "Image resized"
        );

        Ok(dimensions)
    }
}
