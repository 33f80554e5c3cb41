//! Bytes to model input: decode, resize, scale, batch.

use std::io::{BufRead, Cursor, Seek};

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageReader};
use ndarray::Array4;

use crate::error::ClassifyError;
use crate::manifest::Manifest;

/// Decode any format the `image` crate can sniff from the content, upright
/// according to its EXIF orientation tag.
pub fn decode<R: BufRead + Seek>(reader: R) -> Result<DynamicImage, ClassifyError> {
    let mut decoder = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|e| ClassifyError::Decode(e.to_string()))?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage, ClassifyError> {
    decode(Cursor::new(bytes))
}

pub fn ensure_dimensions(image: &DynamicImage) -> Result<(), ClassifyError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ClassifyError::Shape { width, height });
    }
    Ok(())
}

/// NHWC tensor of shape (1, size, size, 3) with values in [0, 1].
///
/// The image is stretched to a square with the `image` crate's triangle
/// filter; aspect ratio is not preserved. Alpha is dropped and greyscale is expanded to three
/// channels before the channels are laid out in the manifest's order.
pub fn to_tensor(image: &DynamicImage, manifest: &Manifest) -> Array4<f32> {
    let size = manifest.input_size;
    let rgb = image.to_rgb8();
    let resized = imageops::resize(&rgb, size, size, FilterType::Triangle);
    let channels = manifest.channel_order.source_channels();

    Array4::from_shape_fn(
        (1, size as usize, size as usize, 3),
        |(_, y, x, c)| resized.get_pixel(x as u32, y as u32)[channels[c]] as f32 / 255.0,
    )
}
