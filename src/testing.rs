//! In-crate fixtures: image encoders and deterministic stand-in models.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::{Array4, Axis};

use crate::classifier::{softmax, Classifier};
use crate::manifest::Manifest;
use crate::model::Model;

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

pub fn encode_png(image: &DynamicImage) -> Vec<u8> {
    encode(image, ImageFormat::Png)
}

/// Splices an APP1 Exif segment carrying only an Orientation tag right after
/// the JPEG start-of-image marker.
pub fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");

    let mut payload = b"Exif\0\0".to_vec();
    // big-endian TIFF header, first IFD at offset 8
    payload.extend_from_slice(b"MM\0\x2a\0\0\0\x08");
    payload.extend_from_slice(&1u16.to_be_bytes());
    payload.extend_from_slice(&0x0112u16.to_be_bytes());
    payload.extend_from_slice(&3u16.to_be_bytes());
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(&orientation.to_be_bytes());
    payload.extend_from_slice(&[0, 0]);
    payload.extend_from_slice(&0u32.to_be_bytes());

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    encode_png(&DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb(rgb),
    )))
}

/// Scores each class by the mean of one colour channel: red is Hazardous,
/// green is Organic, blue is Recyclable and Other holds a flat bias. Expects
/// BGR tensors, which is what the default manifest produces.
pub struct ColourModel {
    pub emit_logits: bool,
}

impl Model for ColourModel {
    fn forward(&self, input: Array4<f32>) -> anyhow::Result<Vec<f32>> {
        let means = input
            .mean_axis(Axis(0))
            .and_then(|a| a.mean_axis(Axis(0)))
            .and_then(|a| a.mean_axis(Axis(0)))
            .ok_or_else(|| anyhow::anyhow!("empty input"))?;
        let (blue, green, red) = (means[0], means[1], means[2]);
        let logits = [8.0 * red, 8.0 * green, 2.0, 8.0 * blue];
        if self.emit_logits {
            Ok(logits.to_vec())
        } else {
            Ok(softmax(&logits))
        }
    }
}

/// Returns the same output for every input.
pub struct FixedModel(pub Vec<f32>);

impl Model for FixedModel {
    fn forward(&self, _input: Array4<f32>) -> anyhow::Result<Vec<f32>> {
        Ok(self.0.clone())
    }
}

/// Answers the load-time probe, then fails every call.
#[derive(Default)]
pub struct FlakyModel {
    calls: AtomicUsize,
}

impl Model for FlakyModel {
    fn forward(&self, _input: Array4<f32>) -> anyhow::Result<Vec<f32>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(vec![0.25; 4])
        } else {
            anyhow::bail!("accelerator went away")
        }
    }
}

pub fn colour_classifier() -> Classifier {
    Classifier::new(
        Box::new(ColourModel { emit_logits: false }),
        Manifest::default(),
    )
    .unwrap()
}
