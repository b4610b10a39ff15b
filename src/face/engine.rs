//! Face engines turn a decoded capture into an [`Embedding`].
//!
//! The server only talks to the [`FaceEngine`] trait. [`SampleEngine`] is the
//! built-in implementation: it samples a normalized grayscale patch from the
//! center of the capture, which is where both capture pages frame the face.
//! A model-backed engine can replace it without touching the handlers.

use image::{DynamicImage, GrayImage, imageops::FilterType};

use super::embedding::Embedding;
use crate::config::Config;

/// Below this luma standard deviation the capture is treated as blank.
const BLANK_STD_DEV: f32 = 8.0;
const MIN_CONTRAST_STD_DEV: f32 = 20.0;
const MIN_MEAN_LUMA: f32 = 40.0;
const MAX_MEAN_LUMA: f32 = 215.0;

/// Produces embeddings and judges capture quality.
pub trait FaceEngine: Send + Sync {
    /// Quality gate run before encoding. The error is shown to the user.
    fn assess(&self, image: &DynamicImage) -> Result<(), String>;

    /// Build an embedding, or `None` when the capture holds nothing usable.
    fn encode(&self, image: &DynamicImage) -> Option<Embedding>;
}

/// Histogram-equalized, mean-centered, L2-normalized grayscale sample.
#[derive(Debug, Clone)]
pub struct SampleEngine {
    sample_size: u32,
    min_face_size: u32,
}

impl SampleEngine {
    pub fn new(sample_size: u32, min_face_size: u32) -> Self {
        Self {
            sample_size,
            min_face_size,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.face_sample_size, config.min_face_size)
    }

    /// Largest centered square of the capture, resized to the sample size.
    fn sample(&self, image: &DynamicImage) -> GrayImage {
        let (width, height) = (image.width(), image.height());
        let side = width.min(height);
        let square = image.crop_imm((width - side) / 2, (height - side) / 2, side, side);
        image::imageops::resize(
            &square.to_luma8(),
            self.sample_size,
            self.sample_size,
            FilterType::Triangle,
        )
    }
}

impl FaceEngine for SampleEngine {
    fn assess(&self, image: &DynamicImage) -> Result<(), String> {
        if image.width() < self.min_face_size || image.height() < self.min_face_size {
            return Err("Face is too small. Please use a clearer image".to_string());
        }

        let (mean, std_dev) = luma_stats(&image.to_luma8());
        if std_dev < BLANK_STD_DEV {
            return Err("No face detected in image".to_string());
        }
        if mean < MIN_MEAN_LUMA {
            return Err("Image is too dark. Please improve the lighting".to_string());
        }
        if mean > MAX_MEAN_LUMA {
            return Err("Image is too bright. Please reduce the lighting".to_string());
        }
        if std_dev < MIN_CONTRAST_STD_DEV {
            return Err("Image contrast is too low. Please face the camera directly".to_string());
        }
        Ok(())
    }

    fn encode(&self, image: &DynamicImage) -> Option<Embedding> {
        if image.width() == 0 || image.height() == 0 {
            return None;
        }
        let sample = self.sample(image);
        let equalized = equalize(sample.as_raw())?;

        let mean = equalized.iter().sum::<f32>() / equalized.len() as f32;
        let centered: Vec<f32> = equalized.iter().map(|v| v - mean).collect();
        let norm = centered.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm < 1e-6 {
            return None;
        }
        Some(Embedding::new(centered.iter().map(|v| v / norm).collect()))
    }
}

/// Mean and standard deviation of the luma channel.
fn luma_stats(gray: &GrayImage) -> (f32, f32) {
    let pixels = gray.as_raw();
    if pixels.is_empty() {
        return (0.0, 0.0);
    }
    let (sum, sum_sq) = pixels.iter().fold((0u64, 0u64), |(s, sq), &p| {
        let p = p as u64;
        (s + p, sq + p * p)
    });
    let count = pixels.len() as f64;
    let mean = sum as f64 / count;
    let variance = (sum_sq as f64 / count - mean * mean).max(0.0);
    (mean as f32, variance.sqrt() as f32)
}

/// Histogram equalization to the 0..=255 range. `None` for single-valued input.
fn equalize(pixels: &[u8]) -> Option<Vec<f32>> {
    let mut histogram = [0u32; 256];
    for &p in pixels {
        histogram[p as usize] += 1;
    }

    let mut cdf = [0u32; 256];
    let mut running = 0u32;
    for (bin, count) in histogram.iter().enumerate() {
        running += count;
        cdf[bin] = running;
    }

    let total = pixels.len() as u32;
    let cdf_min = cdf.iter().copied().find(|&c| c > 0)?;
    if total == cdf_min {
        return None;
    }
    let span = (total - cdf_min) as f32;
    Some(
        pixels
            .iter()
            .map(|&p| (cdf[p as usize] - cdf_min) as f32 * 255.0 / span)
            .collect(),
    )
}
