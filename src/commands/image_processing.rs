use std::io::Cursor;
use std::time::Instant;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use eyre::WrapErr;
use image::ImageFormat;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageProcessingInput {
    /// Base64 of an encoded image (any format `image` can sniff).
    pub data: String,
    pub filter: ImageFilter,
    pub intensity: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFilter {
    Grayscale,
    Blur,
    Brighten,
    Contrast,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageProcessingResult {
    /// Base64 of the filtered image, always PNG.
    pub data: String,
    pub filter: ImageFilter,
    pub original_size: (u32, u32),
    pub computation_time_ms: u64,
}

pub async fn process_image(input: &ImageProcessingInput) -> eyre::Result<ImageProcessingResult> {
    let started = Instant::now();

    let bytes = STANDARD.decode(&input.data).wrap_err("image data is not valid base64")?;
    let img = image::load_from_memory(&bytes).wrap_err("failed to decode image")?;
    let original_size = (img.width(), img.height());

    let processed = match input.filter {
        ImageFilter::Grayscale => img.grayscale(),
        ImageFilter::Blur => img.blur(input.intensity.unwrap_or(1.0)),
        ImageFilter::Brighten => img.brighten((input.intensity.unwrap_or(0.1) * 255.0) as i32),
        ImageFilter::Contrast => img.adjust_contrast(input.intensity.unwrap_or(1.2)),
    };

    let mut png = Vec::new();
    processed
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .wrap_err("failed to encode PNG")?;

    Ok(ImageProcessingResult {
        data: STANDARD.encode(&png),
        filter: input.filter,
        original_size,
        computation_time_ms: started.elapsed().as_millis() as u64,
    })
}
