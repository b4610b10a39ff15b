//! Decoding of the `image` field posted by the capture pages.

use base64::{Engine, prelude::BASE64_STANDARD};
use image::{DynamicImage, ImageFormat};

use crate::error::AppError;

/// Decode a `data:image/...;base64,` URL (or bare base64) into an image.
pub fn decode_data_url(data: &str) -> Result<DynamicImage, AppError> {
    let payload = match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = BASE64_STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| AppError::InvalidImage)?;
    image::load_from_memory(&bytes).map_err(|_| AppError::InvalidImage)
}

/// Re-encode a capture as JPEG for photo storage.
pub fn to_jpeg(image: &DynamicImage) -> Result<Vec<u8>, AppError> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_to(&mut bytes, ImageFormat::Jpeg)
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
    Ok(bytes.into_inner())
}

/// PNG data URL of `image`, as a browser canvas would produce.
#[cfg(test)]
pub fn to_data_url(image: &DynamicImage) -> String {
    let mut bytes = std::io::Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    format!(
        "data:image/png;base64,{}",
        BASE64_STANDARD.encode(bytes.into_inner())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::engine::tests::horizontal_ramp;

    #[test]
    fn round_trips_a_canvas_capture() {
        let image = horizontal_ramp(120, 90);
        let decoded = decode_data_url(&to_data_url(&image)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 90));
        assert_eq!(decoded.to_rgb8(), image.to_rgb8());
    }

    #[test]
    fn bare_base64_is_accepted() {
        let url = to_data_url(&horizontal_ramp(10, 10));
        let (_, bare) = url.split_once(',').unwrap();
        assert!(decode_data_url(bare).is_ok());
    }

    #[test]
    fn garbage_is_invalid_image() {
        assert!(matches!(
            decode_data_url("data:image/jpeg;base64,not*base64"),
            Err(AppError::InvalidImage)
        ));
        // Valid base64, not an image
        assert!(matches!(
            decode_data_url("data:image/jpeg;base64,aGVsbG8="),
            Err(AppError::InvalidImage)
        ));
    }

    #[test]
    fn jpeg_export_is_decodable() {
        let bytes = to_jpeg(&horizontal_ramp(64, 48)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }
}
