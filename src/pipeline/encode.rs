//! Image encoding: `DynamicImage` → base64 PNG wrapped in [`EncodedPayload`].
//!
//! VLM APIs accept images as base64 data-URIs embedded in the JSON request
//! body. PNG is chosen over re-emitting the upload's own format because it is
//! lossless: JPEG re-compression would blur small print and hurt OCR accuracy.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// MIME type of every payload produced by [`encode_image`].
pub const PAYLOAD_MIME: &str = "image/png";

/// Text-safe image payload, consumed by exactly one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    /// Standard base64 of the PNG bytes.
    pub data: String,
    pub mime_type: &'static str,
}

impl EncodedPayload {
    /// `data:<mime>;base64,<data>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Convert into the provider's image attachment.
    ///
    /// `detail: "high"` lets GPT-4-class models tile the image instead of
    /// reading a single 512 px overview, which loses fine print.
    pub fn into_image_data(self) -> ImageData {
        ImageData::new(self.data, self.mime_type).with_detail("high")
    }
}

/// Encode an image as a base64 PNG ready for the VLM API.
///
/// Deterministic: the same pixels always produce the same string.
pub fn encode_image(img: &DynamicImage) -> Result<EncodedPayload, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded image → {} bytes base64", b64.len());

    Ok(EncodedPayload {
        data: b64,
        mime_type: PAYLOAD_MIME,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x * 7) as u8, (y * 11) as u8, ((x + y) * 3) as u8, 255 - x as u8])
        }))
    }

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let data = encode_image(&img).expect("encode should succeed");
        assert_eq!(data.mime_type, "image/png");
        assert!(!data.data.is_empty());
        let decoded = STANDARD.decode(&data.data).expect("valid base64");
        assert!(decoded.starts_with(b"\x89PNG"));
    }

    #[test]
    fn round_trip_preserves_pixels() {
        let img = gradient(23, 17);
        let payload = encode_image(&img).unwrap();
        let bytes = STANDARD.decode(&payload.data).unwrap();
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!(back.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn round_trip_rgb_image() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(8, 5, |x, y| {
            image::Rgb([x as u8 * 30, y as u8 * 40, 9])
        }));
        let payload = encode_image(&img).unwrap();
        let back = image::load_from_memory(&STANDARD.decode(&payload.data).unwrap()).unwrap();
        assert_eq!(back.to_rgb8(), img.to_rgb8());
    }

    #[test]
    fn encoding_is_deterministic() {
        let img = gradient(12, 12);
        assert_eq!(encode_image(&img).unwrap(), encode_image(&img).unwrap());
    }

    #[test]
    fn data_uri_has_png_prefix() {
        let payload = encode_image(&gradient(2, 2)).unwrap();
        let uri = payload.data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(uri.ends_with(&payload.data));
    }
}
