//! Image encoding: `DynamicImage` ⇄ base64 PNG data URLs.
//!
//! Both directions of the pipeline normalise images to PNG. Local images are
//! re-encoded before they are sent, and every image the service returns is
//! re-encoded before it is embedded in the markdown. Whatever the source
//! format (JPEG from a phone, PNG from a scanner), the output always carries
//! one predictable MIME type.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

/// Prefix of every data URL produced by this crate.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Why a base64 image payload could not be turned into an image.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid image data: {0}")]
    Image(#[from] image::ImageError),
}

/// Encode an image as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}

/// Encode an image as a `data:image/png;base64,…` URL.
pub fn png_data_url(img: &DynamicImage) -> Result<String, image::ImageError> {
    let png = encode_png(img)?;
    let b64 = STANDARD.encode(&png);
    debug!("Encoded image → {} bytes base64", b64.len());
    Ok(format!("{PNG_DATA_URL_PREFIX}{b64}"))
}

/// Drop a data-URL header: everything up to and including the last `,`.
///
/// Payloads without a comma are returned unchanged.
pub fn strip_data_url_header(payload: &str) -> &str {
    match payload.rsplit_once(',') {
        Some((_, data)) => data,
        None => payload,
    }
}

/// Decode a base64 image payload (with or without data-URL header).
///
/// ASCII whitespace is ignored, so line-wrapped payloads decode.
pub fn decode_base64_image(payload: &str) -> Result<DynamicImage, DecodeError> {
    let raw: String = strip_data_url_header(payload)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(raw)?;
    Ok(image::load_from_memory(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn red_square() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn encode_small_image() {
        let png = encode_png(&red_square()).expect("encode should succeed");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn data_url_has_png_prefix() {
        let url = png_data_url(&red_square()).unwrap();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));
        let decoded = STANDARD
            .decode(&url[PNG_DATA_URL_PREFIX.len()..])
            .expect("valid base64");
        assert!(!decoded.is_empty());
    }

    #[test]
    fn strip_header_uses_last_comma() {
        assert_eq!(strip_data_url_header("data:image/jpeg;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url_header("a,b,QUJD"), "QUJD");
        assert_eq!(strip_data_url_header("QUJD"), "QUJD");
    }

    #[test]
    fn decode_with_and_without_header() {
        let b64 = STANDARD.encode(encode_png(&red_square()).unwrap());
        let bare = decode_base64_image(&b64).unwrap();
        assert_eq!((bare.width(), bare.height()), (10, 10));

        let prefixed = decode_base64_image(&format!("data:image/png;base64,{b64}")).unwrap();
        assert_eq!((prefixed.width(), prefixed.height()), (10, 10));
    }

    #[test]
    fn decode_line_wrapped_payload() {
        let b64 = STANDARD.encode(encode_png(&red_square()).unwrap());
        let wrapped = b64
            .as_bytes()
            .chunks(16)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");
        let img = decode_base64_image(&format!("data:image/png;base64,\n{wrapped}\n")).unwrap();
        assert_eq!((img.width(), img.height()), (10, 10));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_base64_image("!!not base64!!"),
            Err(DecodeError::Base64(_))
        ));
        let not_an_image = STANDARD.encode(b"plain text, not pixels");
        assert!(matches!(
            decode_base64_image(&not_an_image),
            Err(DecodeError::Image(_))
        ));
    }
}
