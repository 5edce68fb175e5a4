use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::imaging::domain::image_decoder::{DecodeError, ImageDecoder};
use crate::shared::constants::JPEG_QUALITY;
use crate::shared::frame::Frame;

/// Decodes uploaded and captured images with the `image` crate.
pub struct ImageCrateDecoder;

impl ImageCrateDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageCrateDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, DecodeError> {
        let rgb = image::load_from_memory(bytes)
            .map_err(|e| DecodeError(e.to_string()))?
            .to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Frame::new(rgb.into_raw(), width, height, 3, 0))
    }
}

/// JPEG-encodes an RGB frame, as camera frames are before analysis.
pub fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let img = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or("Failed to create image from frame data")?;
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).encode_image(&img)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let frame = ImageCrateDecoder::new()
            .decode(&png_bytes(12, 8, [50, 100, 200]))
            .unwrap();
        assert_eq!((frame.width(), frame.height(), frame.channels()), (12, 8, 3));
        assert_eq!(&frame.data()[..3], &[50, 100, 200]);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = ImageCrateDecoder::new()
            .decode(b"definitely not an image")
            .unwrap_err();
        assert!(err.to_string().starts_with("Could not decode image"));
    }

    #[test]
    fn test_decode_empty_is_decode_error() {
        assert!(ImageCrateDecoder::new().decode(&[]).is_err());
    }

    #[test]
    fn test_jpeg_encode_decodes_back_to_same_size() {
        let frame = Frame::new(vec![128u8; 32 * 24 * 3], 32, 24, 3, 0);
        let bytes = encode_jpeg(&frame).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = ImageCrateDecoder::new().decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }
}
