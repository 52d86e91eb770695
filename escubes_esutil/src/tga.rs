//! Decoding of uncompressed TGA images, the texture format the sample
//! assets ship in.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Byte length of the fixed TGA file header.
const HEADER_LEN: usize = 18;

/// Image type tag for uncompressed true-color data.
const TYPE_TRUE_COLOR: u8 = 2;
/// Image type tag for uncompressed grayscale data.
const TYPE_GRAYSCALE: u8 = 3;

/// Bit 5 of the descriptor byte: rows are stored top to bottom.
const DESCRIPTOR_TOP_ORIGIN: u8 = 1 << 5;

#[derive(Debug, Error)]
pub enum TgaError {
    #[error("file ends early: needed {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },
    #[error("unsupported TGA image type {0}, only uncompressed images load")]
    UnsupportedImageType(u8),
    #[error("unsupported TGA pixel depth {0}, expected 8, 24 or 32")]
    UnsupportedDepth(u8),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A decoded image, pixels laid out exactly as stored in the file.
///
/// True-color pixels are BGR or BGRA; grayscale pixels are one byte each.
/// Rows run bottom to top unless `top_origin` is set, so callers flip (or
/// negate their texture coordinates) as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TgaImage {
    pub width: usize,
    pub height: usize,
    pub bytes_per_pixel: usize,
    pub top_origin: bool,
    pub pixels: Vec<u8>,
}

/// Decodes an in-memory TGA file.
///
/// A TGA file begins with a packed 18-byte header:
///
/// ```text
/// <id-length: 1> <map-type: 1> <image-type: 1>
/// <palette-start: 2> <palette-size: 2> <palette-depth: 1>
/// <x-origin: 2> <y-origin: 2> <width: 2> <height: 2>
/// <pixel-depth: 1> <descriptor: 1>
/// ```
///
/// Multi-byte fields are little endian. An optional image id block of
/// <id-length> bytes follows the header and is skipped; pixel data starts
/// right after it. Only uncompressed images (types 2 and 3) at 8, 24 or
/// 32 bits per pixel are supported.
pub fn decode(bytes: &[u8]) -> Result<TgaImage, TgaError> {
    let header = bytes.get(..HEADER_LEN).ok_or(TgaError::Truncated {
        needed: HEADER_LEN,
        got: bytes.len(),
    })?;

    let image_type = header[2];
    if image_type != TYPE_TRUE_COLOR && image_type != TYPE_GRAYSCALE {
        return Err(TgaError::UnsupportedImageType(image_type));
    }
    let depth = header[16];
    if depth != 8 && depth != 24 && depth != 32 {
        return Err(TgaError::UnsupportedDepth(depth));
    }

    let width = u16::from_le_bytes([header[12], header[13]]) as usize;
    let height = u16::from_le_bytes([header[14], header[15]]) as usize;
    let bytes_per_pixel = depth as usize / 8;
    let top_origin = header[17] & DESCRIPTOR_TOP_ORIGIN != 0;

    let start = HEADER_LEN + header[0] as usize;
    let needed = start + width * height * bytes_per_pixel;
    let pixels = bytes
        .get(start..needed)
        .ok_or(TgaError::Truncated {
            needed,
            got: bytes.len(),
        })?
        .to_vec();

    Ok(TgaImage {
        width,
        height,
        bytes_per_pixel,
        top_origin,
        pixels,
    })
}

/// Reads and decodes a TGA file from disk.
pub fn load(path: &Path) -> Result<TgaImage, TgaError> {
    decode(&fs::read(path)?)
}

#[cfg(test)]
mod test {
    use super::*;

    fn header(id_len: u8, image_type: u8, width: u16, height: u16, depth: u8, descriptor: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0] = id_len;
        bytes[2] = image_type;
        bytes[12..14].copy_from_slice(&width.to_le_bytes());
        bytes[14..16].copy_from_slice(&height.to_le_bytes());
        bytes[16] = depth;
        bytes[17] = descriptor;
        bytes
    }

    #[test]
    fn decodes_a_true_color_image() {
        let mut file = header(0, TYPE_TRUE_COLOR, 2, 2, 24, 0);
        let pixels: Vec<u8> = (0..12).collect();
        file.extend_from_slice(&pixels);

        let image = decode(&file).unwrap();

        assert_eq!(image.width, 2);
        assert_eq!(image.height, 2);
        assert_eq!(image.bytes_per_pixel, 3);
        assert!(!image.top_origin);
        assert_eq!(image.pixels, pixels);
    }

    #[test]
    fn decodes_a_grayscale_image() {
        let mut file = header(0, TYPE_GRAYSCALE, 3, 1, 8, 0);
        file.extend_from_slice(&[7, 8, 9]);

        let image = decode(&file).unwrap();

        assert_eq!(image.bytes_per_pixel, 1);
        assert_eq!(image.pixels, vec![7, 8, 9]);
    }

    #[test]
    fn skips_the_image_id_block() {
        let mut file = header(4, TYPE_TRUE_COLOR, 1, 1, 32, 0);
        file.extend_from_slice(b"name");
        file.extend_from_slice(&[1, 2, 3, 4]);

        let image = decode(&file).unwrap();

        assert_eq!(image.pixels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn reports_the_row_order_bit() {
        let mut file = header(0, TYPE_GRAYSCALE, 1, 1, 8, DESCRIPTOR_TOP_ORIGIN);
        file.push(0xff);

        assert!(decode(&file).unwrap().top_origin);
    }

    #[test]
    fn rejects_run_length_encoded_files() {
        let file = header(0, 10, 1, 1, 24, 0);

        assert!(matches!(
            decode(&file),
            Err(TgaError::UnsupportedImageType(10))
        ));
    }

    #[test]
    fn rejects_unsupported_pixel_depths() {
        let file = header(0, TYPE_TRUE_COLOR, 1, 1, 16, 0);

        assert!(matches!(decode(&file), Err(TgaError::UnsupportedDepth(16))));
    }

    #[test]
    fn rejects_truncated_pixel_data() {
        let mut file = header(0, TYPE_TRUE_COLOR, 2, 2, 24, 0);
        file.extend_from_slice(&[0; 11]);

        assert!(matches!(
            decode(&file),
            Err(TgaError::Truncated { needed: 30, got: 29 })
        ));
    }

    #[test]
    fn rejects_files_shorter_than_the_header() {
        assert!(matches!(
            decode(&[0; 17]),
            Err(TgaError::Truncated { needed: 18, got: 17 })
        ));
    }
}
