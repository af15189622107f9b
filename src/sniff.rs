//! Raster dimensions from PNG and JPEG headers, without decoding.
//!
//! Reads only the fixed PNG header region or walks JPEG marker segments up
//! to the first frame header. Never panics and never fails: anything
//! malformed resolves to [`RasterHeader::Unknown`], and callers pick a
//! fallback such as [`DEFAULT_DIMENSIONS`].
//!
//! # Example
//!
//! ```
//! use zenlayers::sniff::{sniff, ImageFormat, RasterHeader, DEFAULT_DIMENSIONS};
//! use zenlayers::Size;
//!
//! let mut png = Vec::from(*b"\x89PNG\r\n\x1a\n\0\0\0\x0dIHDR");
//! png.extend_from_slice(&640u32.to_be_bytes());
//! png.extend_from_slice(&480u32.to_be_bytes());
//!
//! assert_eq!(sniff(&png, ImageFormat::Png), RasterHeader::Known(Size::new(640, 480)));
//! assert_eq!(sniff(&png[..20], ImageFormat::Png).or_default(DEFAULT_DIMENSIONS), DEFAULT_DIMENSIONS);
//! ```

use crate::geometry::Size;

/// Fallback dimensions for previews whose header cannot be read.
pub const DEFAULT_DIMENSIONS: Size = Size::new(1920, 1080);

/// The 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Signature, IHDR length and type, width, height.
const PNG_MIN_LEN: usize = 24;
const PNG_WIDTH_OFFSET: usize = 16;
const PNG_HEIGHT_OFFSET: usize = 20;

const JPEG_MARKER: u8 = 0xFF;
const JPEG_SOI: u8 = 0xD8;
const JPEG_EOI: u8 = 0xD9;
const JPEG_TEM: u8 = 0x01;

/// Frame header field offsets, relative to the segment length field:
/// length (2), sample precision (1), height (2), width (2).
const SOF_HEIGHT_OFFSET: usize = 3;
const SOF_WIDTH_OFFSET: usize = 5;
const SOF_MIN_LEN: usize = 7;

/// Image container formats the sniffer understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Map a file extension (with or without the leading dot, any case).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        if ext.eq_ignore_ascii_case("png") {
            Some(Self::Png)
        } else if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// Detect the format from leading magic bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(&PNG_SIGNATURE) {
            Some(Self::Png)
        } else if data.starts_with(&[JPEG_MARKER, JPEG_SOI]) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// Lowercase extensions conventionally used for this format.
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Png => &["png"],
            Self::Jpeg => &["jpg", "jpeg"],
        }
    }
}

/// Result of sniffing an image header.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RasterHeader {
    /// Dimensions read from the header.
    Known(Size),
    /// The header was missing, truncated, or malformed.
    Unknown,
}

impl RasterHeader {
    /// The dimensions, if known.
    pub const fn size(self) -> Option<Size> {
        match self {
            Self::Known(size) => Some(size),
            Self::Unknown => None,
        }
    }

    /// Whether dimensions were found.
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// The dimensions, or `fallback` when unknown.
    pub const fn or_default(self, fallback: Size) -> Size {
        match self {
            Self::Known(size) => size,
            Self::Unknown => fallback,
        }
    }
}

/// Read the pixel dimensions of `data`, interpreted as `format`.
pub fn sniff(data: &[u8], format: ImageFormat) -> RasterHeader {
    let size = match format {
        ImageFormat::Png => sniff_png(data),
        ImageFormat::Jpeg => sniff_jpeg(data),
    };
    match size {
        Some(size) => RasterHeader::Known(size),
        None => RasterHeader::Unknown,
    }
}

/// Detect the format from magic bytes, then sniff.
pub fn sniff_auto(data: &[u8]) -> RasterHeader {
    match ImageFormat::detect(data) {
        Some(format) => sniff(data, format),
        None => RasterHeader::Unknown,
    }
}

fn sniff_png(data: &[u8]) -> Option<Size> {
    if data.len() < PNG_MIN_LEN || !data.starts_with(&PNG_SIGNATURE) {
        return None;
    }
    let width = read_u32_be(data, PNG_WIDTH_OFFSET)?;
    let height = read_u32_be(data, PNG_HEIGHT_OFFSET)?;
    Some(Size::new(width, height))
}

fn sniff_jpeg(data: &[u8]) -> Option<Size> {
    if !data.starts_with(&[JPEG_MARKER, JPEG_SOI]) {
        return None;
    }

    let mut pos = 2;
    loop {
        if *data.get(pos)? != JPEG_MARKER {
            return None;
        }
        let marker = *data.get(pos + 1)?;
        pos += 2;

        if marker == JPEG_EOI {
            return None;
        }
        if is_standalone(marker) {
            continue;
        }

        let length = read_u16_be(data, pos)? as usize;
        if length < 2 {
            return None;
        }

        if is_start_of_frame(marker) {
            if length < SOF_MIN_LEN || pos + length > data.len() {
                return None;
            }
            let height = read_u16_be(data, pos + SOF_HEIGHT_OFFSET)?;
            let width = read_u16_be(data, pos + SOF_WIDTH_OFFSET)?;
            return Some(Size::new(width as u32, height as u32));
        }

        pos += length;
    }
}

/// SOF0–SOF3, SOF5–SOF7, SOF9–SOF11, SOF13–SOF15.
///
/// C4 (DHT), C8 (JPG extension) and CC (DAC) share the range but are not
/// frame headers.
const fn is_start_of_frame(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

/// Markers without a length field.
const fn is_standalone(marker: u8) -> bool {
    matches!(marker, JPEG_TEM | JPEG_SOI | 0xD0..=0xD7)
}

fn read_u16_be(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32_be(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
