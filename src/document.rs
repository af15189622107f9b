//! Resolved layer tree of a design document.
//!
//! This is the closed model the compositor consumes. Decoder output is
//! turned into it once, by [`Resolver`](crate::resolve::Resolver); after
//! that every field is typed and every optional is explicit.
//!
//! Child lists are stored bottom-to-top: the first child is painted first.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::color::{Color, ColorError};
use crate::geometry::{Rect, Size};

/// Layer opacity, always within `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Opacity(f32);

impl Opacity {
    pub const OPAQUE: Self = Self(1.0);
    pub const TRANSPARENT: Self = Self(0.0);

    /// From a fraction, clamped to `0.0..=1.0`. NaN becomes opaque.
    pub fn fraction(value: f32) -> Self {
        if value.is_nan() {
            Self::OPAQUE
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// From a 0–255 byte.
    pub fn from_byte(value: u8) -> Self {
        Self(value as f32 / 255.0)
    }

    /// Convert a decoder value under an explicit convention.
    ///
    /// Returns `None` for non-finite input.
    pub fn from_raw(value: f64, convention: OpacityConvention) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let byte_scale = match convention {
            OpacityConvention::Fraction => false,
            OpacityConvention::Byte => true,
            OpacityConvention::Auto => value > 1.0,
        };
        let v = if byte_scale { value / 255.0 } else { value };
        Some(Self(v.clamp(0.0, 1.0) as f32))
    }

    /// The opacity as a fraction.
    pub const fn get(self) -> f32 {
        self.0
    }

    /// The opacity on the 0–255 scale, rounded.
    pub fn to_byte(self) -> u8 {
        (self.0 * 255.0 + 0.5) as u8
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::OPAQUE
    }
}

/// How a decoder reports layer opacity.
///
/// `ag-psd`-style decoders report fractions; raw PSD records store a byte.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OpacityConvention {
    /// Values are already `0.0..=1.0`.
    #[default]
    Fraction,
    /// Values are `0..=255`.
    Byte,
    /// Values above 1.0 are treated as bytes, the rest as fractions.
    Auto,
}

/// Decoded RGBA8 pixels of a raster layer, shared by reference count.
///
/// A source is usable when its size is non-empty and the buffer holds
/// exactly `width * height * 4` bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelSource {
    size: Size,
    rgba: Arc<[u8]>,
}

impl PixelSource {
    /// Wrap an RGBA8 buffer. Returns `None` on a size/length mismatch or
    /// zero-sized pixels.
    pub fn rgba8(size: Size, rgba: impl Into<Arc<[u8]>>) -> Option<Self> {
        let rgba = rgba.into();
        let expected = (size.width as usize)
            .checked_mul(size.height as usize)?
            .checked_mul(4)?;
        (!size.is_empty() && rgba.len() == expected).then_some(Self { size, rgba })
    }

    /// Pixel dimensions.
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Row-major RGBA8 bytes.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

impl fmt::Debug for PixelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelSource")
            .field("size", &self.size)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Placements describe pixels by size; the bytes stay with the renderer's copy.
#[cfg(feature = "serde")]
impl serde::Serialize for PixelSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.size.serialize(serializer)
    }
}

/// A resolved design document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Document (canvas) size in pixels.
    pub size: Size,
    /// Top-level layers, bottom-to-top.
    pub children: Vec<DocumentNode>,
}

impl Document {
    /// An empty document of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            children: Vec::new(),
        }
    }

    /// Append a layer on top of the existing ones.
    pub fn with(mut self, node: impl Into<DocumentNode>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Total number of nodes in the tree, hidden ones included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&DocumentNode> = self.children.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            if let DocumentNode::Group(g) = node {
                stack.extend(&g.children);
            }
        }
        count
    }

    /// Nesting depth; 0 for an empty document, 1 for flat layers.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&DocumentNode, usize)> = self.children.iter().map(|n| (n, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let DocumentNode::Group(g) = node {
                stack.extend(g.children.iter().map(|c| (c, depth + 1)));
            }
        }
        deepest
    }
}

/// One node of the layer tree.
#[derive(Clone, Debug, PartialEq)]
pub enum DocumentNode {
    Group(Group),
    Raster(RasterLayer),
    Text(TextLayer),
}

impl DocumentNode {
    /// Layer name.
    pub fn name(&self) -> &str {
        match self {
            Self::Group(g) => &g.name,
            Self::Raster(r) => &r.name,
            Self::Text(t) => &t.name,
        }
    }

    /// Whether the layer is hidden.
    pub fn is_hidden(&self) -> bool {
        match self {
            Self::Group(g) => g.hidden,
            Self::Raster(r) => r.hidden,
            Self::Text(t) => t.hidden,
        }
    }
}

impl From<Group> for DocumentNode {
    fn from(g: Group) -> Self {
        Self::Group(g)
    }
}

impl From<RasterLayer> for DocumentNode {
    fn from(r: RasterLayer) -> Self {
        Self::Raster(r)
    }
}

impl From<TextLayer> for DocumentNode {
    fn from(t: TextLayer) -> Self {
        Self::Text(t)
    }
}

/// A folder of layers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub name: String,
    pub hidden: bool,
    /// Bottom-to-top.
    pub children: Vec<DocumentNode>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a layer on top of the existing children.
    pub fn with(mut self, node: impl Into<DocumentNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// A bitmap layer.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterLayer {
    pub name: String,
    pub hidden: bool,
    /// Bounds in document pixels.
    pub bounds: Rect,
    pub opacity: Opacity,
    /// `None` when the decoder produced no usable pixels.
    pub pixels: Option<PixelSource>,
}

impl RasterLayer {
    /// A visible, opaque raster layer whose bounds match its pixels.
    pub fn new(name: impl Into<String>, left: i32, top: i32, pixels: PixelSource) -> Self {
        let size = pixels.size();
        Self {
            name: name.into(),
            hidden: false,
            bounds: Rect::new(left, top, size.width, size.height),
            opacity: Opacity::OPAQUE,
            pixels: Some(pixels),
        }
    }

    /// A raster layer without pixel data.
    pub fn empty(name: impl Into<String>, bounds: Rect) -> Self {
        Self {
            name: name.into(),
            hidden: false,
            bounds,
            opacity: Opacity::OPAQUE,
            pixels: None,
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn opacity(mut self, opacity: Opacity) -> Self {
        self.opacity = opacity;
        self
    }
}

/// A text run.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayer {
    pub name: String,
    pub hidden: bool,
    pub left: i32,
    pub top: i32,
    pub opacity: Opacity,
    /// `None` when the run carried no text; composed as an empty string.
    pub text: Option<String>,
    /// `Err` when the decoder's style record could not be read.
    pub style: Result<TextStyle, StyleError>,
}

impl TextLayer {
    /// A visible, opaque text layer with default style.
    pub fn new(name: impl Into<String>, left: i32, top: i32, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: false,
            left,
            top,
            opacity: Opacity::OPAQUE,
            text: Some(text.into()),
            style: Ok(TextStyle::default()),
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn opacity(mut self, opacity: Opacity) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = Ok(style);
        self
    }
}

/// Style of a text run. Unset fields fall back to
/// [`TextDefaults`](crate::compose::TextDefaults) at composition time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextStyle {
    pub font_family: Option<String>,
    /// Font size in document points.
    pub font_size_pt: Option<f32>,
    pub fill: Option<Color>,
}

/// Why a text style record is unreadable.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StyleError {
    #[error("invalid fill color: {0}")]
    Color(#[from] ColorError),
    #[error("invalid font size {0}")]
    FontSize(f64),
    #[error("color component {0} out of range")]
    ColorComponent(f64),
}
