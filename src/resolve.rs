//! Decoder boundary: loosely-typed layer records → [`Document`].
//!
//! Design-file decoders emit records whose fields may or may not be present
//! (`ag-psd` style: a layer has `canvas` if it is a bitmap, `text` if it is a
//! text run, `children` if it is a folder). [`Resolver`] classifies each
//! record exactly once and settles every convention the compositor would
//! otherwise have to guess: opacity units, child order, missing geometry.
//!
//! # Example
//!
//! ```
//! use zenlayers::resolve::{ChildOrder, RawDocument, RawLayer, RawText, Resolver};
//! use zenlayers::{DocumentNode, OpacityConvention};
//!
//! let raw = RawDocument {
//!     width: Some(800.0),
//!     height: Some(600.0),
//!     children: vec![
//!         RawLayer { name: Some("title".into()), text: Some(RawText::plain("Hello")), ..Default::default() },
//!         RawLayer { name: Some("background".into()), opacity: Some(255.0), ..Default::default() },
//!     ],
//! };
//!
//! let doc = Resolver::new()
//!     .opacity(OpacityConvention::Byte)
//!     .child_order(ChildOrder::TopToBottom)
//!     .resolve(&raw)
//!     .unwrap();
//!
//! // Stored bottom-to-top after resolution.
//! assert_eq!(doc.children[0].name(), "background");
//! assert!(matches!(doc.children[1], DocumentNode::Text(_)));
//! ```

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::color::{Color, parse_color};
use crate::document::{
    Document, DocumentNode, Group, Opacity, OpacityConvention, PixelSource, RasterLayer,
    StyleError, TextLayer, TextStyle,
};
use crate::geometry::{Rect, Size};

/// Order of child lists in decoder output.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ChildOrder {
    /// First child is the bottom-most layer (PSD storage order).
    #[default]
    BottomToTop,
    /// First child is the top-most layer (layer-panel order).
    TopToBottom,
}

/// A decoded document as the decoder hands it over.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawDocument {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub children: Vec<RawLayer>,
}

/// One decoder layer record. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawLayer {
    pub name: Option<String>,
    pub hidden: Option<bool>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub opacity: Option<f64>,
    /// Bitmap content.
    #[cfg_attr(feature = "serde", serde(alias = "canvas"))]
    pub pixels: Option<RawPixels>,
    pub text: Option<RawText>,
    pub children: Option<Vec<RawLayer>>,
}

/// Bitmap content of a layer record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawPixels {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8.
    pub rgba: Vec<u8>,
}

/// Text run of a layer record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawText {
    pub text: Option<String>,
    /// Some decoders put the run in `value` instead of `text`.
    pub value: Option<String>,
    pub style: Option<RawTextStyle>,
}

impl RawText {
    /// A run with text and no style.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawTextStyle {
    pub font: Option<RawFont>,
    pub fill: Option<RawFill>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawFont {
    pub name: Option<String>,
    /// Sizes of the style runs in points; the first one is used.
    pub sizes: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawFill {
    pub color: Option<RawColor>,
}

/// A fill color as a decoder may express it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawColor {
    /// Hex or named color string.
    Css(String),
    /// 0–255 components; alpha defaults to opaque.
    Rgb {
        r: f64,
        g: f64,
        b: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        a: Option<f64>,
    },
}

/// Resolution error. Unreadable layers degrade instead of failing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("document width or height missing or not positive")]
    MissingDocumentExtent,
    /// Layer groups nest deeper than the resolver allows.
    #[error("layers nest deeper than {limit} levels")]
    DepthLimit { limit: usize },
}

/// Turns raw decoder records into a [`Document`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolver {
    opacity: OpacityConvention,
    order: ChildOrder,
    max_depth: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            opacity: OpacityConvention::default(),
            order: ChildOrder::default(),
            max_depth: 64,
        }
    }
}

impl Resolver {
    /// Fractional opacity, bottom-to-top children, at most 64 levels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the decoder's opacity units.
    pub fn opacity(mut self, convention: OpacityConvention) -> Self {
        self.opacity = convention;
        self
    }

    /// Declare the decoder's child order.
    pub fn child_order(mut self, order: ChildOrder) -> Self {
        self.order = order;
        self
    }

    /// Limit group nesting. Top-level layers are at depth 1.
    ///
    /// Keep this at or below [`TraversalLimits::max_depth`] so a resolved
    /// document can always be composed.
    ///
    /// [`TraversalLimits::max_depth`]: crate::compose::TraversalLimits::max_depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Resolve a whole document.
    ///
    /// Fails when the document extent is missing or not positive, or when
    /// groups nest deeper than [`max_depth`](Self::max_depth).
    pub fn resolve(&self, raw: &RawDocument) -> Result<Document, ResolveError> {
        let size = match (raw.width.and_then(to_extent), raw.height.and_then(to_extent)) {
            (Some(w), Some(h)) => Size::new(w, h),
            _ => return Err(ResolveError::MissingDocumentExtent),
        };
        Ok(Document {
            size,
            children: self.resolve_children(&raw.children, 1)?,
        })
    }

    fn resolve_children(
        &self,
        layers: &[RawLayer],
        depth: usize,
    ) -> Result<Vec<DocumentNode>, ResolveError> {
        if depth > self.max_depth && !layers.is_empty() {
            return Err(ResolveError::DepthLimit {
                limit: self.max_depth,
            });
        }
        let mut nodes = layers
            .iter()
            .map(|l| self.resolve_node(l, depth))
            .collect::<Result<Vec<_>, _>>()?;
        if self.order == ChildOrder::TopToBottom {
            nodes.reverse();
        }
        Ok(nodes)
    }

    /// Classify one record: pixels → raster, text → text, children →
    /// group, nothing → raster without pixels.
    pub fn resolve_layer(&self, raw: &RawLayer) -> Result<DocumentNode, ResolveError> {
        self.resolve_node(raw, 1)
    }

    fn resolve_node(&self, raw: &RawLayer, depth: usize) -> Result<DocumentNode, ResolveError> {
        let name = raw.name.clone().unwrap_or_default();
        let hidden = raw.hidden.unwrap_or(false);
        let opacity = raw
            .opacity
            .and_then(|v| Opacity::from_raw(v, self.opacity))
            .unwrap_or(Opacity::OPAQUE);
        let left = raw.left.map(to_coord).unwrap_or(0);
        let top = raw.top.map(to_coord).unwrap_or(0);

        if let Some(px) = &raw.pixels {
            let pixels = PixelSource::rgba8(Size::new(px.width, px.height), px.rgba.as_slice());
            if pixels.is_none() {
                log::debug!(
                    "layer {name:?}: pixel buffer of {} bytes does not match {}x{}",
                    px.rgba.len(),
                    px.width,
                    px.height
                );
            }
            let width = raw.width.map(to_length).filter(|&w| w > 0).unwrap_or(px.width);
            let height = raw.height.map(to_length).filter(|&h| h > 0).unwrap_or(px.height);
            return Ok(DocumentNode::Raster(RasterLayer {
                name,
                hidden,
                bounds: Rect::new(left, top, width, height),
                opacity,
                pixels,
            }));
        }

        if let Some(text) = &raw.text {
            return Ok(DocumentNode::Text(TextLayer {
                name,
                hidden,
                left,
                top,
                opacity,
                text: text.text.clone().or_else(|| text.value.clone()),
                style: resolve_style(text.style.as_ref()),
            }));
        }

        if let Some(children) = &raw.children {
            return Ok(DocumentNode::Group(Group {
                name,
                hidden,
                children: self.resolve_children(children, depth + 1)?,
            }));
        }

        let bounds = Rect::new(
            left,
            top,
            raw.width.map(to_length).unwrap_or(0),
            raw.height.map(to_length).unwrap_or(0),
        );
        Ok(DocumentNode::Raster(RasterLayer {
            name,
            hidden,
            bounds,
            opacity,
            pixels: None,
        }))
    }
}

fn resolve_style(raw: Option<&RawTextStyle>) -> Result<TextStyle, StyleError> {
    let Some(raw) = raw else {
        return Ok(TextStyle::default());
    };
    let font = raw.font.as_ref();
    let font_size_pt = match font.and_then(|f| f.sizes.first().copied()) {
        Some(size) if size.is_finite() && size > 0.0 => Some(size as f32),
        Some(size) => return Err(StyleError::FontSize(size)),
        None => None,
    };
    let fill = match raw.fill.as_ref().and_then(|f| f.color.as_ref()) {
        Some(color) => Some(resolve_color(color)?),
        None => None,
    };
    Ok(TextStyle {
        font_family: font.and_then(|f| f.name.clone()).filter(|n| !n.is_empty()),
        font_size_pt,
        fill,
    })
}

fn resolve_color(raw: &RawColor) -> Result<Color, StyleError> {
    match raw {
        RawColor::Css(s) => Ok(parse_color(s)?),
        RawColor::Rgb { r, g, b, a } => Ok(Color::rgba(
            component(*r)?,
            component(*g)?,
            component(*b)?,
            a.map(component).transpose()?.unwrap_or(255),
        )),
    }
}

fn component(v: f64) -> Result<u8, StyleError> {
    if v.is_finite() && (0.0..=255.0).contains(&v) {
        Ok(v.round() as u8)
    } else {
        Err(StyleError::ColorComponent(v))
    }
}

/// Positive, finite extents round to whole pixels.
fn to_extent(v: f64) -> Option<u32> {
    (v.is_finite() && v >= 0.5).then(|| to_length(v))
}

/// Float casts saturate; NaN becomes 0.
fn to_length(v: f64) -> u32 {
    v.round() as u32
}

fn to_coord(v: f64) -> i32 {
    v.round() as i32
}
