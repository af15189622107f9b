//! Layered design documents: raster header sniffing and layer-tree composition.
//!
//! Two independent pieces:
//!
//! - [`sniff`] reads pixel dimensions from PNG and JPEG headers without
//!   decoding. No allocations, `no_std` compatible.
//! - [`compose`] flattens a layered document tree into an ordered list of
//!   scaled drawing instructions for a display surface, using one uniform
//!   scale factor that fits the document inside the surface.
//!
//! # Modules
//!
//! - [`geometry`]: sizes, layer rectangles, fit-to-surface scale and viewport
//! - [`sniff`]: PNG/JPEG header dimension sniffing
//! - [`color`]: text fill color parsing
//! - [`document`]: the resolved layer tree (`alloc`)
//! - [`resolve`]: loosely typed decoder records → [`Document`] (`alloc`)
//! - [`compose`]: document → placements (`alloc`)
//! - [`svg`]: SVG preview of a composition (`svg` feature)
//! - [`catalog`]: template directory catalog (`catalog` feature)
//!
//! # Example
//!
//! ```
//! use zenlayers::{compose, ComposeOptions, Document, Size, TextLayer};
//!
//! let doc = Document::new(Size::new(1000, 2000))
//!     .with(TextLayer::new("title", 100, 200, "Hello"));
//! let composition = compose(&doc, Size::new(500, 500), &ComposeOptions::default()).unwrap();
//!
//! let text = composition.placements[0].as_text().unwrap();
//! assert_eq!((text.left, text.top), (25.0, 50.0));
//! assert_eq!(text.font_size_px, 3.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod color;
pub mod geometry;
pub mod sniff;

#[cfg(feature = "alloc")]
pub mod compose;
#[cfg(feature = "alloc")]
pub mod document;
#[cfg(feature = "alloc")]
pub mod resolve;

#[cfg(feature = "catalog")]
pub mod catalog;
#[cfg(feature = "svg")]
pub mod svg;

pub use color::{Color, ColorError, parse_color};
pub use geometry::{
    FitMode, Gravity, LayoutError, Rect, ScaleContext, ScaledRect, Size, Viewport, fit_scale,
};
pub use sniff::{DEFAULT_DIMENSIONS, ImageFormat, RasterHeader, sniff_auto};

#[cfg(feature = "alloc")]
pub use compose::{
    ComposeError, ComposeOptions, Composition, ImagePlacement, Placement, SkipReason,
    SkippedLayer, Surface, SurfacePolicy, TextDefaults, TextPlacement, TraversalLimits, compose,
    compose_onto,
};
#[cfg(feature = "alloc")]
pub use document::{
    Document, DocumentNode, Group, Opacity, OpacityConvention, PixelSource, RasterLayer,
    StyleError, TextLayer, TextStyle,
};
#[cfg(feature = "alloc")]
pub use resolve::{ChildOrder, ResolveError, Resolver};
