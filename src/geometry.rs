//! Fit-to-surface geometry for document composition.
//!
//! Computes the uniform scale factor that fits a document inside a display
//! surface, the fitted canvas size, and where that canvas sits on a surface
//! that keeps its own size. Pure geometry, no allocations, `no_std`
//! compatible.
//!
//! # Example
//!
//! ```
//! use zenlayers::{FitMode, Gravity, Size, Viewport};
//!
//! let viewport = Viewport::fit(
//!     Size::new(1000, 2000),
//!     Size::new(500, 500),
//!     FitMode::Fit,
//!     Gravity::Center,
//! )
//! .unwrap();
//!
//! assert_eq!(viewport.scale.factor(), 0.25);
//! assert_eq!(viewport.canvas, Size::new(250, 500));
//! assert_eq!(viewport.offset, (125, 0));
//! ```

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// How a document is scaled onto a surface.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FitMode {
    /// Scale to fit within the surface, preserving aspect ratio.
    /// Upscales small documents and downscales large ones.
    #[default]
    Fit,
    /// Like [`Fit`](Self::Fit), but never upscales.
    /// Documents already smaller than the surface keep scale 1.
    Within,
}

/// Where the fitted canvas sits on a surface that keeps its size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Gravity {
    /// Center on both axes.
    #[default]
    Center,
    /// Position by percentage. `(0.0, 0.0)` = top-left, `(1.0, 1.0)` = bottom-right.
    Percentage(f32, f32),
}

impl Gravity {
    /// Top-left anchoring, the layout a resized surface ends up with.
    pub const TOP_LEFT: Self = Self::Percentage(0.0, 0.0);
}

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either axis is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl core::fmt::Display for Size {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A layer's bounds in document pixel coordinates.
///
/// Layers may start left of or above the document origin, so the origin is
/// signed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A rectangle in surface coordinates after scaling.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaledRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// The uniform scale factor of one composition pass.
///
/// Always finite and strictly positive. The same factor applies to both
/// axes, so aspect ratio is preserved.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScaleContext {
    factor: f64,
}

impl ScaleContext {
    /// Wrap a factor. Returns `None` unless it is finite and positive.
    pub fn new(factor: f64) -> Option<Self> {
        (factor.is_finite() && factor > 0.0).then_some(Self { factor })
    }

    /// The scale factor.
    pub const fn factor(&self) -> f64 {
        self.factor
    }

    /// Document units to surface units.
    pub fn apply(&self, value: f64) -> f64 {
        value * self.factor
    }

    /// Surface units back to document units.
    pub fn invert(&self, value: f64) -> f64 {
        value / self.factor
    }

    /// Scale a layer rectangle into surface coordinates.
    pub fn scale_rect(&self, rect: Rect) -> ScaledRect {
        ScaledRect {
            left: self.apply(rect.left as f64),
            top: self.apply(rect.top as f64),
            width: self.apply(rect.width as f64),
            height: self.apply(rect.height as f64),
        }
    }
}

/// Geometry error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The document has zero width or height.
    #[error("document has zero width or height")]
    ZeroDocumentDimension,
    /// The surface has zero width or height.
    #[error("surface has zero width or height")]
    ZeroSurfaceDimension,
}

/// Compute the scale factor that fits `document` inside `surface`.
///
/// `min(surface.width / document.width, surface.height / document.height)`,
/// clamped to at most 1 under [`FitMode::Within`].
pub fn fit_scale(document: Size, surface: Size, mode: FitMode) -> Result<ScaleContext, LayoutError> {
    if document.is_empty() {
        return Err(LayoutError::ZeroDocumentDimension);
    }
    if surface.is_empty() {
        return Err(LayoutError::ZeroSurfaceDimension);
    }
    let ratio_w = surface.width as f64 / document.width as f64;
    let ratio_h = surface.height as f64 / document.height as f64;
    let factor = match mode {
        FitMode::Fit => ratio_w.min(ratio_h),
        FitMode::Within => ratio_w.min(ratio_h).min(1.0),
    };
    // Both ratios are finite and positive for non-empty u32 sizes.
    Ok(ScaleContext { factor })
}

/// Scale factor, fitted canvas, and canvas placement for one document on one surface.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Viewport {
    /// Uniform document → surface scale.
    pub scale: ScaleContext,
    /// The document's size once scaled, rounded per axis (≤ surface on both axes).
    pub canvas: Size,
    /// Top-left offset of the canvas on a surface that keeps its size.
    pub offset: (u32, u32),
    /// The surface the viewport was computed for.
    pub surface: Size,
}

impl Viewport {
    /// Fit `document` onto `surface`.
    pub fn fit(
        document: Size,
        surface: Size,
        mode: FitMode,
        gravity: Gravity,
    ) -> Result<Self, LayoutError> {
        let scale = fit_scale(document, surface, mode)?;
        let cw = scaled_extent(document.width, scale, surface.width);
        let ch = scaled_extent(document.height, scale, surface.height);
        let offset = gravity_offset(surface.width, surface.height, cw, ch, &gravity);
        Ok(Self {
            scale,
            canvas: Size::new(cw, ch),
            offset,
            surface,
        })
    }

    /// Whether the canvas leaves uncovered surface area.
    pub fn needs_letterbox(&self) -> bool {
        self.canvas != self.surface
    }
}

// ============================================================================
// Internal geometry
// ============================================================================

/// One axis of the document once scaled, in whole pixels.
///
/// At least 1, and never past the surface even when float error pushes the
/// exact product a hair over it.
fn scaled_extent(extent: u32, scale: ScaleContext, limit: u32) -> u32 {
    (scale.apply(extent as f64).round() as u32).clamp(1, limit)
}

fn gravity_offset(cw: u32, ch: u32, iw: u32, ih: u32, gravity: &Gravity) -> (u32, u32) {
    let x = gravity_offset_1d(cw.saturating_sub(iw), gravity, true);
    let y = gravity_offset_1d(ch.saturating_sub(ih), gravity, false);
    (x, y)
}

fn gravity_offset_1d(space: u32, gravity: &Gravity, horizontal: bool) -> u32 {
    if space == 0 {
        return 0;
    }
    match gravity {
        Gravity::Center => space / 2,
        Gravity::Percentage(x, y) => {
            let pct = if horizontal { *x } else { *y };
            (space as f64 * pct.clamp(0.0, 1.0) as f64).round() as u32
        }
    }
}
