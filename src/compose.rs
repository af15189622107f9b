//! Layer-tree composition: [`Document`] → ordered placement instructions.
//!
//! One composition pass computes a single uniform scale factor that fits the
//! document onto the surface, walks the layer tree depth-first in stored
//! (bottom-to-top) order, and emits one [`Placement`] per visible, readable
//! leaf. Renderers draw the list in order, so later entries paint over
//! earlier ones.
//!
//! Hidden groups are pruned with their whole subtree. Hidden leaves are
//! skipped. Unreadable leaves (no pixels, unreadable text style) are logged,
//! recorded in [`Composition::skipped`], and skipped; they never abort the
//! pass. Only a degenerate document or surface, or a tree beyond the
//! configured [`TraversalLimits`], fails the call.
//!
//! # Example
//!
//! ```
//! use zenlayers::{compose, ComposeOptions, Document, PixelSource, RasterLayer, Size};
//!
//! let pixels = PixelSource::rgba8(Size::new(400, 400), vec![0u8; 400 * 400 * 4]).unwrap();
//! let doc = Document::new(Size::new(1000, 2000))
//!     .with(RasterLayer::new("photo", 200, 800, pixels));
//!
//! let composition = compose(&doc, Size::new(500, 500), &ComposeOptions::default()).unwrap();
//!
//! assert_eq!(composition.scale().factor(), 0.25);
//! let image = composition.placements[0].as_image().unwrap();
//! assert_eq!((image.left, image.top), (50.0, 200.0));
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use whereat::{At, ErrorAtExt};

use crate::color::Color;
use crate::document::{Document, DocumentNode, Group, PixelSource, RasterLayer, StyleError, TextLayer};
use crate::geometry::{FitMode, Gravity, LayoutError, Rect, ScaleContext, Size, Viewport};

/// Caps that bound one composition pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TraversalLimits {
    /// Maximum group nesting. Top-level layers are at depth 1.
    pub max_depth: usize,
    /// Maximum number of visited nodes, pruned subtrees excluded.
    pub max_nodes: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_nodes: 100_000,
        }
    }
}

/// Fallbacks for text layers whose style leaves a field unset.
#[derive(Clone, Debug, PartialEq)]
pub struct TextDefaults {
    pub font_family: String,
    pub font_size_pt: f32,
    pub color: Color,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            font_family: String::from("Arial"),
            font_size_pt: 12.0,
            color: Color::BLACK,
        }
    }
}

/// What happens to the surface size.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfacePolicy {
    /// Shrink the surface to the fitted canvas; placements start at the origin.
    #[default]
    Resize,
    /// Keep the surface size; placements are offset by the gravity placement
    /// of the fitted canvas.
    Keep,
}

/// Options for a composition pass.
///
/// # Example
///
/// ```
/// use zenlayers::{ComposeOptions, FitMode, Gravity, SurfacePolicy};
///
/// let options = ComposeOptions::new()
///     .fit(FitMode::Within)
///     .surface_policy(SurfacePolicy::Keep)
///     .gravity(Gravity::Center)
///     .max_depth(16);
/// assert_eq!(options.limits.max_depth, 16);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComposeOptions {
    pub fit: FitMode,
    pub gravity: Gravity,
    pub surface_policy: SurfacePolicy,
    pub limits: TraversalLimits,
    pub text: TextDefaults,
}

impl ComposeOptions {
    /// Fit mode, centered, resized surface, default limits and text defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(mut self, mode: FitMode) -> Self {
        self.fit = mode;
        self
    }

    /// Canvas placement when the surface keeps its size.
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn surface_policy(mut self, policy: SurfacePolicy) -> Self {
        self.surface_policy = policy;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.limits.max_depth = depth;
        self
    }

    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.limits.max_nodes = nodes;
        self
    }

    pub fn text_defaults(mut self, text: TextDefaults) -> Self {
        self.text = text;
        self
    }
}

/// A drawable primitive with resolved position, scale and attributes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Placement {
    Image(ImagePlacement),
    Text(TextPlacement),
}

impl Placement {
    /// The source layer's name, for debugging.
    pub fn name(&self) -> &str {
        match self {
            Self::Image(i) => &i.name,
            Self::Text(t) => &t.name,
        }
    }

    pub fn as_image(&self) -> Option<&ImagePlacement> {
        match self {
            Self::Image(i) => Some(i),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextPlacement> {
        match self {
            Self::Text(t) => Some(t),
            Self::Image(_) => None,
        }
    }
}

/// Draw `pixels` with its top-left corner at (`left`, `top`), scaled by
/// (`scale_x`, `scale_y`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImagePlacement {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// `0.0..=1.0`.
    pub opacity: f32,
    pub pixels: PixelSource,
    pub name: String,
    /// The layer's unscaled bounds in document pixels.
    pub source_bounds: Rect,
}

/// Draw `text` with its top-left corner at (`left`, `top`).
///
/// `font_size_px` is already multiplied by the composition scale; `scale`
/// is informational and must not be applied to the font size again.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextPlacement {
    pub left: f64,
    pub top: f64,
    pub scale: f64,
    /// `0.0..=1.0`.
    pub opacity: f32,
    pub text: String,
    pub font_family: String,
    pub font_size_px: f64,
    pub color: Color,
    pub name: String,
    /// Text placements are display-only.
    pub selectable: bool,
}

/// Why a visible leaf produced no placement.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("raster layer has no usable pixel data")]
    MissingPixels,
    #[error("text style is unreadable: {0}")]
    UnreadableStyle(StyleError),
}

/// A visible leaf that was skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedLayer {
    pub name: String,
    /// Nesting depth of the layer; top-level layers are at 1.
    pub depth: usize,
    pub reason: SkipReason,
}

/// Result of one composition pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    /// Scale, fitted canvas and canvas offset.
    pub viewport: Viewport,
    /// Drawing order: first entry is painted first.
    pub placements: Vec<Placement>,
    /// Visible leaves that could not be placed.
    pub skipped: Vec<SkippedLayer>,
    /// Hidden nodes encountered (pruned subtrees count once).
    pub hidden: usize,
    /// Surface policy the placements were computed for.
    pub policy: SurfacePolicy,
}

impl Composition {
    /// The uniform scale of this pass.
    pub fn scale(&self) -> ScaleContext {
        self.viewport.scale
    }

    /// Size the renderer's surface should take.
    pub fn surface_size(&self) -> Size {
        match self.policy {
            SurfacePolicy::Resize => self.viewport.canvas,
            SurfacePolicy::Keep => self.viewport.surface,
        }
    }

    /// Top-left corner of the fitted canvas in placement coordinates.
    pub fn canvas_origin(&self) -> (u32, u32) {
        match self.policy {
            SurfacePolicy::Resize => (0, 0),
            SurfacePolicy::Keep => self.viewport.offset,
        }
    }
}

/// Fatal composition error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("layer tree deeper than {limit} levels")]
    DepthLimit { limit: usize },
    #[error("layer tree has more than {limit} nodes")]
    NodeLimit { limit: usize },
}

/// The renderer side: a surface that takes drawable primitives.
pub trait Surface {
    /// Current size in pixels.
    fn dimensions(&self) -> Size;
    /// Resize the surface.
    fn set_dimensions(&mut self, size: Size);
    /// Add a primitive on top of everything added so far.
    fn add(&mut self, placement: Placement);
    /// Remove all primitives.
    fn clear(&mut self) {}
}

/// Compose `document` for a surface of `surface` pixels.
pub fn compose(
    document: &Document,
    surface: Size,
    options: &ComposeOptions,
) -> Result<Composition, At<ComposeError>> {
    let viewport = Viewport::fit(document.size, surface, options.fit, options.gravity)
        .map_err(|e| ComposeError::from(e).start_at())?;

    let origin = match options.surface_policy {
        SurfacePolicy::Resize => (0.0, 0.0),
        SurfacePolicy::Keep => (viewport.offset.0 as f64, viewport.offset.1 as f64),
    };

    let mut pass = Pass {
        scale: viewport.scale,
        origin,
        options,
        visited: 0,
        placements: Vec::new(),
        skipped: Vec::new(),
        hidden: 0,
    };
    pass.visit(&document.children, 1).map_err(|e| e.start_at())?;

    log::debug!(
        "composed {} placements ({} skipped, {} hidden) at scale {}",
        pass.placements.len(),
        pass.skipped.len(),
        pass.hidden,
        viewport.scale.factor()
    );

    Ok(Composition {
        viewport,
        placements: pass.placements,
        skipped: pass.skipped,
        hidden: pass.hidden,
        policy: options.surface_policy,
    })
}

/// Compose `document` onto `surface`: read its size once, clear it, apply
/// the [`SurfacePolicy`], then add every placement in order.
///
/// The surface is untouched when composition fails.
pub fn compose_onto<S: Surface + ?Sized>(
    document: &Document,
    surface: &mut S,
    options: &ComposeOptions,
) -> Result<Composition, At<ComposeError>> {
    let composition = compose(document, surface.dimensions(), options)?;
    surface.clear();
    if composition.policy == SurfacePolicy::Resize {
        surface.set_dimensions(composition.surface_size());
    }
    for placement in &composition.placements {
        surface.add(placement.clone());
    }
    Ok(composition)
}

/// State of one traversal.
struct Pass<'a> {
    scale: ScaleContext,
    origin: (f64, f64),
    options: &'a ComposeOptions,
    visited: usize,
    placements: Vec<Placement>,
    skipped: Vec<SkippedLayer>,
    hidden: usize,
}

impl Pass<'_> {
    fn visit(&mut self, nodes: &[DocumentNode], depth: usize) -> Result<(), ComposeError> {
        let limits = self.options.limits;
        if depth > limits.max_depth && !nodes.is_empty() {
            return Err(ComposeError::DepthLimit {
                limit: limits.max_depth,
            });
        }
        for node in nodes {
            self.visited += 1;
            if self.visited > limits.max_nodes {
                return Err(ComposeError::NodeLimit {
                    limit: limits.max_nodes,
                });
            }
            if node.is_hidden() {
                self.hidden += 1;
                continue;
            }
            match node {
                DocumentNode::Group(group) => self.visit_group(group, depth)?,
                DocumentNode::Raster(layer) => self.place_raster(layer, depth),
                DocumentNode::Text(layer) => self.place_text(layer, depth),
            }
        }
        Ok(())
    }

    fn visit_group(&mut self, group: &Group, depth: usize) -> Result<(), ComposeError> {
        self.visit(&group.children, depth + 1)
    }

    fn place_raster(&mut self, layer: &RasterLayer, depth: usize) {
        let Some(pixels) = &layer.pixels else {
            self.skip(&layer.name, depth, SkipReason::MissingPixels);
            return;
        };
        let (left, top) = self.position(layer.bounds.left, layer.bounds.top);
        self.placements.push(Placement::Image(ImagePlacement {
            left,
            top,
            scale_x: self.scale.factor(),
            scale_y: self.scale.factor(),
            opacity: layer.opacity.get(),
            pixels: pixels.clone(),
            name: layer.name.clone(),
            source_bounds: layer.bounds,
        }));
    }

    fn place_text(&mut self, layer: &TextLayer, depth: usize) {
        let style = match &layer.style {
            Ok(style) => style,
            Err(e) => {
                self.skip(&layer.name, depth, SkipReason::UnreadableStyle(e.clone()));
                return;
            }
        };
        let defaults = &self.options.text;
        let (left, top) = self.position(layer.left, layer.top);
        let size_pt = style.font_size_pt.unwrap_or(defaults.font_size_pt);
        self.placements.push(Placement::Text(TextPlacement {
            left,
            top,
            scale: self.scale.factor(),
            opacity: layer.opacity.get(),
            text: layer.text.clone().unwrap_or_default(),
            font_family: style
                .font_family
                .clone()
                .unwrap_or_else(|| defaults.font_family.clone()),
            font_size_px: self.scale.apply(size_pt as f64),
            color: style.fill.unwrap_or(defaults.color),
            name: layer.name.clone(),
            selectable: false,
        }));
    }

    fn position(&self, left: i32, top: i32) -> (f64, f64) {
        (
            self.origin.0 + self.scale.apply(left as f64),
            self.origin.1 + self.scale.apply(top as f64),
        )
    }

    fn skip(&mut self, name: &str, depth: usize, reason: SkipReason) {
        log::warn!("skipping layer {name:?}: {reason}");
        self.skipped.push(SkippedLayer {
            name: String::from(name),
            depth,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Opacity, TextStyle};
    use alloc::vec;

    fn px(w: u32, h: u32) -> PixelSource {
        PixelSource::rgba8(Size::new(w, h), vec![0u8; (w * h * 4) as usize]).unwrap()
    }

    fn raster(name: &str) -> RasterLayer {
        RasterLayer::new(name, 10, 20, px(2, 2))
    }

    fn names(c: &Composition) -> Vec<&str> {
        c.placements.iter().map(Placement::name).collect()
    }

    fn run(doc: &Document) -> Composition {
        compose(doc, Size::new(500, 500), &ComposeOptions::default()).unwrap()
    }

    // ── scale ───────────────────────────────────────────────────────────

    #[test]
    fn scale_is_min_of_axis_ratios() {
        let doc = Document::new(Size::new(1000, 2000));
        let c = run(&doc);
        assert_eq!(c.scale().factor(), 0.25);
        assert_eq!(c.viewport.canvas, Size::new(250, 500));
    }

    #[test]
    fn zero_document_extent_is_fatal() {
        let doc = Document::new(Size::new(0, 100)).with(raster("a"));
        let err = compose(&doc, Size::new(500, 500), &ComposeOptions::default()).unwrap_err();
        assert_eq!(
            *err.error(),
            ComposeError::Layout(LayoutError::ZeroDocumentDimension)
        );
    }

    #[test]
    fn zero_surface_is_fatal() {
        let doc = Document::new(Size::new(10, 10));
        let err = compose(&doc, Size::new(0, 0), &ComposeOptions::default()).unwrap_err();
        assert_eq!(
            *err.error(),
            ComposeError::Layout(LayoutError::ZeroSurfaceDimension)
        );
    }

    // ── image placements ────────────────────────────────────────────────

    #[test]
    fn raster_position_and_scale() {
        let doc = Document::new(Size::new(1000, 1000))
            .with(raster("a").opacity(Opacity::fraction(0.4)));
        let c = run(&doc);
        let img = c.placements[0].as_image().unwrap();
        assert_eq!((img.left, img.top), (5.0, 10.0));
        assert_eq!((img.scale_x, img.scale_y), (0.5, 0.5));
        assert_eq!(img.opacity, 0.4);
        assert_eq!(img.source_bounds, Rect::new(10, 20, 2, 2));
        assert_eq!(img.pixels.size(), Size::new(2, 2));
    }

    #[test]
    fn placement_round_trips_to_document_coordinates() {
        let doc = Document::new(Size::new(1920, 1080)).with(RasterLayer::new("r", 333, -77, px(3, 5)));
        let c = compose(&doc, Size::new(1000, 700), &ComposeOptions::default()).unwrap();
        let s = c.scale();
        let img = c.placements[0].as_image().unwrap();
        assert!((s.invert(img.left) - 333.0).abs() < 1e-9);
        assert!((s.invert(img.top) + 77.0).abs() < 1e-9);
        let scaled_w = img.source_bounds.width as f64 * img.scale_x;
        assert!((s.invert(scaled_w) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn raster_without_pixels_is_skipped_and_siblings_continue() {
        let doc = Document::new(Size::new(100, 100))
            .with(raster("a"))
            .with(RasterLayer::empty("empty", Rect::new(0, 0, 5, 5)))
            .with(raster("c"));
        let c = run(&doc);
        assert_eq!(names(&c), ["a", "c"]);
        assert_eq!(c.skipped.len(), 1);
        assert_eq!(c.skipped[0].name, "empty");
        assert_eq!(c.skipped[0].reason, SkipReason::MissingPixels);
    }

    // ── text placements ─────────────────────────────────────────────────

    #[test]
    fn text_uses_defaults_when_style_unset() {
        let doc = Document::new(Size::new(1000, 1000)).with(TextLayer::new("t", 100, 50, "Hello"));
        let c = run(&doc);
        let t = c.placements[0].as_text().unwrap();
        assert_eq!((t.left, t.top), (50.0, 25.0));
        assert_eq!(t.text, "Hello");
        assert_eq!(t.font_family, "Arial");
        assert_eq!(t.font_size_px, 6.0);
        assert_eq!(t.color, Color::BLACK);
        assert_eq!(t.scale, 0.5);
        assert!(!t.selectable);
    }

    #[test]
    fn text_style_is_scaled() {
        let style = TextStyle {
            font_family: Some("Noto Sans".into()),
            font_size_pt: Some(48.0),
            fill: Some(Color::rgb(255, 0, 0)),
        };
        let doc = Document::new(Size::new(2000, 1000))
            .with(TextLayer::new("t", 0, 0, "x").style(style));
        let c = run(&doc);
        let t = c.placements[0].as_text().unwrap();
        assert_eq!(t.font_family, "Noto Sans");
        assert_eq!(t.font_size_px, 12.0);
        assert_eq!(t.color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn missing_text_is_empty_string() {
        let mut layer = TextLayer::new("t", 0, 0, "");
        layer.text = None;
        let c = run(&Document::new(Size::new(10, 10)).with(layer));
        assert_eq!(c.placements[0].as_text().unwrap().text, "");
    }

    #[test]
    fn unreadable_style_is_skipped() {
        let mut layer = TextLayer::new("bad", 0, 0, "x");
        layer.style = Err(StyleError::FontSize(-1.0));
        let doc = Document::new(Size::new(10, 10)).with(layer).with(raster("after"));
        let c = run(&doc);
        assert_eq!(names(&c), ["after"]);
        assert_eq!(
            c.skipped[0].reason,
            SkipReason::UnreadableStyle(StyleError::FontSize(-1.0))
        );
    }

    // ── traversal ───────────────────────────────────────────────────────

    #[test]
    fn hidden_group_prunes_subtree() {
        let doc = Document::new(Size::new(100, 100)).with(
            Group::new("g")
                .hidden(true)
                .with(raster("inside"))
                .with(Group::new("deeper").with(raster("deep"))),
        );
        let c = run(&doc);
        assert!(c.placements.is_empty());
        assert!(c.skipped.is_empty());
        assert_eq!(c.hidden, 1);
    }

    #[test]
    fn hidden_leaf_skips_only_itself() {
        let doc = Document::new(Size::new(100, 100))
            .with(raster("a"))
            .with(raster("b").hidden(true))
            .with(TextLayer::new("c", 0, 0, "c"));
        let c = run(&doc);
        assert_eq!(names(&c), ["a", "c"]);
        assert_eq!(c.hidden, 1);
    }

    #[test]
    fn nested_groups_flatten_depth_first() {
        let doc = Document::new(Size::new(100, 100))
            .with(raster("a"))
            .with(
                Group::new("g1")
                    .with(raster("b1"))
                    .with(Group::new("g2").with(raster("b2")).with(raster("b3")))
                    .with(raster("b4")),
            )
            .with(raster("c"));
        let c = run(&doc);
        assert_eq!(names(&c), ["a", "b1", "b2", "b3", "b4", "c"]);
    }

    #[test]
    fn depth_limit_is_fatal() {
        let mut node: DocumentNode = raster("leaf").into();
        for i in 0..5 {
            node = Group::new(alloc::format!("g{i}")).with(node).into();
        }
        let doc = Document::new(Size::new(10, 10)).with(node);
        let ok = ComposeOptions::new().max_depth(6);
        assert_eq!(compose(&doc, Size::new(10, 10), &ok).unwrap().placements.len(), 1);

        let tight = ComposeOptions::new().max_depth(5);
        let err = compose(&doc, Size::new(10, 10), &tight).unwrap_err();
        assert_eq!(*err.error(), ComposeError::DepthLimit { limit: 5 });
    }

    #[test]
    fn node_limit_is_fatal() {
        let mut doc = Document::new(Size::new(10, 10));
        for i in 0..10 {
            doc = doc.with(raster(&alloc::format!("r{i}")));
        }
        let err = compose(&doc, Size::new(10, 10), &ComposeOptions::new().max_nodes(9)).unwrap_err();
        assert_eq!(*err.error(), ComposeError::NodeLimit { limit: 9 });
        assert!(compose(&doc, Size::new(10, 10), &ComposeOptions::new().max_nodes(10)).is_ok());
    }

    // ── surface policy ──────────────────────────────────────────────────

    #[test]
    fn keep_policy_offsets_placements() {
        let doc = Document::new(Size::new(1000, 500)).with(RasterLayer::new("r", 0, 0, px(1, 1)));
        let options = ComposeOptions::new().surface_policy(SurfacePolicy::Keep);
        let c = compose(&doc, Size::new(400, 300), &options).unwrap();
        let img = c.placements[0].as_image().unwrap();
        assert_eq!((img.left, img.top), (0.0, 50.0));
        assert_eq!(c.surface_size(), Size::new(400, 300));
        assert_eq!(c.canvas_origin(), (0, 50));
        assert_eq!(c.viewport.canvas, Size::new(400, 200));
    }

    #[test]
    fn resized_surface_matches_scaled_document() {
        let doc = Document::new(Size::new(1200, 400))
            .with(RasterLayer::new("wide", 0, 0, px(1200, 400)));
        let c = compose(&doc, Size::new(100, 33), &ComposeOptions::default()).unwrap();
        let s = c.scale().factor();
        assert_eq!(c.surface_size(), Size::new(99, 33));
        assert_eq!(c.surface_size().width as f64, (1200.0 * s).round());

        let img = c.placements[0].as_image().unwrap();
        let right = img.left + img.source_bounds.width as f64 * img.scale_x;
        assert!((right - c.surface_size().width as f64).abs() < 0.5);
    }

    #[test]
    fn keep_policy_centers_scaled_document() {
        let doc = Document::new(Size::new(1200, 400));
        let options = ComposeOptions::new().surface_policy(SurfacePolicy::Keep);
        let c = compose(&doc, Size::new(102, 33), &options).unwrap();
        assert_eq!(c.viewport.canvas, Size::new(99, 33));
        assert_eq!(c.canvas_origin(), (1, 0));
    }

    #[derive(Default)]
    struct Recorder {
        size: Size,
        cleared: usize,
        added: Vec<Placement>,
    }

    impl Surface for Recorder {
        fn dimensions(&self) -> Size {
            self.size
        }
        fn set_dimensions(&mut self, size: Size) {
            self.size = size;
        }
        fn add(&mut self, placement: Placement) {
            self.added.push(placement);
        }
        fn clear(&mut self) {
            self.cleared += 1;
            self.added.clear();
        }
    }

    #[test]
    fn compose_onto_resizes_and_adds_in_order() {
        let doc = Document::new(Size::new(1000, 2000))
            .with(raster("bottom"))
            .with(TextLayer::new("top", 0, 0, "t"));
        let mut surface = Recorder {
            size: Size::new(500, 500),
            ..Recorder::default()
        };
        let c = compose_onto(&doc, &mut surface, &ComposeOptions::default()).unwrap();
        assert_eq!(surface.size, Size::new(250, 500));
        assert_eq!(surface.cleared, 1);
        assert_eq!(surface.added, c.placements);
        assert_eq!(surface.added[0].name(), "bottom");
    }

    #[test]
    fn compose_onto_leaves_surface_alone_on_error() {
        let doc = Document::new(Size::new(0, 0)).with(raster("a"));
        let mut surface = Recorder {
            size: Size::new(500, 500),
            ..Recorder::default()
        };
        assert!(compose_onto(&doc, &mut surface, &ComposeOptions::default()).is_err());
        assert_eq!(surface.size, Size::new(500, 500));
        assert_eq!(surface.cleared, 0);
    }
}
