//! SVG preview of a composition.
//!
//! Draws the surface, the fitted canvas on it, one outlined box per image
//! placement and one text element per text placement, in drawing order,
//! followed by a legend listing every placement and every skipped layer.
//!
//! # Example
//!
//! ```
//! use zenlayers::{compose, ComposeOptions, Document, Size, TextLayer};
//! use zenlayers::svg::render_composition_svg;
//!
//! let doc = Document::new(Size::new(1920, 1080))
//!     .with(TextLayer::new("title", 100, 100, "Hello"));
//! let composition = compose(&doc, Size::new(960, 960), &ComposeOptions::default()).unwrap();
//!
//! let svg = render_composition_svg(&composition);
//! assert!(svg.contains("Hello"));
//! ```

use crate::compose::{Composition, ImagePlacement, Placement, TextPlacement};
use crate::geometry::Size;

/// Maximum pixel width of the preview panel.
const MAX_PANEL_W: f64 = 480.0;
/// Maximum pixel height of the preview panel.
const MAX_PANEL_H: f64 = 360.0;
/// Horizontal margin.
const MARGIN_X: f64 = 50.0;
/// Top and bottom margin.
const MARGIN_TOP: f64 = 30.0;
/// Height of the label area above the panel.
const LABEL_H: f64 = 22.0;
/// Height of one legend row.
const ROW_H: f64 = 16.0;

/// Render a complete SVG document previewing `composition`.
pub fn render_composition_svg(composition: &Composition) -> String {
    let surface = composition.surface_size();
    let (sw, sh, scale) = scale_to_fit(surface);

    let legend = legend_rows(composition);
    let total_w = MAX_PANEL_W + 2.0 * MARGIN_X;
    let total_h = MARGIN_TOP + LABEL_H + MAX_PANEL_H + 10.0 + legend.len() as f64 * ROW_H + MARGIN_TOP;

    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    // Light and dark mode via prefers-color-scheme.
    svg.push_str(r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .skipped { font-size: 11px; fill: #b04040; }
  .outer { fill: #e8e8e8; stroke: #999; stroke-width: 1; }
  .canvas { fill: #ffffff; stroke: #2c6faa; stroke-width: 1.5; }
  .image { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .outer { fill: #2d2d2d; stroke: #555; }
    .canvas { fill: #1e1e1e; stroke: #5a9fd4; }
    .image { fill: #3a72a4; stroke: #5a9fd4; }
  }
</style>
"##);

    let center_x = total_w / 2.0;
    let mut y = MARGIN_TOP;

    let viewport = &composition.viewport;
    svg.push_str(&format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
        center_x,
        y + 14.0,
        escape_xml(&format!(
            "Surface  {}  canvas {}  scale {:.4}",
            surface,
            viewport.canvas,
            viewport.scale.factor()
        ))
    ));
    svg.push('\n');
    y += LABEL_H;

    let panel_x = center_x - sw / 2.0;
    let panel_y = y;

    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="outer" rx="2"/>"#,
        panel_x, panel_y, sw, sh
    ));
    svg.push('\n');

    let (ox, oy) = composition.canvas_origin();
    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="canvas"/>"#,
        panel_x + ox as f64 * scale,
        panel_y + oy as f64 * scale,
        viewport.canvas.width as f64 * scale,
        viewport.canvas.height as f64 * scale
    ));
    svg.push('\n');

    // Placements can extend past the surface.
    svg.push_str(&format!(
        r#"<clipPath id="surface"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/></clipPath>"#,
        panel_x, panel_y, sw, sh
    ));
    svg.push('\n');
    svg.push_str(r#"<g clip-path="url(#surface)">"#);
    svg.push('\n');
    for placement in &composition.placements {
        match placement {
            Placement::Image(image) => push_image(&mut svg, image, panel_x, panel_y, scale),
            Placement::Text(text) => push_text(&mut svg, text, panel_x, panel_y, scale),
        }
    }
    svg.push_str("</g>\n");

    y += MAX_PANEL_H + 10.0;
    for (class, row) in &legend {
        y += ROW_H;
        svg.push_str(&format!(
            r#"<text x="{}" y="{:.1}" class="{}">{}</text>"#,
            MARGIN_X,
            y,
            class,
            escape_xml(row)
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_image(svg: &mut String, image: &ImagePlacement, px: f64, py: f64, scale: f64) {
    let w = image.source_bounds.width as f64 * image.scale_x;
    let h = image.source_bounds.height as f64 * image.scale_y;
    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="image" fill-opacity="{:.3}"><title>{}</title></rect>"#,
        px + image.left * scale,
        py + image.top * scale,
        w * scale,
        h * scale,
        image.opacity,
        escape_xml(&image.name)
    ));
    svg.push('\n');
}

fn push_text(svg: &mut String, text: &TextPlacement, px: f64, py: f64, scale: f64) {
    let size = text.font_size_px * scale;
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="{:.2}" font-family="{}" fill="{}" fill-opacity="{:.3}">{}</text>"#,
        px + text.left * scale,
        py + text.top * scale + size,
        size,
        escape_xml(&text.font_family),
        text.color,
        text.opacity,
        escape_xml(&text.text)
    ));
    svg.push('\n');
}

fn legend_rows(composition: &Composition) -> Vec<(&'static str, String)> {
    let mut rows = Vec::with_capacity(composition.placements.len() + composition.skipped.len());
    for (i, placement) in composition.placements.iter().enumerate() {
        let row = match placement {
            Placement::Image(image) => format!(
                "{i:>3} image {:?} at ({:.1}, {:.1}) {}x{} opacity {:.2}",
                image.name,
                image.left,
                image.top,
                image.source_bounds.width,
                image.source_bounds.height,
                image.opacity
            ),
            Placement::Text(text) => format!(
                "{i:>3} text  {:?} at ({:.1}, {:.1}) {} {:.1}px {}",
                text.name, text.left, text.top, text.font_family, text.font_size_px, text.color
            ),
        };
        rows.push(("annotation", row));
    }
    for skipped in &composition.skipped {
        rows.push((
            "skipped",
            format!("    skipped {:?}: {}", skipped.name, skipped.reason),
        ));
    }
    rows
}

/// Scale a Size to fit within MAX_PANEL_W × MAX_PANEL_H, preserving aspect ratio.
fn scale_to_fit(size: Size) -> (f64, f64, f64) {
    let w = size.width as f64;
    let h = size.height as f64;
    if w == 0.0 || h == 0.0 {
        return (1.0, 1.0, 1.0);
    }
    let scale = (MAX_PANEL_W / w).min(MAX_PANEL_H / h);
    (w * scale, h * scale, scale)
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
