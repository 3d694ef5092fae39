//! SVG preview of a planned sheet.
//!
//! Draws the sheet, every tile cell colored by its source image, the source
//! number in each cell, and label badges where the plan has them. Nothing
//! is decoded or rasterized.
//!
//! # Example
//!
//! ```
//! use photosheet::{SheetOptions, SheetPlan, resolve, svg::render_sheet_svg};
//!
//! let (layout, sheet) = resolve("4x6-10").unwrap();
//! let plan = SheetPlan::new(layout, sheet, 3, &SheetOptions::default()).unwrap();
//!
//! let svg = render_sheet_svg(&plan);
//! assert!(svg.contains("4+3+3"));
//! ```

use crate::geometry::{Rect, Size};
use crate::plan::SheetPlan;

/// Maximum pixel width of the sheet panel.
const MAX_PANEL_W: f64 = 480.0;
/// Maximum pixel height of the sheet panel.
const MAX_PANEL_H: f64 = 480.0;
/// Horizontal margin.
const MARGIN_X: f64 = 30.0;
/// Top and bottom margin.
const MARGIN_TOP: f64 = 20.0;
/// Height of the title above the panel.
const LABEL_H: f64 = 24.0;
/// Height of the annotation below the panel.
const ANNOTATION_H: f64 = 22.0;
/// Distinct tile colors; image indices wrap around.
const PALETTE_LEN: usize = 6;

/// Render a complete SVG document previewing `plan`.
pub fn render_sheet_svg(plan: &SheetPlan) -> String {
    let canvas = plan.canvas();
    let (sw, sh, scale) = scale_to_fit(canvas);
    let total_w = sw.max(MAX_PANEL_W) + 2.0 * MARGIN_X;
    let total_h = MARGIN_TOP + LABEL_H + sh + ANNOTATION_H + MARGIN_TOP;
    let center_x = total_w / 2.0;
    let panel_x = center_x - sw / 2.0;
    let panel_y = MARGIN_TOP + LABEL_H;

    let mut svg = String::with_capacity(256 * (plan.tiles.len() + 8));

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    // Light/dark mode via prefers-color-scheme
    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .sheet { fill: #ffffff; stroke: #999; stroke-width: 1; }
  .tile { stroke: #222; stroke-width: 1; }
  .num { font-size: 12px; fill: #111; }
  .badge { fill: #fff; stroke: #111; stroke-width: 0.5; }
  .img0 { fill: #6ba3d6; } .img1 { fill: #e8a05c; } .img2 { fill: #7cc47f; }
  .img3 { fill: #d67a9a; } .img4 { fill: #a58fd6; } .img5 { fill: #d6c56b; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .sheet { fill: #2d2d2d; stroke: #555; }
    .tile { stroke: #ccc; }
  }
</style>
"##,
    );

    svg.push_str(&format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
        center_x,
        MARGIN_TOP + 14.0,
        escape_xml(&format!(
            "{}  {}  {}×{}",
            plan.layout.key, plan.sheet.label, canvas.width, canvas.height
        ))
    ));
    svg.push('\n');

    push_rect(&mut svg, panel_x, panel_y, sw, sh, "sheet");

    for tile in &plan.tiles {
        let r = scaled(tile.cell, scale);
        let class = format!("tile img{}", tile.image_index % PALETTE_LEN);
        push_rect(&mut svg, panel_x + r.0, panel_y + r.1, r.2, r.3, &class);

        if let Some(badge) = tile.badge {
            let b = scaled(badge.rect, scale);
            push_rect(
                &mut svg,
                panel_x + r.0 + b.0,
                panel_y + r.1 + b.1,
                b.2,
                b.3,
                "badge",
            );
        }

        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" class="num" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            panel_x + r.0 + r.2 / 2.0,
            panel_y + r.1 + r.3 / 2.0,
            tile.image_index + 1
        ));
        svg.push('\n');
    }

    let counts: Vec<String> = plan
        .assignment()
        .counts()
        .iter()
        .map(|c| c.to_string())
        .collect();
    let tile = plan.tile_size();
    svg.push_str(&format!(
        r#"<text x="{}" y="{:.1}" class="annotation" text-anchor="middle">{}</text>"#,
        center_x,
        panel_y + sh + 15.0,
        escape_xml(&format!(
            "{} tiles {}×{}, gap {}, per image {}",
            plan.tiles.len(),
            tile.width,
            tile.height,
            plan.geometry.h_gap,
            counts.join("+")
        ))
    ));
    svg.push('\n');

    svg.push_str("</svg>\n");
    svg
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

fn scaled(r: Rect, scale: f64) -> (f64, f64, f64, f64) {
    (
        r.x as f64 * scale,
        r.y as f64 * scale,
        r.width as f64 * scale,
        r.height as f64 * scale,
    )
}

fn push_rect(svg: &mut String, x: f64, y: f64, w: f64, h: f64, class: &str) {
    svg.push_str(&format!(
        r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" class="{class}"/>"#
    ));
    svg.push('\n');
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
