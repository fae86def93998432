//! Capturable rendering surface.
//!
//! Composes a resolved layout into one standalone SVG document with the
//! current zoom and visibility flags baked in, so the export side can
//! rasterize it as-is.

use seat_core::id::ObjectId;
use seat_core::layout::{PlacedItem, ResolvedLayout, Viewport};
use seat_core::model::{SEAT_DIAMETER, ShapeTag};
use std::fmt::Write as _;

use crate::hit::ROUNDED_RADIUS;

/// Theme-dependent colors for the surface.
#[derive(Debug, Clone)]
pub struct SvgTheme {
    pub bg: &'static str,
    pub seat_fill: &'static str,
    pub seat_stroke: &'static str,
    pub host_stroke: &'static str,
    pub text: &'static str,
    pub badge: &'static str,
    pub selection: &'static str,
}

impl SvgTheme {
    pub fn light() -> Self {
        Self {
            bg: "#F5F5F7",
            seat_fill: "#FFFFFF",
            seat_stroke: "#86868B",
            host_stroke: "#D97706",
            text: "#1D1D1F",
            badge: "#2563EB",
            selection: "#0A84FF",
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: "#1C1C1E",
            seat_fill: "#2C2C2E",
            seat_stroke: "#636366",
            host_stroke: "#F59E0B",
            text: "#F5F5F7",
            badge: "#3B82F6",
            selection: "#0A84FF",
        }
    }
}

impl Default for SvgTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// What a seat shows, aligned index-for-index with `ResolvedLayout::seats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatBadge {
    pub initials: String,
    /// Tooltip text, e.g. "Ana Souza · Acme".
    pub title: String,
    pub is_host: bool,
    pub score: Option<u8>,
    /// `false` renders the seat dimmed and desaturated.
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct SvgOptions {
    pub viewport: Viewport,
    pub zoom: f32,
    pub theme: SvgTheme,
    pub selected: Option<ObjectId>,
}

/// Opacity of seats hidden by the filter.
const DIMMED_OPACITY: f32 = 0.25;

/// Render `layout` to an SVG string.
///
/// `badges` must be aligned with `layout.seats`; a seat without a badge
/// renders as an empty circle.
pub fn render_svg(layout: &ResolvedLayout, badges: &[SeatBadge], options: &SvgOptions) -> String {
    let Viewport { width, height } = options.viewport;
    let zoom = options.zoom;
    let theme = &options.theme;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {width} {height}\" data-format=\"{}\">",
        width * zoom,
        height * zoom,
        layout.format.as_str()
    );
    svg.push_str(
        "<defs><filter id=\"dim\"><feColorMatrix type=\"saturate\" values=\"0\"/></filter></defs>\n",
    );
    svg.push_str("<style>\n  text { font-family: Inter, system-ui, sans-serif; }\n</style>\n");
    let _ = writeln!(
        svg,
        "<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"{}\" />",
        theme.bg
    );

    // Furniture sizes are given at 100% zoom; the outer width/height
    // already scale the whole surface, so pixel footprints stay as-is.
    for item in &layout.items {
        render_item(&mut svg, item, options);
    }

    let r = SEAT_DIAMETER / 2.0;
    for (i, seat) in layout.seats.iter().enumerate() {
        let (cx, cy) = options.viewport.to_pixels(seat.x, seat.y);
        let badge = badges.get(i);
        let visible = badge.is_none_or(|b| b.visible);

        if visible {
            svg.push_str("<g>\n");
        } else {
            let _ = writeln!(svg, "<g opacity=\"{DIMMED_OPACITY}\" filter=\"url(#dim)\">");
        }
        if let Some(b) = badge {
            let _ = writeln!(svg, "  <title>{}</title>", escape(&b.title));
        }
        let stroke = if badge.is_some_and(|b| b.is_host) {
            theme.host_stroke
        } else {
            theme.seat_stroke
        };
        let _ = writeln!(
            svg,
            "  <circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"{}\" stroke=\"{stroke}\" stroke-width=\"2\" />",
            theme.seat_fill
        );
        if let Some(b) = badge {
            let _ = writeln!(
                svg,
                "  <text x=\"{cx}\" y=\"{}\" font-size=\"13\" fill=\"{}\" text-anchor=\"middle\">{}</text>",
                cy + 4.5,
                theme.text,
                escape(&b.initials)
            );
            if let Some(score) = b.score {
                let (bx, by) = (cx + r * 0.75, cy - r * 0.75);
                let _ = writeln!(
                    svg,
                    "  <circle cx=\"{bx}\" cy=\"{by}\" r=\"9\" fill=\"{}\" />",
                    theme.badge
                );
                let _ = writeln!(
                    svg,
                    "  <text x=\"{bx}\" y=\"{}\" font-size=\"9\" fill=\"#FFFFFF\" text-anchor=\"middle\">{score}</text>",
                    by + 3.0
                );
            }
        }
        if seat.object.is_some() && seat.object == options.selected {
            let _ = writeln!(
                svg,
                "  <circle cx=\"{cx}\" cy=\"{cy}\" r=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" stroke-dasharray=\"4 3\" />",
                r + 4.0,
                theme.selection
            );
        }
        svg.push_str("</g>\n");
    }

    svg.push_str("</svg>");
    log::trace!(
        "rendered {} seats, {} items at zoom {zoom}",
        layout.seats.len(),
        layout.items.len()
    );
    svg
}

fn render_item(out: &mut String, item: &PlacedItem, options: &SvgOptions) {
    let (cx, cy) = options.viewport.to_pixels(item.x, item.y);
    let (w, h) = item.size.to_pixels(options.viewport);
    let fill = item.color.to_hex();
    let transform = if item.rotation != 0.0 {
        format!(" transform=\"rotate({} {cx} {cy})\"", item.rotation)
    } else {
        String::new()
    };
    let selected = item.object.is_some() && item.object == options.selected;
    let stroke = if selected {
        format!(" stroke=\"{}\" stroke-width=\"2\"", options.theme.selection)
    } else {
        String::new()
    };

    match item.shape {
        ShapeTag::Circle => {
            let _ = writeln!(
                out,
                "<ellipse cx=\"{cx}\" cy=\"{cy}\" rx=\"{}\" ry=\"{}\" fill=\"{fill}\"{stroke}{transform} />",
                w / 2.0,
                h / 2.0
            );
        }
        ShapeTag::Square | ShapeTag::Rounded => {
            let radius = if item.shape == ShapeTag::Rounded {
                ROUNDED_RADIUS as f32
            } else {
                0.0
            };
            let _ = writeln!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{w}\" height=\"{h}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{fill}\"{stroke}{transform} />",
                cx - w / 2.0,
                cy - h / 2.0
            );
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
