//! SVG builder: accumulates elements into named layer groups and produces
//! the final string.
//!
//! Layers are written in a fixed order, so document order is paint order
//! regardless of the order in which the emitter fills them.

use super::constants::*;

// ═══════════════════════════════════════════════════════════════════════
// Layers
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Layer {
    Background,
    LaneLines,
    MeasureLines,
    BeatLines,
    MeasureNumbers,
    SlidePaths,
    SlideDiamonds,
    Notes,
    CriticalNotes,
    Arrows,
    SpecialEvents,
}

impl Layer {
    pub(super) const ALL: [Layer; 11] = [
        Layer::Background,
        Layer::LaneLines,
        Layer::MeasureLines,
        Layer::BeatLines,
        Layer::MeasureNumbers,
        Layer::SlidePaths,
        Layer::SlideDiamonds,
        Layer::Notes,
        Layer::CriticalNotes,
        Layer::Arrows,
        Layer::SpecialEvents,
    ];

    pub(super) fn id(self) -> &'static str {
        match self {
            Layer::Background => "background",
            Layer::LaneLines => "lane-lines",
            Layer::MeasureLines => "measure-lines",
            Layer::BeatLines => "beat-lines",
            Layer::MeasureNumbers => "measure-numbers",
            Layer::SlidePaths => "slide-paths",
            Layer::SlideDiamonds => "slide-diamonds",
            Layer::Notes => "notes",
            Layer::CriticalNotes => "critical-notes",
            Layer::Arrows => "arrows",
            Layer::SpecialEvents => "special-events",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Marker definitions referenced by event markers: (id, fill).
pub(super) const EVENT_MARKERS: [(&str, &str); 3] = [
    ("skill", SKILL_MARKER_COLOR),
    ("feverStart", FEVER_START_MARKER_COLOR),
    ("feverPrepare", FEVER_PREPARE_MARKER_COLOR),
];

// ═══════════════════════════════════════════════════════════════════════
// SvgBuilder
// ═══════════════════════════════════════════════════════════════════════

pub(super) struct SvgBuilder {
    layers: Vec<Vec<String>>,
    /// Nesting depth of open sub-groups per layer
    depth: Vec<usize>,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    pub(super) fn new(width: f64, height: f64) -> Self {
        Self {
            layers: vec![Vec::new(); Layer::ALL.len()],
            depth: vec![0; Layer::ALL.len()],
            width,
            height,
        }
    }

    pub(super) fn build(self) -> String {
        let mut svg = format!(
            r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');

        svg.push_str("  <defs>\n");
        for (id, fill) in EVENT_MARKERS {
            svg.push_str(&format!(
                r#"    <marker id="{}" viewBox="0 0 10 10" refX="5" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse" fill="{}"><path d="M 0 0 L 10 5 L 0 10 z"/></marker>"#,
                id, fill
            ));
            svg.push('\n');
        }
        svg.push_str("  </defs>\n");

        for (layer, elements) in Layer::ALL.iter().zip(&self.layers) {
            if elements.is_empty() {
                svg.push_str(&format!("  <g id=\"{}\"/>\n", layer.id()));
                continue;
            }
            svg.push_str(&format!("  <g id=\"{}\">\n", layer.id()));
            for el in elements {
                svg.push_str("    ");
                svg.push_str(el);
                svg.push('\n');
            }
            svg.push_str("  </g>\n");
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn push(&mut self, layer: Layer, element: String) {
        let depth = self.depth[layer.index()];
        let mut line = "  ".repeat(depth);
        line.push_str(&element);
        self.layers[layer.index()].push(line);
    }

    /// Open an anonymous sub-group inside a layer.
    pub(super) fn begin_group(&mut self, layer: Layer) {
        self.push(layer, "<g>".to_string());
        self.depth[layer.index()] += 1;
    }

    pub(super) fn end_group(&mut self, layer: Layer) {
        let depth = &mut self.depth[layer.index()];
        *depth = depth.saturating_sub(1);
        self.push(layer, "</g>".to_string());
    }

    pub(super) fn line(&mut self, layer: Layer, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.push(layer, format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
            x1, y1, x2, y2, color, width
        ));
    }

    /// Zero-length stroke carrying a marker at its start.
    pub(super) fn marker_line(&mut self, layer: Layer, x: f64, y: f64, marker: &str, width: f64) {
        self.push(layer, format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke-width="{:.1}" marker-start="url(#{})"/>"#,
            x, y, x, y, width, marker
        ));
    }

    pub(super) fn rect(&mut self, layer: Layer, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        self.push(layer, format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x, y, w, h, fill
        ));
    }

    pub(super) fn text(&mut self, layer: Layer, x: f64, y: f64, content: &str, size: f64, fill: Option<&str>) {
        let escaped = content
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        let fill = fill.map(|f| format!(r#" fill="{}""#, f)).unwrap_or_default();
        self.push(layer, format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{:.0}px"{}>{}</text>"#,
            x, y, size, fill, escaped
        ));
    }

    pub(super) fn path(&mut self, layer: Layer, d: &str, fill: &str) {
        self.push(layer, format!(r#"<path d="{}" fill="{}"/>"#, d, fill));
    }

    /// Sprite reference. Without a height the rasterizer keeps the
    /// sprite's aspect ratio; with one the sprite is stretched to fit.
    pub(super) fn image(&mut self, layer: Layer, href: &str, x: f64, y: f64, w: f64, h: Option<f64>) {
        let href = href.replace('&', "&amp;").replace('"', "&quot;");
        match h {
            Some(h) => self.push(layer, format!(
                r#"<image href="{}" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" preserveAspectRatio="none"/>"#,
                href, x, y, w, h
            )),
            None => self.push(layer, format!(
                r#"<image href="{}" x="{:.1}" y="{:.1}" width="{:.1}"/>"#,
                href, x, y, w
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_are_written_in_paint_order() {
        let mut svg = SvgBuilder::new(100.0, 50.0);
        svg.rect(Layer::CriticalNotes, 0.0, 0.0, 1.0, 1.0, "red");
        svg.rect(Layer::Background, 0.0, 0.0, 100.0, 50.0, "black");
        let out = svg.build();

        let background = out.find(r#"<g id="background">"#).unwrap();
        let critical = out.find(r#"<g id="critical-notes">"#).unwrap();
        assert!(background < critical);
        assert!(out.contains(r#"<g id="arrows"/>"#));
        assert!(out.contains(r#"width="100" height="50""#));
        assert_eq!(out.matches("<marker ").count(), 3);
    }

    #[test]
    fn sub_groups_nest_inside_their_layer() {
        let mut svg = SvgBuilder::new(10.0, 10.0);
        svg.begin_group(Layer::SlidePaths);
        svg.path(Layer::SlidePaths, "M0,0H1z", SLIDE_FILL);
        svg.end_group(Layer::SlidePaths);
        let out = svg.build();
        assert!(out.contains("    <g>\n      <path d=\"M0,0H1z\""));
        assert!(out.contains("    </g>\n  </g>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut svg = SvgBuilder::new(10.0, 10.0);
        svg.text(Layer::MeasureNumbers, 0.0, 0.0, "<1&2>", 12.0, None);
        assert!(svg.build().contains("&lt;1&amp;2&gt;"));
    }
}
