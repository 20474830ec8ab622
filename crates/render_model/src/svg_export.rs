//! SVG Export - Serialize a scene as a standalone SVG document
//!
//! Glyphs become `<image>` references to their source files, connectors become
//! `<line>` elements, and outlines become unfilled `<rect>` elements. Hidden
//! items are left out.

use crate::{CanvasItem, Color, ItemKind, LineCap, RenderError, Result, SceneCanvas};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;
use std::path::Path;

const SVG_NS_URI: &str = "http://www.w3.org/2000/svg";

/// Writer for converting a scene into SVG markup
pub struct SvgExporter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> SvgExporter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
        }
    }

    /// Write the whole scene as one `<svg>` document
    pub fn write_scene(&mut self, scene: &SceneCanvas) -> Result<()> {
        let rect = scene.scene_rect();

        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("svg");
        root.push_attribute(("xmlns", SVG_NS_URI));
        root.push_attribute(("width", fmt_num(rect.width).as_str()));
        root.push_attribute(("height", fmt_num(rect.height).as_str()));
        let view_box = format!(
            "{} {} {} {}",
            fmt_num(rect.x),
            fmt_num(rect.y),
            fmt_num(rect.width),
            fmt_num(rect.height)
        );
        root.push_attribute(("viewBox", view_box.as_str()));
        self.event(Event::Start(root))?;

        for item in scene.iter().filter(|item| item.visible) {
            self.write_item(item)?;
        }

        self.event(Event::End(BytesEnd::new("svg")))
    }

    fn write_item(&mut self, item: &CanvasItem) -> Result<()> {
        let element = match &item.kind {
            ItemKind::Glyph { image, .. } => {
                let bounds = item.bounds();
                let href = image.source.display().to_string();
                let mut elem = BytesStart::new("image");
                elem.push_attribute(("href", href.as_str()));
                elem.push_attribute(("x", fmt_num(bounds.x).as_str()));
                elem.push_attribute(("y", fmt_num(bounds.y).as_str()));
                elem.push_attribute(("width", fmt_num(bounds.width).as_str()));
                elem.push_attribute(("height", fmt_num(bounds.height).as_str()));
                elem
            }
            ItemKind::Line { to, stroke } => {
                let mut elem = BytesStart::new("line");
                elem.push_attribute(("x1", fmt_num(item.position.x).as_str()));
                elem.push_attribute(("y1", fmt_num(item.position.y).as_str()));
                elem.push_attribute(("x2", fmt_num(to.x).as_str()));
                elem.push_attribute(("y2", fmt_num(to.y).as_str()));
                push_stroke(&mut elem, stroke.color, stroke.width);
                elem.push_attribute(("stroke-linecap", line_cap_name(stroke.cap)));
                elem
            }
            ItemKind::Rect { size, style } => {
                let mut elem = BytesStart::new("rect");
                elem.push_attribute(("x", fmt_num(item.position.x).as_str()));
                elem.push_attribute(("y", fmt_num(item.position.y).as_str()));
                elem.push_attribute(("width", fmt_num(size.0).as_str()));
                elem.push_attribute(("height", fmt_num(size.1).as_str()));
                let fill = style.fill.map(|c| c.to_hex()).unwrap_or_else(|| "none".to_string());
                elem.push_attribute(("fill", fill.as_str()));
                push_stroke(&mut elem, style.stroke.color, style.stroke.width);
                elem
            }
        };

        self.event(Event::Empty(element))
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| RenderError::ExportFailed(e.to_string()))
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// Serialize a scene into an SVG string
pub fn export_svg(scene: &SceneCanvas) -> Result<String> {
    let mut exporter = SvgExporter::new(Vec::new());
    exporter.write_scene(scene)?;
    String::from_utf8(exporter.into_inner()).map_err(|e| RenderError::ExportFailed(e.to_string()))
}

/// Serialize a scene into an SVG file
pub fn write_svg_file(scene: &SceneCanvas, path: &Path) -> Result<()> {
    let svg = export_svg(scene)?;
    std::fs::write(path, svg)?;
    Ok(())
}

fn push_stroke(elem: &mut BytesStart<'_>, color: Color, width: f64) {
    elem.push_attribute(("stroke", color.to_hex().as_str()));
    elem.push_attribute(("stroke-width", fmt_num(width).as_str()));
    if color.a != 255 {
        let opacity = fmt_num(color.a as f64 / 255.0);
        elem.push_attribute(("stroke-opacity", opacity.as_str()));
    }
}

fn line_cap_name(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
        LineCap::Square => "square",
    }
}

/// Format a coordinate with at most three decimals and no trailing zeros
fn fmt_num(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
