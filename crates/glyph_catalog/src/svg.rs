//! SVG header probing
//!
//! Only the root `<svg>` element is read: its `width`/`height` attributes give
//! the default render size, with the `viewBox` as a fallback when either is
//! missing or relative.

use crate::{CatalogError, Result, Size};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// CSS pixels per unit for absolute SVG length units
const PX_PER_IN: f64 = 96.0;

/// Read the default render size of an SVG file
pub fn probe_svg_file(path: &Path) -> Result<Size> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    probe_svg_size(&content)
}

/// Read the default render size of an SVG document
pub fn probe_svg_size(xml: &str) -> Result<Size> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if local_name_from_bytes(e.name().as_ref()) == "svg" {
                    return size_from_root(e);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CatalogError::Xml(e)),
            _ => {}
        }
    }

    Err(CatalogError::InvalidSvg("no <svg> root element".to_string()))
}

fn size_from_root(element: &BytesStart<'_>) -> Result<Size> {
    let mut width = None;
    let mut height = None;
    let mut view_box = None;

    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr.unescape_value()?;
        match local_name_from_bytes(attr.key.as_ref()).as_str() {
            "width" => width = parse_length(&value),
            "height" => height = parse_length(&value),
            "viewBox" => view_box = parse_view_box(&value),
            _ => {}
        }
    }

    match (width, height, view_box) {
        (Some(w), Some(h), _) => Ok(Size::new(w, h)),
        (Some(w), None, Some(vb)) if vb.width > 0.0 => Ok(Size::new(w, w * vb.height / vb.width)),
        (None, Some(h), Some(vb)) if vb.height > 0.0 => Ok(Size::new(h * vb.width / vb.height, h)),
        (_, _, Some(vb)) => Ok(vb),
        _ => Err(CatalogError::InvalidSvg(
            "neither width/height nor viewBox present".to_string(),
        )),
    }
}

/// Parse an absolute SVG length into pixels; relative lengths yield `None`
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let split = value
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number: f64 = number.trim().parse().ok()?;

    let factor = match unit {
        "" | "px" => 1.0,
        "in" => PX_PER_IN,
        "pt" => PX_PER_IN / 72.0,
        "pc" => PX_PER_IN / 6.0,
        "mm" => PX_PER_IN / 25.4,
        "cm" => PX_PER_IN / 2.54,
        _ => return None,
    };

    (number > 0.0).then_some(number * factor)
}

fn parse_view_box(value: &str) -> Option<Size> {
    let parts: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .ok()?;

    match parts.as_slice() {
        [_, _, w, h] if *w > 0.0 && *h > 0.0 => Some(Size::new(*w, *h)),
        _ => None,
    }
}

/// Strip a namespace prefix from a qualified name
fn local_name_from_bytes(name: &[u8]) -> String {
    let name = String::from_utf8_lossy(name);
    match name.rfind(':') {
        Some(pos) => name[pos + 1..].to_string(),
        None => name.to_string(),
    }
}
