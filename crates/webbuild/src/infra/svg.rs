//! Lossless SVG size optimizer working over the quick-xml event stream.
//!
//! Removes content that never affects rendering: comments, doctype,
//! processing instructions, `<metadata>` subtrees, editor-specific
//! (`sodipodi:` / `inkscape:`) elements and attributes, and whitespace-only
//! text between elements. Whitespace inside text content elements or under
//! `xml:space="preserve"` is visible and kept. Everything else is written
//! back unchanged.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

const EDITOR_PREFIXES: &[&[u8]] = &[
    b"sodipodi:",
    b"inkscape:",
    b"xmlns:sodipodi",
    b"xmlns:inkscape",
];

/// Elements whose character data is rendered, spaces included.
const TEXT_CONTENT_ELEMENTS: &[&[u8]] = &[b"text", b"tspan", b"textPath"];

pub fn optimize_svg(source: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(source);
    let mut writer = Writer::new(Vec::with_capacity(source.len()));
    // Depth inside an element being dropped, zero when emitting.
    let mut skipping = 0usize;
    // One entry per open emitted element: does whitespace text matter here.
    let mut preserving: Vec<bool> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) => {
                if skipping > 0 || is_droppable(&start) {
                    skipping += 1;
                    continue;
                }
                let inherited = preserving.last().copied().unwrap_or(false);
                preserving.push(keeps_whitespace(&start, inherited)?);
                writer.write_event(Event::Start(strip_editor_attributes(&start)?))?;
            }
            Event::End(end) => {
                if skipping > 0 {
                    skipping -= 1;
                    continue;
                }
                preserving.pop();
                writer.write_event(Event::End(end))?;
            }
            Event::Empty(empty) => {
                if skipping > 0 || is_droppable(&empty) {
                    continue;
                }
                writer.write_event(Event::Empty(strip_editor_attributes(&empty)?))?;
            }
            Event::Text(text) => {
                let blank = text.iter().all(u8::is_ascii_whitespace);
                let significant = preserving.last().copied().unwrap_or(false);
                if skipping > 0 || (blank && !significant) {
                    continue;
                }
                writer.write_event(Event::Text(text))?;
            }
            Event::CData(data) if skipping == 0 => writer.write_event(Event::CData(data))?,
            Event::Decl(decl) => writer.write_event(Event::Decl(decl))?,
            Event::Comment(_) | Event::PI(_) | Event::DocType(_) | Event::CData(_) => {}
        }
    }

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn is_droppable(element: &BytesStart<'_>) -> bool {
    let name = element.name();
    let name = name.as_ref();
    name == b"metadata" || EDITOR_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

fn keeps_whitespace(element: &BytesStart<'_>, inherited: bool) -> Result<bool, quick_xml::Error> {
    if TEXT_CONTENT_ELEMENTS.contains(&element.local_name().as_ref()) {
        return Ok(true);
    }
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == b"xml:space" {
            return Ok(attribute.value.as_ref() == b"preserve");
        }
    }
    Ok(inherited)
}

fn strip_editor_attributes(
    element: &BytesStart<'_>,
) -> Result<BytesStart<'static>, quick_xml::Error> {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let mut stripped = BytesStart::new(name);
    for attribute in element.attributes() {
        let attribute = attribute?;
        let key = attribute.key.as_ref();
        if EDITOR_PREFIXES.iter().any(|prefix| key.starts_with(prefix)) {
            continue;
        }
        stripped.push_attribute(attribute);
    }
    Ok(stripped.into_owned())
}
