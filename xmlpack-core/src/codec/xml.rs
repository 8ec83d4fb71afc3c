//! Markup form of a record:
//!
//! ```text
//! <root>
//!   <var name="id" value="…"/>
//!   <var name="level" value="…"/>
//!   <objects><object name="…"/>…</objects>
//! </root>
//! ```
//!
//! Written without whitespace or an XML declaration.

use super::DocumentCodec;
use crate::domain::{ParsedRecord, Record};
use crate::error::{Result, XmlpackError};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

const ROOT: &str = "root";
const VAR: &str = "var";
const OBJECTS: &str = "objects";
const OBJECT: &str = "object";

pub struct XmlCodec;

fn emit(w: &mut Writer<Vec<u8>>, ev: Event<'_>) -> Result<()> {
    w.write_event(ev)
        .map_err(|e| XmlpackError::Encode(e.to_string()))
}

/// Only whitespace may surround the root element.
fn outside_root(depth: usize, content: &[u8]) -> Result<()> {
    if depth == 0 && !content.iter().all(u8::is_ascii_whitespace) {
        return Err(XmlpackError::malformed("content outside root element"));
    }
    Ok(())
}

fn attr(e: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
    let found = e
        .try_get_attribute(key)
        .map_err(|err| XmlpackError::malformed(format!("bad attribute: {err}")))?;
    match found {
        Some(a) => {
            let v = a
                .unescape_value()
                .map_err(|err| XmlpackError::malformed(format!("bad attribute value: {err}")))?;
            Ok(Some(v.into_owned()))
        }
        None => Ok(None),
    }
}

/// Accumulates fields while the document is streamed.
#[derive(Default)]
struct Scan {
    root_seen: bool,
    id: Option<String>,
    level: Option<String>,
    objects_seen: bool,
    /// Depth of the open `objects` container, while inside it.
    objects_open: Option<usize>,
    object_names: Vec<String>,
}

impl Scan {
    /// `depth` is 1 for the root element.
    fn open(&mut self, e: &BytesStart<'_>, depth: usize, self_closing: bool) -> Result<()> {
        let name = e.name();
        let name = name.as_ref();

        if depth == 1 {
            if self.root_seen {
                return Err(XmlpackError::malformed("more than one root element"));
            }
            self.root_seen = true;
            return Ok(());
        }

        if name == VAR.as_bytes() {
            let slot = match attr(e, "name")?.as_deref() {
                Some("id") => &mut self.id,
                Some("level") => &mut self.level,
                _ => return Ok(()),
            };
            if slot.is_none() {
                let value = attr(e, "value")?
                    .ok_or_else(|| XmlpackError::malformed("var entry without value"))?;
                *slot = Some(value);
            }
        } else if depth == 2 && name == OBJECTS.as_bytes() && !self.objects_seen {
            self.objects_seen = true;
            if !self_closing {
                self.objects_open = Some(depth);
            }
        } else if name == OBJECT.as_bytes() && self.objects_open.is_some_and(|d| depth > d) {
            let n = attr(e, "name")?
                .ok_or_else(|| XmlpackError::malformed("object without name"))?;
            self.object_names.push(n);
        }
        Ok(())
    }

    fn close(&mut self, depth: usize) {
        if self.objects_open == Some(depth) {
            self.objects_open = None;
        }
    }

    fn finish(self) -> Result<ParsedRecord> {
        if !self.root_seen {
            return Err(XmlpackError::malformed("document has no root element"));
        }
        let id = self
            .id
            .ok_or_else(|| XmlpackError::malformed("missing id entry"))?;
        let level = self
            .level
            .ok_or_else(|| XmlpackError::malformed("missing level entry"))?;
        if !self.objects_seen {
            return Err(XmlpackError::malformed("missing objects container"));
        }
        Ok(ParsedRecord {
            id,
            level,
            object_names: self.object_names,
        })
    }
}

impl DocumentCodec for XmlCodec {
    fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        let mut w = Writer::new(Vec::with_capacity(256 + 64 * record.objects.len()));
        let level = record.level.to_string();

        emit(&mut w, Event::Start(BytesStart::new(ROOT)))?;
        emit(
            &mut w,
            Event::Empty(
                BytesStart::new(VAR).with_attributes([("name", "id"), ("value", record.id.as_str())]),
            ),
        )?;
        emit(
            &mut w,
            Event::Empty(
                BytesStart::new(VAR).with_attributes([("name", "level"), ("value", level.as_str())]),
            ),
        )?;
        emit(&mut w, Event::Start(BytesStart::new(OBJECTS)))?;
        for name in record.object_names() {
            emit(
                &mut w,
                Event::Empty(BytesStart::new(OBJECT).with_attributes([("name", name)])),
            )?;
        }
        emit(&mut w, Event::End(BytesEnd::new(OBJECTS)))?;
        emit(&mut w, Event::End(BytesEnd::new(ROOT)))?;

        Ok(w.into_inner())
    }

    fn decode(&self, doc: &[u8]) -> Result<ParsedRecord> {
        let mut reader = Reader::from_reader(doc);
        let mut scan = Scan::default();
        let mut depth = 0usize;

        loop {
            let ev = reader
                .read_event()
                .map_err(|e| XmlpackError::malformed(format!("xml: {e}")))?;
            match ev {
                Event::Start(e) => {
                    depth += 1;
                    scan.open(&e, depth, false)?;
                }
                Event::Empty(e) => scan.open(&e, depth + 1, true)?,
                Event::End(_) => {
                    scan.close(depth);
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| XmlpackError::malformed("unbalanced end tag"))?;
                }
                Event::Text(t) => outside_root(depth, &t)?,
                Event::CData(t) => outside_root(depth, &t)?,
                Event::Eof => break,
                _ => {}
            }
        }
        if depth != 0 {
            return Err(XmlpackError::malformed("unclosed element at end of document"));
        }
        scan.finish()
    }
}
