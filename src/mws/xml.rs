//! Converts MWS XML payloads into a nested `serde_json::Value` tree.
//!
//! Conversion rules:
//! - element names keep their namespace prefix (`ns2:Title`)
//! - attributes become string entries of the element object
//! - repeated child elements collapse into an array
//! - a text-only element without attributes becomes a plain string
//! - text of an element that also has attributes or children goes under `$t`
//! - an element with neither becomes an empty object

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};
use thiserror::Error;

/// Key holding element text when the element also has attributes or children.
pub const TEXT_KEY: &str = "$t";

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("Malformed XML at position {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("Unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    #[error("Unclosed element <{0}>")]
    Unclosed(String),

    #[error("Document has no root element")]
    Empty,
}

struct Frame {
    name: String,
    entries: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, position: u64) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut entries = Map::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| syntax(position, e))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| syntax(position, e))?;
            entries.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self { name, entries, text: String::new() })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.entries.is_empty() && !text.is_empty() {
            Value::String(text.to_string())
        } else {
            let mut entries = self.entries;
            if !text.is_empty() {
                entries.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
            }
            Value::Object(entries)
        };
        (self.name, value)
    }
}

fn syntax(position: u64, err: impl std::fmt::Display) -> XmlError {
    XmlError::Syntax { position, message: err.to_string() }
}

/// Inserts a child, turning repeated names into arrays.
fn insert_child(entries: &mut Map<String, Value>, name: String, value: Value) {
    match entries.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            entries.insert(name, value);
        }
    }
}

/// Parses an XML document into a tree keyed by the root element's name.
pub fn to_tree(xml: &str) -> Result<Value, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Map<String, Value>> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader.read_event().map_err(|e| syntax(position, e))?;

        match event {
            Event::Start(start) => stack.push(Frame::open(&start, position)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start, position)?.close();
                attach(&mut stack, &mut root, name, value);
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| syntax(position, e))?;
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let frame = stack.pop().ok_or_else(|| XmlError::UnexpectedClose(name.clone()))?;
                if frame.name != name {
                    return Err(XmlError::UnexpectedClose(name));
                }
                let (name, value) = frame.close();
                attach(&mut stack, &mut root, name, value);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(XmlError::Unclosed(frame.name));
    }

    root.map(Value::Object).ok_or(XmlError::Empty)
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<Map<String, Value>>,
    name: String,
    value: Value,
) {
    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.entries, name, value),
        None => insert_child(root.get_or_insert_with(Map::new), name, value),
    }
}
