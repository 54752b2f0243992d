use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::value::{Map, Value, ATTRIBUTE_PREFIX, TEXT_KEY};
use crate::XmlMapError;

/// Parse an XML document into a [`Value`] tree.
///
/// The returned tree is a one-entry mapping keyed by the root tag name. Tag
/// and attribute names are kept exactly as written, namespace prefixes
/// included; no namespace resolution or validation is performed, so a
/// document may use a prefix it never declares.
pub fn parse(xml: &str) -> Result<Value, XmlMapError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| XmlMapError::Malformed(err.to_string()))?;
        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlMapError::TrailingContent);
                }
                stack.push(Frame::open(&start)?);
            }
            Event::Empty(start) => {
                let closed = Frame::open(&start)?.close();
                attach(&mut stack, &mut root, closed)?;
            }
            Event::End(_) => {
                // quick-xml rejects mismatched end tags before we see them
                let Some(frame) = stack.pop() else {
                    return Err(XmlMapError::Malformed("unexpected end tag".to_owned()));
                };
                attach(&mut stack, &mut root, frame.close())?;
            }
            Event::Text(text) => {
                let chunk = text
                    .unescape()
                    .map_err(|err| XmlMapError::Malformed(err.to_string()))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&chunk),
                    None if chunk.trim().is_empty() => {}
                    None if root.is_some() => return Err(XmlMapError::TrailingContent),
                    None => {
                        return Err(XmlMapError::Malformed(
                            "character data outside of the document element".to_owned(),
                        ))
                    }
                }
            }
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                let chunk = std::str::from_utf8(&bytes)
                    .map_err(|err| XmlMapError::Malformed(err.to_string()))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(chunk),
                    None => {
                        return Err(XmlMapError::Malformed(
                            "CDATA outside of the document element".to_owned(),
                        ))
                    }
                }
            }
            Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(XmlMapError::UnclosedElement(frame.name));
    }
    match root {
        Some((name, value)) => {
            let mut document = Map::new();
            document.insert(name, value);
            Ok(Value::Map(document))
        }
        None => Err(XmlMapError::NoRootElement),
    }
}

/// Element whose end tag has not been seen yet.
struct Frame {
    name: String,
    content: Map,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlMapError> {
        let name = qualified_name(start.name().into_inner())?;
        let mut content = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|err| XmlMapError::Malformed(err.to_string()))?;
            let key = format!(
                "{ATTRIBUTE_PREFIX}{}",
                qualified_name(attribute.key.into_inner())?
            );
            let value = attribute
                .unescape_value()
                .map_err(|err| XmlMapError::Malformed(err.to_string()))?
                .into_owned();
            content.insert(key, Value::Text(value));
        }
        Ok(Self {
            name,
            content,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let Self {
            name,
            mut content,
            text,
        } = self;
        let text = text.trim();
        let value = if content.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::Text(text.to_owned())
            }
        } else {
            if !text.is_empty() {
                content.insert(TEXT_KEY.to_owned(), Value::Text(text.to_owned()));
            }
            Value::Map(content)
        };
        (name, value)
    }
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
    closed: (String, Value),
) -> Result<(), XmlMapError> {
    let (name, value) = closed;
    match stack.last_mut() {
        Some(parent) => {
            parent.content.insert(name, value);
            Ok(())
        }
        None if root.is_some() => Err(XmlMapError::TrailingContent),
        None => {
            *root = Some((name, value));
            Ok(())
        }
    }
}

fn qualified_name(raw: &[u8]) -> Result<String, XmlMapError> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|err| XmlMapError::Malformed(err.to_string()))
}
