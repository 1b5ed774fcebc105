//! XML parts kept as owned event streams.
//!
//! A part is parsed once into `quick-xml` events. Only the text events of
//! translated runs are ever replaced, in place, so every index recorded
//! during the shape walk stays valid and every other construct is written
//! back exactly as it was read.

use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::errors::DocumentError;

/// Location of an `a:t` element inside a part's event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSlot {
    /// Index of the `a:t` start (or empty) event
    pub start: usize,
    /// Index of the matching end event (equal to `start` for `<a:t/>`)
    pub end: usize,
}

/// Element node over an event stream (local names only)
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub children: Vec<Element>,
}

impl Element {
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Depth-first search for the first descendant with the given name
    pub fn descendant(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }
}

/// One XML part of the package
#[derive(Debug, Clone)]
pub struct XmlPart {
    name: String,
    events: Vec<Event<'static>>,
    dirty: bool,
}

impl XmlPart {
    /// Parse a part without trimming any whitespace
    pub fn parse(name: &str, xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        let mut events = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(event) => events.push(event.into_owned()),
                Err(e) => {
                    return Err(DocumentError::Xml {
                        part: name.to_string(),
                        message: format!("at position {}: {}", reader.buffer_position(), e),
                    });
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            events,
            dirty: false,
        })
    }

    /// Part name inside the package (e.g. `ppt/slides/slide1.xml`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether any text was replaced since parsing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Build the element tree for this part
    pub(crate) fn elements(&self) -> Result<Vec<Element>, DocumentError> {
        let mut roots = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        for (index, event) in self.events.iter().enumerate() {
            let element = match event {
                Event::Start(e) => {
                    stack.push(Element {
                        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                        start: index,
                        end: index,
                        children: Vec::new(),
                    });
                    continue;
                }
                Event::Empty(e) => Element {
                    name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                    start: index,
                    end: index,
                    children: Vec::new(),
                },
                Event::End(_) => {
                    let mut open = stack.pop().ok_or_else(|| self.xml_error("unbalanced end tag"))?;
                    open.end = index;
                    open
                }
                _ => continue,
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(element),
                None => roots.push(element),
            }
        }

        if !stack.is_empty() {
            return Err(self.xml_error("unclosed element"));
        }

        Ok(roots)
    }

    /// Unescaped value of an element's attribute, matched by local name
    pub(crate) fn attribute(&self, element: &Element, key: &str) -> Option<String> {
        let start = match self.events.get(element.start)? {
            Event::Start(e) | Event::Empty(e) => e,
            _ => return None,
        };

        start
            .attributes()
            .flatten()
            .find(|attr| attr.key.local_name().as_ref() == key.as_bytes())
            .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
    }

    /// Current unescaped text of an `a:t` slot
    pub fn slot_text(&self, slot: TextSlot) -> Result<String, DocumentError> {
        let mut text = String::new();
        if slot.end <= slot.start {
            return Ok(text);
        }

        for event in &self.events[slot.start + 1..slot.end] {
            match event {
                Event::Text(t) => {
                    let unescaped = t.unescape().map_err(|e| self.xml_error(&e.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c[..])),
                _ => {}
            }
        }

        Ok(text)
    }

    /// Replace the text of an `a:t` slot, leaving every surrounding event untouched
    pub fn replace_slot_text(&mut self, slot: TextSlot, text: &str) -> Result<(), DocumentError> {
        let first_text = (slot.start + 1..slot.end)
            .find(|&i| matches!(self.events[i], Event::Text(_) | Event::CData(_)))
            .ok_or_else(|| self.xml_error("run has no text node to replace"))?;

        self.events[first_text] = Event::Text(BytesText::new(text).into_owned());
        for index in first_text + 1..slot.end {
            if matches!(self.events[index], Event::Text(_) | Event::CData(_)) {
                self.events[index] = Event::Text(BytesText::new(""));
            }
        }

        self.dirty = true;
        Ok(())
    }

    /// Serialize the events back into XML bytes
    pub fn to_xml(&self) -> Result<Vec<u8>, DocumentError> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.events {
            writer
                .write_event(event.clone())
                .map_err(|e| self.xml_error(&e.to_string()))?;
        }
        Ok(writer.into_inner())
    }

    fn xml_error(&self, message: &str) -> DocumentError {
        DocumentError::Xml {
            part: self.name.clone(),
            message: message.to_string(),
        }
    }
}
