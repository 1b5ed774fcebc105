//! OOXML package access: zip entries, relationships and part paths.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::DocumentError;

pub const PRESENTATION_PART: &str = "ppt/presentation.xml";
const NOTES_SLIDE_REL_TYPE: &str = "/notesSlide";

/// A relationship entry from a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// Read-only view over the original package bytes
pub struct Package {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl Package {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DocumentError> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DocumentError::Archive(format!("not a valid .pptx package: {}", e)))?;
        Ok(Self { archive })
    }

    /// Read a part as UTF-8, `None` if the package has no such entry
    pub fn read_part(&mut self, name: &str) -> Result<Option<String>, DocumentError> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut xml = String::new();
        file.read_to_string(&mut xml)
            .map_err(|e| DocumentError::Archive(format!("failed to read {}: {}", name, e)))?;
        Ok(Some(xml))
    }

    /// Read a part that must exist
    pub fn require_part(&mut self, name: &str) -> Result<String, DocumentError> {
        self.read_part(name)?
            .ok_or_else(|| DocumentError::MissingPart(name.to_string()))
    }

    /// Relationships of a part, empty when it has no `.rels`
    pub fn relationships(&mut self, part_name: &str) -> Result<Vec<Relationship>, DocumentError> {
        let rels_name = rels_path(part_name);
        match self.read_part(&rels_name)? {
            Some(xml) => parse_relationships(&rels_name, &xml),
            None => Ok(Vec::new()),
        }
    }

    /// Slide part names in presentation order
    pub fn slide_parts(&mut self) -> Result<Vec<String>, DocumentError> {
        let presentation = self.require_part(PRESENTATION_PART)?;
        let rels: HashMap<String, Relationship> = self
            .relationships(PRESENTATION_PART)?
            .into_iter()
            .map(|rel| (rel.id.clone(), rel))
            .collect();

        let mut slides = Vec::new();
        for rel_id in slide_rel_ids(&presentation)? {
            let rel = rels
                .get(&rel_id)
                .ok_or_else(|| DocumentError::MissingPart(format!("relationship {} of {}", rel_id, PRESENTATION_PART)))?;
            slides.push(resolve_target(PRESENTATION_PART, &rel.target));
        }

        Ok(slides)
    }

    /// Notes page of a slide, if it has one
    pub fn notes_part(&mut self, slide_part: &str) -> Result<Option<String>, DocumentError> {
        Ok(self
            .relationships(slide_part)?
            .into_iter()
            .find(|rel| !rel.external && rel.rel_type.ends_with(NOTES_SLIDE_REL_TYPE))
            .map(|rel| resolve_target(slide_part, &rel.target)))
    }

    /// Rewrite the package, replacing the listed parts and copying every other entry raw
    pub fn rewrite(mut self, replaced: &HashMap<String, Vec<u8>>) -> Result<Vec<u8>, DocumentError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for index in 0..self.archive.len() {
            let file = self.archive.by_index_raw(index)?;
            match replaced.get(file.name()) {
                Some(content) => {
                    let name = file.name().to_string();
                    drop(file);
                    writer.start_file(name, options)?;
                    writer
                        .write_all(content)
                        .map_err(|e| DocumentError::Archive(e.to_string()))?;
                }
                None => writer.raw_copy_file(file)?,
            }
        }

        Ok(writer.finish()?.into_inner())
    }
}

/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
pub fn rels_path(part_name: &str) -> String {
    match part_name.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_name),
    }
}

/// Resolve a relationship target against the part that owns the relationship
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

fn parse_relationships(part_name: &str, xml: &str) -> Result<Vec<Relationship>, DocumentError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"Relationship" => {
                let id = attribute(&e, b"Id").unwrap_or_default();
                let target = attribute(&e, b"Target").unwrap_or_default();
                if id.is_empty() || target.is_empty() {
                    continue;
                }
                rels.push(Relationship {
                    id,
                    rel_type: attribute(&e, b"Type").unwrap_or_default(),
                    target,
                    external: attribute(&e, b"TargetMode").is_some_and(|m| m == "External"),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::Xml {
                    part: part_name.to_string(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(rels)
}

// `p:sldId` entries of `p:sldIdLst`, in order; the relationship id is the
// namespaced `r:id` attribute, not the numeric `id`
fn slide_rel_ids(presentation_xml: &str) -> Result<Vec<String>, DocumentError> {
    let mut reader = Reader::from_str(presentation_xml);
    reader.config_mut().trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sldId" => {
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some())
                    .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()));
                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::Xml {
                    part: PRESENTATION_PART.to_string(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(ids)
}
