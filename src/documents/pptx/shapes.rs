//! Shape tree classification.
//!
//! Every shape of a slide (or notes page) is classified once, when the part
//! is loaded, into a closed set of kinds. The walker then dispatches on the
//! kind instead of probing elements again.

use super::part::{Element, TextSlot, XmlPart};
use crate::errors::DocumentError;

/// A shape on a slide or notes page
#[derive(Debug, Clone)]
pub struct Shape {
    /// `name` of the shape's `p:cNvPr`, empty when absent
    pub name: String,
    /// What the shape holds
    pub kind: ShapeKind,
}

/// Closed set of shape kinds relevant to translation
#[derive(Debug, Clone)]
pub enum ShapeKind {
    /// `p:grpSp`: child shapes in document order, no text of its own
    Group(Vec<Shape>),
    /// `p:graphicFrame` holding an `a:tbl`: rows of cell text bodies
    Table(Vec<Vec<TextBody>>),
    /// `p:sp` with a `p:txBody`
    TextContainer(TextBody),
    /// Pictures, connectors, charts, SmartArt, shapes without text
    Other,
}

/// Paragraphs of a text container or table cell
#[derive(Debug, Clone, Default)]
pub struct TextBody {
    pub paragraphs: Vec<Paragraph>,
}

/// One `a:p` paragraph
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

/// One `a:r` run
#[derive(Debug, Clone)]
pub struct Run {
    /// Text as loaded
    pub text: String,
    /// Where the run's `a:t` lives in the part
    pub slot: Option<TextSlot>,
}

impl ShapeKind {
    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Group(_) => "group",
            Self::Table(_) => "table",
            Self::TextContainer(_) => "text",
            Self::Other => "other",
        }
    }
}

/// Classify the shapes of the first `p:spTree` found in a part
pub fn parse_shape_tree(part: &XmlPart) -> Result<Vec<Shape>, DocumentError> {
    let roots = part.elements()?;
    let tree = roots.iter().find_map(|root| {
        if root.name == "spTree" {
            Some(root)
        } else {
            root.descendant("spTree")
        }
    });

    match tree {
        Some(tree) => shapes_in(tree, part),
        None => Ok(Vec::new()),
    }
}

fn shapes_in(container: &Element, part: &XmlPart) -> Result<Vec<Shape>, DocumentError> {
    let mut shapes = Vec::new();

    for child in &container.children {
        let kind = match child.name.as_str() {
            "sp" => match child.child("txBody") {
                Some(body) => ShapeKind::TextContainer(text_body(body, part)?),
                None => ShapeKind::Other,
            },
            "grpSp" => ShapeKind::Group(shapes_in(child, part)?),
            // Charts, diagrams and OLE objects also live in graphic frames;
            // only a frame that actually holds a table is one.
            "graphicFrame" => match child.descendant("tbl") {
                Some(table) => ShapeKind::Table(table_cells(table, part)?),
                None => ShapeKind::Other,
            },
            "pic" | "cxnSp" | "contentPart" => ShapeKind::Other,
            _ => continue,
        };
        shapes.push(Shape {
            name: shape_name(child, part),
            kind,
        });
    }

    Ok(shapes)
}

// Every shape kind carries its `cNvPr` in a leading `nv*Pr` child
fn shape_name(shape: &Element, part: &XmlPart) -> String {
    shape
        .children
        .iter()
        .find(|c| c.name.starts_with("nv"))
        .and_then(|nv| nv.child("cNvPr"))
        .and_then(|c_nv_pr| part.attribute(c_nv_pr, "name"))
        .unwrap_or_default()
}

fn table_cells(table: &Element, part: &XmlPart) -> Result<Vec<Vec<TextBody>>, DocumentError> {
    table
        .children_named("tr")
        .map(|row| {
            row.children_named("tc")
                .map(|cell| match cell.child("txBody") {
                    Some(body) => text_body(body, part),
                    None => Ok(TextBody::default()),
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

fn text_body(body: &Element, part: &XmlPart) -> Result<TextBody, DocumentError> {
    let mut paragraphs = Vec::new();

    for p in body.children_named("p") {
        let mut runs = Vec::new();
        for r in p.children_named("r") {
            let slot = r.child("t").map(|t| TextSlot { start: t.start, end: t.end });
            let text = match slot {
                Some(slot) => part.slot_text(slot)?,
                None => String::new(),
            };
            runs.push(Run { text, slot });
        }
        paragraphs.push(Paragraph { runs });
    }

    Ok(TextBody { paragraphs })
}
