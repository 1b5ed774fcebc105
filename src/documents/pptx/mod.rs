/*!
 * Slide-deck fragment walker.
 *
 * A `Presentation` is loaded from a `.pptx` package: slides in
 * presentation order, each with its classified shape tree and, when the
 * slide has one, its notes page. Collection walks the shape trees depth
 * first and yields one `RunUnit` per non-blank text run; applying writes
 * translations back run for run, and saving rewrites only the parts that
 * changed.
 */

use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::documents::{CollectOptions, TranslatableDocument, TranslatableUnit};
use crate::errors::DocumentError;

pub use self::part::{TextSlot, XmlPart};
pub use self::shapes::{parse_shape_tree, Paragraph, Run, Shape, ShapeKind, TextBody};

use self::package::Package;

pub mod package;
pub mod part;
pub mod shapes;

/// Where a run sits in the deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerPath {
    /// Zero-based slide index in presentation order
    pub slide: usize,
    /// Run belongs to the slide's notes page
    pub notes: bool,
    /// Shape indices from the tree root down through groups
    pub shape_path: Vec<usize>,
    /// Name of the innermost shape holding the run
    pub shape_name: String,
    /// `(row, column)` when the run is inside a table cell
    pub cell: Option<(usize, usize)>,
    pub paragraph: usize,
    pub run: usize,
}

impl fmt::Display for ContainerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slide {}", self.slide + 1)?;
        if self.notes {
            write!(f, " notes")?;
        }
        let shapes: Vec<String> = self.shape_path.iter().map(|i| i.to_string()).collect();
        write!(f, " shape {}", shapes.join("/"))?;
        if !self.shape_name.is_empty() {
            write!(f, " \"{}\"", self.shape_name)?;
        }
        if let Some((row, column)) = self.cell {
            write!(f, " cell {},{}", row, column)?;
        }
        write!(f, " p{} r{}", self.paragraph, self.run)
    }
}

/// A single text run to translate
#[derive(Debug, Clone)]
pub struct RunUnit {
    pub path: ContainerPath,
    /// Index of the owning part in the presentation
    part: usize,
    slot: TextSlot,
    original: String,
}

impl RunUnit {
    /// Text of the run as it was loaded
    pub fn original(&self) -> &str {
        &self.original
    }
}

impl TranslatableUnit for RunUnit {
    fn source_text(&self) -> &str {
        &self.original
    }
}

#[derive(Debug, Clone)]
struct PageShapes {
    part: usize,
    shapes: Vec<Shape>,
}

#[derive(Debug, Clone)]
struct SlideEntry {
    slide: PageShapes,
    notes: Option<PageShapes>,
}

/// A loaded slide deck
#[derive(Debug, Clone)]
pub struct Presentation {
    source: Vec<u8>,
    parts: Vec<XmlPart>,
    slides: Vec<SlideEntry>,
}

impl Presentation {
    /// Load a `.pptx` file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| DocumentError::Archive(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_bytes(bytes)
    }

    /// Load a `.pptx` package from memory
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DocumentError> {
        let mut package = Package::from_bytes(bytes.clone())?;
        let mut parts = Vec::new();
        let mut slides = Vec::new();

        for slide_name in package.slide_parts()? {
            let xml = package.require_part(&slide_name)?;
            let slide = load_page(&mut parts, &slide_name, &xml)?;

            let notes = match package.notes_part(&slide_name)? {
                Some(notes_name) => match package.read_part(&notes_name)? {
                    Some(xml) => Some(load_page(&mut parts, &notes_name, &xml)?),
                    None => {
                        debug!("Notes part {} referenced by {} is missing", notes_name, slide_name);
                        None
                    }
                },
                None => None,
            };

            slides.push(SlideEntry { slide, notes });
        }

        info!("Loaded presentation with {} slides", slides.len());

        Ok(Self {
            source: bytes,
            parts,
            slides,
        })
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Classified shapes of a slide
    pub fn slide_shapes(&self, slide: usize) -> Option<&[Shape]> {
        self.slides.get(slide).map(|s| s.slide.shapes.as_slice())
    }

    /// Classified shapes of a slide's notes page
    pub fn notes_shapes(&self, slide: usize) -> Option<&[Shape]> {
        self.slides
            .get(slide)
            .and_then(|s| s.notes.as_ref())
            .map(|n| n.shapes.as_slice())
    }

    pub fn has_notes(&self, slide: usize) -> bool {
        self.notes_shapes(slide).is_some()
    }

    /// Current text of a unit's run
    pub fn run_text(&self, unit: &RunUnit) -> Result<String, DocumentError> {
        self.parts
            .get(unit.part)
            .ok_or_else(|| DocumentError::MissingPart(format!("part #{} of {}", unit.part, unit.path)))?
            .slot_text(unit.slot)
    }

    /// Current serialized XML of a part, by package name
    pub fn part_xml(&self, name: &str) -> Result<Option<Vec<u8>>, DocumentError> {
        self.parts
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.to_xml())
            .transpose()
    }

    /// Collect every non-blank run, slide by slide
    pub fn collect_runs(&self, include_notes: bool) -> Vec<RunUnit> {
        let mut units = Vec::new();

        for (index, entry) in self.slides.iter().enumerate() {
            let mut walker = Walker {
                slide: index,
                notes: false,
                part: entry.slide.part,
                units: &mut units,
            };
            walker.shapes(&entry.slide.shapes, &mut Vec::new());

            if include_notes {
                if let Some(notes) = &entry.notes {
                    let mut walker = Walker {
                        slide: index,
                        notes: true,
                        part: notes.part,
                        units: &mut units,
                    };
                    walker.shapes(&notes.shapes, &mut Vec::new());
                }
            }
        }

        debug!("Collected {} runs from {} slides", units.len(), self.slides.len());
        units
    }

    /// Overwrite each unit's run with its translation
    pub fn apply_runs(&mut self, units: &[RunUnit], translations: &[String]) -> Result<(), DocumentError> {
        if units.len() != translations.len() {
            return Err(DocumentError::UnitCountMismatch {
                units: units.len(),
                translations: translations.len(),
            });
        }

        for (unit, translation) in units.iter().zip(translations) {
            let part = self
                .parts
                .get_mut(unit.part)
                .ok_or_else(|| DocumentError::MissingPart(format!("part #{} of {}", unit.part, unit.path)))?;
            part.replace_slot_text(unit.slot, translation)?;
        }

        Ok(())
    }

    /// Serialize the package, re-encoding only modified parts
    pub fn package_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut replaced = HashMap::new();
        for part in self.parts.iter().filter(|p| p.is_dirty()) {
            replaced.insert(part.name().to_string(), part.to_xml()?);
        }

        debug!("Rewriting package with {} modified parts", replaced.len());
        Package::from_bytes(self.source.clone())?.rewrite(&replaced)
    }

    /// Write the package to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let path = path.as_ref();
        std::fs::write(path, self.package_bytes()?)
            .map_err(|e| DocumentError::Archive(format!("failed to write {}: {}", path.display(), e)))
    }
}

impl TranslatableDocument for Presentation {
    type Unit = RunUnit;

    fn kind(&self) -> &'static str {
        "presentation"
    }

    fn collect(&self, options: &CollectOptions) -> Vec<RunUnit> {
        self.collect_runs(options.include_notes)
    }

    fn apply(&mut self, units: &[RunUnit], translations: &[String]) -> Result<(), DocumentError> {
        self.apply_runs(units, translations)
    }

    fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        self.package_bytes()
    }
}

fn load_page(parts: &mut Vec<XmlPart>, name: &str, xml: &str) -> Result<PageShapes, DocumentError> {
    let part = XmlPart::parse(name, xml)?;
    let shapes = parse_shape_tree(&part)?;
    parts.push(part);
    Ok(PageShapes {
        part: parts.len() - 1,
        shapes,
    })
}

struct Walker<'a> {
    slide: usize,
    notes: bool,
    part: usize,
    units: &'a mut Vec<RunUnit>,
}

impl Walker<'_> {
    fn shapes(&mut self, shapes: &[Shape], path: &mut Vec<usize>) {
        for (index, shape) in shapes.iter().enumerate() {
            path.push(index);
            match &shape.kind {
                ShapeKind::Group(children) => self.shapes(children, path),
                ShapeKind::Table(rows) => {
                    for (row, cells) in rows.iter().enumerate() {
                        for (column, body) in cells.iter().enumerate() {
                            self.body(body, path, &shape.name, Some((row, column)));
                        }
                    }
                }
                ShapeKind::TextContainer(body) => self.body(body, path, &shape.name, None),
                ShapeKind::Other => {}
            }
            path.pop();
        }
    }

    fn body(&mut self, body: &TextBody, path: &[usize], shape_name: &str, cell: Option<(usize, usize)>) {
        for (p_index, paragraph) in body.paragraphs.iter().enumerate() {
            for (r_index, run) in paragraph.runs.iter().enumerate() {
                let Some(slot) = run.slot else { continue };
                if run.text.trim().is_empty() {
                    continue;
                }
                self.units.push(RunUnit {
                    path: ContainerPath {
                        slide: self.slide,
                        notes: self.notes,
                        shape_path: path.to_vec(),
                        shape_name: shape_name.to_string(),
                        cell,
                        paragraph: p_index,
                        run: r_index,
                    },
                    part: self.part,
                    slot,
                    original: run.text.clone(),
                });
            }
        }
    }
}
