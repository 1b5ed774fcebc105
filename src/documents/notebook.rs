/*!
 * Jupyter notebook fragment walker.
 *
 * Markdown cells are translated whole; code cells only have their `#`
 * comments translated, spliced back into the untouched code. Fields the
 * walker does not know about (outputs, metadata, ids) are carried through
 * as raw JSON.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::documents::comments::{scan_line_comments, splice_spans, CommentSpan};
use crate::documents::{CollectOptions, TranslatableDocument, TranslatableUnit};
use crate::errors::DocumentError;

const SUPPORTED_NBFORMAT: u32 = 4;

/// Notebook document (nbformat 4)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    pub nbformat: u32,

    pub nbformat_minor: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Notebook cell type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Markdown,
    Code,
    Raw,
}

/// A single notebook cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,

    #[serde(default)]
    pub source: CellSource,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Cell source, either one string or a list of lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl CellSource {
    /// Full source as a single string
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }

    /// Replace the source, keeping the string or line-list shape
    pub fn set_text(&mut self, text: &str) {
        match self {
            Self::Text(current) => *current = text.to_string(),
            Self::Lines(lines) => *lines = text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }
}

/// A translatable fragment of a notebook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotebookUnit {
    /// Whole source of a markdown cell
    Markdown { cell: usize, original: String },
    /// A `#` comment inside a code cell
    Comment(CommentSpan),
}

impl NotebookUnit {
    pub fn cell(&self) -> usize {
        match self {
            Self::Markdown { cell, .. } => *cell,
            Self::Comment(span) => span.cell,
        }
    }
}

impl TranslatableUnit for NotebookUnit {
    fn source_text(&self) -> &str {
        match self {
            Self::Markdown { original, .. } => original,
            Self::Comment(span) => span.source_text(),
        }
    }
}

impl Notebook {
    /// Parse notebook JSON, rejecting formats other than v4
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let version: Value = serde_json::from_str(json)?;
        let nbformat = version.get("nbformat").and_then(Value::as_u64);
        if nbformat != Some(u64::from(SUPPORTED_NBFORMAT)) {
            return Err(DocumentError::Notebook(format!(
                "unsupported notebook format {:?}, only nbformat {} is supported",
                nbformat, SUPPORTED_NBFORMAT
            )));
        }

        Ok(serde_json::from_value(version)?)
    }

    /// Load a notebook file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DocumentError::Notebook(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Indented JSON with a trailing newline, object keys sorted at every level
    pub fn to_json(&self) -> Result<String, DocumentError> {
        // `Map` is ordered by key, so going through `Value` sorts the flattened fields in
        let value = serde_json::to_value(self)?;

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        value.serialize(&mut serializer)?;

        let mut json = String::from_utf8(buffer).map_err(|e| DocumentError::Notebook(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    /// Write the notebook to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .map_err(|e| DocumentError::Notebook(format!("failed to write {}: {}", path.display(), e)))
    }

    /// Markdown bodies and code comments, in cell order
    pub fn collect_units(&self) -> Vec<NotebookUnit> {
        let mut units = Vec::new();

        for (index, cell) in self.cells.iter().enumerate() {
            match cell.cell_type {
                CellType::Markdown => {
                    let source = cell.source.text();
                    if !source.trim().is_empty() {
                        units.push(NotebookUnit::Markdown { cell: index, original: source });
                    }
                }
                CellType::Code => {
                    units.extend(scan_line_comments(index, &cell.source.text()).into_iter().map(NotebookUnit::Comment));
                }
                CellType::Raw => {}
            }
        }

        debug!("Collected {} fragments from {} cells", units.len(), self.cells.len());
        units
    }

    /// Write translations back; comment spans are spliced per cell
    pub fn apply_units(&mut self, units: &[NotebookUnit], translations: &[String]) -> Result<(), DocumentError> {
        if units.len() != translations.len() {
            return Err(DocumentError::UnitCountMismatch {
                units: units.len(),
                translations: translations.len(),
            });
        }

        let mut comment_edits: HashMap<usize, Vec<(&CommentSpan, &str)>> = HashMap::new();

        for (unit, translation) in units.iter().zip(translations) {
            let cell = self
                .cells
                .get_mut(unit.cell())
                .ok_or_else(|| DocumentError::Notebook(format!("cell {} does not exist", unit.cell())))?;

            match unit {
                NotebookUnit::Markdown { .. } => cell.source.set_text(translation),
                NotebookUnit::Comment(span) => {
                    comment_edits.entry(span.cell).or_default().push((span, translation.as_str()));
                }
            }
        }

        for (index, edits) in comment_edits {
            let cell = &mut self.cells[index];
            let spliced = splice_spans(&cell.source.text(), &edits)?;
            cell.source.set_text(&spliced);
        }

        Ok(())
    }
}

impl std::str::FromStr for Notebook {
    type Err = DocumentError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        Self::from_json(json)
    }
}

impl TranslatableDocument for Notebook {
    type Unit = NotebookUnit;

    fn kind(&self) -> &'static str {
        "notebook"
    }

    fn collect(&self, _options: &CollectOptions) -> Vec<NotebookUnit> {
        self.collect_units()
    }

    fn apply(&mut self, units: &[NotebookUnit], translations: &[String]) -> Result<(), DocumentError> {
        self.apply_units(units, translations)
    }

    fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(self.to_json()?.into_bytes())
    }
}
