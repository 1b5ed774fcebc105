/*!
 * Translatable documents.
 *
 * Each supported format knows how to list its translatable fragments in a
 * stable order, write an equally long list of translations back into the
 * same places, and serialize itself afterwards.
 *
 * - `pptx`: Slide decks (runs inside shapes, tables, groups and notes)
 * - `notebook`: Jupyter notebooks (markdown cells and code comments)
 * - `comments`: Line-comment scanning for code cells
 */

use crate::errors::DocumentError;

pub use self::notebook::{Notebook, NotebookUnit};
pub use self::pptx::{Presentation, RunUnit};

pub mod comments;
pub mod notebook;
pub mod pptx;

/// A piece of source text with a write-back location
pub trait TranslatableUnit {
    fn source_text(&self) -> &str;
}

/// Options for fragment collection
#[derive(Debug, Clone, Copy)]
pub struct CollectOptions {
    /// Include slide notes pages
    pub include_notes: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self { include_notes: true }
    }
}

/// A document whose fragments can be collected, translated and written back
pub trait TranslatableDocument {
    type Unit: TranslatableUnit;

    /// Short name used in logs
    fn kind(&self) -> &'static str;

    /// Ordered fragments; never includes blank text
    fn collect(&self, options: &CollectOptions) -> Vec<Self::Unit>;

    /// Write translation `i` into unit `i`
    fn apply(&mut self, units: &[Self::Unit], translations: &[String]) -> Result<(), DocumentError>;

    /// Serialized document
    fn to_bytes(&self) -> Result<Vec<u8>, DocumentError>;
}
