use anyhow::{Result, Context};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Suffix appended to translated file stems
pub const OUTPUT_SUFFIX: &str = "_EN";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: `<stem>_EN.<ext>` for a translated document
    pub fn output_file_name<P: AsRef<Path>>(input_file: P, file_type: FileType) -> Result<String> {
        let input_file = input_file.as_ref();
        let stem = input_file
            .file_stem()
            .with_context(|| format!("Input has no file name: {:?}", input_file))?;
        let extension = file_type
            .output_extension()
            .with_context(|| format!("Unsupported file type: {:?}", input_file))?;

        Ok(format!("{}{}.{}", stem.to_string_lossy(), OUTPUT_SUFFIX, extension))
    }

    // @generates: Output path for a translated document
    // @params: input_file, output_dir, file_type
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        file_type: FileType,
    ) -> Result<PathBuf> {
        let file_name = Self::output_file_name(input_file, file_type)?;
        Ok(output_dir.as_ref().join(file_name))
    }

    /// Find supported documents in a directory, skipping earlier outputs
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let matches_extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| extensions.iter().any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(&ext)));
            let is_output = path
                .file_stem()
                .is_some_and(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX));

            if matches_extension && !is_output {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.exists() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", from));
        }

        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::copy(from, to)
            .with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;

        Ok(())
    }

    /// Detect whether a file is a slide deck or a notebook
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            match ext.to_string_lossy().to_lowercase().as_str() {
                "pptx" => return Ok(FileType::Presentation),
                "ppt" => return Ok(FileType::LegacyPresentation),
                "ipynb" => return Ok(FileType::Notebook),
                _ => {}
            }
        }

        // Fall back to examining file contents
        let mut header = [0u8; 8];
        let read = fs::File::open(path)
            .and_then(|mut file| file.read(&mut header))
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        let header = &header[..read];

        if header.starts_with(ZIP_MAGIC) {
            return Ok(FileType::Presentation);
        }
        if header.starts_with(OLE_MAGIC) {
            return Ok(FileType::LegacyPresentation);
        }

        if let Ok(content) = fs::read_to_string(path) {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&content) {
                if json.get("cells").is_some_and(|cells| cells.is_array()) {
                    return Ok(FileType::Notebook);
                }
            }
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Office Open XML slide deck (.pptx)
    Presentation,
    /// Binary slide deck (.ppt), converted before translation
    LegacyPresentation,
    /// Jupyter notebook (.ipynb)
    Notebook,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Extension of the translated output
    pub fn output_extension(&self) -> Option<&'static str> {
        match self {
            Self::Presentation | Self::LegacyPresentation => Some("pptx"),
            Self::Notebook => Some("ipynb"),
            Self::Unknown => None,
        }
    }
}
