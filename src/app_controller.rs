use anyhow::Result;
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};

use crate::app_config::Config;
use crate::converter::LegacyConverter;
use crate::documents::{CollectOptions, Notebook, Presentation, TranslatableDocument};
use crate::errors::{AppError, DocumentError};
use crate::file_utils::{FileManager, FileType};
use crate::language_utils;
use crate::providers::deepl::DeepL;
use crate::providers::Translator;
use crate::translation::BatchTranslator;

// @module: Application controller for document translation

// @const: Prefix of the per-operation scratch directory
const SCRATCH_PREFIX: &str = "translate-";

// @const: Extensions picked up in folder mode
const FOLDER_EXTENSIONS: &[&str] = &["pptx", "ppt", "ipynb"];

/// Result of translating one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The translated document was written
    Translated {
        // @field: Path of the written document
        output: PathBuf,
        // @field: Number of fragments sent to the provider
        segments: usize,
    },
    /// An output already existed and overwriting was not requested
    Skipped(PathBuf),
}

/// Counts reported after a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Provider used for every batch
    translator: Arc<dyn Translator>,

    // @field: Parent of the scratch directories, system temp dir when unset
    scratch_root: Option<PathBuf>,
}

impl Controller {
    // @method: Create a controller talking to DeepL
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        let translator: Arc<dyn Translator> = Arc::new(DeepL::from_config(&config.translation));
        Ok(Self { config, translator, scratch_root: None })
    }

    // @method: Create a controller with an explicit provider (dry runs, tests)
    pub fn with_translator(config: Config, translator: Arc<dyn Translator>) -> Result<Self, AppError> {
        config.validate_settings()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        Ok(Self { config, translator, scratch_root: None })
    }

    // @method: Place scratch directories under `dir` instead of the system temp dir
    pub fn with_scratch_root<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.scratch_root = Some(dir.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate a single file into `output_dir`
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<RunOutcome> {
        let multi_progress = MultiProgress::new();
        Ok(self.translate_file(&input_file, &output_dir, force_overwrite, &multi_progress).await?)
    }

    /// Translate one file with progress reporting
    pub async fn translate_file(
        &self,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
        multi_progress: &MultiProgress,
    ) -> Result<RunOutcome, AppError> {
        let start_time = Instant::now();

        if !input_file.is_file() {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)));
        }

        let file_type = FileManager::detect_file_type(input_file)
            .map_err(|e| AppError::File(e.to_string()))?;
        if file_type == FileType::Unknown {
            return Err(DocumentError::UnsupportedFormat(input_file.display().to_string()).into());
        }

        let output_name = FileManager::output_file_name(input_file, file_type)
            .map_err(|e| AppError::File(e.to_string()))?;
        let output_path = output_dir.join(&output_name);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, translation already exists (use -f to force overwrite)");
            return Ok(RunOutcome::Skipped(output_path));
        }

        let source_code = language_utils::to_deepl_source_code(&self.config.source_language)
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        // Removed on drop, whichever way this function returns
        let mut scratch_builder = tempfile::Builder::new();
        scratch_builder.prefix(SCRATCH_PREFIX);
        let scratch = match &self.scratch_root {
            Some(root) => scratch_builder.tempdir_in(root)?,
            None => scratch_builder.tempdir()?,
        };
        let file_name = input_file
            .file_name()
            .ok_or_else(|| AppError::File(format!("Input has no file name: {:?}", input_file)))?;
        let working_copy = scratch.path().join(file_name);
        FileManager::copy_file(input_file, &working_copy)
            .map_err(|e| AppError::File(e.to_string()))?;
        debug!("Working copy: {}", working_copy.display());

        let label = input_file.display().to_string();
        let options = CollectOptions { include_notes: self.config.include_notes };

        let (bytes, segments) = match file_type {
            FileType::Notebook => {
                let mut notebook = Notebook::open(&working_copy)?;
                self.translate_document(&mut notebook, &label, &source_code, &options, multi_progress).await?
            }
            FileType::Presentation | FileType::LegacyPresentation => {
                let deck_path = if file_type == FileType::LegacyPresentation {
                    LegacyConverter::new(&self.config.conversion).convert(&working_copy).await?
                } else {
                    working_copy
                };
                let mut presentation = Presentation::open(&deck_path)?;
                self.translate_document(&mut presentation, &label, &source_code, &options, multi_progress).await?
            }
            FileType::Unknown => {
                return Err(DocumentError::UnsupportedFormat(label).into());
            }
        };

        let scratch_output = scratch.path().join(&output_name);
        std::fs::write(&scratch_output, bytes)
            .map_err(|e| AppError::Serialization(format!("{}: {}", scratch_output.display(), e)))?;

        FileManager::ensure_dir(output_dir)
            .map_err(|e| AppError::File(e.to_string()))?;
        FileManager::copy_file(&scratch_output, &output_path)
            .map_err(|e| AppError::File(e.to_string()))?;

        info!("Success: {} ({})", output_path.display(), Self::format_duration(start_time.elapsed()));

        Ok(RunOutcome::Translated {
            output: output_path,
            segments,
        })
    }

    /// Collect, translate, apply and serialize one loaded document
    async fn translate_document<D: TranslatableDocument>(
        &self,
        document: &mut D,
        label: &str,
        source_code: &str,
        options: &CollectOptions,
        multi_progress: &MultiProgress,
    ) -> Result<(Vec<u8>, usize), AppError> {
        let units = document.collect(options);
        if units.is_empty() {
            warn!("No translatable text found in {}", label);
            return Err(AppError::EmptyInput(label.to_string()));
        }

        let batch_translator = BatchTranslator::new(Arc::clone(&self.translator), self.config.translation.batch_size);
        info!(
            "Found {} segments in {} {} ({} batches, {} -> {})",
            units.len(),
            document.kind(),
            label,
            batch_translator.batch_count(units.len()),
            source_code,
            self.config.target_variant
        );

        let progress_bar = multi_progress.add(ProgressBar::new(units.len() as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message(format!("Translating with {}", self.translator.name()));

        let translation_start = Instant::now();
        let pb = progress_bar.clone();
        let result = batch_translator
            .translate_units(&units, source_code, self.config.target_variant, move |done, _total| {
                pb.set_position(done as u64);
            })
            .await;
        progress_bar.finish_and_clear();
        let translations = result?;

        debug!("Translated {} segments in {}", translations.len(), Self::format_duration(translation_start.elapsed()));

        document.apply(&units, &translations)?;
        let bytes = document
            .to_bytes()
            .map_err(|e| AppError::Serialization(e.to_string()))?;

        Ok((bytes, units.len()))
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Run the workflow in folder mode, one document after another
    /// Files that already have a translation are skipped
    pub async fn run_folder(&self, input_dir: PathBuf, output_dir: Option<PathBuf>, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_files(&input_dir, FOLDER_EXTENSIONS)?;
        if files.is_empty() {
            return Err(anyhow::anyhow!("No .pptx, .ppt or .ipynb files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let target_dir = match (&output_dir, file.parent()) {
                (Some(dir), _) => dir.clone(),
                (None, Some(parent)) => parent.to_path_buf(),
                (None, None) => input_dir.clone(),
            };

            match self.translate_file(file, &target_dir, force_overwrite, &multi_progress).await {
                Ok(RunOutcome::Translated { .. }) => summary.translated += 1,
                Ok(RunOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} translated, {} skipped, {} errors ({})",
            summary.translated, summary.skipped, summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }
}
