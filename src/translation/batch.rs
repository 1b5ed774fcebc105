/*!
 * Batch translation processing.
 *
 * This module splits the ordered fragments of a document into bounded
 * batches, submits them to the provider one after another, and checks that
 * every batch comes back with exactly one translation per text.
 */

use log::{debug, error};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::TargetVariant;
use crate::documents::TranslatableUnit;
use crate::errors::ProviderError;
use crate::providers::Translator;

/// Batch translator for processing document fragments in sequential batches
#[derive(Debug, Clone)]
pub struct BatchTranslator {
    /// The provider to use
    translator: Arc<dyn Translator>,

    /// Maximum number of texts per provider request
    batch_size: usize,
}

impl BatchTranslator {
    /// Create a new batch translator; a zero batch size is treated as one
    pub fn new(translator: Arc<dyn Translator>, batch_size: usize) -> Self {
        Self {
            translator,
            batch_size: batch_size.max(1),
        }
    }

    /// Number of texts per request
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of provider calls needed for `total` texts
    pub fn batch_count(&self, total: usize) -> usize {
        total.div_ceil(self.batch_size)
    }

    /// Translate the source text of every unit, preserving order
    pub async fn translate_units<U: TranslatableUnit>(
        &self,
        units: &[U],
        source_language: &str,
        target: TargetVariant,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<Vec<String>, ProviderError> {
        let texts: Vec<String> = units.iter().map(|u| u.source_text().to_string()).collect();
        self.translate_all(&texts, source_language, target, progress_callback).await
    }

    /// Translate all texts batch by batch
    ///
    /// The callback receives `(texts_done, texts_total)` after each batch.
    /// The first failing batch aborts the whole run; nothing is retried.
    pub async fn translate_all(
        &self,
        texts: &[String],
        source_language: &str,
        target: TargetVariant,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<Vec<String>, ProviderError> {
        let total = texts.len();
        let total_batches = self.batch_count(total);
        let mut translated = Vec::with_capacity(total);

        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            let start_time = Instant::now();

            let result = self.translator.translate(batch, source_language, target).await
                .inspect_err(|e| error!("Batch {} of {} failed: {}", batch_index + 1, total_batches, e))?;

            if result.len() != batch.len() {
                error!("Batch {} of {} came back with {} of {} translations",
                    batch_index + 1, total_batches, result.len(), batch.len());
                return Err(ProviderError::CountMismatch {
                    expected: batch.len(),
                    actual: result.len(),
                });
            }

            translated.extend(result);
            debug!("Batch {} of {} completed in {:?}", batch_index + 1, total_batches, start_time.elapsed());
            progress_callback(translated.len(), total);
        }

        Ok(translated)
    }
}
