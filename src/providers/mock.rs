/*!
 * Mock translator implementations for testing and dry runs.
 *
 * This module provides a translator that never touches the network:
 * - `MockTranslator::working()` - Tags every text with the target variant
 * - `MockTranslator::failing()` - Always fails with an API error
 * - `MockTranslator::offline()` - Always fails with a connection error
 * - `MockTranslator::short_batches()` - Drops the last translation of each batch
 */

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::app_config::TargetVariant;
use crate::errors::ProviderError;
use crate::providers::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a tagged translation
    Working,
    /// Always fails with an API error
    Failing { status_code: u16 },
    /// Always fails as if the network were down
    Offline,
    /// Returns one translation fewer than requested
    ShortBatches,
}

/// Mock translator recording every batch it receives
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Sizes of the batches received, in call order
    batch_sizes: Mutex<Vec<usize>>,
    /// Texts received, flattened in call order
    received: Mutex<Vec<String>>,
    /// Custom translation function (optional)
    custom_translation: Option<fn(&str) -> String>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            batch_sizes: Mutex::new(Vec::new()),
            received: Mutex::new(Vec::new()),
            custom_translation: None,
        }
    }

    /// Create a working mock translator
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock translator that answers with HTTP 456 (quota exceeded)
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing { status_code: 456 })
    }

    /// Create a mock translator that cannot connect
    pub fn offline() -> Self {
        Self::new(MockBehavior::Offline)
    }

    /// Create a mock translator that returns short batches
    pub fn short_batches() -> Self {
        Self::new(MockBehavior::ShortBatches)
    }

    /// Set a custom translation function
    pub fn with_translation(mut self, translate: fn(&str) -> String) -> Self {
        self.custom_translation = Some(translate);
        self
    }

    /// Number of provider calls made so far
    pub fn call_count(&self) -> usize {
        self.batch_sizes.lock().len()
    }

    /// Sizes of the batches received so far
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().clone()
    }

    /// All texts received so far, in order
    pub fn received_texts(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    fn render(&self, text: &str, target: TargetVariant) -> String {
        match self.custom_translation {
            Some(translate) => translate(text),
            None => format!("[{}] {}", target.deepl_code(), text),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn translate(
        &self,
        texts: &[String],
        _source_language: &str,
        target: TargetVariant,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        self.batch_sizes.lock().push(texts.len());
        self.received.lock().extend(texts.iter().cloned());

        match self.behavior {
            MockBehavior::Working => Ok(texts.iter().map(|t| self.render(t, target)).collect()),

            MockBehavior::Failing { status_code } => Err(ProviderError::ApiError {
                status_code,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::Offline => Err(ProviderError::ConnectionError(
                "Simulated network failure".to_string(),
            )),

            MockBehavior::ShortBatches => {
                let mut translated: Vec<String> = texts.iter().map(|t| self.render(t, target)).collect();
                translated.pop();
                Ok(translated)
            }
        }
    }
}
