/*!
 * Provider implementations for translation services.
 *
 * This module contains the client side of machine translation:
 * - DeepL: the production provider (form-encoded batch API)
 * - Mock: deterministic in-process translator for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::TargetVariant;
use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// A provider receives an ordered batch of source strings and must return
/// exactly one translation per string, in the same order.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Translate a batch of texts
    ///
    /// # Arguments
    /// * `texts` - Ordered source strings; an empty slice yields an empty result
    /// * `source_language` - Provider source code (e.g. "FR")
    /// * `target` - English variant to produce
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - Translations in submission order
    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target: TargetVariant,
    ) -> Result<Vec<String>, ProviderError>;
}

pub mod deepl;
pub mod mock;
