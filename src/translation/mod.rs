/*!
 * Translation orchestration for extracted document fragments.
 *
 * - `batch`: Sequential, bounded batches with a 1:1 order check
 */

// Re-export main types for easier usage
pub use self::batch::BatchTranslator;

// Submodules
pub mod batch;
