/*!
 * Translation pipeline for tabular documents using AI providers.
 *
 * This module contains the core functionality for translating column text
 * through LLM backends. It is split into two submodules:
 *
 * - `core`: Backend adapter, family dispatch and the backend trait seam
 * - `batch`: Chunk serialization, response reconciliation and the
 *   per-document chunk loop
 */

// Re-export main types for easier usage
pub use self::batch::{
    CountMismatch, DocumentRun, DocumentTranslator, Reconciled, reconcile_batch, serialize_batch,
};
pub use self::core::{LogEntry, TranslationBackend, TranslationService};

// Submodules
pub mod batch;
pub mod core;
