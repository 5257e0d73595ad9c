/*!
 * Batch translation processing.
 *
 * This module contains the serializer and reconciler that turn row chunks
 * into single backend payloads and back, plus the document translator that
 * drives the chunk-translate-merge loop for one document with progress
 * tracking, pacing and cancellation.
 */

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::document::{Document, DocumentRow, TranslatedDocument};

use super::core::{LogEntry, TranslationBackend};

/// Replace any line break inside one row's text with a single space
fn flatten_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Join a chunk of rows into a single newline-delimited payload
///
/// Line breaks embedded in a row's source text are collapsed to spaces so
/// the payload line count always equals the chunk row count.
pub fn serialize_batch(rows: &[DocumentRow]) -> String {
    rows.iter()
        .map(|row| flatten_line_breaks(&row.source_text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Line count disagreement between a backend response and its chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMismatch {
    /// Rows the chunk contained
    pub expected: usize,
    /// Lines the backend returned
    pub actual: usize,
}

/// Outcome of aligning a backend response against the expected row count
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Exactly one translated string per expected row
    pub rows: Vec<String>,
    /// Set when the response line count disagreed with the chunk size
    pub mismatch: Option<CountMismatch>,
}

/// Align a backend response with the expected row count
///
/// The response is trimmed and split on line breaks. A short response is
/// right-padded with empty strings, an overlong one is truncated; either
/// case is reported through [`Reconciled::mismatch`] and never fails.
pub fn reconcile_batch(response: &str, expected: usize) -> Reconciled {
    let mut rows: Vec<String> = response.trim()
        .lines()
        .map(|line| line.to_string())
        .collect();

    let actual = rows.len();
    if actual == expected {
        return Reconciled { rows, mismatch: None };
    }

    if actual < expected {
        rows.resize(expected, String::new());
    } else {
        rows.truncate(expected);
    }

    Reconciled {
        rows,
        mismatch: Some(CountMismatch { expected, actual }),
    }
}

/// Result of driving one document through the chunk loop
#[derive(Debug)]
pub enum DocumentRun {
    /// All chunks processed and the output table built
    Done(TranslatedDocument),
    /// The document had no rows, nothing to translate
    SkippedEmpty,
    /// The cancellation flag was observed at a chunk boundary
    Cancelled,
}

/// Drives the chunk-translate-merge loop for one document
pub struct DocumentTranslator<B: TranslationBackend> {
    /// The backend every chunk payload is sent to
    backend: Arc<B>,

    /// Maximum rows per backend call
    batch_size: usize,

    /// Delay applied after each chunk call, rate-limit pacing
    inter_chunk_delay: Duration,

    /// Flag checked before each chunk; set externally to stop the run
    cancel: Arc<AtomicBool>,
}

impl<B: TranslationBackend> DocumentTranslator<B> {
    /// Create a new document translator
    pub fn new(backend: Arc<B>, batch_size: usize, inter_chunk_delay: Duration, cancel: Arc<AtomicBool>) -> Self {
        Self {
            backend,
            batch_size,
            inter_chunk_delay,
            cancel,
        }
    }

    /// Translate one document chunk by chunk, in row order
    ///
    /// A failed chunk call fills its rows with "[Error: <cause>]" markers and
    /// the loop moves on; there is no failure that aborts the document. The
    /// progress callback fires after every chunk with (rows done, rows total).
    pub async fn translate_document(
        &self,
        document: &Document,
        target_language: &str,
        log_capture: Arc<StdMutex<Vec<LogEntry>>>,
        progress_callback: impl Fn(usize, usize),
    ) -> DocumentRun {
        let total_rows = document.rows.len();
        if total_rows == 0 {
            let mut logs = log_capture.lock().unwrap();
            logs.push(LogEntry {
                level: "WARN".to_string(),
                message: format!("Skipping '{}', document has no rows", document.name),
            });
            return DocumentRun::SkippedEmpty;
        }

        let chunks = document.split_into_chunks(self.batch_size);
        let total_chunks = chunks.len();
        let mut translated: Vec<String> = Vec::with_capacity(total_rows);
        let mut rows_done = 0usize;

        for (chunk_index, chunk) in chunks.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                let mut logs = log_capture.lock().unwrap();
                logs.push(LogEntry {
                    level: "WARN".to_string(),
                    message: format!("Cancelled '{}' before chunk {} of {}",
                        document.name, chunk_index + 1, total_chunks),
                });
                return DocumentRun::Cancelled;
            }

            let payload = serialize_batch(chunk);
            let start_time = Instant::now();
            let result = self.backend.translate_payload(&payload, target_language).await;
            let duration = start_time.elapsed();

            match result {
                Ok(response) => {
                    let reconciled = reconcile_batch(&response, chunk.len());
                    if let Some(mismatch) = reconciled.mismatch {
                        let mut logs = log_capture.lock().unwrap();
                        logs.push(LogEntry {
                            level: "WARN".to_string(),
                            message: format!(
                                "Line count mismatch in '{}' chunk {}: expected {} lines, got {} (padded or truncated)",
                                document.name, chunk_index + 1, mismatch.expected, mismatch.actual
                            ),
                        });
                    } else {
                        let mut logs = log_capture.lock().unwrap();
                        logs.push(LogEntry {
                            level: "INFO".to_string(),
                            message: format!("Chunk {} of {} for '{}' completed in {:?}",
                                chunk_index + 1, total_chunks, document.name, duration),
                        });
                    }
                    translated.extend(reconciled.rows);
                }
                Err(e) => {
                    {
                        let mut logs = log_capture.lock().unwrap();
                        logs.push(LogEntry {
                            level: "ERROR".to_string(),
                            message: format!("Chunk {} of {} for '{}' failed: {}",
                                chunk_index + 1, total_chunks, document.name, e),
                        });
                    }
                    // The marker is cell content, the run itself keeps going
                    let marker = format!("[Error: {}]", e);
                    translated.extend(vec![marker; chunk.len()]);
                }
            }

            rows_done += chunk.len();
            progress_callback(rows_done, total_rows);

            if !self.inter_chunk_delay.is_zero() {
                tokio::time::sleep(self.inter_chunk_delay).await;
            }
        }

        debug_assert_eq!(translated.len(), total_rows);
        DocumentRun::Done(TranslatedDocument::from_translations(document, target_language, translated))
    }
}
