/*!
 * Application controller for document translation runs
 *
 * Drives the full workflow: collect the input tables, translate each one in
 * row chunks through the configured provider, write the output tables and
 * build a per-document report. A document that fails to load or render is
 * recorded in the report, it never aborts the run.
 */

use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::document::{Document, TranslatedDocument};
use crate::file_utils::{FileManager, FileType};
use crate::language_utils;
use crate::translation::{DocumentRun, DocumentTranslator, LogEntry, TranslationBackend, TranslationService};

/// Outcome of a single document within a run
#[derive(Debug)]
pub enum DocumentOutcome {
    /// Document translated, output table attached
    Translated(TranslatedDocument),
    /// Document skipped with the reason
    Skipped { reason: String },
    /// Document failed to load or render, the run continued
    Failed { error: String },
}

/// Aggregated results of one run
pub struct RunReport {
    /// Per-document outcomes keyed by output name, in input order
    pub outcomes: Vec<(String, DocumentOutcome)>,
    /// Log entries captured while the progress bars were active
    pub logs: Vec<LogEntry>,
    /// True when the run stopped on the cancellation flag
    pub cancelled: bool,
}

impl RunReport {
    /// Number of documents that produced a translated table
    pub fn translated_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, DocumentOutcome::Translated(_)))
            .count()
    }

    /// Number of documents skipped
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, DocumentOutcome::Skipped { .. }))
            .count()
    }

    /// Number of documents that failed
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, DocumentOutcome::Failed { .. }))
            .count()
    }

    /// Look up an outcome by its output name
    pub fn get(&self, key: &str) -> Option<&DocumentOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, outcome)| outcome)
    }
}

/// Overall run progress in `[0, 1]`
///
/// Weighted combination of completed documents and the fractional progress
/// of the in-flight document. Monotone as long as `rows_done` only grows
/// within a document.
pub fn overall_progress(docs_done: usize, total_docs: usize, rows_done: usize, rows_total: usize) -> f64 {
    if total_docs == 0 {
        return 1.0;
    }
    let fraction = if rows_total == 0 {
        0.0
    } else {
        (rows_done as f64 / rows_total as f64).min(1.0)
    };
    ((docs_done as f64 + fraction) / total_docs as f64).clamp(0.0, 1.0)
}

/// Output name for a document that never produced a translated table
fn output_key_for(name: &str, target_language: &str) -> String {
    format!("{}_{}", name, target_language.replace(' ', "_"))
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.target_language.is_empty() && !self.config.translation.model.is_empty()
    }

    /// Collect the tabular input files for a run
    ///
    /// A single file must hold delimited text, a directory is scanned for
    /// .csv files and processed in sorted order. An empty directory is an
    /// error.
    pub fn collect_input_files(&self, input_path: &Path) -> Result<Vec<PathBuf>> {
        if FileManager::file_exists(input_path) {
            match FileManager::detect_file_type(input_path)? {
                FileType::Tabular => Ok(vec![input_path.to_path_buf()]),
                FileType::Unknown => Err(anyhow::anyhow!(
                    "Input file is not delimited text: {:?}",
                    input_path
                )),
            }
        } else if FileManager::dir_exists(input_path) {
            let mut files = FileManager::find_files(input_path, "csv")?;
            files.sort();
            if files.is_empty() {
                return Err(anyhow::anyhow!("No csv files found in directory: {:?}", input_path));
            }
            Ok(files)
        } else {
            Err(anyhow::anyhow!("Input path does not exist: {:?}", input_path))
        }
    }

    /// Run the main workflow over an input file or directory
    pub async fn run(&self, input_path: PathBuf, output_dir: PathBuf, cancel: Arc<AtomicBool>) -> Result<RunReport> {
        // Build the provider up front so a bad model name fails before any IO
        let service = TranslationService::new(self.config.translation.clone())?;
        self.run_with_backend(input_path, output_dir, Arc::new(service), cancel)
            .await
    }

    /// Run the main workflow through an injected backend
    pub async fn run_with_backend<B: TranslationBackend>(
        &self,
        input_path: PathBuf,
        output_dir: PathBuf,
        backend: Arc<B>,
        cancel: Arc<AtomicBool>,
    ) -> Result<RunReport> {
        // Start timing the process
        let start_time = Instant::now();

        let files = self.collect_input_files(&input_path)?;
        FileManager::ensure_dir(&output_dir)?;

        let target_language = language_utils::resolve_language_name(&self.config.target_language);
        info!(
            "🚀 tabtrans: {} into {} ({} file{})",
            self.config.translation.model,
            target_language,
            files.len(),
            if files.len() == 1 { "" } else { "s" }
        );

        // Overall bar counts documents in percent steps so the in-flight
        // document can advance it fractionally
        let multi_progress = MultiProgress::new();
        let overall_pb = multi_progress.add(ProgressBar::new((files.len() as u64) * 100));
        overall_pb.set_style(Self::bar_style(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} {eta}",
        ));
        overall_pb.set_message("Processing documents");

        // Create log capture for storing warnings during translation
        let log_capture: Arc<StdMutex<Vec<LogEntry>>> = Arc::new(StdMutex::new(Vec::new()));

        let translator = DocumentTranslator::new(
            backend,
            self.config.translation.common.batch_size,
            Duration::from_secs_f64(self.config.translation.common.inter_chunk_delay_secs),
            Arc::clone(&cancel),
        );

        let total_docs = files.len();
        let mut outcomes: Vec<(String, DocumentOutcome)> = Vec::new();
        let mut written_files: Vec<PathBuf> = Vec::new();
        let mut cancelled = false;

        for (doc_index, file) in files.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                cancelled = true;
                break;
            }

            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            overall_pb.set_message(format!("Processing: {}", file_name));

            let document = match Document::from_csv_file(file) {
                Ok(document) => document,
                Err(e) => {
                    // Document-level failure, the run keeps going
                    error!("Error loading {}: {}", file_name, e);
                    let stem = file
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().to_string())
                        .unwrap_or_else(|| "document".to_string());
                    outcomes.push((
                        output_key_for(&stem, &target_language),
                        DocumentOutcome::Failed { error: e.to_string() },
                    ));
                    overall_pb.set_position(((doc_index + 1) as u64) * 100);
                    continue;
                }
            };

            let outcome = self
                .process_document(
                    &document,
                    &target_language,
                    &translator,
                    &multi_progress,
                    &overall_pb,
                    doc_index,
                    total_docs,
                    Arc::clone(&log_capture),
                )
                .await;

            match outcome {
                None => {
                    cancelled = true;
                    break;
                }
                Some(outcome) => {
                    let key = match &outcome {
                        DocumentOutcome::Translated(translated) => {
                            match translated.to_csv_string() {
                                Ok(content) => {
                                    let output_path = output_dir.join(translated.output_file_name());
                                    match FileManager::write_to_file(&output_path, &content) {
                                        Ok(()) => {
                                            info!("Success: {}", output_path.display());
                                            written_files.push(output_path);
                                        }
                                        Err(e) => {
                                            warn!("Failed to write output for '{}': {}", translated.name, e)
                                        }
                                    }
                                }
                                Err(e) => warn!("Failed to render output for '{}': {}", translated.name, e),
                            }
                            translated.output_key()
                        }
                        _ => output_key_for(&document.name, &target_language),
                    };
                    outcomes.push((key, outcome));
                    overall_pb.set_position(((doc_index + 1) as u64) * 100);
                }
            }
        }

        overall_pb.finish_with_message(if cancelled { "Run cancelled" } else { "Run complete" });

        // Now that the progress bars are finished, drain the captured logs
        let logs = { log_capture.lock().unwrap().clone() };
        let error_logs = logs.iter().filter(|log| log.level == "ERROR").count();
        let warning_logs = logs.iter().filter(|log| log.level == "WARN").count();

        if error_logs > 0 || warning_logs > 0 {
            info!("Run completed with {} errors and {} warnings.", error_logs, warning_logs);

            // In debug mode, show all captured entries
            if log::max_level() >= log::LevelFilter::Debug {
                for log in &logs {
                    match log.level.as_str() {
                        "ERROR" => error!("{}", log.message),
                        "WARN" => warn!("{}", log.message),
                        "DEBUG" => debug!("{}", log.message),
                        _ => info!("{}", log.message),
                    }
                }
            }

            // Write captured entries to tabtrans.issues.log
            let log_file_path = output_dir.join("tabtrans.issues.log").to_string_lossy().to_string();
            let run_context = format!(
                "{} into {} ({})",
                self.config.translation.model,
                target_language,
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            );

            if let Err(e) = self.write_logs_to_file(&logs, &log_file_path, &run_context) {
                warn!("Failed to write logs to file: {}", e);
            } else {
                info!("Logs written to {}", log_file_path);
            }
        }

        // Package multiple output tables into a single archive
        if written_files.len() > 1 {
            let archive_path = output_dir.join("translated_files.zip");
            match FileManager::zip_files(&written_files, &archive_path) {
                Ok(path) => info!("Packaged {} outputs into {}", written_files.len(), path.display()),
                Err(e) => warn!("Failed to package outputs: {}", e),
            }
        }

        let report = RunReport { outcomes, logs, cancelled };

        // Give summary results - important for batch operations
        info!(
            "Run completed: {} translated, {} skipped, {} failed - Duration: {}",
            report.translated_count(),
            report.skipped_count(),
            report.failed_count(),
            Self::format_duration(start_time.elapsed())
        );
        if cancelled {
            warn!("Run cancelled before completing all documents");
        }

        Ok(report)
    }

    /// Orchestrate a set of in-memory documents, in input order
    ///
    /// The file-free core of [`Controller::run`]: nothing is written to
    /// disk, the report carries the translated tables instead.
    pub async fn run_documents<B: TranslationBackend>(
        &self,
        documents: &[Document],
        backend: Arc<B>,
        cancel: Arc<AtomicBool>,
    ) -> Result<RunReport> {
        let target_language = language_utils::resolve_language_name(&self.config.target_language);

        let multi_progress = MultiProgress::new();
        let overall_pb = multi_progress.add(ProgressBar::new((documents.len() as u64) * 100));
        overall_pb.set_style(Self::bar_style(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} {eta}",
        ));

        let log_capture: Arc<StdMutex<Vec<LogEntry>>> = Arc::new(StdMutex::new(Vec::new()));
        let translator = DocumentTranslator::new(
            backend,
            self.config.translation.common.batch_size,
            Duration::from_secs_f64(self.config.translation.common.inter_chunk_delay_secs),
            Arc::clone(&cancel),
        );

        let total_docs = documents.len();
        let mut outcomes: Vec<(String, DocumentOutcome)> = Vec::new();
        let mut cancelled = false;

        for (doc_index, document) in documents.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                cancelled = true;
                break;
            }
            overall_pb.set_message(format!("Processing: {}", document.name));

            let outcome = self
                .process_document(
                    document,
                    &target_language,
                    &translator,
                    &multi_progress,
                    &overall_pb,
                    doc_index,
                    total_docs,
                    Arc::clone(&log_capture),
                )
                .await;

            match outcome {
                None => {
                    cancelled = true;
                    break;
                }
                Some(outcome) => {
                    let key = match &outcome {
                        DocumentOutcome::Translated(translated) => translated.output_key(),
                        _ => output_key_for(&document.name, &target_language),
                    };
                    outcomes.push((key, outcome));
                    overall_pb.set_position(((doc_index + 1) as u64) * 100);
                }
            }
        }

        overall_pb.finish_and_clear();
        let logs = { log_capture.lock().unwrap().clone() };
        Ok(RunReport { outcomes, logs, cancelled })
    }

    /// Translate one document behind a per-document progress bar
    ///
    /// Returns None when the run was cancelled mid-document.
    #[allow(clippy::too_many_arguments)]
    async fn process_document<B: TranslationBackend>(
        &self,
        document: &Document,
        target_language: &str,
        translator: &DocumentTranslator<B>,
        multi_progress: &MultiProgress,
        overall_pb: &ProgressBar,
        doc_index: usize,
        total_docs: usize,
        log_capture: Arc<StdMutex<Vec<LogEntry>>>,
    ) -> Option<DocumentOutcome> {
        let rows_pb = multi_progress.add(ProgressBar::new(document.row_count() as u64));
        rows_pb.set_style(Self::bar_style(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg} {eta}",
        ));
        rows_pb.set_message(format!("Translating {}", document.name));

        // Clone the bars for use in the callback
        let pb = rows_pb.clone();
        let overall = overall_pb.clone();
        let run = translator
            .translate_document(document, target_language, log_capture, move |rows_done, rows_total| {
                pb.set_position(rows_done as u64);
                let progress = overall_progress(doc_index, total_docs, rows_done, rows_total);
                overall.set_position((progress * (total_docs as f64) * 100.0).round() as u64);
            })
            .await;

        // Finish and clear so only the overall bar stays visible
        rows_pb.finish_and_clear();

        match run {
            DocumentRun::Done(translated) => {
                info!("Translated '{}': {} rows", translated.name, translated.row_count());
                Some(DocumentOutcome::Translated(translated))
            }
            DocumentRun::SkippedEmpty => {
                warn!("Skipping '{}': document has no rows", document.name);
                Some(DocumentOutcome::Skipped {
                    reason: "document has no rows".to_string(),
                })
            }
            DocumentRun::Cancelled => None,
        }
    }

    /// Build a progress bar style, falling back to simpler templates
    fn bar_style(template: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(template)
            .or_else(|_| {
                ProgressStyle::default_bar()
                    .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }

    /// Write captured run entries to a log file
    pub fn write_logs_to_file(&self, logs: &[LogEntry], file_path: &str, run_context: &str) -> Result<()> {
        let mut log_content = String::new();

        // Add header
        log_content.push_str(&format!(
            "Translation Log - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        log_content.push_str(&format!("Context: {}\n\n", run_context));

        // Add each log entry
        for entry in logs {
            log_content.push_str(&format!("[{}] {}\n", entry.level, entry.message));
        }

        // Write to file
        FileManager::write_to_file(file_path, &log_content)?;

        Ok(())
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
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
}
