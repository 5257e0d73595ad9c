/*!
 * Integration tests for the file-based translation workflow
 *
 * Drives the controller over real directories with a mock backend: inputs
 * are collected, translated tables are written next to a zip archive and an
 * issues log, and per-document failures never abort the run.
 */

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use anyhow::Result;

use tabtrans::app_controller::{Controller, DocumentOutcome};
use tabtrans::providers::mock::MockBackend;
use crate::common;

/// Test a directory run over a mix of good, empty and malformed tables
#[tokio::test]
async fn test_directory_run_withMixedInputs_shouldWriteOutputsAndContinuePastFailures() -> Result<()> {
    // 1. Lay out an input directory with two good tables, a header-only
    //    table and a ragged one that cannot be parsed
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("input");
    let output_dir = temp_dir.path().join("output");
    fs::create_dir_all(&input_dir)?;

    common::create_test_csv(&input_dir, "alpha.csv")?;
    common::create_test_csv(&input_dir, "beta.csv")?;
    common::create_test_file(&input_dir, "empty.csv", "text,author\n")?;
    common::create_test_file(&input_dir, "broken.csv", "text,author\nHello,alice,extra,fields\n")?;

    let controller = Controller::with_config(common::test_config("French"))?;
    let backend = Arc::new(MockBackend::echoing());
    let cancel = Arc::new(AtomicBool::new(false));

    // 2. Run the workflow
    let report = controller
        .run_with_backend(input_dir, output_dir.clone(), backend, cancel)
        .await?;

    // 3. Per-document outcomes: two translated, one skipped, one failed
    assert!(!report.cancelled);
    assert_eq!(report.translated_count(), 2, "both good tables should translate");
    assert_eq!(report.skipped_count(), 1, "the header-only table should be skipped");
    assert_eq!(report.failed_count(), 1, "the ragged table should fail without aborting");

    assert!(matches!(report.get("alpha_French"), Some(DocumentOutcome::Translated(_))));
    assert!(matches!(report.get("beta_French"), Some(DocumentOutcome::Translated(_))));
    assert!(matches!(report.get("empty_French"), Some(DocumentOutcome::Skipped { .. })));
    match report.get("broken_French") {
        Some(DocumentOutcome::Failed { error }) => {
            assert!(error.contains("parse"), "failure should carry the parse error: {}", error)
        }
        other => panic!("expected a failed outcome for the ragged table, got {:?}", other),
    }

    // 4. Translated tables land in the output directory with the language
    //    suffix and the appended column
    let alpha_out = output_dir.join("alpha_French.csv");
    let beta_out = output_dir.join("beta_French.csv");
    assert!(alpha_out.exists(), "alpha output should exist");
    assert!(beta_out.exists(), "beta output should exist");

    let alpha_content = fs::read_to_string(&alpha_out)?;
    assert!(alpha_content.contains("Translated_French"));
    assert!(alpha_content.contains("[TRANSLATED to French] Hello world"));

    // The skipped and failed tables produce no outputs
    assert!(!output_dir.join("empty_French.csv").exists());
    assert!(!output_dir.join("broken_French.csv").exists());

    // 5. More than one written table gets packaged into an archive
    let archive_path = output_dir.join("translated_files.zip");
    assert!(archive_path.exists(), "archive should exist for multi-file runs");
    let archive = zip::ZipArchive::new(fs::File::open(&archive_path)?)?;
    assert_eq!(archive.len(), 2);

    // 6. The skip warning is captured and written to the issues log
    assert!(report.logs.iter().any(|entry| entry.level == "WARN"));
    let issues_log = output_dir.join("tabtrans.issues.log");
    assert!(issues_log.exists(), "issues log should exist when warnings were captured");
    let log_content = fs::read_to_string(&issues_log)?;
    assert!(log_content.starts_with("Translation Log - "));
    assert!(log_content.contains("[WARN]"));

    Ok(())
}

/// Test a single-file run writes one output and no archive
#[tokio::test]
async fn test_single_file_run_withCleanInput_shouldWriteOnlyTheTable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("output");
    let csv_file = common::create_test_csv(&temp_dir.path().to_path_buf(), "greetings.csv")?;

    let controller = Controller::with_config(common::test_config("de"))?;
    let backend = Arc::new(MockBackend::echoing());
    let cancel = Arc::new(AtomicBool::new(false));

    let report = controller
        .run_with_backend(csv_file, output_dir.clone(), backend, cancel)
        .await?;

    assert_eq!(report.translated_count(), 1);

    // "de" resolves to "German" in the output name
    let output_path = output_dir.join("greetings_German.csv");
    assert!(output_path.exists());
    let content = fs::read_to_string(&output_path)?;
    assert!(content.contains("Translated_German"));
    assert!(content.contains("[TRANSLATED to German] Good morning"));

    // A clean single-file run produces neither an archive nor an issues log
    assert!(!output_dir.join("translated_files.zip").exists());
    assert!(!output_dir.join("tabtrans.issues.log").exists());

    Ok(())
}

/// Test that cancellation before the first document writes nothing
#[tokio::test]
async fn test_run_withPresetCancellation_shouldWriteNoOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("input");
    let output_dir = temp_dir.path().join("output");
    fs::create_dir_all(&input_dir)?;
    common::create_test_csv(&input_dir, "alpha.csv")?;

    let controller = Controller::with_config(common::test_config("French"))?;
    let backend = Arc::new(MockBackend::echoing());
    let cancel = Arc::new(AtomicBool::new(false));
    cancel.store(true, Ordering::SeqCst);

    let report = controller
        .run_with_backend(input_dir, output_dir.clone(), backend.clone(), cancel)
        .await?;

    assert!(report.cancelled);
    assert!(report.outcomes.is_empty());
    assert_eq!(backend.call_count(), 0);
    assert!(!output_dir.join("alpha_French.csv").exists());

    Ok(())
}
