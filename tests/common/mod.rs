/*!
 * Common test utilities for the tabtrans test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use tabtrans::app_config::Config;
use tabtrans::document::{Document, DocumentRow};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample CSV file with a text column and one extra column
pub fn create_test_csv(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = "\
text,author
Hello world,alice
Good morning,bob
See you later,carol
";
    create_test_file(dir, filename, content)
}

/// Builds an in-memory document with one text column and the given rows
pub fn make_document(name: &str, texts: &[&str]) -> Document {
    let rows = texts.iter()
        .map(|text| DocumentRow::new(*text, Vec::new()))
        .collect();
    Document::new(name, vec!["text".to_string()], rows)
}

/// Config preset for controller tests: target language set, no pacing delay
pub fn test_config(target_language: &str) -> Config {
    let mut config = Config::default();
    config.target_language = target_language.to_string();
    config.translation.common.inter_chunk_delay_secs = 0.0;
    config
}
