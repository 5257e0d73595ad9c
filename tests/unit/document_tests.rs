/*!
 * Tests for tabular document parsing, chunking and output generation
 */

use anyhow::Result;
use tabtrans::document::{Document, DocumentRow, TranslatedDocument};
use crate::common;

/// Test parsing a simple CSV string
#[test]
fn test_from_csv_str_withSimpleTable_shouldParseHeadersAndRows() -> Result<()> {
    let content = "text,author\nHello world,alice\nGood morning,bob\n";

    let document = Document::from_csv_str("reviews", content)?;

    assert_eq!(document.name, "reviews");
    assert_eq!(document.headers, vec!["text".to_string(), "author".to_string()]);
    assert_eq!(document.row_count(), 2);
    assert_eq!(document.rows[0].source_text, "Hello world");
    assert_eq!(document.rows[0].extra_fields, vec!["alice".to_string()]);
    assert_eq!(document.rows[1].source_text, "Good morning");

    Ok(())
}

/// Test that quoted cells may contain commas and line breaks
#[test]
fn test_from_csv_str_withQuotedCells_shouldPreserveContent() -> Result<()> {
    let content = "text,author\n\"Hello,\nworld\",alice\n";

    let document = Document::from_csv_str("quoted", content)?;

    assert_eq!(document.row_count(), 1);
    assert_eq!(document.rows[0].source_text, "Hello,\nworld");
    assert_eq!(document.rows[0].extra_fields, vec!["alice".to_string()]);

    Ok(())
}

/// Test that rows with a different field count are rejected
#[test]
fn test_from_csv_str_withRaggedRows_shouldFail() {
    let content = "text,author\nHello world,alice,extra\n";

    let result = Document::from_csv_str("ragged", content);

    assert!(result.is_err());
}

/// Test that a header-only table parses with zero rows
#[test]
fn test_from_csv_str_withHeaderOnly_shouldHaveNoRows() -> Result<()> {
    let document = Document::from_csv_str("empty", "text,author\n")?;

    assert_eq!(document.headers.len(), 2);
    assert_eq!(document.row_count(), 0);

    Ok(())
}

/// Test loading a CSV file, the document takes the file stem as its name
#[test]
fn test_from_csv_file_withValidFile_shouldUseFileStemAsName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_csv(&temp_dir.path().to_path_buf(), "reviews.csv")?;

    let document = Document::from_csv_file(&file)?;

    assert_eq!(document.name, "reviews");
    assert_eq!(document.row_count(), 3);

    Ok(())
}

/// Test loading a missing file
#[test]
fn test_from_csv_file_withMissingFile_shouldFail() {
    let result = Document::from_csv_file("does_not_exist.csv");
    assert!(result.is_err());
}

/// Test splitting rows into contiguous chunks
#[test]
fn test_split_into_chunks_withVariousSizes_shouldPreserveOrder() {
    let texts: Vec<String> = (0..120).map(|i| format!("row-{}", i)).collect();
    let refs: Vec<&str> = texts.iter().map(|t| t.as_str()).collect();
    let document = common::make_document("large", &refs);

    let chunks = document.split_into_chunks(50);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].len(), 50);
    assert_eq!(chunks[1].len(), 50);
    assert_eq!(chunks[2].len(), 20);
    assert_eq!(chunks[0][0].source_text, "row-0");
    assert_eq!(chunks[1][0].source_text, "row-50");
    assert_eq!(chunks[2][19].source_text, "row-119");

    // A chunk size larger than the document yields one chunk
    assert_eq!(document.split_into_chunks(500).len(), 1);

    // Zero is clamped to one row per chunk
    assert_eq!(document.split_into_chunks(0).len(), 120);
}

/// Test that an empty document yields no chunks
#[test]
fn test_split_into_chunks_withEmptyDocument_shouldReturnNoChunks() {
    let document = common::make_document("empty", &[]);
    assert!(document.split_into_chunks(50).is_empty());
}

/// Test pairing translations with source rows
#[test]
fn test_from_translations_withMatchingCounts_shouldPairRowsInOrder() {
    let document = common::make_document("reviews", &["Hello", "World"]);

    let translated = TranslatedDocument::from_translations(
        &document,
        "French",
        vec!["Bonjour".to_string(), "Monde".to_string()],
    );

    assert_eq!(translated.name, "reviews");
    assert_eq!(translated.target_language, "French");
    assert_eq!(translated.row_count(), 2);
    assert_eq!(translated.headers.last().unwrap(), "Translated_French");
    assert_eq!(translated.rows[0].0.source_text, "Hello");
    assert_eq!(translated.rows[0].1, "Bonjour");
    assert_eq!(translated.rows[1].1, "Monde");
}

/// Test output naming for multi-word languages
#[test]
fn test_output_naming_withMultiWordLanguage_shouldUnderscoreFileName() {
    let document = common::make_document("data", &["Hello"]);
    let translated = TranslatedDocument::from_translations(
        &document,
        "Simplified Chinese",
        vec!["你好".to_string()],
    );

    // The file name replaces spaces, the column header keeps them
    assert_eq!(translated.output_key(), "data_Simplified_Chinese");
    assert_eq!(translated.output_file_name(), "data_Simplified_Chinese.csv");
    assert_eq!(translated.headers.last().unwrap(), "Translated_Simplified Chinese");
}

/// Test rendering the output table back to CSV
#[test]
fn test_to_csv_string_withTranslations_shouldRoundTrip() -> Result<()> {
    let rows = vec![
        DocumentRow::new("Hello, world", vec!["alice".to_string()]),
        DocumentRow::new("Good morning", vec!["bob".to_string()]),
    ];
    let document = Document::new(
        "reviews",
        vec!["text".to_string(), "author".to_string()],
        rows,
    );
    let translated = TranslatedDocument::from_translations(
        &document,
        "Spanish",
        vec!["Hola, mundo".to_string(), "Buenos días".to_string()],
    );

    let csv_output = translated.to_csv_string()?;

    // Parse the output back and check the shape
    let parsed = Document::from_csv_str("roundtrip", &csv_output)?;
    assert_eq!(
        parsed.headers,
        vec!["text".to_string(), "author".to_string(), "Translated_Spanish".to_string()]
    );
    assert_eq!(parsed.row_count(), 2);
    assert_eq!(parsed.rows[0].source_text, "Hello, world");
    assert_eq!(parsed.rows[0].extra_fields, vec!["alice".to_string(), "Hola, mundo".to_string()]);
    assert_eq!(parsed.rows[1].extra_fields[1], "Buenos días");

    Ok(())
}
