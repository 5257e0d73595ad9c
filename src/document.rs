use std::path::Path;
use anyhow::{Result, Context};
use csv::{ReaderBuilder, WriterBuilder};
use log::debug;

use crate::errors::DocumentError;

// @module: Tabular document parsing, chunking and output generation

// @struct: Single data row of a tabular document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    // @field: Text of the designated source column (the first column)
    pub source_text: String,

    // @field: Remaining columns, in original order
    pub extra_fields: Vec<String>,
}

impl DocumentRow {
    /// Creates a new row - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(source_text: impl Into<String>, extra_fields: Vec<String>) -> Self {
        DocumentRow {
            source_text: source_text.into(),
            extra_fields,
        }
    }
}

// @struct: Ordered tabular document with a designated source-text column
#[derive(Debug, Clone)]
pub struct Document {
    // @field: Document identifier, the input file stem
    pub name: String,

    // @field: Header row of the source table
    pub headers: Vec<String>,

    // @field: Ordered data rows
    pub rows: Vec<DocumentRow>,
}

impl Document {
    /// Creates a new document from parts
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<DocumentRow>) -> Self {
        Document {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Parse a CSV string into a document
    ///
    /// The first column is the source-text column; every other column is
    /// carried through untouched. Quoted cells may contain line breaks.
    pub fn from_csv_str(name: impl Into<String>, content: &str) -> Result<Self, DocumentError> {
        let mut reader = ReaderBuilder::new().from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()
            .map_err(|e| DocumentError::ParseError(e.to_string()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| DocumentError::ParseError(e.to_string()))?;
            let mut fields = record.iter().map(|f| f.to_string());
            let source_text = fields.next().unwrap_or_default();
            rows.push(DocumentRow {
                source_text,
                extra_fields: fields.collect(),
            });
        }

        Ok(Document::new(name, headers, rows))
    }

    /// Read and parse a CSV file, using the file stem as the document name
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path.file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;

        let document = Self::from_csv_str(name, &content)
            .with_context(|| format!("Failed to parse CSV file: {:?}", path))?;

        debug!("Loaded '{}': {} rows, {} columns",
            document.name, document.rows.len(), document.headers.len());
        Ok(document)
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Split the rows into contiguous windows of at most `max_rows`
    ///
    /// Order is preserved and the last window may be smaller. Zero rows
    /// yield zero windows; empty documents are handled upstream.
    pub fn split_into_chunks(&self, max_rows: usize) -> Vec<&[DocumentRow]> {
        if self.rows.is_empty() {
            return Vec::new();
        }

        // Guard against a zero size slipping past config validation
        let effective_max = max_rows.max(1);
        self.rows.chunks(effective_max).collect()
    }
}

// @struct: A document plus its translation column
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    // @field: Source document name
    pub name: String,

    // @field: Target language the rows were translated into
    pub target_language: String,

    // @field: Original headers plus the added translation column
    pub headers: Vec<String>,

    // @field: (source row, translated text) pairs in original order
    pub rows: Vec<(DocumentRow, String)>,
}

impl TranslatedDocument {
    /// Pair each source row with its translated text
    ///
    /// Callers guarantee `translations.len() == document.rows.len()`; the
    /// chunk loop produces exactly one output string per input row.
    pub fn from_translations(document: &Document, target_language: &str, translations: Vec<String>) -> Self {
        let mut headers = document.headers.clone();
        headers.push(format!("Translated_{}", target_language));

        TranslatedDocument {
            name: document.name.clone(),
            target_language: target_language.to_string(),
            headers,
            rows: document.rows.iter().cloned().zip(translations).collect(),
        }
    }

    /// Number of output rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Report key for this output, `<name>_<language with underscores>`
    pub fn output_key(&self) -> String {
        format!("{}_{}", self.name, self.target_language.replace(' ', "_"))
    }

    /// Derived output file name, `<name>_<language with underscores>.csv`
    pub fn output_file_name(&self) -> String {
        format!("{}.csv", self.output_key())
    }

    /// Render the output table as a CSV string
    pub fn to_csv_string(&self) -> Result<String, DocumentError> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());

        writer.write_record(&self.headers)
            .map_err(|e| DocumentError::WriteError(e.to_string()))?;

        for (row, translated) in &self.rows {
            let mut record: Vec<&str> = Vec::with_capacity(row.extra_fields.len() + 2);
            record.push(row.source_text.as_str());
            record.extend(row.extra_fields.iter().map(|f| f.as_str()));
            record.push(translated.as_str());
            writer.write_record(&record)
                .map_err(|e| DocumentError::WriteError(e.to_string()))?;
        }

        let bytes = writer.into_inner()
            .map_err(|e| DocumentError::WriteError(e.to_string()))?;
        String::from_utf8(bytes)
            .map_err(|e| DocumentError::WriteError(e.to_string()))
    }
}
