use anyhow::{Result, Context};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use std::io::Write;
use once_cell::sync::Lazy;
use regex::Regex;
use zip::{ZipWriter, write::FileOptions, CompressionMethod};

// @module: File and directory utilities

// @const: A line of at least two comma-separated cells
static DELIMITED_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^,\r\n]*(,[^,\r\n]*)+$").unwrap()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(&normalized_ext[1..]) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect whether a file is a tabular (CSV) input
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        // Check file extension first
        if let Some(ext) = path.extension() {
            if ext.to_string_lossy().eq_ignore_ascii_case("csv") {
                return Ok(FileType::Tabular);
            }
        }

        // Fall back to examining file contents: the first two non-empty
        // lines both looking comma-delimited is treated as tabular
        if let Ok(content) = fs::read_to_string(path) {
            let mut delimited_lines = 0;
            for line in content.lines().filter(|line| !line.trim().is_empty()).take(2) {
                if DELIMITED_LINE_REGEX.is_match(line) {
                    delimited_lines += 1;
                }
            }
            if delimited_lines == 2 {
                return Ok(FileType::Tabular);
            }
        }

        Ok(FileType::Unknown)
    }

    /// Package a set of files into a single zip archive
    ///
    /// Entry names are the original file names, directory structure is not
    /// preserved.
    pub fn zip_files<P: AsRef<Path>>(files: &[PathBuf], archive_path: P) -> Result<PathBuf> {
        let archive_path = archive_path.as_ref();
        if let Some(parent) = archive_path.parent() {
            Self::ensure_dir(parent)?;
        }

        let file = File::create(archive_path)
            .with_context(|| format!("Failed to create archive: {:?}", archive_path))?;
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for path in files {
            let entry_name = path.file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "output.csv".to_string());
            let content = fs::read(path)
                .with_context(|| format!("Failed to read file for archiving: {:?}", path))?;

            zip.start_file(entry_name, options)
                .context("Failed to add archive entry")?;
            zip.write_all(&content)
                .context("Failed to write archive entry")?;
        }

        zip.finish().context("Failed to finalize archive")?;
        Ok(archive_path.to_path_buf())
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Tabular (CSV) input file
    Tabular,
    /// Unknown file type
    Unknown,
}
