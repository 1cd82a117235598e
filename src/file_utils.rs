use anyhow::{Result, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Screenplay markup file extensions
pub const SCRIPT_EXTENSIONS: &[&str] = &["fountain", "spmd"];

// @const: Scene heading at the start of a line, for content sniffing
static SCENE_HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:INT|EXT|EST|INT\./EXT|INT/EXT|I/E)[. ]").unwrap()
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

    // @generates: Output path for a processed script
    // @params: input_file, output_dir, suffix, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        if !suffix.is_empty() {
            output_filename.push('.');
            output_filename.push_str(suffix);
        }
        output_filename.push('.');
        output_filename.push_str(extension);

        output_dir.join(output_filename)
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Find every screenplay file in a directory
    pub fn find_scripts<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut scripts = Vec::new();
        for ext in SCRIPT_EXTENSIONS {
            scripts.append(&mut Self::find_files(dir.as_ref(), ext)?);
        }
        scripts.sort();
        Ok(scripts)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file. The content goes to a temporary file in the
    /// same directory first, which then replaces the target.
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to file: {:?}", path))?;
        temp.persist(path)
            .with_context(|| format!("Failed to replace file: {:?}", path))?;

        Ok(())
    }

    /// Detect whether a file holds screenplay markup
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        // Check file extension
        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();
            if SCRIPT_EXTENSIONS.contains(&ext_str.as_str()) {
                return Ok(FileType::Screenplay);
            }
        }

        // Fall back to examining file contents
        if let Ok(content) = fs::read_to_string(path) {
            if SCENE_HEADING_REGEX.is_match(&content) {
                return Ok(FileType::Screenplay);
            }
            return Ok(FileType::Text);
        }

        // Default to unknown if we couldn't determine the type
        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Screenplay markup file
    Screenplay,
    /// Readable text without screenplay structure
    Text,
    /// Binary or unreadable file
    Unknown,
}
