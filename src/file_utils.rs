use anyhow::{Context, Result, anyhow};
use chrono::Local;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::manifest::MANIFEST_SUFFIX;

// @module: File and directory utilities

/// File name suffix of composed timeline outputs
pub const TIMELINE_SUFFIX: &str = ".timeline.json";

/// File name suffix of the caption sidecar
pub const SRT_SUFFIX: &str = ".srt";

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

    /// Base name of an assembly, with the manifest suffix (or a plain
    /// `.json` extension) stripped
    pub fn assembly_stem<P: AsRef<Path>>(manifest_path: P) -> String {
        let path = manifest_path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match name.strip_suffix(MANIFEST_SUFFIX) {
            Some(stem) => stem.to_string(),
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }

    // @generates: Output path for a composed artifact
    // @params: manifest_path, output_dir, suffix
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        manifest_path: P1,
        output_dir: P2,
        suffix: &str,
    ) -> PathBuf {
        let mut output_filename = Self::assembly_stem(manifest_path);
        output_filename.push_str(suffix);
        output_dir.as_ref().join(output_filename)
    }

    /// Find assembly manifests under a directory, sorted by path
    pub fn find_manifest_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .file_name()
                    .map(|n| n.to_string_lossy().ends_with(MANIFEST_SUFFIX))
                    .unwrap_or(false)
            {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
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

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Get current timestamp
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        // Open file in append mode, create if it doesn't exist
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        // Write content with timestamp
        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write a string to a file atomically: the content lands in a
    /// temporary file first and is renamed into place, so a crash never
    /// leaves a half-written artifact behind
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = path.parent().unwrap_or(Path::new("."));
        Self::ensure_dir(parent)?;

        let mut staged = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to stage write for: {}", path.display()))?;
        staged
            .write_all(content.as_bytes())
            .with_context(|| format!("Failed to write staged content for: {}", path.display()))?;
        staged
            .persist(path)
            .map_err(|e| anyhow!("Failed to persist {}: {}", path.display(), e))?;

        Ok(())
    }
}
