//! File ingestion: validation, folder packing, and base64 encoding.
//!
//! A selection arrives as one or more [`InputFile`]s (bytes plus name and
//! type metadata) and leaves as a single [`SelectedFile`] ready to be sent
//! inline to the model. Any failure aborts the whole selection.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use tracing::debug;

use crate::archive::{self, ZIP_MIME_TYPE};
use crate::error::{Error, Result};

/// Largest accepted file, applied to every file in a selection.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Document types accepted as a single, non-archive upload.
pub const ALLOWED_MIME_TYPES: [&str; 4] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

const ARCHIVE_MIME_TYPES: [&str; 2] = ["application/zip", "application/x-zip-compressed"];

/// A raw file as handed over by whatever picked it (file dialog, dropped
/// path, directory walk).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    /// Path inside a picked folder, e.g. `reports/q1/summary.txt`.
    pub relative_path: Option<String>,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    /// Create a file, guessing its MIME type from the name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = guess_mime_type(&name);
        Self {
            name,
            relative_path: None,
            mime_type,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_archive(&self) -> bool {
        self.name.to_lowercase().ends_with(".zip")
            || ARCHIVE_MIME_TYPES.contains(&self.mime_type.as_str())
    }
}

/// The document currently attached to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub content_base64: String,
}

/// Turn a selection into one encoded file.
///
/// A lone file without a folder path is validated by type and size; archives
/// skip the type check. Anything else is treated as a folder and zipped.
pub fn ingest(mut files: Vec<InputFile>) -> Result<SelectedFile> {
    if files.is_empty() {
        return Err(Error::Validation("No files were selected.".to_string()));
    }

    if files.len() == 1 && files[0].relative_path.is_none() {
        let file = files.remove(0);
        ingest_single(file)
    } else {
        ingest_folder(files)
    }
}

fn ingest_single(file: InputFile) -> Result<SelectedFile> {
    validate_size(&file.name, file.size())?;

    let mime_type = if file.is_archive() {
        ZIP_MIME_TYPE.to_string()
    } else {
        validate_type(&file)?;
        file.mime_type.clone()
    };

    debug!(name = %file.name, %mime_type, size = file.size(), "encoding single file");

    Ok(SelectedFile {
        size_bytes: file.size(),
        content_base64: BASE64.encode(&file.bytes),
        name: file.name,
        mime_type,
    })
}

fn ingest_folder(files: Vec<InputFile>) -> Result<SelectedFile> {
    for file in &files {
        validate_size(&file.name, file.size())?;
    }

    let entries: Vec<(String, Vec<u8>)> = files
        .into_iter()
        .map(|f| (f.relative_path.unwrap_or(f.name), f.bytes))
        .collect();

    let paths: Vec<&str> = entries.iter().map(|(path, _)| path.as_str()).collect();
    let name = archive::archive_name(&paths);

    let bytes = archive::pack_zip(&entries)?;
    debug!(%name, files = entries.len(), size = bytes.len(), "packed folder");

    Ok(SelectedFile {
        name,
        mime_type: ZIP_MIME_TYPE.to_string(),
        size_bytes: bytes.len() as u64,
        content_base64: BASE64.encode(&bytes),
    })
}

pub fn validate_size(name: &str, size: u64) -> Result<()> {
    if size > MAX_FILE_SIZE {
        return Err(Error::Validation(format!(
            "\"{}\" is too large ({}). The maximum file size is {}.",
            name,
            format_size(size),
            format_size(MAX_FILE_SIZE)
        )));
    }
    Ok(())
}

pub fn validate_type(file: &InputFile) -> Result<()> {
    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(Error::Validation(format!(
            "Invalid file type for \"{}\" ({}). Please upload a PDF, DOC, DOCX or TXT file, a .zip archive, or a folder.",
            file.name, file.mime_type
        )));
    }
    Ok(())
}

pub fn guess_mime_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Human-readable size with binary units, e.g. `2.0 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if value.fract() == 0.0 {
        format!("{} {}", value as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Read a file or a whole directory from disk.
///
/// Directories are walked recursively; each file gets a relative path rooted
/// at the directory's own name so the archive keeps that folder. Hidden
/// entries are skipped. Oversized files are rejected before being read.
pub async fn load_path(path: &Path) -> Result<Vec<InputFile>> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| Error::Encoding(format!("Cannot open \"{}\": {}", path.display(), e)))?;

    if metadata.is_dir() {
        load_directory(path).await
    } else {
        let name = file_name(path);
        let file = load_file(path, name, None, metadata.len()).await?;
        Ok(vec![file])
    }
}

async fn load_directory(root: &Path) -> Result<Vec<InputFile>> {
    let root_name = match tokio::fs::canonicalize(root).await {
        Ok(canonical) => file_name(&canonical),
        Err(_) => file_name(root),
    };

    let mut pending = vec![root.to_path_buf()];
    let mut found = Vec::new();

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() {
                found.push(entry.path());
            } else if file_type.is_symlink() {
                // Follow links to files only
                match tokio::fs::metadata(entry.path()).await {
                    Ok(target) if target.is_file() => found.push(entry.path()),
                    _ => debug!(path = %entry.path().display(), "skipping symlink"),
                }
            }
        }
    }

    if found.is_empty() {
        return Err(Error::Validation(format!(
            "The folder \"{}\" contains no files.",
            root_name
        )));
    }

    found.sort();

    let mut files = Vec::with_capacity(found.len());
    for path in found {
        let inner = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let relative_path = format!("{}/{}", root_name, inner);
        let size = tokio::fs::metadata(&path).await?.len();
        files.push(load_file(&path, file_name(&path), Some(relative_path), size).await?);
    }

    Ok(files)
}

async fn load_file(
    path: &Path,
    name: String,
    relative_path: Option<String>,
    size: u64,
) -> Result<InputFile> {
    validate_size(&name, size)?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::Encoding(format!("Failed to read \"{}\": {}", name, e)))?;

    let file = InputFile::new(name, bytes);
    Ok(match relative_path {
        Some(relative) => file.with_relative_path(relative),
        None => file,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "folder".to_string())
}

/// Clean up a path pasted or dropped into a terminal: surrounding quotes,
/// `file://` URLs, and backslash-escaped spaces. Only the first line is used.
pub fn normalize_dropped_path(raw: &str) -> PathBuf {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");

    let unquoted = line
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| line.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(line);

    let without_scheme = match unquoted.strip_prefix("file://") {
        Some(rest) => rest.replace("%20", " "),
        None => unquoted.to_string(),
    };

    PathBuf::from(without_scheme.replace("\\ ", " "))
}
