//! Packing several files into a single zip archive.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// Name used when the packed files share no common top-level directory.
pub const DEFAULT_ARCHIVE_NAME: &str = "folder.zip";

pub const ZIP_MIME_TYPE: &str = "application/zip";

/// Pack `(path, bytes)` pairs into an in-memory, deflate-compressed zip.
/// Paths are stored as given, so relative folder structure survives.
pub fn pack_zip(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, bytes) in entries {
        writer.start_file(path.as_str(), options)?;
        writer
            .write_all(bytes)
            .map_err(|e| Error::Encoding(format!("Failed to add \"{}\" to archive: {}", path, e)))?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Derive the archive file name from the common parent directory of `paths`.
///
/// `["reports/a.pdf", "reports/q1/b.txt"]` gives `reports.zip`. Paths without
/// a directory, or with differing top-level directories, give
/// [`DEFAULT_ARCHIVE_NAME`].
pub fn archive_name<S: AsRef<str>>(paths: &[S]) -> String {
    let mut common: Option<&str> = None;

    for path in paths {
        let path = path.as_ref().trim_start_matches('/');
        let Some((top, _)) = path.split_once('/') else {
            return DEFAULT_ARCHIVE_NAME.to_string();
        };
        if top.is_empty() {
            return DEFAULT_ARCHIVE_NAME.to_string();
        }
        match common {
            None => common = Some(top),
            Some(existing) if existing == top => {}
            Some(_) => return DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }

    match common {
        Some(dir) => format!("{}.zip", dir),
        None => DEFAULT_ARCHIVE_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn packs_entries_with_their_paths() {
        let entries = vec![
            ("notes/a.txt".to_string(), b"alpha".to_vec()),
            ("notes/sub/b.txt".to_string(), b"beta".to_vec()),
        ];
        let bytes = pack_zip(&entries).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut contents = String::new();
        archive
            .by_name("notes/sub/b.txt")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "beta");
    }

    #[test]
    fn duplicate_paths_are_an_encoding_error() {
        let entries = vec![
            ("a.txt".to_string(), b"1".to_vec()),
            ("a.txt".to_string(), b"2".to_vec()),
        ];
        let err = pack_zip(&entries).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn archive_name_uses_common_directory() {
        assert_eq!(archive_name(&["reports/a.pdf", "reports/q1/b.txt"]), "reports.zip");
    }

    #[test]
    fn archive_name_falls_back_without_common_directory() {
        assert_eq!(archive_name(&["a/x.txt", "b/y.txt"]), DEFAULT_ARCHIVE_NAME);
        assert_eq!(archive_name(&["x.txt", "y.txt"]), DEFAULT_ARCHIVE_NAME);
        assert_eq!(archive_name::<&str>(&[]), DEFAULT_ARCHIVE_NAME);
    }
}
