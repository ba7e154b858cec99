// NerView - platform/fs.rs
//
// Filesystem helpers: reading analysis input and writing export files.

use crate::util::constants::PLAIN_TEXT_EXTENSIONS;
use crate::util::error::ExportError;
use std::io;
use std::path::{Path, PathBuf};

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// True if the file can be read locally as text rather than uploaded for
/// server-side document parsing. Decided by extension, case-insensitively.
pub fn is_plain_text(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            PLAIN_TEXT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Write an export buffer to `dir/file_name` and return the final path.
///
/// Writes to a sibling temp file first and renames it into place so an
/// interrupted export never leaves a half-written file under the real name.
pub fn write_export(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = dir.join(file_name);
    let tmp = dir.join(format!(".{file_name}.tmp"));

    std::fs::write(&tmp, bytes).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        ExportError::Io {
            path: tmp.clone(),
            source: e,
        }
    })?;

    std::fs::rename(&tmp, &path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        ExportError::Io {
            path: path.clone(),
            source: e,
        }
    })?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Export written");
    Ok(path)
}
