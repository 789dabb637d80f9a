//! File name resolution for CSV inputs

use std::path::{Path, PathBuf};

use crate::types::*;

/// Resolve a CSV file name
///
/// A `.csv` extension (any case) is accepted as is, a bare name gets `.csv`
/// appended. A path without a file name is an unnamed slot
/// ([`ErrorKind::UnnamedResource`]), an empty name is [`ErrorKind::NoData`],
/// and any other extension is [`ErrorKind::WrongResourceType`].
pub fn resolve_csv_name(name: &Path) -> LedgerResult<PathBuf> {
    let raw = name.to_string_lossy();
    if raw.trim().is_empty() {
        return Err(LedgerError::new(
            ErrorKind::NoData,
            "No path and no file name provided",
        )
        .crumb("resolve_csv_name"));
    }

    // A trailing separator means the slot names a directory, not a file.
    if raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR) {
        return Err(LedgerError::new(ErrorKind::UnnamedResource, "No file name")
            .with_resource(raw.to_string())
            .crumb("resolve_csv_name"));
    }

    match name.extension().map(|ext| ext.to_string_lossy().to_lowercase()) {
        Some(ext) if ext == "csv" => Ok(name.to_path_buf()),
        None => {
            let mut full = name.as_os_str().to_os_string();
            full.push(".csv");
            tracing::debug!(file = %raw, "no extension, assuming .csv");
            Ok(PathBuf::from(full))
        }
        Some(ext) => Err(LedgerError::new(
            ErrorKind::WrongResourceType,
            format!("File '{}' has an unacceptable extension '.{}'", raw, ext),
        )
        .with_resource(raw.to_string())
        .crumb("resolve_csv_name")),
    }
}

/// Join a slot's file name onto the working directory
///
/// A blank file name keeps the trailing separator so the slot resolves as
/// unnamed rather than as the directory itself.
pub fn slot_path(dir: &Path, file: &str) -> PathBuf {
    if file.trim().is_empty() {
        let mut joined = dir.as_os_str().to_os_string();
        if !joined.is_empty() {
            joined.push(std::path::MAIN_SEPARATOR.to_string());
        }
        PathBuf::from(joined)
    } else {
        dir.join(file)
    }
}
