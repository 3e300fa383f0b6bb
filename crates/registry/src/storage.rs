use {
    crate::error::PersistError,
    serde::{Serialize, de::DeserializeOwned},
    std::{io::Write, path::Path},
};

/// Reads and parses a JSON file. A missing file yields `None` silently, any
/// other failure is logged and also yields `None`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "registry file does not exist");
            return None;
        }
        Err(err) => {
            tracing::warn!(?err, path = %path.display(), "failed to read registry file");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(?err, path = %path.display(), "ignoring unparsable registry file");
            None
        }
    }
}

/// Serializes `value` as pretty JSON into a temporary file next to `path` and
/// renames it into place, so readers never observe a partial write.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    let content = serde_json::to_string_pretty(value)?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    file.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}
