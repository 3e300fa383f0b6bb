use std::path::PathBuf;

/// A key was looked up that was never set.
#[derive(Debug, thiserror::Error)]
#[error("{kind} for {key:?} not found in {}", file.display())]
pub struct NotFound {
    pub kind: Entry,
    pub key: String,
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entry {
    ContractId,
    WasmHash,
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ContractId => "contract id",
            Self::WasmHash => "wasm hash",
        })
    }
}

/// Writing a registry file failed. The previous file contents (if any) are
/// left untouched.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
