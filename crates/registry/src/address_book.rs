use {
    crate::{
        error::{Entry, NotFound, PersistError},
        storage,
    },
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeMap,
        path::{Path, PathBuf},
    },
};

/// On-disk shape of `<network>.contracts.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contracts {
    #[serde(default)]
    pub ids: BTreeMap<String, String>,
    #[serde(default)]
    pub hashes: BTreeMap<String, String>,
}

/// Contract ids and wasm hashes deployed on one network.
#[derive(Clone, Debug)]
pub struct AddressBook {
    network: String,
    path: PathBuf,
    contracts: Contracts,
}

impl AddressBook {
    /// Name of the file that stores the address book for `network`.
    pub fn file_name(network: &str) -> String {
        format!("{network}.contracts.json")
    }

    /// Loads `<dir>/<network>.contracts.json`. A file that is missing or
    /// cannot be parsed results in an empty address book.
    pub fn load(network: &str, dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(Self::file_name(network));
        let contracts = storage::read_json(&path).unwrap_or_default();
        Self {
            network: network.to_string(),
            path,
            contracts,
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contracts(&self) -> &Contracts {
        &self.contracts
    }

    pub fn contract_id(&self, key: &str) -> Result<&str, NotFound> {
        self.contracts
            .ids
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| self.not_found(Entry::ContractId, key))
    }

    pub fn set_contract_id(&mut self, key: impl Into<String>, id: impl Into<String>) {
        self.contracts.ids.insert(key.into(), id.into());
    }

    pub fn wasm_hash(&self, key: &str) -> Result<&str, NotFound> {
        self.contracts
            .hashes
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| self.not_found(Entry::WasmHash, key))
    }

    pub fn set_wasm_hash(&mut self, key: impl Into<String>, hash: impl Into<String>) {
        self.contracts.hashes.insert(key.into(), hash.into());
    }

    /// Atomically writes the address book back to the file it was loaded
    /// from.
    pub fn persist(&self) -> Result<(), PersistError> {
        storage::write_json_atomic(&self.path, &self.contracts)?;
        tracing::debug!(network = %self.network, path = %self.path.display(), "persisted address book");
        Ok(())
    }

    fn not_found(&self, kind: Entry, key: &str) -> NotFound {
        NotFound {
            kind,
            key: key.to_string(),
            file: self.path.clone(),
        }
    }
}
