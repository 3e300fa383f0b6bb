use {
    crate::{error::PersistError, storage},
    serde::{Deserialize, Serialize},
    std::path::{Path, PathBuf},
};

/// File holding the curated test token list.
pub const TOKENS_FILE: &str = "tokens.json";
/// File holding tokens deployed with generated names.
pub const RANDOM_TOKENS_FILE: &str = "random_tokens.json";

/// Networks that always have a partition, even when empty.
const DEFAULT_NETWORKS: [&str; 3] = ["mainnet", "testnet", "standalone"];

/// A token as listed for wallets and front ends.
///
/// Older files use `symbol`, `address` and `logoURI`; those names are
/// accepted when loading and the canonical names are written back.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Token {
    pub name: String,
    #[serde(alias = "symbol")]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(alias = "address")]
    pub contract: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, alias = "logoURI", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub decimals: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkTokens {
    pub network: String,
    #[serde(default, alias = "assets")]
    pub tokens: Vec<Token>,
}

impl NetworkTokens {
    fn empty(network: &str) -> Self {
        Self {
            network: network.to_string(),
            tokens: Vec::new(),
        }
    }

    fn contains(&self, contract: &str) -> bool {
        self.tokens.iter().any(|token| token.contract == contract)
    }
}

/// Per-network token lists backed by one JSON file.
#[derive(Clone, Debug)]
pub struct TokenBook {
    path: PathBuf,
    networks: Vec<NetworkTokens>,
}

impl TokenBook {
    /// Loads `<dir>/<file_name>`. Missing or unparsable files yield a book
    /// with empty default partitions.
    pub fn load(dir: impl AsRef<Path>, file_name: &str) -> Self {
        let path = dir.as_ref().join(file_name);
        let mut networks: Vec<NetworkTokens> = storage::read_json(&path).unwrap_or_default();
        for network in DEFAULT_NETWORKS {
            if !networks.iter().any(|n| n.network == network) {
                networks.push(NetworkTokens::empty(network));
            }
        }
        Self { path, networks }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn networks(&self) -> &[NetworkTokens] {
        &self.networks
    }

    /// Tokens listed for `network`, empty if the network is unknown.
    pub fn tokens(&self, network: &str) -> &[Token] {
        self.networks
            .iter()
            .find(|n| n.network == network)
            .map(|n| n.tokens.as_slice())
            .unwrap_or_default()
    }

    /// Appends `token` unless a token with the same contract is already
    /// listed for `network`. Returns whether the token was added.
    pub fn add_token(&mut self, network: &str, token: Token) -> bool {
        let partition = self.partition_mut(network);
        if partition.contains(&token.contract) {
            return false;
        }
        partition.tokens.push(token);
        true
    }

    /// Like [`Self::add_token`] but inserts at the front of the list.
    pub fn prepend_token(&mut self, network: &str, token: Token) -> bool {
        let partition = self.partition_mut(network);
        if partition.contains(&token.contract) {
            return false;
        }
        partition.tokens.insert(0, token);
        true
    }

    /// Clears the token list of `network` only.
    pub fn reset_network(&mut self, network: &str) {
        self.partition_mut(network).tokens.clear();
    }

    /// Atomically rewrites the whole file.
    pub fn persist(&self) -> Result<(), PersistError> {
        storage::write_json_atomic(&self.path, &self.networks)?;
        tracing::debug!(path = %self.path.display(), "persisted token book");
        Ok(())
    }

    fn partition_mut(&mut self, network: &str) -> &mut NetworkTokens {
        let index = match self.networks.iter().position(|n| n.network == network) {
            Some(index) => index,
            None => {
                self.networks.push(NetworkTokens::empty(network));
                self.networks.len() - 1
            }
        };
        &mut self.networks[index]
    }
}
