//! Deployment plans run by the `deployer` binary.

use {
    crate::{config::Network, friendbot::Friendbot, policy::ErrorPolicy, tooling::Tooling},
    std::path::{Path, PathBuf},
};

mod deploy;
mod liquidity;
mod publish;
mod tokens;
mod trustlines;

pub use {
    deploy::deploy,
    liquidity::{add_liquidity, generate_paths, liquidity, mint, swap},
    publish::publish,
    tokens::{TokenNames, deploy_classic_tokens, deploy_test_tokens, tokens},
    trustlines::trustlines,
};

/// Everything a plan needs to act on one network.
pub struct Deployment {
    pub network: Network,
    pub tooling: Tooling,
    pub friendbot: Option<Friendbot>,
    /// Directory holding the address and token books.
    pub registry_dir: PathBuf,
    /// Directory holding the compiled contracts.
    pub wasm_dir: PathBuf,
    pub policy: ErrorPolicy,
    /// How many Soroban test tokens `deploy` lists on test networks.
    pub test_tokens: usize,
    /// How many liquidity paths `deploy` seeds between the test tokens.
    pub liquidity_paths: usize,
    /// How many classic assets `deploy` appends to the test tokens.
    pub classic_tokens: usize,
    /// How many tokens `deploy` lists in `random_tokens.json`.
    pub random_tokens: usize,
}

impl Deployment {
    fn wasm_path(&self, contract: &str) -> PathBuf {
        wasm_path(&self.wasm_dir, contract)
    }
}

/// File name of a compiled contract.
pub fn wasm_path(dir: &Path, contract: &str) -> PathBuf {
    match contract {
        "token" => dir.join("soroban_token_contract.wasm"),
        name => dir.join(format!("soroswap_{name}.wasm")),
    }
}
