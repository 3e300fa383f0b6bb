//! Ledger transaction model.
//!
//! Transactions are exchanged with the ledger gateway as JSON. The encoding
//! produced by `serde_json` for these types is also what gets hashed and
//! signed, so field order is part of the format.

use {
    serde::{Deserialize, Serialize},
    sha2::{Digest, Sha256},
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Account paying for and authorizing the transaction.
    pub source: String,
    pub sequence: u64,
    /// Total fee in stroops, base fee plus resource fees once assembled.
    pub fee: u64,
    pub operations: Vec<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soroban_data: Option<SorobanData>,
}

impl Transaction {
    /// The hash identifying this transaction on the network with the given
    /// passphrase, hex encoded.
    pub fn hash(&self, network_passphrase: &str) -> String {
        hex::encode(self.signature_payload(network_passphrase))
    }

    /// Bytes that get signed: `sha256(sha256(passphrase) || body)`.
    pub fn signature_payload(&self, network_passphrase: &str) -> [u8; 32] {
        let network_id = Sha256::digest(network_passphrase.as_bytes());
        // Serializing plain structs with string keys cannot fail.
        let body = serde_json::to_vec(self).unwrap_or_default();
        Sha256::new()
            .chain_update(network_id)
            .chain_update(body)
            .finalize()
            .into()
    }

    /// Classic-only transactions go out without simulation.
    pub fn needs_simulation(&self) -> bool {
        self.operations.iter().any(Operation::is_soroban)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Operation {
    /// Installs contract code on the ledger.
    UploadWasm {
        #[serde(with = "hex::serde")]
        wasm: Vec<u8>,
    },
    /// Instantiates previously installed code.
    #[serde(rename_all = "camelCase")]
    CreateContract {
        deployer: String,
        wasm_hash: String,
        #[serde(with = "hex::serde")]
        salt: [u8; 32],
    },
    InvokeContract {
        contract: String,
        function: String,
        args: Vec<ScVal>,
    },
    /// Deploys the contract wrapping a classic asset.
    CreateAssetContract { asset: Asset },
    /// Classic operation letting the source account hold `asset`.
    ChangeTrust { asset: Asset },
}

impl Operation {
    /// Whether the operation runs contract code and so has to be simulated
    /// for its resource footprint.
    pub fn is_soroban(&self) -> bool {
        !matches!(self, Self::ChangeTrust { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ScVal {
    Address(String),
    U32(u32),
    U64(u64),
    I128(i128),
    String(String),
    Bytes(#[serde(with = "hex::serde")] Vec<u8>),
    Vec(Vec<ScVal>),
}

impl From<u32> for ScVal {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<i128> for ScVal {
    fn from(value: i128) -> Self {
        Self::I128(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Asset {
    Native,
    Credit { code: String, issuer: String },
}

impl Asset {
    pub fn code(&self) -> &str {
        match self {
            Self::Native => "XLM",
            Self::Credit { code, .. } => code,
        }
    }
}

/// Resource declaration attached to a transaction after simulation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SorobanData {
    pub resources: Resources,
    pub resource_fee: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    pub instructions: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Hex encoded ed25519 public key.
    pub public_key: String,
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signatures: Vec<Signature>,
}
