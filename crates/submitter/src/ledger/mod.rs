//! The ledger RPC as seen by the submitter.

use {
    crate::transaction::{SignedTransaction, SorobanData, Transaction},
    serde::{Deserialize, Serialize},
};

pub mod jsonrpc;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    /// Current state of an account, most importantly its sequence number.
    async fn account(&self, id: &str) -> Result<Account, RpcError>;

    /// Dry-runs the transaction and returns the resource estimate.
    async fn simulate(&self, transaction: &Transaction) -> Result<SimulateResponse, RpcError>;

    /// Hands a signed transaction to the network.
    async fn send(&self, transaction: &SignedTransaction) -> Result<SendResponse, RpcError>;

    /// Looks up a previously sent transaction by hash.
    async fn transaction(&self, hash: &str) -> Result<TransactionResult, RpcError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Server { code: i64, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RpcError {
    /// Transport failures leave the request's effect unknown; everything else
    /// is a definitive answer from the node.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    Success,
    Failed,
    Error,
    NotFound,
    Duplicate,
    TryAgainLater,
}

impl Status {
    /// The transaction will not change status anymore.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Error)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub sequence: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub min_resource_fee: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_data: Option<SorobanData>,
    /// Return value of the simulated invocation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub status: Status,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub status: Status,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionResult {
    /// Address returned by the transaction, e.g. the id of a newly created
    /// contract.
    pub fn returned_address(&self) -> Option<&str> {
        self.result_meta
            .as_ref()?
            .pointer("/returnValue/address")?
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names() {
        let statuses: Vec<Status> = serde_json::from_str(
            r#"["PENDING","SUCCESS","FAILED","ERROR","NOT_FOUND","DUPLICATE","TRY_AGAIN_LATER"]"#,
        )
        .unwrap();
        let terminal: Vec<_> = statuses.iter().map(|s| s.is_terminal()).collect();
        assert_eq!(terminal, [false, true, true, true, false, false, false]);
    }

    #[test]
    fn extracts_returned_address() {
        let result: TransactionResult = serde_json::from_value(serde_json::json!({
            "status": "SUCCESS",
            "hash": "aa",
            "resultMeta": { "returnValue": { "address": "CNEW" } },
        }))
        .unwrap();
        assert_eq!(result.returned_address(), Some("CNEW"));

        let result = TransactionResult {
            result_meta: Some(serde_json::json!({ "returnValue": null })),
            ..result
        };
        assert_eq!(result.returned_address(), None);
    }
}
