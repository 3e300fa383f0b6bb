//! In-memory ledger for exercising deployment plans.

use {
    crate::tooling::Tooling,
    std::sync::{Arc, Mutex},
    submitter::{
        Config,
        Ledger,
        Operation,
        RpcError,
        SignedTransaction,
        Signer,
        Status,
        Submitter,
        Transaction,
        TransactionResult,
        ledger::{Account, SendResponse, SimulateResponse},
        transaction::SorobanData,
    },
    tokio::sync::watch,
};

pub const ADMIN_SECRET: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

/// Accepts every transaction. Contract creations return `C<n>` addresses.
/// Invocations of the configured function end with `FAILED`.
#[derive(Default)]
pub struct FakeLedger {
    failing_function: Option<String>,
    sent: Mutex<Vec<TransactionResult>>,
    operations: Mutex<Vec<Operation>>,
    sources: Mutex<Vec<String>>,
}

impl FakeLedger {
    pub fn failing(function: &str) -> Self {
        Self {
            failing_function: Some(function.to_string()),
            ..Default::default()
        }
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.operations.lock().unwrap().clone()
    }

    /// Source account of every sent transaction, in order.
    pub fn sources(&self) -> Vec<String> {
        self.sources.lock().unwrap().clone()
    }

    /// Invocations of `function`, in order.
    pub fn invocations(&self, function: &str) -> Vec<(String, Vec<submitter::ScVal>)> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                Operation::InvokeContract {
                    contract,
                    function: f,
                    args,
                } if f == function => Some((contract, args)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl Ledger for FakeLedger {
    async fn account(&self, id: &str) -> Result<Account, RpcError> {
        Ok(Account {
            id: id.to_string(),
            sequence: self.operations.lock().unwrap().len() as u64,
        })
    }

    async fn simulate(&self, _: &Transaction) -> Result<SimulateResponse, RpcError> {
        Ok(SimulateResponse {
            min_resource_fee: 1_000,
            transaction_data: Some(SorobanData::default()),
            ..Default::default()
        })
    }

    async fn send(&self, signed: &SignedTransaction) -> Result<SendResponse, RpcError> {
        let mut operations = self.operations.lock().unwrap();
        let mut sent = self.sent.lock().unwrap();
        let hash = format!("{:064x}", sent.len());
        let operation = signed.transaction.operations[0].clone();
        let (status, result_meta) = match &operation {
            Operation::CreateContract { .. } | Operation::CreateAssetContract { .. } => (
                Status::Success,
                Some(serde_json::json!({
                    "returnValue": { "address": format!("C{}", operations.len()) }
                })),
            ),
            Operation::InvokeContract { function, .. }
                if self.failing_function.as_ref() == Some(function) =>
            {
                (Status::Failed, None)
            }
            _ => (Status::Success, None),
        };
        operations.push(operation);
        self.sources
            .lock()
            .unwrap()
            .push(signed.transaction.source.clone());
        sent.push(TransactionResult {
            status,
            hash: hash.clone(),
            result_meta,
            error: None,
        });
        Ok(SendResponse {
            status: Status::Pending,
            hash,
            error: None,
        })
    }

    async fn transaction(&self, hash: &str) -> Result<TransactionResult, RpcError> {
        let sent = self.sent.lock().unwrap();
        Ok(sent
            .iter()
            .find(|result| result.hash == hash)
            .cloned()
            .unwrap_or(TransactionResult {
                status: Status::NotFound,
                hash: hash.to_string(),
                result_meta: None,
                error: None,
            }))
    }
}

pub fn tooling(ledger: Arc<FakeLedger>) -> Tooling {
    // The sender is dropped, so nothing is ever cancelled.
    let (_, cancel) = watch::channel(false);
    let submitter = Submitter::new(ledger, Config::new("Test Network"), cancel);
    Tooling::new(submitter, Signer::from_secret(ADMIN_SECRET).unwrap())
}
