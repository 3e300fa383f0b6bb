use {
    super::{Account, Ledger, RpcError, SendResponse, SimulateResponse, TransactionResult},
    crate::transaction::{SignedTransaction, Transaction},
    reqwest::Client,
    serde::{Deserialize, de::DeserializeOwned},
    serde_json::json,
    std::{
        sync::atomic::{AtomicU64, Ordering},
        time::Duration,
    },
    url::Url,
};

/// How often read-only calls are attempted before a transport error is
/// returned.
const READ_ATTEMPTS: usize = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Ledger RPC over JSON-RPC 2.0.
pub struct JsonRpcClient {
    client: Client,
    url: Url,
    next_id: AtomicU64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Output<T> {
    Success { result: T },
    Failure { error: ErrorBody },
}

#[derive(Deserialize)]
struct ErrorBody {
    code: i64,
    message: String,
}

impl JsonRpcClient {
    pub fn new(client: Client, url: Url) -> Self {
        Self {
            client,
            url,
            next_id: AtomicU64::new(1),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::trace!(%method, id, "sending rpc request");

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| RpcError::Transport(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| RpcError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(RpcError::Transport(format!("status {status}: {text}")));
        }
        tracing::trace!(%method, id, response = %text, "received rpc response");
        parse_response(&text)
    }

    /// Like [`Self::call`] but retries transport errors. Only for methods
    /// without side effects.
    async fn read<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, RpcError> {
        let mut attempt = 1;
        loop {
            match self.call(method, params.clone()).await {
                Err(err) if err.is_transport() && attempt < READ_ATTEMPTS => {
                    tracing::debug!(?err, %method, attempt, "retrying rpc request");
                    attempt += 1;
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                result => return result,
            }
        }
    }
}

fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T, RpcError> {
    match serde_json::from_str::<Output<T>>(body) {
        Ok(Output::Success { result }) => Ok(result),
        Ok(Output::Failure { error }) => Err(RpcError::Server {
            code: error.code,
            message: error.message,
        }),
        Err(err) => Err(RpcError::Decode(format!(
            "{err}, expected {}",
            std::any::type_name::<T>()
        ))),
    }
}

#[async_trait::async_trait]
impl Ledger for JsonRpcClient {
    async fn account(&self, id: &str) -> Result<Account, RpcError> {
        self.read("getAccount", json!({ "account": id })).await
    }

    async fn simulate(&self, transaction: &Transaction) -> Result<SimulateResponse, RpcError> {
        self.read("simulateTransaction", json!({ "transaction": transaction }))
            .await
    }

    async fn send(&self, transaction: &SignedTransaction) -> Result<SendResponse, RpcError> {
        self.call("sendTransaction", json!({ "transaction": transaction }))
            .await
    }

    async fn transaction(&self, hash: &str) -> Result<TransactionResult, RpcError> {
        self.read("getTransaction", json!({ "hash": hash })).await
    }
}
