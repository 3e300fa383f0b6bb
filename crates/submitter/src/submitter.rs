use {
    crate::{
        ledger::{Ledger, RpcError, SendResponse, Status, TransactionResult},
        signer::Signer,
        transaction::{Operation, SignedTransaction, SorobanData, Transaction},
    },
    std::{sync::Arc, time::Duration},
    tokio::sync::watch,
};

/// Margins added on top of the simulated resource estimate. Simulation runs
/// against a slightly older ledger state, so the real execution can need a
/// bit more.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Padding {
    pub instructions: u64,
    pub resource_fee: u64,
    pub min_resource_fee: u64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            instructions: 500_000,
            resource_fee: 100_000,
            min_resource_fee: 10_000_000,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub network_passphrase: String,
    /// Inclusion fee per transaction in stroops.
    pub base_fee: u64,
    pub padding: Padding,
    pub poll_interval: Duration,
    /// Upper bound on how long to wait for a submitted transaction.
    pub max_wait: Duration,
}

impl Config {
    pub fn new(network_passphrase: impl Into<String>) -> Self {
        Self {
            network_passphrase: network_passphrase.into(),
            base_fee: 100,
            padding: Padding::default(),
            poll_interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("simulation failed: {0}")]
    Simulation(String),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("ledger is busy, try again later")]
    TryAgainLater,
    #[error("transaction {hash} did not finish within {waited:?}")]
    Timeout { hash: String, waited: Duration },
    #[error("cancelled while waiting for transaction {hash}")]
    Cancelled { hash: String },
}

/// Takes transactions through simulate, assemble, sign, submit and poll.
#[derive(Clone)]
pub struct Submitter {
    ledger: Arc<dyn Ledger>,
    config: Config,
    cancel: watch::Receiver<bool>,
}

impl Submitter {
    /// `cancel` aborts polling as soon as it holds `true`. A closed channel
    /// never cancels.
    pub fn new(ledger: Arc<dyn Ledger>, config: Config, cancel: watch::Receiver<bool>) -> Self {
        Self {
            ledger,
            config,
            cancel,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    /// Builds an unsimulated transaction for `source` using its next
    /// sequence number.
    pub async fn build(
        &self,
        source: &str,
        operations: Vec<Operation>,
    ) -> Result<Transaction, Error> {
        let account = self.ledger.account(source).await?;
        Ok(Transaction {
            source: source.to_string(),
            sequence: account.sequence + 1,
            fee: self.config.base_fee,
            operations,
            soroban_data: None,
        })
    }

    /// Dry-runs the transaction. A rejected simulation is final.
    pub async fn simulate(&self, transaction: &Transaction) -> Result<Simulation, Error> {
        let response = self.ledger.simulate(transaction).await?;
        if let Some(err) = response.error {
            tracing::warn!(%err, "transaction simulation failed");
            return Err(Error::Simulation(err));
        }
        let data = response
            .transaction_data
            .ok_or_else(|| Error::Simulation("no transaction data in simulation".to_string()))?;
        Ok(Simulation {
            min_resource_fee: response.min_resource_fee,
            data,
            result: response.result,
        })
    }

    /// Simulates and assembles without signing, for inspecting what would
    /// be submitted.
    pub async fn simulate_only(&self, transaction: Transaction) -> Result<Transaction, Error> {
        let simulation = self.simulate(&transaction).await?;
        Ok(assemble(transaction, &simulation, &self.config.padding))
    }

    /// Hands the signed transaction to the ledger. Never retried.
    pub async fn submit(&self, signed: &SignedTransaction) -> Result<SendResponse, Error> {
        let response = self.ledger.send(signed).await?;
        tracing::debug!(hash = %response.hash, status = ?response.status, "submitted transaction");
        match response.status {
            Status::TryAgainLater => Err(Error::TryAgainLater),
            _ => Ok(response),
        }
    }

    /// Polls the transaction until it reaches a terminal status.
    pub async fn poll_until_terminal(&self, hash: &str) -> Result<TransactionResult, Error> {
        let mut cancel = self.cancel.clone();
        tokio::select! {
            result = self.poll(hash) => result,
            _ = tokio::time::sleep(self.config.max_wait) => Err(Error::Timeout {
                hash: hash.to_string(),
                waited: self.config.max_wait,
            }),
            _ = cancelled(&mut cancel) => Err(Error::Cancelled {
                hash: hash.to_string(),
            }),
        }
    }

    async fn poll(&self, hash: &str) -> Result<TransactionResult, Error> {
        loop {
            match self.ledger.transaction(hash).await {
                Ok(result) if result.status.is_terminal() => return Ok(result),
                Ok(result) => {
                    tracing::debug!(%hash, status = ?result.status, "waiting for transaction");
                }
                // The transaction is already out, so a flaky node should not
                // make us forget about it.
                Err(err) if err.is_transport() => {
                    tracing::warn!(?err, %hash, "failed to fetch transaction status");
                }
                Err(err) => return Err(err.into()),
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// Runs the whole pipeline. `FAILED` and `ERROR` outcomes are returned
    /// as results, not errors. Transactions without contract operations skip
    /// simulation.
    pub async fn execute(
        &self,
        transaction: Transaction,
        signer: &Signer,
    ) -> Result<TransactionResult, Error> {
        let prepared = if transaction.needs_simulation() {
            self.simulate_only(transaction).await?
        } else {
            transaction
        };
        let signed = signer.sign(prepared, &self.config.network_passphrase);
        // Nothing new goes out once cancelled.
        if *self.cancel.borrow() {
            return Err(Error::Cancelled {
                hash: signed.transaction.hash(&self.config.network_passphrase),
            });
        }
        let sent = self.submit(&signed).await?;
        if sent.status == Status::Error {
            return Ok(TransactionResult {
                status: Status::Error,
                hash: sent.hash,
                result_meta: None,
                error: sent.error,
            });
        }
        let result = self.poll_until_terminal(&sent.hash).await?;
        tracing::debug!(hash = %result.hash, status = ?result.status, "transaction finished");
        Ok(result)
    }
}

/// Simulation outcome of a transaction that passed the dry-run.
#[derive(Clone, Debug, PartialEq)]
pub struct Simulation {
    pub min_resource_fee: u64,
    pub data: SorobanData,
    pub result: Option<serde_json::Value>,
}

/// Attaches the padded simulation estimate to the transaction.
pub fn assemble(
    mut transaction: Transaction,
    simulation: &Simulation,
    padding: &Padding,
) -> Transaction {
    let mut data = simulation.data.clone();
    data.resources.instructions = data
        .resources
        .instructions
        .saturating_add(padding.instructions);
    data.resource_fee = data.resource_fee.saturating_add(padding.resource_fee);
    transaction.fee = transaction
        .fee
        .saturating_add(simulation.min_resource_fee)
        .saturating_add(padding.min_resource_fee);
    transaction.soroban_data = Some(data);
    transaction
}

/// Resolves once the flag is set. Never resolves if the sender is gone.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}
