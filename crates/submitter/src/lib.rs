//! Drives ledger transactions from simulation to a final status.
//!
//! A transaction is simulated against the ledger, assembled with the padded
//! resource estimate, signed and submitted. Afterwards its status is polled
//! until it settles, bounded by a deadline and a cancellation signal.

pub mod arguments;
pub mod http_client;
pub mod ledger;
pub mod signer;
pub mod submitter;
pub mod transaction;

pub use {
    ledger::{Ledger, RpcError, Status, TransactionResult, jsonrpc::JsonRpcClient},
    signer::Signer,
    submitter::{Config, Error, Padding, Simulation, Submitter, assemble},
    transaction::{Asset, Operation, ScVal, SignedTransaction, Transaction},
};
