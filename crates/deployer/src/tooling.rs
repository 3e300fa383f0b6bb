//! Contract operations on top of the submitter: installing code, creating
//! instances and invoking them, all signed by the admin account.

use {
    registry::AddressBook,
    sha2::{Digest, Sha256},
    std::path::{Path, PathBuf},
    submitter::{
        Asset,
        Operation,
        ScVal,
        Signer,
        Status,
        Submitter,
        TransactionResult,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read wasm {}: {source}", path.display())]
    Wasm {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Submit(#[from] submitter::Error),
    #[error("transaction {hash} ended with status {status:?}: {}", error.as_deref().unwrap_or("no details"))]
    Failed {
        hash: String,
        status: Status,
        error: Option<String>,
    },
    #[error("transaction {hash} did not return a contract address")]
    MissingAddress { hash: String },
    #[error(transparent)]
    NotFound(#[from] registry::NotFound),
}

pub struct Tooling {
    submitter: Submitter,
    admin: Signer,
}

impl Tooling {
    pub fn new(submitter: Submitter, admin: Signer) -> Self {
        Self { submitter, admin }
    }

    pub fn admin(&self) -> &Signer {
        &self.admin
    }

    /// Uploads the wasm at `path` and records its hash under `name`.
    pub async fn install_code(
        &self,
        book: &mut AddressBook,
        name: &str,
        path: &Path,
    ) -> Result<String, Error> {
        let wasm = tokio::fs::read(path).await.map_err(|source| Error::Wasm {
            path: path.to_path_buf(),
            source,
        })?;
        let hash = hex::encode(Sha256::digest(&wasm));
        tracing::info!(%name, %hash, size = wasm.len(), "installing contract code");
        self.run(Operation::UploadWasm { wasm }).await?;
        book.set_wasm_hash(name, hash.clone());
        Ok(hash)
    }

    /// Creates a new instance of installed code and returns its id.
    pub async fn create_contract(&self, wasm_hash: &str) -> Result<String, Error> {
        let result = self
            .run(Operation::CreateContract {
                deployer: self.admin.account_id(),
                wasm_hash: wasm_hash.to_string(),
                salt: rand::random(),
            })
            .await?;
        returned_address(&result)
    }

    /// Creates an instance of the code recorded under `wasm_key` and records
    /// the new contract id under `name`.
    pub async fn create_instance(
        &self,
        book: &mut AddressBook,
        name: &str,
        wasm_key: &str,
    ) -> Result<String, Error> {
        let hash = book.wasm_hash(wasm_key)?.to_string();
        let id = self.create_contract(&hash).await?;
        tracing::info!(%name, %id, "deployed contract");
        book.set_contract_id(name, id.clone());
        Ok(id)
    }

    pub async fn invoke(
        &self,
        contract: &str,
        function: &str,
        args: Vec<ScVal>,
    ) -> Result<TransactionResult, Error> {
        tracing::info!(%contract, %function, "invoking contract");
        self.run(Operation::InvokeContract {
            contract: contract.to_string(),
            function: function.to_string(),
            args,
        })
        .await
    }

    /// Deploys the contract wrapping a classic asset and returns its id.
    pub async fn deploy_asset_contract(&self, asset: &Asset) -> Result<String, Error> {
        tracing::info!(code = %asset.code(), "deploying asset contract");
        let result = self
            .run(Operation::CreateAssetContract {
                asset: asset.clone(),
            })
            .await?;
        returned_address(&result)
    }

    /// Lets `holder` hold the classic `asset`.
    pub async fn change_trust(&self, holder: &Signer, asset: &Asset) -> Result<(), Error> {
        tracing::info!(code = %asset.code(), holder = %holder.account_id(), "setting trustline");
        self.run_as(
            holder,
            Operation::ChangeTrust {
                asset: asset.clone(),
            },
        )
        .await?;
        Ok(())
    }

    async fn run(&self, operation: Operation) -> Result<TransactionResult, Error> {
        self.run_as(&self.admin, operation).await
    }

    async fn run_as(
        &self,
        signer: &Signer,
        operation: Operation,
    ) -> Result<TransactionResult, Error> {
        let transaction = self
            .submitter
            .build(&signer.account_id(), vec![operation])
            .await?;
        let result = self.submitter.execute(transaction, signer).await?;
        match result.status {
            Status::Success => Ok(result),
            status => Err(Error::Failed {
                hash: result.hash,
                status,
                error: result.error,
            }),
        }
    }
}

fn returned_address(result: &TransactionResult) -> Result<String, Error> {
    result
        .returned_address()
        .map(str::to_string)
        .ok_or_else(|| Error::MissingAddress {
            hash: result.hash.clone(),
        })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::testing::{FakeLedger, tooling},
        std::sync::Arc,
    };

    #[tokio::test]
    async fn install_records_hash() {
        let dir = tempfile::tempdir().unwrap();
        let wasm = dir.path().join("pair.wasm");
        std::fs::write(&wasm, b"\0asm").unwrap();
        let ledger = Arc::new(FakeLedger::default());
        let tooling = tooling(ledger.clone());
        let mut book = AddressBook::load("testnet", dir.path());

        let hash = tooling.install_code(&mut book, "pair", &wasm).await.unwrap();

        assert_eq!(hash, hex::encode(Sha256::digest(b"\0asm")));
        assert_eq!(book.wasm_hash("pair").unwrap(), hash);
        assert_eq!(
            ledger.operations(),
            [Operation::UploadWasm {
                wasm: b"\0asm".to_vec()
            }]
        );
    }

    #[tokio::test]
    async fn missing_wasm_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let tooling = tooling(Arc::new(FakeLedger::default()));
        let mut book = AddressBook::load("testnet", dir.path());

        let err = tooling
            .install_code(&mut book, "pair", &dir.path().join("missing.wasm"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Wasm { .. }));
        assert!(book.wasm_hash("pair").is_err());
    }

    #[tokio::test]
    async fn create_instance_records_id() {
        let dir = tempfile::tempdir().unwrap();
        let tooling = tooling(Arc::new(FakeLedger::default()));
        let mut book = AddressBook::load("testnet", dir.path());
        book.set_wasm_hash("factory", "ab");

        let id = tooling
            .create_instance(&mut book, "factory", "factory")
            .await
            .unwrap();

        assert_eq!(book.contract_id("factory").unwrap(), id);
    }

    #[tokio::test]
    async fn create_instance_needs_installed_code() {
        let dir = tempfile::tempdir().unwrap();
        let tooling = tooling(Arc::new(FakeLedger::default()));
        let mut book = AddressBook::load("testnet", dir.path());

        let err = tooling
            .create_instance(&mut book, "router", "router")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn trustline_is_signed_by_holder() {
        let ledger = Arc::new(FakeLedger::default());
        let tooling = tooling(ledger.clone());
        let holder = Signer::random();
        let asset = Asset::Credit {
            code: "TEST".to_string(),
            issuer: tooling.admin().account_id(),
        };

        tooling.change_trust(&holder, &asset).await.unwrap();

        assert_eq!(ledger.operations(), [Operation::ChangeTrust { asset }]);
        assert_eq!(ledger.sources(), [holder.account_id()]);
    }

    #[tokio::test]
    async fn failed_transaction_is_an_error() {
        let ledger = Arc::new(FakeLedger::failing("initialize"));
        let tooling = tooling(ledger);

        let err = tooling
            .invoke("CFACTORY", "initialize", vec![])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Failed {
                status: Status::Failed,
                ..
            }
        ));
    }
}
