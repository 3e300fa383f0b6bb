use {
    crate::transaction::{Signature, SignedTransaction, Transaction},
    ed25519_dalek::{Signer as _, SigningKey, VerifyingKey},
    std::fmt::{self, Debug, Formatter},
};

#[derive(Debug, thiserror::Error)]
pub enum InvalidSecret {
    #[error("secret is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("secret must be 32 bytes, got {0}")]
    Length(usize),
}

/// An ed25519 account key.
#[derive(Clone)]
pub struct Signer {
    key: SigningKey,
}

impl Signer {
    /// Parses a hex encoded 32 byte seed.
    pub fn from_secret(secret: &str) -> Result<Self, InvalidSecret> {
        let bytes = hex::decode(secret.trim().trim_start_matches("0x"))?;
        let seed: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| InvalidSecret::Length(bytes.len()))?;
        Ok(Self {
            key: SigningKey::from_bytes(&seed),
        })
    }

    /// A fresh key, e.g. for a throwaway issuer account.
    pub fn random() -> Self {
        Self {
            key: SigningKey::from_bytes(&rand::random::<[u8; 32]>()),
        }
    }

    /// Hex encoded public key, used as the account id.
    pub fn account_id(&self) -> String {
        hex::encode(self.key.verifying_key().as_bytes())
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// Signs the transaction hash for the given network. Signing does not
    /// touch the transaction itself.
    pub fn sign(&self, transaction: Transaction, network_passphrase: &str) -> SignedTransaction {
        let payload = transaction.signature_payload(network_passphrase);
        let signature = self.key.sign(&payload);
        SignedTransaction {
            transaction,
            signatures: vec![Signature {
                public_key: self.account_id(),
                signature: signature.to_bytes().to_vec(),
            }],
        }
    }
}

impl Debug for Signer {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Signer")
            .field("account_id", &self.account_id())
            .finish_non_exhaustive()
    }
}
