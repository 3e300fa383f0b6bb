//! Persisted registries of deployment artifacts.
//!
//! The [`AddressBook`] maps contract keys (`"factory"`, `"router"`, ...) to
//! deployed contract ids and installed wasm hashes for one network. The
//! [`TokenBook`] keeps per-network token lists. Both are loaded leniently and
//! written back atomically.

pub mod address_book;
pub mod error;
mod storage;
pub mod token_book;

pub use {
    address_book::{AddressBook, Contracts},
    error::{Entry, NotFound, PersistError},
    token_book::{NetworkTokens, Token, TokenBook},
};

/// Default directory (relative to the working directory) holding registry
/// files.
pub const DEFAULT_DIR: &str = ".soroban";
