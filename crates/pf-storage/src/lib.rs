//! # pf-storage
//!
//! Storage traits for the host's local stores.
//!
//! The federation provider never owns persistence. It reads and writes
//! identities through [`UserStore`] and writes migrated passwords through
//! [`CredentialStore`]; the host supplies the implementations.
//!
//! [`memory`] contains in-memory implementations used by tests and the CLI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod credential;
pub mod error;
pub mod memory;
pub mod user;

pub use credential::CredentialStore;
pub use error::{StorageError, StorageResult};
pub use user::UserStore;
