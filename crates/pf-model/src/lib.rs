//! # pf-model
//!
//! Domain records shared by the federation crates.
//!
//! - [`LocalIdentity`] - the host-persisted user record a federated user
//!   is materialized into
//! - [`Credential`], [`CredentialType`] - stored credentials
//! - [`CredentialInput`], [`UserCredential`] - credentials presented for validation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod credential;
pub mod identity;

pub use credential::{
    Credential, CredentialInput, CredentialType, UnknownCredentialType, UserCredential,
};
pub use identity::LocalIdentity;
