//! # pf-federation
//!
//! User federation framework.
//!
//! A federation provider lets the host resolve and authenticate users that
//! live in an external directory. This crate defines the capability traits
//! a provider implements and the host invokes:
//!
//! - [`UserLookupProvider`] - lookup by id, username and email
//! - [`CredentialInputValidator`] - credential validation
//! - [`UserStorageProvider`] - lifecycle and configuration
//! - [`UserStorageProviderFactory`] - per-unit-of-work provider creation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod provider;
pub mod storage_id;

pub use config::{ConfigProperty, ConfigPropertyType, FederationConfig, FederationConfigBuilder};
pub use error::{FederationError, FederationResult};
pub use provider::{
    CredentialInputValidator, FederationSession, UserLookupProvider, UserStorageProvider,
    UserStorageProviderFactory,
};
pub use storage_id::StorageId;
