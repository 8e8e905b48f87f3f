//! # pf-federation-portal
//!
//! On-demand user federation against a Portal directory.
//!
//! A user unknown to the host is looked up in the Portal on first access
//! and materialized as a local identity linked to this provider. The first
//! password the Portal confirms becomes the identity's local credential and
//! the link is removed, so every user migrates exactly once.
//!
//! ## Components
//!
//! - [`PortalClient`] - Portal JSON API over `reqwest`
//! - [`IdentityCache`] - per-unit-of-work lookup cache
//! - [`ShadowRecordMaterializer`] - local identity creation
//! - [`PortalUserFederationProvider`] - lookup and validation flows
//! - [`PortalProviderFactory`] - configuration metadata and provider creation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod factory;
pub mod materializer;
pub mod provider;

pub use cache::IdentityCache;
pub use client::{CredentialVerdict, PortalClient, RemoteDirectory};
pub use config::PortalConfig;
pub use dto::RemoteProfile;
pub use error::{PortalError, PortalResult};
pub use factory::{PROVIDER_ID, PortalProviderFactory};
pub use materializer::ShadowRecordMaterializer;
pub use provider::{PROVIDER_TYPE, PortalUserFederationProvider};
