//! End-to-End Integration Tests
//!
//! These tests drive the Portal federation provider through its host
//! traits against a wiremock Portal and in-memory local stores.

mod common;
mod credential_migration;
mod on_demand_import;
mod portal_failures;
