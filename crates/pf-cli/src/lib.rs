//! # pf-cli
//!
//! Command-line tool for a Portal federation setup:
//! - Configuration checks
//! - Raw profile lookups and credential checks against the Portal
//! - The full on-demand import flow against in-memory stores

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::Cli;
