//! Tally - a terminal ledger for income and outcome transactions
//!
//! This library provides the core of the Tally ledger: transactions filed
//! under categories, a running balance that a new outcome may never push
//! below zero, and a bulk import path that ingests a whole CSV batch as one
//! unit.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, money, balance)
//! - `storage`: JSON file storage layer
//! - `services`: Ledger rules (balance, category resolution, creation, import)
//! - `cli`: Command handlers for the `tally` binary
//! - `display`: Plain-text formatting
//! - `export`: JSON and YAML export of the ledger
//! - `logging`: tracing subscriber setup for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use tally::config::paths::TallyPaths;
//! use tally::services::ImportService;
//! use tally::storage::Storage;
//!
//! let storage = Storage::new(TallyPaths::new()?)?;
//! storage.load_all()?;
//! let imported = ImportService::new(&storage).execute_file("upload.csv".as_ref())?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{TallyError, TallyResult};
