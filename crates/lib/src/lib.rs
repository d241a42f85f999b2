//! cstore-lib: Core types and logic for cstore
//!
//! This crate provides everything behind the `cstore` command:
//! - `Catalog`: the document listing tracked files and where they are stored
//! - `token`: the `{{group/prop}}` syntax that moves values into vaults
//! - `Store` / `Vault`: the back-end contracts, plus bundled local adapters
//! - `Registry`: the table of named back-ends and per-entry resolution
//! - `ops`: push, pull, purge, list, clean and init

pub mod catalog;
pub mod config;
pub mod consts;
pub mod ops;
pub mod options;
pub mod path;
pub mod platform;
pub mod prompt;
pub mod records;
pub mod remote;
pub mod store;
pub mod token;
pub mod util;
pub mod vault;
