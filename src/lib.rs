//! A DNS wire protocol library for Rust.
//!
//! This crate provides the building blocks for reading and writing DNS
//! messages: domain names with compression, resource records and their
//! data, RRsets, complete messages with size-bounded composition, and
//! transaction signatures.
//!
//! # Modules
//!
//! * [base] contains the fundamental types for DNS data and messages,
//! * [rdata] contains the record data types and the registry mapping record
//!   types to them,
#![cfg_attr(feature = "tsig", doc = "* [tsig]")]
#![cfg_attr(not(feature = "tsig"), doc = "* tsig")]
//!   provides signing and verifying of messages with TSIG, and
//! * [utils] contains helpers used throughout the crate.
//!
//! # Reference of Feature Flags
//!
//! * `rand`: Chooses random message IDs for new messages. Enabled by
//!   default.
//! * `tsig`: support for signing and validating message exchanges via TSIG
//!   signatures. This enables the
#![cfg_attr(feature = "tsig", doc = "  [tsig]")]
#![cfg_attr(not(feature = "tsig"), doc = "  tsig")]
//!   module and pulls in the [ring](https://github.com/briansmith/ring)
//!   crate. Enabled by default.
//!
//! # Logging
//!
//! The crate emits diagnostics through the
//! [tracing](https://github.com/tokio-rs/tracing) crate. Nothing is logged
//! unless the application installs a subscriber.

#![allow(renamed_and_removed_lints)]
#![allow(clippy::unknown_clippy_lints)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base;
pub mod rdata;
pub mod tsig;
pub mod utils;
