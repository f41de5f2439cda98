//! Core types for the schoolhub data-access layer.
//!
//! Following the Functional Core pattern, this crate holds pure data types,
//! validation and the traits the imperative shell implements:
//!
//! - [`entity`]: entity records, relation declarations and validation
//! - [`cache`]: the expiring key-value cache contract, keys and serialization
//! - [`storage`]: the document store contract, rule matching and errors
//! - [`population`]: resolving reference ids into nested records

pub mod cache;
pub mod entity;
pub mod population;
pub mod storage;
