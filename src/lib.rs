//! # civic-core
//!
//! A typed, lazily-completing object model for the [CIViC](https://civicdb.org) clinical
//! interpretation knowledge base.
//!
//! ## Overview
//!
//! The CIViC REST service returns interrelated records: variants, genes, evidence items,
//! assertions, and leaf attributes such as drugs and diseases. Payloads are frequently
//! **partial**: a gene embeds only `{id, name, type}` stubs for its variants. civic-core turns
//! those payloads into a navigable graph of [`record::Record`]s and transparently upgrades a stub
//! to a complete record the first time a caller reads a field the stub did not carry.
//!
//! ## Architecture
//!
//! - **[`naming`]**: pluralization, singularization, class-name and endpoint rules
//! - **[`schema`]**: the closed [`schema::RecordKind`] set and its declared simple/complex fields
//! - **[`registry`]**: resolves payload field names and type tags to record kinds
//! - **[`record`]**: construction, missing-field tracking, lazy access and promotion
//! - **[`fetch`]**: the [`fetch::RemoteFetcher`] seam and its blocking HTTP implementation
//! - **[`search`]**: request bodies for batch searches
//! - **[`config`]**: client configuration (API base URL, timeout, user agent)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use civic_core::{config::ClientConfig, fetch::{get_assertions, get_record, HttpFetcher}, schema::RecordKind};
//!
//! fn main() -> Result<(), civic_core::CivicError> {
//!     let fetcher = HttpFetcher::new(&ClientConfig::default().with_env_overrides()?)?;
//!
//!     let mut gene = get_record(&fetcher, RecordKind::Gene, 5)?;
//!     // Variants are embedded as partial stubs
//!     let variants = gene.nested_mut("variants", &fetcher)?;
//!     for variant in variants.records_mut() {
//!         // Reading a field the stub lacks fetches the full variant
//!         let description = variant
//!             .get("description", &fetcher)?
//!             .as_str()
//!             .map(str::to_string);
//!         println!("{variant}: {description:?}");
//!     }
//!
//!     for assertion in get_assertions(&fetcher, &[1, 2])? {
//!         println!("{assertion}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Partial Records
//!
//! A record built with `partial = true` remembers every declared field that was absent from its
//! payload. The `type` and `id` fields are required regardless. Leaf kinds (attributes, drugs,
//! diseases) are never fetched by id and are always built complete.
//!
//! Promotion re-fetches the whole record and rebuilds it; it never patches individual fields.
//! Nothing is cached between records, so two stubs for the same remote id each fetch once.

pub mod config;
pub mod error;
pub mod fetch;
pub mod naming;
pub mod record;
pub mod registry;
pub mod schema;
pub mod search;
#[cfg(test)]
mod tests;

pub use error::*;
