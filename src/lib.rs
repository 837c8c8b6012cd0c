//! Typed-document retrieval and caching pipeline for a YAML-backed content site.
//!
//! Folio turns a prefix-organized bucket of YAML objects into rendered, typed
//! content records. Documents live in a remote object store under one prefix per
//! type (`articles/`, `projects/`, `letters/`, `reading-list/`); on first access
//! each object is mirrored into a local cache directory, decoded into its typed
//! record, and its markup body is rendered to styled HTML. Collections come back
//! filtered by tag, deterministically ordered, and carrying the deduplicated tag
//! vocabulary of the listing.
//!
//! # Architecture
//!
//! - **Store**: an [`store::ObjectStore`] trait over prefix-list/get/put, with an
//!   S3 implementation and an in-memory one for tests
//! - **Cache**: a read-through mirror — one local file per remote key, fetched at
//!   most once per process via per-key locking
//! - **Documents**: `serde_yaml` decoding into capability-polymorphic records,
//!   CommonMark body rendering via `pulldown-cmark`
//! - **Collections**: listing, tag filtering, recency/date ordering, positional
//!   identifier assignment
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`store`] — Object-store boundary: trait, S3 client, in-memory store
//! - [`cache`] — Local mirror cache with single-flight downloads
//! - [`document`] — Typed document records, decoding, body rendering, tags
//! - [`collection`] — The collection assembler every document-type page uses

pub mod cache;
pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod store;

pub use error::{Error, Result};
