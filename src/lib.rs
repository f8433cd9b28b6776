//! # docdrop
//!
//! A small ingestion service: callers upload a PDF (as a file or a URL)
//! or text, the server normalizes it into a string and stores one record
//! per upload, and a listing endpoint returns every record newest-first.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌─────────────┐   ┌──────────┐
//! │  Client  │──▶│ POST /ingest  │──▶│  Normalize  │──▶│  SQLite  │
//! │ (CLI/UI) │   │ [fetch URL]   │   │  (base64)   │   │  store   │
//! └──────────┘   └───────────────┘   └─────────────┘   └────┬─────┘
//!       ▲                                                   │
//!       └──────────────── GET /api/data ◀───────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | SQLite connection pool |
//! | [`migrate`] | Schema setup |
//! | [`sqlite_store`] | SQLite [`RecordStore`](docdrop_core::store::RecordStore) |
//! | [`transport`] | HTTP client wrapper |
//! | [`fetch`] | Remote PDF retrieval |
//! | [`ingest`] | Ingestion pipeline |
//! | [`list`] | Newest-first listing |
//! | [`error`] | Endpoint error taxonomy |
//! | [`server`] | HTTP API |
//! | [`client`] | CLI client for a running server |

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod list;
pub mod migrate;
pub mod server;
pub mod sqlite_store;
pub mod transport;

pub use docdrop_core::models;
pub use docdrop_core::normalize;
pub use docdrop_core::store;
