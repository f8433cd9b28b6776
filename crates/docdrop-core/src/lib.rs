//! # docdrop Core
//!
//! Runtime-agnostic logic for docdrop: record models, payload
//! classification and normalization, and the record store abstraction.
//!
//! This crate contains no tokio, sqlx, or network dependencies. The
//! `docdrop` crate provides the SQLite store, remote fetching, and the
//! HTTP server on top of it.

pub mod models;
pub mod normalize;
pub mod store;
