//! Querydeck - saved-query sessions for a schema-backed data browser.
//!
//! A session edits a draft `(constraint, search key)` pair, keeps a
//! persistent list of saved pairs, and ends by handing exactly one pair to
//! a consumer (or none, if cancelled). Constraints are opaque strings owned
//! by whatever backend eventually runs them.
//!
//! The pieces, bottom-up:
//!
//! - [`storage`]: backends behind the [`storage::QueryBackend`] trait
//! - [`store`]: the ordered saved-query list with rollback on failure
//! - [`selector`], [`editor`], [`bridge`]: the editable session state
//! - [`controller`]: the session state machine
//! - [`schema`]: field lists for a class

#![forbid(unsafe_code)]

pub mod bridge;
pub mod controller;
pub mod domain;
pub mod editor;
pub mod error;
pub mod help;
pub mod id_generation;
pub mod schema;
pub mod selector;
pub mod storage;
pub mod store;

// Application layer used by the binary
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod output;

pub use error::{Error, Result};
