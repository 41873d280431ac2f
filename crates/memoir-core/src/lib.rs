//! memoir-core - Core library for memoir
//!
//! This crate contains the entry models, local catalog, media store, path
//! recovery, and optional remote mirror shared by all memoir interfaces.

pub mod catalog;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod recovery;
pub mod service;
pub mod sync;

pub use error::{Error, Result};
pub use models::{Entry, EntryId, EntryKind, MediaRef};
