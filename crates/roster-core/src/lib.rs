//! Core types and trait definitions for the Roster user directory.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod query;
pub mod service;
pub mod store;
pub mod user;

pub use error::{Error, Result};
pub use service::UserService;
