//! sqlray Core - Shared abstractions for the query advisory layer
//!
//! This crate provides the types and traits that every other sqlray crate
//! depends on. It defines:
//!
//! - `SqlEngine` - Trait for the SQL engine that executes queries and produces plans
//! - `EngineDriver` - Trait for opening an engine against a `ConnectionTarget`
//! - `AdvisorConfig` - TOML-backed configuration
//! - Common types like `Value`, `Row` and `QueryResult`

mod config;
mod engine;
mod error;
mod types;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use types::*;
