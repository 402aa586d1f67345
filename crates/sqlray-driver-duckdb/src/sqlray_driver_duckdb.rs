//! DuckDB engine for sqlray
//!
//! DuckDB is an in-process analytical database. It runs in-memory
//! (`:memory:`) or against a database file, which makes it a convenient
//! engine for producing plans of advisory queries.

mod driver;
#[cfg(test)]
mod driver_tests;

pub use driver::*;
