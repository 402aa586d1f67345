//! SQLRay Services Layer
//!
//! This crate ties the advisory pieces together behind a single service.
//!
//! # Architecture
//!
//! ```text
//! Service Layer (sqlray-services) ← This crate
//!     ↓
//! Domain Layer (sqlray-intent, sqlray-analyzer)
//!     ↓
//! Infrastructure Layer (sqlray-core, sqlray-driver-duckdb)
//! ```
//!
//! # Services
//!
//! - [`Advisor`] - Question/query comparison, plan analysis and metrics

mod advisor;
mod error;
mod report;

pub use advisor::Advisor;
pub use error::{ServiceError, ServiceResult};
pub use report::{AdvisoryReport, Finding};
