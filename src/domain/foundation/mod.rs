//! Foundation module - Shared domain primitives.
//!
//! Contains the timestamp value object and the error vocabulary shared by
//! the AHP engine, the KPI domain, and the application layer.

mod errors;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use timestamp::Timestamp;
