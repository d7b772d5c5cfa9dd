//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors, timestamps)
//! - `ahp` - Analytic Hierarchy Process engine (weights, consistency, what-if)
//! - `kpi` - KPI datasets, profiling, and period-over-period comparison

pub mod ahp;
pub mod foundation;
pub mod kpi;
