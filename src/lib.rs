//! Remote Fix KPI - Quarterly case-resolution analysis
//!
//! This crate compares KPI distributions between a baseline and a current
//! period, weights the root causes behind them with the Analytic Hierarchy
//! Process, and narrates the results through an AI provider.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
