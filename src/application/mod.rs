//! Application layer - Commands and Handlers.
//!
//! Orchestrates the AHP and KPI domains over the dataset and AI ports.

pub mod handlers;
pub mod narration;

pub use narration::{NarrationService, NarrationSettings, Narrative};
