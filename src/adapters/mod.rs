//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers (OpenAI, mock)
//! - `data` - Dataset sources (CSV files, Power BI)

pub mod ai;
pub mod data;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use data::{CsvDatasetSource, PowerBiConfig, PowerBiDatasetSource};
