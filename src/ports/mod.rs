//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - LLM completions used for narration
//! - `DatasetSource` - Loading one period of KPI data

mod ai_provider;
mod dataset_source;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use dataset_source::{DataSourceError, DatasetSource, PeriodSpec};
