//! Narration - Plain-language explanations of dashboard artifacts.
//!
//! Every artifact (dataset summary, profile, KPI comparison, AHP report,
//! what-if result, assistant question) has a prompt builder in [`prompts`].
//! [`NarrationService::narrate`] never fails: provider errors turn into
//! fallback text so the rest of the dashboard keeps working.

pub mod prompts;

use serde::Serialize;
use std::sync::Arc;

use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

pub use prompts::{NarrationKind, Prompt};

/// Fallback text when no provider is configured.
pub const NARRATION_UNAVAILABLE: &str = "Narration unavailable: no AI provider configured";

const SYSTEM_PROMPT: &str =
    "You are an operations analyst explaining remote-fix case KPIs to managers. Be concise and concrete.";

/// Generation settings applied to every narration request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            max_tokens: 200,
            temperature: 0.3,
        }
    }
}

/// Text produced for one artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub text: String,
    /// True when `text` is an error or unavailability message rather than model output.
    pub is_fallback: bool,
}

impl Narrative {
    fn generated(text: String) -> Self {
        Self {
            text,
            is_fallback: false,
        }
    }

    fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_fallback: true,
        }
    }
}

/// Fail-soft narration over an optional AI provider.
#[derive(Clone)]
pub struct NarrationService {
    provider: Option<Arc<dyn AIProvider>>,
    settings: NarrationSettings,
}

impl NarrationService {
    pub fn new(provider: Arc<dyn AIProvider>, settings: NarrationSettings) -> Self {
        Self {
            provider: Some(provider),
            settings,
        }
    }

    /// A service that only ever returns the unavailable fallback.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            settings: NarrationSettings::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Sends the prompt and returns the model's text, or fallback text on failure.
    ///
    /// Errors are logged and not retried here; the provider owns its retry budget.
    pub async fn narrate(&self, prompt: Prompt) -> Narrative {
        let Some(provider) = &self.provider else {
            return Narrative::fallback(NARRATION_UNAVAILABLE);
        };

        let metadata = RequestMetadata::new(prompt.kind.as_str());
        let trace_id = metadata.trace_id.clone();
        let request = CompletionRequest::new(metadata)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompt.text)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);

        match provider.complete(request).await {
            Ok(response) => {
                tracing::debug!(
                    kind = prompt.kind.as_str(),
                    trace_id = %trace_id,
                    model = %response.model,
                    tokens = response.usage.total_tokens,
                    "Narration generated"
                );
                Narrative::generated(response.content)
            }
            Err(err) => {
                tracing::warn!(
                    kind = prompt.kind.as_str(),
                    trace_id = %trace_id,
                    error = %err,
                    "Narration failed, using fallback text"
                );
                Narrative::fallback(format!("Error: {}", err))
            }
        }
    }
}
