mod anthropic;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use prompt::{build_explanation_prompt, EXPLANATION_PROMPT};

use async_trait::async_trait;

use crate::error::Result;

/// Text completion capability used to explain customizations
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "anthropic")
    fn provider_name(&self) -> &str;

    /// Complete `prompt` under the explanation system prompt
    async fn complete(&self, prompt: &str) -> Result<String>;
}
