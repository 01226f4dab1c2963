use async_trait::async_trait;

/// External language-generation capability used by the coaching selector.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Runs one chat completion and returns the raw response text, which is
    /// expected (but not guaranteed) to be a JSON object.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
