use thiserror::Error;

use crate::llm::Provider;

/// Failures a quiz request can end in.
///
/// `Generation` collapses everything that can go wrong once the engine has
/// been called (network, HTTP status, quota, malformed output) into one
/// variant; callers only need to know that the request failed.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Unsupported language: '{0}'")]
    UnsupportedLanguage(String),

    #[error("No {} API key configured. Set {} or run `bhasha-quiz key --provider {} --set <KEY>`.", .0.display_name(), .0.api_key_env(), .0.id())]
    MissingCredential(Provider),

    #[error("Quiz generation failed: {0:#}")]
    Generation(anyhow::Error),
}

impl QuizError {
    pub fn generation(err: impl Into<anyhow::Error>) -> Self {
        QuizError::Generation(err.into())
    }
}
