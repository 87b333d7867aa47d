use crate::llm::{BackendConfig, Provider};

pub const MODEL_ENV: &str = "BHASHA_QUIZ_MODEL";
pub const API_BASE_ENV: &str = "BHASHA_QUIZ_API_BASE";

/// Backend settings before a key has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub provider: Provider,
    pub model: String,
    pub api_base: String,
}

impl Settings {
    pub fn from_env(provider: Provider, model_override: Option<String>) -> Self {
        Self::resolve(provider, model_override, |name| std::env::var(name).ok())
    }

    /// `--model` beats the environment, which beats the provider defaults.
    pub fn resolve<F>(provider: Provider, model_override: Option<String>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |value: String| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        let model = model_override
            .and_then(non_blank)
            .or_else(|| env(MODEL_ENV).and_then(non_blank))
            .unwrap_or_else(|| provider.default_model().to_string());
        let api_base = env(API_BASE_ENV)
            .and_then(non_blank)
            .unwrap_or_else(|| provider.default_api_base().to_string());

        Self {
            provider,
            model,
            api_base,
        }
    }

    pub fn with_api_key(self, api_key: impl Into<String>) -> BackendConfig {
        BackendConfig {
            provider: self.provider,
            model: self.model,
            api_base: self.api_base,
            api_key: api_key.into(),
        }
    }
}
