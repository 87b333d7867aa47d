use std::fmt;

use clap::ValueEnum;

/// Where a provider's key is expected to come from when none is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Ask the user through a masked prompt.
    UserSupplied,
    /// Environment or auth file only; never prompt.
    StoredSecret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Provider {
    #[default]
    Sutra,
    Gemini,
}

impl Provider {
    pub fn id(self) -> &'static str {
        match self {
            Provider::Sutra => "sutra",
            Provider::Gemini => "gemini",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Sutra => "Sutra",
            Provider::Gemini => "Gemini",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Sutra => "sutra-v2",
            Provider::Gemini => "gemini-2.0-flash",
        }
    }

    /// OpenAI-compatible base URL.
    pub fn default_api_base(self) -> &'static str {
        match self {
            Provider::Sutra => "https://api.two.ai/v2",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }

    pub fn api_key_env(self) -> &'static str {
        match self {
            Provider::Sutra => "SUTRA_API_KEY",
            Provider::Gemini => "GOOGLE_API_KEY",
        }
    }

    pub fn key_page(self) -> &'static str {
        match self {
            Provider::Sutra => "https://docs.two.ai",
            Provider::Gemini => "https://aistudio.google.com/app/apikey",
        }
    }

    pub fn credential_source(self) -> CredentialSource {
        match self {
            Provider::Sutra => CredentialSource::UserSupplied,
            Provider::Gemini => CredentialSource::StoredSecret,
        }
    }

    pub fn failure_hint(self) -> &'static str {
        match self.credential_source() {
            CredentialSource::UserSupplied => "Please check your API key or try again later.",
            CredentialSource::StoredSecret => {
                "Please try again or check your API key configuration."
            }
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Everything needed to talk to one backend.
#[derive(Clone)]
pub struct BackendConfig {
    pub provider: Provider,
    pub model: String,
    pub api_base: String,
    pub api_key: String,
}

impl BackendConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// Keeps the key out of logs and error output.
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(api_base: &str) -> BackendConfig {
        BackendConfig {
            provider: Provider::Sutra,
            model: "sutra-v2".into(),
            api_base: api_base.into(),
            api_key: "secret-key".into(),
        }
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            backend("https://api.two.ai/v2/").endpoint("/chat/completions"),
            "https://api.two.ai/v2/chat/completions"
        );
        assert_eq!(
            backend("http://127.0.0.1:9000").endpoint("models"),
            "http://127.0.0.1:9000/models"
        );
    }

    #[test]
    fn debug_output_redacts_key() {
        let rendered = format!("{:?}", backend("https://api.two.ai/v2"));
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn providers_differ_in_credential_source() {
        assert_eq!(
            Provider::Sutra.credential_source(),
            CredentialSource::UserSupplied
        );
        assert_eq!(
            Provider::Gemini.credential_source(),
            CredentialSource::StoredSecret
        );
        assert_ne!(Provider::Sutra.failure_hint(), Provider::Gemini.failure_hint());
    }
}
