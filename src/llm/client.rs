use anyhow::{Context, Result};
use tracing::{debug, info};

use super::secrets::{
    ApiKeyLookup, ApiKeySource, get_api_key_from_sources, prompt_for_api_key, store_api_key,
};
use super::{ChatEngine, CredentialSource, Provider};
use crate::config::Settings;
use crate::error::QuizError;
use crate::utils::{ask_yn, trim_line};

/// A key in use for this session.
///
/// Keys typed at the prompt stay `unsaved` until the user has seen them
/// produce a quiz and been asked whether to keep them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey {
    pub key: String,
    pub unsaved: bool,
}

impl SessionKey {
    pub fn configured(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            unsaved: false,
        }
    }

    pub fn prompted(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            unsaved: true,
        }
    }
}

/// A key for `provider`, if one can be found.
///
/// User-supplied providers fall back to a masked prompt when `interactive` is
/// set; stored-secret providers never prompt. Nothing is written to disk here.
pub fn find_api_key(provider: Provider, interactive: bool) -> Result<Option<SessionKey>> {
    let lookup = get_api_key_from_sources(provider)?;
    resolve_api_key(provider, lookup, interactive, || prompt_for_api_key(provider))
}

/// Asks for a different key after a failed request.
pub fn reprompt_api_key(provider: Provider) -> Result<Option<SessionKey>> {
    if provider.credential_source() != CredentialSource::UserSupplied {
        return Ok(None);
    }
    prompted_key(prompt_for_api_key(provider)?)
}

fn resolve_api_key(
    provider: Provider,
    lookup: ApiKeyLookup,
    interactive: bool,
    prompt: impl FnOnce() -> Result<String>,
) -> Result<Option<SessionKey>> {
    if let (Some(key), Some(source)) = (lookup.api_key, lookup.source) {
        debug!(
            provider = provider.id(),
            source = source.description(),
            "using configured API key"
        );
        return Ok(Some(SessionKey::configured(key)));
    }

    if !interactive || provider.credential_source() != CredentialSource::UserSupplied {
        return Ok(None);
    }

    prompted_key(prompt()?)
}

fn prompted_key(raw: String) -> Result<Option<SessionKey>> {
    Ok(trim_line(&raw).map(SessionKey::prompted))
}

/// Offers once to keep a prompted key that has just produced a quiz.
pub fn offer_to_save(provider: Provider, session_key: &mut SessionKey) -> Result<()> {
    if !session_key.unsaved {
        return Ok(());
    }
    session_key.unsaved = false;

    if ask_yn(format!(
        "Save this {} key for future sessions?",
        provider.display_name()
    ))? {
        store_api_key(provider, &session_key.key)?;
        info!(provider = provider.id(), "stored API key in the local auth file");
    }
    Ok(())
}

/// Builds the engine, refusing before any network traffic when the key is
/// missing.
pub fn ensure_engine(settings: Settings, api_key: Option<String>) -> Result<ChatEngine, QuizError> {
    let provider = settings.provider;
    let key = api_key
        .as_deref()
        .and_then(trim_line)
        .ok_or(QuizError::MissingCredential(provider))?
        .to_string();
    Ok(ChatEngine::new(settings.with_api_key(key)))
}

pub async fn test_configured_api_key(settings: Settings) -> Result<ApiKeySource> {
    let provider = settings.provider;
    let lookup = get_api_key_from_sources(provider)?;
    let source = lookup.source.ok_or(QuizError::MissingCredential(provider))?;
    let engine = ensure_engine(settings, lookup.api_key)?;
    healthcheck(&engine).await?;
    Ok(source)
}

pub async fn healthcheck(engine: &ChatEngine) -> Result<()> {
    let backend = engine.backend();
    reqwest::Client::new()
        .get(backend.endpoint("models"))
        .bearer_auth(&backend.api_key)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("Failed to validate API key with {}", backend.provider))?;
    Ok(())
}
