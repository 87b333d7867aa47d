use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::{Password, theme::ColorfulTheme};
use serde::{Deserialize, Serialize};

use super::Provider;
use crate::palette::Palette;
use crate::utils::{get_data_dir, strip_controls_and_escapes, trim_line};

const AUTH_FILE_NAME: &str = "auth.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    AuthFile,
}

impl ApiKeySource {
    pub fn description(&self) -> &'static str {
        match self {
            ApiKeySource::Environment => "environment variable",
            ApiKeySource::AuthFile => "local auth file",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct AuthFile {
    #[serde(flatten)]
    providers: HashMap<String, ProviderAuth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProviderAuth {
    key: String,
}

#[derive(Debug)]
pub struct ApiKeyLookup {
    pub api_key: Option<String>,
    pub source: Option<ApiKeySource>,
}

impl ApiKeyLookup {
    fn missing() -> Self {
        Self {
            api_key: None,
            source: None,
        }
    }
}

pub fn prompt_for_api_key(provider: Provider) -> Result<String> {
    println!(
        "\n{} ({}) to generate a quiz.",
        Palette::paint(
            Palette::SUCCESS,
            format!("Enter your {} API key", provider.display_name())
        ),
        Palette::paint(Palette::ACCENT, provider.key_page())
    );
    println!(
        "{}",
        Palette::dim("The key is only kept for this session unless you choose to save it.")
    );
    let raw_password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("API Key")
        .allow_empty_password(true)
        .interact()
        .context("Failed to read API key")?;

    let password = strip_controls_and_escapes(&raw_password);
    Ok(password.trim().to_string())
}

pub fn store_api_key(provider: Provider, api_key: &str) -> Result<()> {
    store_api_key_at(&auth_file_path()?, provider, api_key)
}

pub fn clear_api_key(provider: Provider) -> Result<bool> {
    clear_api_key_at(&auth_file_path()?, provider)
}

pub fn get_api_key_from_sources(provider: Provider) -> Result<ApiKeyLookup> {
    let from_env = env::var(provider.api_key_env()).ok();
    lookup_api_key(provider, from_env, &auth_file_path()?)
}

fn lookup_api_key(
    provider: Provider,
    from_env: Option<String>,
    auth_path: &Path,
) -> Result<ApiKeyLookup> {
    // 1. Environment variable (or .env, already loaded into the environment)
    if let Some(value) = from_env
        && let Some(key) = trim_line(&value)
    {
        return Ok(ApiKeyLookup {
            api_key: Some(key.to_string()),
            source: Some(ApiKeySource::Environment),
        });
    }

    // 2. Auth file
    let Some(auth) = read_auth_file(auth_path)? else {
        return Ok(ApiKeyLookup::missing());
    };

    let key = auth
        .providers
        .get(provider.id())
        .and_then(|entry| trim_line(&entry.key))
        .map(str::to_string);

    match key {
        Some(api_key) => Ok(ApiKeyLookup {
            api_key: Some(api_key),
            source: Some(ApiKeySource::AuthFile),
        }),
        None => Ok(ApiKeyLookup::missing()),
    }
}

fn store_api_key_at(auth_path: &Path, provider: Provider, api_key: &str) -> Result<()> {
    let trimmed = trim_line(api_key).with_context(|| "Cannot store an empty API key")?;

    let mut auth = read_auth_file(auth_path)?.unwrap_or_default();
    auth.providers.insert(
        provider.id().to_string(),
        ProviderAuth {
            key: trimmed.to_string(),
        },
    );

    write_auth_file(auth_path, &auth)
}

fn clear_api_key_at(auth_path: &Path, provider: Provider) -> Result<bool> {
    let Some(mut auth) = read_auth_file(auth_path)? else {
        return Ok(false);
    };

    if auth.providers.remove(provider.id()).is_none() {
        return Ok(false);
    }

    if auth.providers.is_empty() {
        fs::remove_file(auth_path).with_context(|| {
            format!(
                "Failed to remove empty auth file at {}",
                auth_path.display()
            )
        })?;
        return Ok(true);
    }

    write_auth_file(auth_path, &auth)?;
    Ok(true)
}

fn auth_file_path() -> Result<PathBuf> {
    let data_dir = get_data_dir()?;
    Ok(data_dir.join(AUTH_FILE_NAME))
}

fn read_auth_file(path: &Path) -> Result<Option<AuthFile>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(parse_auth_contents(&contents, path)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to read auth file at {}", path.display()))
        }
    }
}

fn write_auth_file(path: &Path, value: &AuthFile) -> Result<()> {
    let contents = serialize_auth(value)?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write auth file at {}", path.display()))?;
    Ok(())
}

fn parse_auth_contents(contents: &str, path: &Path) -> Result<Option<AuthFile>> {
    if contents.trim().is_empty() {
        return Ok(Some(AuthFile::default()));
    }

    let parsed: AuthFile = serde_json::from_str(contents)
        .with_context(|| format!("Failed to parse auth file at {}", path.display()))?;
    Ok(Some(parsed))
}

fn serialize_auth(value: &AuthFile) -> Result<String> {
    let contents = serde_json::to_string_pretty(value)?;
    Ok(format!("{}\n", contents))
}
