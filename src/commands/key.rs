use anyhow::{Context, Result, bail};
use clap::Args;

use crate::config::Settings;
use crate::llm::{self, Provider};
use crate::palette::Palette;

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Provider whose key to manage
    #[arg(long, value_enum, default_value_t = Provider::Sutra)]
    pub provider: Provider,
    /// Store a new API key in the local auth file
    #[arg(long, value_name = "KEY", conflicts_with = "clear")]
    pub set: Option<String>,
    /// Remove the stored API key from the local auth file
    #[arg(long, conflicts_with = "test")]
    pub clear: bool,
    /// Verify the configured API key against the provider
    #[arg(long, conflicts_with = "clear")]
    pub test: bool,
    /// Open the page where the provider issues API keys
    #[arg(long)]
    pub open: bool,
}

pub async fn run(args: KeyArgs) -> Result<()> {
    let provider = args.provider;
    let name = provider.display_name();
    let mut action_taken = false;

    if args.open {
        open::that(provider.key_page())
            .with_context(|| format!("Failed to open {}", provider.key_page()))?;
        println!(
            "Opened {} in your browser.",
            Palette::paint(Palette::ACCENT, provider.key_page())
        );
        action_taken = true;
    }

    if let Some(key) = args.set {
        llm::store_api_key(provider, &key)?;
        println!("Stored {name} API key in the local auth file.");
        action_taken = true;
    }

    if args.clear {
        if llm::clear_api_key(provider)? {
            println!("Removed the stored {name} API key.");
        } else {
            println!("No {name} API key found in the auth file.");
        }
        action_taken = true;
    }

    if args.test {
        let settings = Settings::from_env(provider, None);
        let source = llm::test_configured_api_key(settings).await?;
        println!(
            "{} API key from the {} is valid.",
            name,
            source.description()
        );
        action_taken = true;
    }

    if !action_taken {
        bail!("No action provided. Use --set, --clear, --test, or --open.");
    }
    Ok(())
}
