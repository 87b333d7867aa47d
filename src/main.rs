use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bhasha_quiz::commands::generate::{self, GenerateArgs};
use bhasha_quiz::commands::key::{self, KeyArgs};
use bhasha_quiz::commands::languages;

#[derive(Parser, Debug)]
#[command(
    name = "bhasha-quiz",
    version,
    about = "Multiple-choice quizzes in Indian languages, generated by an LLM.",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a quiz and show it with its answer key
    Generate(GenerateArgs),
    /// List supported languages and topic ideas
    Languages,
    /// Manage provider API keys
    Key(KeyArgs),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    match run_cli().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{:?}", err);
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_cli() -> Result<bool> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => generate::run(args).await,
        Command::Languages => {
            languages::run();
            Ok(true)
        }
        Command::Key(args) => key::run(args).await.map(|()| true),
    }
}
