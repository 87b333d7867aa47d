use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use tracing::debug;

use crate::config::Settings;
use crate::error::QuizError;
use crate::llm::{
    ChatEngine, CredentialSource, Provider, QuestionEngine, SessionKey, ensure_engine,
    find_api_key, offer_to_save, reprompt_api_key,
};
use crate::palette::Palette;
use crate::quiz::{
    DEFAULT_QUESTIONS, DEFAULT_TOPIC, MAX_QUESTIONS, MIN_QUESTIONS, QuizGenerator, QuizRequest,
    QuizResult,
};
use crate::templates::{Language, TOPIC_SUGGESTIONS};
use crate::tui::{plain_text, show_quiz};
use crate::utils::{ask_yn, ask_yn_default, is_interactive_terminal, pluralize};

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Model provider to generate with
    #[arg(long, value_enum, default_value_t = Provider::Sutra)]
    pub provider: Provider,
    /// Quiz language. Prompted for when omitted.
    #[arg(long, value_enum)]
    pub language: Option<Language>,
    /// Quiz topic. Prompted for when omitted.
    #[arg(long)]
    pub topic: Option<String>,
    /// Number of questions
    #[arg(long, value_parser = clap::value_parser!(u8).range(i64::from(MIN_QUESTIONS)..=i64::from(MAX_QUESTIONS)))]
    pub count: Option<u8>,
    /// Override the provider's default model
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,
    /// Print the quiz instead of opening the TUI
    #[arg(long, default_value_t = false)]
    pub plain: bool,
}

impl GenerateArgs {
    /// Prompting happens only when something is missing and a person is there to answer.
    fn is_interactive(&self, terminal: bool) -> bool {
        terminal && (self.language.is_none() || self.topic.is_none())
    }

    fn request_with_defaults(&self) -> QuizRequest {
        QuizRequest::new(
            self.topic.clone().unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
            self.count.unwrap_or(DEFAULT_QUESTIONS),
            self.language.unwrap_or(Language::ALL[0]),
        )
    }
}

#[derive(Debug)]
pub enum Outcome {
    Success(QuizResult),
    Failed(QuizError),
}

/// The engine for one `generate` invocation and the key it was built with.
struct Session {
    settings: Settings,
    key: Option<SessionKey>,
    generator: QuizGenerator<ChatEngine>,
}

impl Session {
    fn start(settings: Settings, key: Option<SessionKey>) -> Result<Self, QuizError> {
        let engine = ensure_engine(settings.clone(), key.as_ref().map(|k| k.key.clone()))?;
        Ok(Self {
            settings,
            key,
            generator: QuizGenerator::new(engine),
        })
    }

    fn replace_key(&mut self, key: SessionKey) -> Result<(), QuizError> {
        *self = Self::start(self.settings.clone(), Some(key))?;
        Ok(())
    }

    fn provider(&self) -> Provider {
        self.settings.provider
    }
}

/// Returns whether the last generation succeeded.
pub async fn run(args: GenerateArgs) -> Result<bool> {
    let terminal = is_interactive_terminal();
    let settings = Settings::from_env(args.provider, args.model.clone());
    debug!(?settings, "resolved backend settings");

    let api_key = find_api_key(args.provider, terminal)?;
    let mut session = Session::start(settings, api_key)?;
    let plain = args.plain || !terminal;

    if !args.is_interactive(terminal) {
        let request = args.request_with_defaults();
        return match attempt(&session.generator, &request).await {
            Outcome::Success(quiz) => present(&quiz, &request, plain).map(|()| true),
            Outcome::Failed(err) => {
                report_failure(&err, args.provider);
                Ok(false)
            }
        };
    }

    let succeeded = loop {
        let request = prompt_request(&args)?;
        match attempt(&session.generator, &request).await {
            Outcome::Success(quiz) => {
                present(&quiz, &request, plain)?;
                if let Some(key) = session.key.as_mut() {
                    offer_to_save(args.provider, key)?;
                }
                if !ask_yn("Generate another quiz?".to_string())? {
                    break true;
                }
            }
            Outcome::Failed(err) => {
                report_failure(&err, args.provider);
                if !ask_yn("Try again?".to_string())? {
                    break false;
                }
                offer_new_key(&mut session)?;
            }
        }
    };
    Ok(succeeded)
}

/// Lets the user swap in a different key before retrying.
fn offer_new_key(session: &mut Session) -> Result<()> {
    let provider = session.provider();
    if provider.credential_source() != CredentialSource::UserSupplied {
        return Ok(());
    }
    if !ask_yn_default(format!("Enter a different {provider} API key?"), false)? {
        return Ok(());
    }
    if let Some(key) = reprompt_api_key(provider)? {
        session.replace_key(key)?;
    }
    Ok(())
}

/// One user-triggered generation: a single engine call, success or failure.
pub async fn attempt<E: QuestionEngine>(
    generator: &QuizGenerator<E>,
    request: &QuizRequest,
) -> Outcome {
    println!("{}", busy_message(request));
    match generator.generate(request).await {
        Ok(quiz) => Outcome::Success(quiz),
        Err(err) => Outcome::Failed(err),
    }
}

fn busy_message(request: &QuizRequest) -> String {
    Palette::dim(format!(
        "Generating {} in {}...",
        pluralize("question", usize::from(request.count)),
        request.language
    ))
}

fn present(quiz: &QuizResult, request: &QuizRequest, plain: bool) -> Result<()> {
    println!(
        "{}",
        Palette::paint(Palette::SUCCESS, "Quiz generated successfully!")
    );
    if plain {
        print!("{}", plain_text(quiz));
        return Ok(());
    }
    let title = format!("{} quiz: {}", request.language, request.topic);
    show_quiz(quiz, &title)
}

fn report_failure(err: &QuizError, provider: Provider) {
    eprintln!("{}", failure_message(err, provider));
}

pub fn failure_message(err: &QuizError, provider: Provider) -> String {
    format!(
        "{} {}\n{}",
        Palette::paint(Palette::DANGER, "An error occurred:"),
        err,
        Palette::dim(provider.failure_hint())
    )
}

fn prompt_request(args: &GenerateArgs) -> Result<QuizRequest> {
    let theme = ColorfulTheme::default();

    let language = match args.language {
        Some(language) => language,
        None => {
            let items: Vec<String> = Language::ALL
                .iter()
                .map(|lang| format!("{} ({})", lang.name(), lang.native_name()))
                .collect();
            let idx = Select::with_theme(&theme)
                .with_prompt("Select Language")
                .items(&items)
                .default(0)
                .interact()
                .context("Failed to read language selection")?;
            Language::ALL[idx]
        }
    };

    let topic = match &args.topic {
        Some(topic) => topic.clone(),
        None => {
            println!(
                "{} {}",
                Palette::dim("Suggestions:"),
                TOPIC_SUGGESTIONS.join(", ")
            );
            Input::<String>::with_theme(&theme)
                .with_prompt("Enter Topic")
                .default(DEFAULT_TOPIC.to_string())
                .allow_empty(true)
                .interact_text()
                .context("Failed to read topic")?
        }
    };

    let count = match args.count {
        Some(count) => count,
        None => Input::<u8>::with_theme(&theme)
            .with_prompt("Number of Questions")
            .default(DEFAULT_QUESTIONS)
            .validate_with(|value: &u8| -> Result<(), String> {
                if (MIN_QUESTIONS..=MAX_QUESTIONS).contains(value) {
                    Ok(())
                } else {
                    Err(format!("Pick a number from {MIN_QUESTIONS} to {MAX_QUESTIONS}"))
                }
            })
            .interact_text()
            .context("Failed to read question count")?,
    };

    Ok(QuizRequest::new(topic, count, language))
}
