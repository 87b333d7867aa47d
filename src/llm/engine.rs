use std::future::Future;

use anyhow::{Context, Result, bail};
use tracing::debug;

use super::BackendConfig;
use super::response::{ChatRequest, ChatResponse, Message, parse_quiz};
use crate::quiz::QuizResult;
use crate::templates::render;

const TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = r#"
You write multiple-choice quiz questions for students.
Follow the user's instructions about language, topic and number of questions.
Write every question, option, answer and explanation in the language the user writes in.
"#;

/// Generates structured questions from a prompt template.
pub trait QuestionEngine {
    fn generate_questions(
        &self,
        topic: &str,
        count: u8,
        template: &str,
    ) -> impl Future<Output = Result<QuizResult>> + Send;
}

/// Talks to an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatEngine {
    http: reqwest::Client,
    backend: BackendConfig,
}

impl ChatEngine {
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            backend,
        }
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }
}

impl QuestionEngine for ChatEngine {
    async fn generate_questions(
        &self,
        topic: &str,
        count: u8,
        template: &str,
    ) -> Result<QuizResult> {
        let request = ChatRequest {
            model: self.backend.model.clone(),
            messages: vec![
                Message::system(SYSTEM_PROMPT.trim()),
                Message::user(user_prompt(template, topic, count)),
            ],
            temperature: TEMPERATURE,
        };

        let url = self.backend.endpoint("chat/completions");
        debug!(%url, model = %self.backend.model, count, "requesting quiz");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.backend.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.backend.provider))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("{} API error ({}): {}", self.backend.provider, status, body);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", self.backend.provider))?;

        let text = chat.first_text()?;
        debug!(bytes = text.len(), "received model output");
        parse_quiz(&text)
    }
}

fn user_prompt(template: &str, topic: &str, count: u8) -> String {
    format!(
        "{}\n\n{}",
        render(template, topic, count).trim(),
        format_instructions(count)
    )
}

fn format_instructions(count: u8) -> String {
    format!(
        r#"Respond with JSON only, no other text, in exactly this shape:
{{"questions": [{{"question": "...", "options": ["...", "...", "...", "..."], "answer": "...", "explanation": "..."}}]}}
The "questions" array must contain {count} items. Every item must have exactly 4 options, and "answer" must repeat the correct option."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{Language, template_for};

    #[test]
    fn user_prompt_contains_rendered_template_and_shape() {
        let prompt = user_prompt(template_for(Language::Tamil), "Sports", 7);
        assert!(prompt.starts_with("தமிழில் 7 பல்தேர்வு"));
        assert!(prompt.contains("தலைப்பு: Sports"));
        assert!(prompt.contains("\"questions\""));
        assert!(prompt.contains("must contain 7 items"));
    }
}
