use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::quiz::{QuizQuestion, QuizResult};

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[\w-]*[ \t]*\r?\n?(.*?)```").expect("fenced block regex is valid")
});

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Message {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Message,
}

impl ChatResponse {
    pub fn first_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .filter_map(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .find(|text| !text.is_empty())
            .context("No text output returned from model")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuizPayload {
    Wrapped { questions: Vec<QuizQuestion> },
    Bare(Vec<QuizQuestion>),
}

impl QuizPayload {
    fn into_questions(self) -> Vec<QuizQuestion> {
        match self {
            QuizPayload::Wrapped { questions } | QuizPayload::Bare(questions) => questions,
        }
    }
}

/// Parses the model's reply into a quiz.
///
/// Models wrap JSON in code fences or add a sentence around it often enough
/// that both are accepted; the questions may sit under a `questions` key or
/// be a bare array. Fenced blocks are tried first, then every `{` or `[` in
/// the reply in order, and the first non-empty quiz wins.
pub fn parse_quiz(content: &str) -> Result<QuizResult> {
    let trimmed = content.trim();
    let mut candidates: Vec<&str> = FENCED_BLOCK
        .captures_iter(trimmed)
        .filter_map(|captures| captures.get(1))
        .map(|inner| inner.as_str().trim())
        .collect();
    candidates.push(trimmed);

    let mut first_error = None;
    let mut empty = None;
    for candidate in candidates {
        for (start, _) in candidate.match_indices(['{', '[']) {
            let mut stream =
                serde_json::Deserializer::from_str(&candidate[start..]).into_iter::<QuizPayload>();
            match stream.next() {
                Some(Ok(payload)) => {
                    let questions = payload.into_questions();
                    if !questions.is_empty() {
                        return Ok(QuizResult { questions });
                    }
                    empty.get_or_insert(questions);
                }
                Some(Err(err)) => {
                    first_error.get_or_insert(err);
                }
                None => {}
            }
        }
    }

    if let Some(questions) = empty {
        return Ok(QuizResult { questions });
    }
    match first_error {
        Some(err) => Err(err).context("Model reply did not match the quiz format"),
        None => Err(anyhow!("no JSON object or array found"))
            .context("Model reply did not contain JSON"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTION: &str = r#"{
        "question": "भारत की राजधानी क्या है?",
        "options": ["क) मुंबई", "ख) नई दिल्ली", "ग) कोलकाता", "घ) चेन्नई"],
        "answer": "ख) नई दिल्ली",
        "explanation": "नई दिल्ली 1931 से राजधानी है।"
    }"#;

    #[test]
    fn parses_wrapped_object() {
        let reply = format!(r#"{{"questions": [{QUESTION}, {QUESTION}]}}"#);
        let quiz = parse_quiz(&reply).unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.questions[0].options.len(), 4);
        assert_eq!(quiz.questions[0].answer, "ख) नई दिल्ली");
    }

    #[test]
    fn parses_bare_array() {
        let reply = format!("[{QUESTION}]");
        let quiz = parse_quiz(&reply).unwrap();
        assert_eq!(quiz.len(), 1);
    }

    #[test]
    fn parses_fenced_block_with_prose() {
        let reply = format!(
            "Here is your quiz:\n\n```json\n{{\"questions\": [{QUESTION}]}}\n```\nGood luck!"
        );
        let quiz = parse_quiz(&reply).unwrap();
        assert_eq!(quiz.len(), 1);
    }

    #[test]
    fn parses_json_surrounded_by_prose() {
        let reply = format!("Sure! {{\"questions\": [{QUESTION}]}} Hope this helps.");
        let quiz = parse_quiz(&reply).unwrap();
        assert_eq!(quiz.len(), 1);
    }

    #[test]
    fn skips_brackets_in_leading_prose() {
        let reply = format!("Here are 5 questions [Hindi]:\n{{\"questions\": [{QUESTION}]}}");
        let quiz = parse_quiz(&reply).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz.questions[0].answer, "ख) नई दिल्ली");
    }

    #[test]
    fn accepts_any_fence_tag() {
        let reply = format!("```jsonc\n{{\"questions\": [{QUESTION}, {QUESTION}]}}\n```");
        let quiz = parse_quiz(&reply).unwrap();
        assert_eq!(quiz.len(), 2);
    }

    #[test]
    fn prefers_a_real_quiz_over_an_empty_array() {
        let reply = format!("Options go in [] lists.\n[{QUESTION}]");
        let quiz = parse_quiz(&reply).unwrap();
        assert_eq!(quiz.len(), 1);
    }

    #[test]
    fn rejects_plain_text() {
        let err = parse_quiz("I cannot help with that.").unwrap_err();
        assert!(format!("{err:#}").contains("did not contain JSON"));
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = parse_quiz(r#"{"items": [1, 2, 3]}"#).unwrap_err();
        assert!(format!("{err:#}").contains("quiz format"));
    }

    #[test]
    fn first_text_skips_empty_choices() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": null } },
                { "message": { "role": "assistant", "content": "  [] " } }
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text().unwrap(), "[]");
    }

    #[test]
    fn first_text_without_choices_fails() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.first_text().is_err());
    }

    #[test]
    fn chat_request_serialization() {
        let request = ChatRequest {
            model: "sutra-v2".to_string(),
            messages: vec![Message::system("sys"), Message::user("hello")],
            temperature: 0.7,
        };

        let json = serde_json::to_string(&request).expect("Should serialize");
        assert!(json.contains("sutra-v2"));
        assert!(json.contains("\"role\":\"system\""));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("0.7"));
    }
}
