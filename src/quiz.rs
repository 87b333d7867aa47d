use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::QuizError;
use crate::llm::QuestionEngine;
use crate::templates::{Language, template_for};

pub const OPTIONS_PER_QUESTION: usize = 4;
pub const MIN_QUESTIONS: u8 = 5;
pub const MAX_QUESTIONS: u8 = 20;
pub const DEFAULT_QUESTIONS: u8 = 10;
pub const DEFAULT_TOPIC: &str = "Indian History";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(alias = "questionText", alias = "question_text")]
    pub question: String,
    pub options: Vec<String>,
    #[serde(alias = "correctAnswer", alias = "correct_answer")]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// Options laid out for two display columns: the first half goes left,
    /// the second half right.
    pub fn option_columns(&self) -> (&[String], &[String]) {
        let split = self.options.len().div_ceil(2);
        self.options.split_at(split)
    }

    fn check_shape(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            bail!("question text is empty");
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            bail!(
                "expected {OPTIONS_PER_QUESTION} options, got {}",
                self.options.len()
            );
        }
        if self.options.iter().any(|option| option.trim().is_empty()) {
            bail!("an option is empty");
        }
        if self.answer.trim().is_empty() {
            bail!("correct answer is empty");
        }
        if self.explanation.trim().is_empty() {
            bail!("explanation is empty");
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub questions: Vec<QuizQuestion>,
}

impl QuizResult {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuizQuestion> {
        self.questions.iter()
    }

    /// Rejects the whole result if any question is malformed.
    pub fn validate(&self) -> Result<()> {
        if self.questions.is_empty() {
            bail!("the model returned no questions");
        }
        for (idx, question) in self.questions.iter().enumerate() {
            if let Err(err) = question.check_shape() {
                bail!("question {} is malformed: {err}", idx + 1);
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizRequest {
    pub topic: String,
    pub count: u8,
    pub language: Language,
}

impl QuizRequest {
    pub fn new(topic: impl Into<String>, count: u8, language: Language) -> Self {
        Self {
            topic: topic.into(),
            count,
            language,
        }
    }
}

/// The one operation the application needs: turn a request into a quiz.
pub struct QuizGenerator<E> {
    engine: E,
}

impl<E: QuestionEngine> QuizGenerator<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub async fn generate(&self, request: &QuizRequest) -> Result<QuizResult, QuizError> {
        let template = template_for(request.language);

        let result = self
            .engine
            .generate_questions(&request.topic, request.count, template)
            .await
            .map_err(QuizError::generation)?;

        if let Err(err) = result.validate() {
            warn!(language = %request.language, error = %err, "rejecting malformed quiz");
            return Err(QuizError::generation(err));
        }

        if result.len() != usize::from(request.count) {
            warn!(
                requested = request.count,
                received = result.len(),
                "engine returned a different number of questions"
            );
        }
        info!(
            language = %request.language,
            questions = result.len(),
            "quiz generated"
        );
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn sample_question(n: usize) -> QuizQuestion {
        QuizQuestion {
            question: format!("Question text {n}?"),
            options: vec![
                format!("क {n}"),
                format!("ख {n}"),
                format!("ग {n}"),
                format!("घ {n}"),
            ],
            answer: format!("ख {n}"),
            explanation: format!("Because {n}."),
        }
    }

    /// Returns exactly `count` well-formed questions.
    struct EchoEngine {
        calls: AtomicUsize,
    }

    impl QuestionEngine for EchoEngine {
        async fn generate_questions(
            &self,
            _topic: &str,
            count: u8,
            template: &str,
        ) -> Result<QuizResult> {
            assert!(template.contains("{topic}"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(QuizResult {
                questions: (1..=usize::from(count)).map(sample_question).collect(),
            })
        }
    }

    struct FailingEngine;

    impl QuestionEngine for FailingEngine {
        async fn generate_questions(&self, _: &str, _: u8, _: &str) -> Result<QuizResult> {
            bail!("quota exceeded")
        }
    }

    struct ShortOptionsEngine;

    impl QuestionEngine for ShortOptionsEngine {
        async fn generate_questions(&self, _: &str, count: u8, _: &str) -> Result<QuizResult> {
            let mut questions: Vec<_> = (1..=usize::from(count)).map(sample_question).collect();
            questions[1].options.pop();
            Ok(QuizResult { questions })
        }
    }

    #[tokio::test]
    async fn echo_engine_yields_requested_shape() {
        let generator = QuizGenerator::new(EchoEngine {
            calls: AtomicUsize::new(0),
        });
        let request = QuizRequest::new("Indian History", 5, Language::Hindi);

        let quiz = generator.generate(&request).await.unwrap();

        assert_eq!(quiz.len(), 5);
        for question in quiz.iter() {
            assert!(!question.question.is_empty());
            assert_eq!(question.options.len(), OPTIONS_PER_QUESTION);
            assert!(!question.answer.is_empty());
            assert!(!question.explanation.is_empty());
        }
        assert_eq!(generator.engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn engine_failure_is_a_single_generation_error() {
        let generator = QuizGenerator::new(FailingEngine);
        let request = QuizRequest::new("Sports", 10, Language::Tamil);

        let err = generator.generate(&request).await.unwrap_err();
        assert!(matches!(err, QuizError::Generation(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn malformed_question_fails_whole_request() {
        let generator = QuizGenerator::new(ShortOptionsEngine);
        let request = QuizRequest::new("Geography", 5, Language::Kannada);

        let err = generator.generate(&request).await.unwrap_err();
        assert!(matches!(err, QuizError::Generation(_)));
        assert!(err.to_string().contains("question 2"));
    }

    #[test]
    fn empty_result_is_invalid() {
        assert!(QuizResult::default().validate().is_err());
    }

    #[test]
    fn blank_explanation_is_invalid() {
        let mut question = sample_question(1);
        question.explanation = "  ".into();
        let quiz = QuizResult {
            questions: vec![question],
        };
        let err = quiz.validate().unwrap_err();
        assert!(err.to_string().contains("explanation"));
    }

    #[test]
    fn options_split_two_and_two() {
        let question = sample_question(1);
        let (left, right) = question.option_columns();
        assert_eq!(left, &["क 1".to_string(), "ख 1".to_string()]);
        assert_eq!(right, &["ग 1".to_string(), "घ 1".to_string()]);
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let raw = r#"{
            "questionText": "Q?",
            "options": ["a", "b", "c", "d"],
            "correctAnswer": "a",
            "explanation": "e"
        }"#;
        let question: QuizQuestion = serde_json::from_str(raw).unwrap();
        assert_eq!(question.question, "Q?");
        assert_eq!(question.answer, "a");
    }
}
