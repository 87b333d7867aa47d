pub mod commands;
pub mod config;
pub mod error;
pub mod llm;
pub mod palette;
pub mod quiz;
pub mod templates;
pub mod tui;
pub mod utils;

pub use error::QuizError;
pub use quiz::{QuizGenerator, QuizQuestion, QuizRequest, QuizResult};
pub use templates::Language;
