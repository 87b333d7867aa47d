pub mod quiz_view;
pub mod theme;

pub use quiz_view::{plain_text, show_quiz};
pub use theme::Theme;
