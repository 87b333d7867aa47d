use crate::palette::Palette;
use crate::templates::{Language, TOPIC_SUGGESTIONS};

pub fn run() {
    print!("{}", render());
}

fn render() -> String {
    let mut out = format!("{}\n", Palette::paint(Palette::ACCENT, "Supported languages"));
    for language in Language::ALL {
        out.push_str(&format!(
            "  {:<10} {}\n",
            language.name(),
            Palette::dim(language.native_name())
        ));
    }

    out.push_str(&format!(
        "\n{}\n",
        Palette::paint(Palette::ACCENT, "Topic suggestions")
    ));
    for topic in TOPIC_SUGGESTIONS {
        out.push_str(&format!("  - {topic}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_language_and_suggestion() {
        let text = render();
        for language in Language::ALL {
            assert!(text.contains(language.name()));
            assert!(text.contains(language.native_name()));
        }
        assert!(text.contains("- Current Affairs"));
    }
}
