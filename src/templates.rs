//! Localized prompt templates, one per supported language.
//!
//! Each template carries two placeholders, `{topic}` and `{num}`, and spells
//! out (in the target language) what every question must contain: the
//! question, four options labelled in that script, the correct answer and an
//! explanation.

use std::fmt;

use clap::ValueEnum;

use crate::error::QuizError;

pub const TOPIC_PLACEHOLDER: &str = "{topic}";
pub const COUNT_PLACEHOLDER: &str = "{num}";

pub const TOPIC_SUGGESTIONS: [&str; 6] = [
    "Indian History",
    "Geography",
    "Science & Technology",
    "Indian Culture",
    "Sports",
    "Current Affairs",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Language {
    Telugu,
    Hindi,
    Tamil,
    Kannada,
    Malayalam,
    Bengali,
    Gujarati,
}

impl Language {
    /// Display order; the first entry is the default selection.
    pub const ALL: [Language; 7] = [
        Language::Telugu,
        Language::Hindi,
        Language::Tamil,
        Language::Kannada,
        Language::Malayalam,
        Language::Bengali,
        Language::Gujarati,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::Telugu => "Telugu",
            Language::Hindi => "Hindi",
            Language::Tamil => "Tamil",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Bengali => "Bengali",
            Language::Gujarati => "Gujarati",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::Telugu => "తెలుగు",
            Language::Hindi => "हिंदी",
            Language::Tamil => "தமிழ்",
            Language::Kannada => "ಕನ್ನಡ",
            Language::Malayalam => "മലയാളം",
            Language::Bengali => "বাংলা",
            Language::Gujarati => "ગુજરાતી",
        }
    }

    /// Case-insensitive lookup by English or native name.
    pub fn from_name(name: &str) -> Result<Language, QuizError> {
        let wanted = name.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(wanted) || lang.native_name() == wanted)
            .ok_or_else(|| QuizError::UnsupportedLanguage(name.to_string()))
    }

    pub fn template(self) -> &'static str {
        template_for(self)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn template_for(language: Language) -> &'static str {
    match language {
        Language::Telugu => TELUGU,
        Language::Hindi => HINDI,
        Language::Tamil => TAMIL,
        Language::Kannada => KANNADA,
        Language::Malayalam => MALAYALAM,
        Language::Bengali => BENGALI,
        Language::Gujarati => GUJARATI,
    }
}

pub fn lookup_template(name: &str) -> Result<&'static str, QuizError> {
    Language::from_name(name).map(template_for)
}

pub fn render(template: &str, topic: &str, count: u8) -> String {
    template
        .replace(COUNT_PLACEHOLDER, &count.to_string())
        .replace(TOPIC_PLACEHOLDER, topic)
}

const TELUGU: &str = r#"
తెలుగులో {num} బహుళైచ్ఛిక ప్రశ్నలను సృష్టించండి.
అంశం: {topic}

ప్రతి ప్రశ్నకు:
1. ప్రశ్న
2. నాలుగు సమాధాన ఎంపికలు (ఎ, బి, సి, డి)
3. సరైన సమాధానం
4. వివరణ
"#;

const HINDI: &str = r#"
हिंदी में {num} बहुविकल्पीय प्रश्न बनाएं।
विषय: {topic}

प्रत्येक प्रश्न के लिए:
1. प्रश्न
2. चार विकल्प (क, ख, ग, घ)
3. सही उत्तर
4. व्याख्या
"#;

const TAMIL: &str = r#"
தமிழில் {num} பல்தேர்வு வினாக்களை உருவாக்கவும்.
தலைப்பு: {topic}

ஒவ்வொரு கேள்விக்கும்:
1. கேள்வி
2. நான்கு விருப்பங்கள் (அ, ஆ, இ, ஈ)
3. சரியான பதில்
4. விளக்கம்
"#;

const KANNADA: &str = r#"
ಕನ್ನಡದಲ್ಲಿ {num} ಬಹು ಆಯ್ಕೆ ಪ್ರಶ್ನೆಗಳನ್ನು ರಚಿಸಿ.
ವಿಷಯ: {topic}

ಪ್ರತಿ ಪ್ರಶ್ನೆಗೆ:
1. ಪ್ರಶ್ನೆ
2. ನಾಲ್ಕು ಆಯ್ಕೆಗಳು (ಎ, ಬಿ, ಸಿ, ಡಿ)
3. ಸರಿಯಾದ ಉತ್ತರ
4. ವಿವರಣೆ
"#;

const MALAYALAM: &str = r#"
മലയാളത്തിൽ {num} ബഹുവരണ ചോദ്യങ്ങൾ സൃഷ്ടിക്കുക.
വിഷയം: {topic}

ഓരോ ചോദ്യത്തിനും:
1. ചോദ്യം
2. നാല് ഓപ്ഷനുകൾ (എ, ബി, സി, ഡി)
3. ശരിയായ ഉത്തരം
4. വിശദീകരണം
"#;

const BENGALI: &str = r#"
বাংলায় {num} টি বহুনির্বাচনী প্রশ্ন তৈরি করুন।
বিষয়: {topic}

প্রতিটি প্রশ্নের জন্য:
1. প্রশ্ন
2. চারটি বিকল্প (ক, খ, গ, ঘ)
3. সঠিক উত্তর
4. ব্যাখ্যা
"#;

const GUJARATI: &str = r#"
ગુજરાતીમાં {num} બહુવિકલ્પી પ્રશ્નો બનાવો.
વિષય: {topic}

દરેક પ્રશ્ન માટે:
1. પ્રશ્ન
2. ચાર વિકલ્પો (અ, બ, ક, ડ)
3. સાચો જવાબ
4. સમજૂતી
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn every_language_has_template_with_both_placeholders() {
        for language in Language::ALL {
            let template = template_for(language);
            assert!(!template.trim().is_empty(), "{language} template is empty");
            assert!(template.contains(TOPIC_PLACEHOLDER), "{language} lacks topic");
            assert!(template.contains(COUNT_PLACEHOLDER), "{language} lacks count");
        }
    }

    #[test]
    fn templates_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for language in Language::ALL {
            assert!(seen.insert(template_for(language)));
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Language::from_name("hindi").unwrap(), Language::Hindi);
        assert_eq!(Language::from_name("  TAMIL ").unwrap(), Language::Tamil);
        assert_eq!(Language::from_name("বাংলা").unwrap(), Language::Bengali);
    }

    #[test]
    fn unknown_language_is_rejected() {
        let err = lookup_template("Klingon").unwrap_err();
        assert!(matches!(err, QuizError::UnsupportedLanguage(ref name) if name == "Klingon"));

        assert!(Language::from_name("").is_err());
    }

    #[test]
    fn render_substitutes_topic_and_count() {
        let prompt = render(template_for(Language::Hindi), "Indian History", 5);
        assert!(prompt.contains("हिंदी में 5 बहुविकल्पीय प्रश्न बनाएं।"));
        assert!(prompt.contains("विषय: Indian History"));
        assert!(!prompt.contains(TOPIC_PLACEHOLDER));
        assert!(!prompt.contains(COUNT_PLACEHOLDER));
    }

    #[test]
    fn telugu_is_the_default_selection() {
        assert_eq!(Language::ALL[0], Language::Telugu);
    }

    proptest! {
        #[test]
        fn render_never_leaves_placeholders(topic in "[^{}]{0,40}", count in 5u8..=20) {
            for language in Language::ALL {
                let prompt = render(template_for(language), &topic, count);
                prop_assert!(prompt.contains(&topic));
                prop_assert!(prompt.contains(&count.to_string()));
                prop_assert!(!prompt.contains(TOPIC_PLACEHOLDER));
                prop_assert!(!prompt.contains(COUNT_PLACEHOLDER));
            }
        }
    }
}
