use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Locale used by the recognition service for English sessions; analytics
/// only run for this locale.
pub const ENGLISH: &str = "en-US";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    pub key: &'static str,
    pub name: &'static str,
    pub code: &'static str,
}

/// Supported recognition languages, in menu order.
pub const LANGUAGES: &[LanguageOption] = &[
    LanguageOption { key: "1", name: "English", code: "en-US" },
    LanguageOption { key: "2", name: "Hindi", code: "hi-IN" },
    LanguageOption { key: "3", name: "French", code: "fr-FR" },
    LanguageOption { key: "4", name: "Spanish", code: "es-ES" },
    LanguageOption { key: "5", name: "German", code: "de-DE" },
    LanguageOption { key: "6", name: "Kannada", code: "kn-IN" },
];

/// Map a menu choice to its language, defaulting to English for anything
/// unrecognized.
pub fn option_for_choice(choice: &str) -> &'static LanguageOption {
    let choice = choice.trim();
    LANGUAGES
        .iter()
        .find(|option| option.key == choice)
        .unwrap_or(&LANGUAGES[0])
}

pub fn option_for_code(code: &str) -> Option<&'static LanguageOption> {
    LANGUAGES
        .iter()
        .find(|option| option.code.eq_ignore_ascii_case(code))
}

/// Print the language menu and read one choice from stdin.
pub fn prompt_language() -> Result<&'static LanguageOption> {
    println!();
    println!("Choose language:");
    for option in LANGUAGES {
        println!("{}. {} ({})", option.key, option.name, option.code);
    }
    print!("Enter your choice: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(option_for_choice(&line))
}

/// Guess the transcript's language from its text alone, independent of the
/// locale the user selected. Returns an ISO 639-3 code, or None when the
/// text is too short or ambiguous for a verdict.
pub fn detect_language(text: &str) -> Option<&'static str> {
    whatlang::detect(text).map(|info| info.lang().code())
}
