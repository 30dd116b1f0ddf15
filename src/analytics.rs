//! Transcript analytics: sentiment scores, rule-based intent classification,
//! and frequency-ranked keyword extraction. English transcripts only; other
//! sessions get the placeholder report.

use std::collections::{HashMap, HashSet};

/// Intent label recorded when analytics are skipped for a non-English session.
pub const SKIPPED_INTENT: &str = "skipped";

/// Fallback intent when no category keyword matches.
pub const GENERAL_INTENT: &str = "General Statement";

const KEYWORD_LIMIT: usize = 5;
const MIN_KEYWORD_LEN: usize = 3;

/// Intent categories in priority order. The first category with any keyword
/// contained in the lowercased transcript wins, so a transcript matching both
/// "weather" and "hello" resolves to Weather Inquiry.
const INTENT_RULES: &[(&str, &[&str])] = &[
    ("Weather Inquiry", &["weather", "temperature", "rain", "sunny", "cloudy", "forecast"]),
    ("Time/Date Inquiry", &["time", "date", "day", "month", "year", "clock"]),
    ("Music Command", &["play", "music", "song", "listen", "radio", "tune"]),
    ("Greeting", &["hello", "hi", "how are you", "greetings", "hey"]),
    ("Tell a Joke", &["joke", "funny", "laugh", "humor"]),
    ("News Request", &["news", "headlines", "update", "current affairs"]),
    ("Help Request", &["help", "support", "assist", "problem"]),
    ("Gratitude", &["thank", "thanks", "appreciate"]),
    ("Goodbye", &["bye", "goodbye", "see you", "later"]),
];

/// The NLTK English stopword list, bundled so keyword extraction works
/// offline with the exact corpus the contract was written against.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you",
    "you're", "you've", "you'll", "you'd", "your", "yours", "yourself",
    "yourselves", "he", "him", "his", "himself", "she", "she's", "her",
    "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were",
    "be", "been", "being", "have", "has", "had", "having", "do", "does",
    "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about",
    "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off",
    "over", "under", "again", "further", "then", "once", "here", "there",
    "when", "where", "why", "how", "all", "any", "both", "each", "few",
    "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "don't", "should", "should've", "now", "d", "ll", "m",
    "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
    "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
    "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn",
    "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won",
    "won't", "wouldn", "wouldn't",
];

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    /// Sentiment polarity in [-1, 1].
    pub polarity: f64,
    /// Sentiment subjectivity in [0, 1].
    pub subjectivity: f64,
    pub intent: String,
    /// Up to five most frequent content words, ties kept in first-seen order.
    pub keywords: Vec<String>,
}

impl AnalyticsReport {
    /// Placeholder report for non-English sessions.
    pub fn skipped() -> Self {
        Self {
            polarity: 0.0,
            subjectivity: 0.0,
            intent: SKIPPED_INTENT.to_string(),
            keywords: Vec::new(),
        }
    }
}

/// Classify the transcript into one intent label by testing each category's
/// keyword set in declared order.
pub fn classify_intent(text: &str) -> &'static str {
    let text = text.to_lowercase();
    for &(label, keywords) in INTENT_RULES {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            return label;
        }
    }
    GENERAL_INTENT
}

pub struct TextAnalyzer {
    stopwords: HashSet<&'static str>,
}

impl TextAnalyzer {
    pub fn new() -> Self {
        Self {
            stopwords: ENGLISH_STOPWORDS.iter().copied().collect(),
        }
    }

    pub fn analyze(&self, text: &str) -> AnalyticsReport {
        let (polarity, subjectivity) = sentiment_scores(text);
        AnalyticsReport {
            polarity,
            subjectivity,
            intent: classify_intent(text).to_string(),
            keywords: self.extract_keywords(text),
        }
    }

    /// Return the most frequent content words: lowercased, punctuation
    /// stripped, stopwords and tokens shorter than three characters dropped.
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for token in cleaned.split_whitespace() {
            if token.chars().count() < MIN_KEYWORD_LEN || self.stopwords.contains(token) {
                continue;
            }
            let count = counts.entry(token).or_insert(0);
            if *count == 0 {
                first_seen.push(token);
            }
            *count += 1;
        }

        // Stable sort keeps first-seen order among equal counts.
        let mut ranked = first_seen;
        ranked.sort_by_key(|token| std::cmp::Reverse(counts[token]));
        ranked
            .into_iter()
            .take(KEYWORD_LIMIT)
            .map(str::to_string)
            .collect()
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// VADER sentiment: polarity is the compound score, subjectivity the
/// non-neutral mass of the text.
fn sentiment_scores(text: &str) -> (f64, f64) {
    let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
    let scores = analyzer.polarity_scores(text);
    let polarity = scores.get("compound").copied().unwrap_or(0.0);
    let positive = scores.get("pos").copied().unwrap_or(0.0);
    let negative = scores.get("neg").copied().unwrap_or(0.0);
    (polarity, (positive + negative).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_keyword_classifies_as_weather_inquiry() {
        assert_eq!(classify_intent("Will it rain this evening"), "Weather Inquiry");
        assert_eq!(classify_intent("what is the FORECAST"), "Weather Inquiry");
    }

    #[test]
    fn category_order_beats_input_order() {
        // Contains both a greeting and a weather keyword; weather is checked
        // first, so it wins regardless of position in the text.
        assert_eq!(classify_intent("hello, what's the weather"), "Weather Inquiry");
    }

    #[test]
    fn later_categories_still_reachable() {
        assert_eq!(classify_intent("tell me a joke"), "Tell a Joke");
        assert_eq!(classify_intent("thanks a lot"), "Gratitude");
        assert_eq!(classify_intent("goodbye everyone"), "Goodbye");
    }

    #[test]
    fn unmatched_text_is_general_statement() {
        assert_eq!(classify_intent("the sky looks blue"), GENERAL_INTENT);
        assert_eq!(classify_intent(""), GENERAL_INTENT);
    }

    #[test]
    fn stopword_only_input_yields_no_keywords() {
        let analyzer = TextAnalyzer::new();
        assert!(analyzer.extract_keywords("it the is").is_empty());
    }

    #[test]
    fn keywords_ranked_by_frequency_then_first_seen() {
        let analyzer = TextAnalyzer::new();
        let keywords = analyzer.extract_keywords("weather weather today sunny today rain");
        assert_eq!(keywords, vec!["weather", "today", "sunny", "rain"]);
    }

    #[test]
    fn keyword_list_caps_at_five() {
        let analyzer = TextAnalyzer::new();
        let keywords =
            analyzer.extract_keywords("alpha bravo charlie delta echo foxtrot golf");
        assert_eq!(keywords.len(), 5);
        assert_eq!(keywords[0], "alpha");
    }

    #[test]
    fn extraction_is_idempotent_on_filtered_output() {
        let analyzer = TextAnalyzer::new();
        let first = analyzer.extract_keywords("What is the weather like today, weather permitting?");
        let second = analyzer.extract_keywords(&first.join(" "));
        let first_set: std::collections::HashSet<_> = first.iter().collect();
        let second_set: std::collections::HashSet<_> = second.iter().collect();
        assert_eq!(first_set, second_set);
    }

    #[test]
    fn weather_question_keywords() {
        let analyzer = TextAnalyzer::new();
        let keywords = analyzer.extract_keywords("What is the weather today");
        assert_eq!(keywords, vec!["weather", "today"]);
    }

    #[test]
    fn factual_question_scores_neutral() {
        let analyzer = TextAnalyzer::new();
        let report = analyzer.analyze("What is the weather today");
        assert!(report.polarity.abs() < 1e-9);
        assert!(report.subjectivity.abs() < 1e-9);
        assert_eq!(report.intent, "Weather Inquiry");
        assert_eq!(report.keywords, vec!["weather", "today"]);
    }

    #[test]
    fn opinionated_text_moves_both_scores() {
        let analyzer = TextAnalyzer::new();
        let report = analyzer.analyze("I love this wonderful sunny day");
        assert!(report.polarity > 0.0);
        assert!(report.subjectivity > 0.0);
    }

    #[test]
    fn skipped_report_holds_placeholder_values() {
        let report = AnalyticsReport::skipped();
        assert_eq!(report.polarity, 0.0);
        assert_eq!(report.subjectivity, 0.0);
        assert_eq!(report.intent, SKIPPED_INTENT);
        assert!(report.keywords.is_empty());
    }
}
