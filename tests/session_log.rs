//! End-to-end checks for the analytics → record → log-file pipeline.

use std::fs;

use tempfile::tempdir;
use voicelog::analytics::{AnalyticsReport, TextAnalyzer};
use voicelog::logbook::{SessionLogger, SessionRecord};

#[test]
fn english_weather_session_produces_schema_exact_log() {
    let analyzer = TextAnalyzer::new();
    let transcript = "What is the weather today";

    let report = analyzer.analyze(transcript);
    assert_eq!(report.intent, "Weather Inquiry");
    assert_eq!(report.keywords, vec!["weather", "today"]);
    assert_eq!(format!("{:.2}", report.polarity), "0.00");
    assert_eq!(format!("{:.2}", report.subjectivity), "0.00");

    let record = SessionRecord::with_timestamp("06-08-2026_10-15-30", "en-US", transcript, report);

    let dir = tempdir().unwrap();
    let logger = SessionLogger::new(dir.path());
    let path = logger.write(&record).unwrap();

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("speech_log_06-08-2026_10-15-30.txt")
    );

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents,
        "Timestamp: 06-08-2026_10-15-30\n\
         Language: en-US\n\
         Transcription: What is the weather today\n\
         Sentiment Polarity: 0.00\n\
         Sentiment Subjectivity: 0.00\n\
         Intent: Weather Inquiry\n\
         Keywords: weather, today\n"
    );

    let parsed = SessionRecord::parse(&contents).unwrap();
    assert_eq!(parsed.locale, "en-US");
    assert_eq!(parsed.transcript, transcript);
    assert_eq!(parsed.report.intent, "Weather Inquiry");
    assert_eq!(parsed.report.keywords, vec!["weather", "today"]);
}

#[test]
fn non_english_session_logs_placeholder_analytics() {
    // Whatever the transcript says, a non-English locale must never run the
    // English analytics.
    let transcript = "what a wonderful sunny day, thank you";
    let record = SessionRecord::with_timestamp(
        "06-08-2026_10-16-00",
        "hi-IN",
        transcript,
        AnalyticsReport::skipped(),
    );

    let dir = tempdir().unwrap();
    let logger = SessionLogger::new(dir.path());
    let path = logger.write(&record).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Language: hi-IN\n"));
    assert!(contents.contains("Sentiment Polarity: 0.00\n"));
    assert!(contents.contains("Sentiment Subjectivity: 0.00\n"));
    assert!(contents.contains("Intent: skipped\n"));
    assert!(contents.ends_with("Keywords: \n"));

    let parsed = SessionRecord::parse(&contents).unwrap();
    assert_eq!(parsed.report, AnalyticsReport::skipped());
}

#[test]
fn successive_sessions_accumulate_separate_files() {
    let dir = tempdir().unwrap();
    let logger = SessionLogger::new(dir.path());

    for (i, transcript) in ["hello there", "goodbye now"].iter().enumerate() {
        let record = SessionRecord::with_timestamp(
            &format!("06-08-2026_10-17-0{}", i),
            "en-US",
            transcript,
            AnalyticsReport::skipped(),
        );
        logger.write(&record).unwrap();
    }

    let count = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(count, 2);
}
