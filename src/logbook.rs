//! Write-once session logs: one timestamped plain-text file per run, with a
//! fixed seven-line schema and a parser for reading records back.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analytics::AnalyticsReport;

pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y_%H-%M-%S";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub timestamp: String,
    pub locale: String,
    pub transcript: String,
    pub report: AnalyticsReport,
}

impl SessionRecord {
    pub fn new(locale: &str, transcript: &str, report: AnalyticsReport) -> Self {
        Self::with_timestamp(
            &Local::now().format(TIMESTAMP_FORMAT).to_string(),
            locale,
            transcript,
            report,
        )
    }

    pub fn with_timestamp(
        timestamp: &str,
        locale: &str,
        transcript: &str,
        report: AnalyticsReport,
    ) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            locale: locale.to_string(),
            transcript: transcript.to_string(),
            report,
        }
    }

    pub fn file_name(&self) -> String {
        format!("speech_log_{}.txt", self.timestamp)
    }

    /// Render the record in the fixed seven-line schema. Floats are fixed to
    /// two decimals; the keyword line is present even when empty.
    pub fn render(&self) -> String {
        format!(
            "Timestamp: {}\n\
             Language: {}\n\
             Transcription: {}\n\
             Sentiment Polarity: {:.2}\n\
             Sentiment Subjectivity: {:.2}\n\
             Intent: {}\n\
             Keywords: {}\n",
            self.timestamp,
            self.locale,
            self.transcript,
            self.report.polarity,
            self.report.subjectivity,
            self.report.intent,
            self.report.keywords.join(", "),
        )
    }

    /// Parse a record rendered by [`SessionRecord::render`].
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();

        let timestamp = expect_field(lines.next(), "Timestamp: ")?;
        let locale = expect_field(lines.next(), "Language: ")?;
        let transcript = expect_field(lines.next(), "Transcription: ")?;
        let polarity = expect_field(lines.next(), "Sentiment Polarity: ")?
            .parse::<f64>()
            .context("invalid polarity value")?;
        let subjectivity = expect_field(lines.next(), "Sentiment Subjectivity: ")?
            .parse::<f64>()
            .context("invalid subjectivity value")?;
        let intent = expect_field(lines.next(), "Intent: ")?;
        let keywords_raw = expect_field(lines.next(), "Keywords: ")?;
        let keywords = if keywords_raw.is_empty() {
            Vec::new()
        } else {
            keywords_raw.split(", ").map(str::to_string).collect()
        };

        Ok(Self {
            timestamp: timestamp.to_string(),
            locale: locale.to_string(),
            transcript: transcript.to_string(),
            report: AnalyticsReport {
                polarity,
                subjectivity,
                intent: intent.to_string(),
                keywords,
            },
        })
    }
}

fn expect_field<'a>(line: Option<&'a str>, prefix: &str) -> Result<&'a str> {
    line.and_then(|l| l.strip_prefix(prefix))
        .with_context(|| format!("log record is missing a `{}` line", prefix.trim_end()))
}

pub struct SessionLogger {
    dir: PathBuf,
}

impl SessionLogger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one record to a new file named after its timestamp. The log
    /// directory is created if absent; existing files are never touched.
    pub fn write(&self, record: &SessionRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create log directory {}", self.dir.display()))?;

        let path = self.dir.join(record.file_name());
        fs::write(&path, record.render())
            .with_context(|| format!("failed to write log file {}", path.display()))?;
        Ok(path)
    }
}
