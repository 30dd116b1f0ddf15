//! One full run: capture, transcribe, analyze, confirm language, log.

use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

use crate::analytics::{AnalyticsReport, TextAnalyzer};
use crate::audio;
use crate::config::AudioSettings;
use crate::language::{self, LanguageOption};
use crate::logbook::{SessionLogger, SessionRecord};
use crate::transcribe::{SpeechError, TranscriptionClient};

/// A single capture-to-log session. Collaborators are injected at
/// construction; nothing is shared across sessions.
pub struct Session {
    locale: &'static LanguageOption,
    audio: AudioSettings,
    device_index: Option<usize>,
    save_audio: Option<PathBuf>,
    client: TranscriptionClient,
    analyzer: TextAnalyzer,
    logger: SessionLogger,
}

/// How the session ended. Speech failures are handled outcomes, not errors:
/// they are reported to the user, write no log, and exit zero.
#[derive(Debug)]
pub enum SessionOutcome {
    Logged(PathBuf),
    UnrecognizedSpeech,
    ServiceFailure(String),
}

impl Session {
    pub fn new(
        locale: &'static LanguageOption,
        audio: AudioSettings,
        device_index: Option<usize>,
        save_audio: Option<PathBuf>,
        client: TranscriptionClient,
        analyzer: TextAnalyzer,
        logger: SessionLogger,
    ) -> Self {
        Self {
            locale,
            audio,
            device_index,
            save_audio,
            client,
            analyzer,
            logger,
        }
    }

    pub async fn run(&self) -> Result<SessionOutcome> {
        println!();
        println!("Speak now in {}...", self.locale.code);

        let settings = self.audio.clone();
        let device_index = self.device_index;
        let utterance =
            tokio::task::spawn_blocking(move || audio::capture_utterance(device_index, &settings))
                .await??;
        debug!(seconds = utterance.duration_seconds(), "utterance captured");

        if let Some(path) = &self.save_audio {
            utterance.save_wav(path)?;
            eprintln!("Saved captured audio to {}", path.display());
        }

        let wav_bytes = utterance.to_wav_bytes()?;
        let transcription = match self.client.recognize(wav_bytes, self.locale.code).await {
            Ok(transcription) => transcription,
            Err(SpeechError::UnrecognizedSpeech) => {
                println!("Could not understand the audio.");
                return Ok(SessionOutcome::UnrecognizedSpeech);
            }
            Err(SpeechError::ServiceRequest(detail)) => {
                println!("Speech service request failed: {}", detail);
                return Ok(SessionOutcome::ServiceFailure(detail));
            }
        };

        println!();
        println!("Transcription: {}", transcription.text);
        match transcription.confidence {
            Some(confidence) => println!("Confidence Score: {:.2}", confidence),
            None => println!("Confidence Score: Not available"),
        }

        let report = if self.locale.code == language::ENGLISH {
            let report = self.analyzer.analyze(&transcription.text);
            println!("Sentiment Polarity: {:.2}", report.polarity);
            println!("Sentiment Subjectivity: {:.2}", report.subjectivity);
            println!("Intent: {}", report.intent);
            if !report.keywords.is_empty() {
                println!("Keywords: {}", report.keywords.join(", "));
            }
            report
        } else {
            println!("Sentiment analysis skipped for this language.");
            println!("Intent detection skipped for this language.");
            AnalyticsReport::skipped()
        };

        // Text-based guess, independent of the selected locale; display only.
        let detected = language::detect_language(&transcription.text).unwrap_or("unknown");
        println!("Detected Language: {}", detected);

        let record = SessionRecord::new(self.locale.code, &transcription.text, report);
        let path = self.logger.write(&record)?;
        println!("Logged to {}", path.display());

        Ok(SessionOutcome::Logged(path))
    }
}
