pub mod analytics;
pub mod audio;
pub mod config;
pub mod language;
pub mod logbook;
pub mod session;
pub mod transcribe;

pub use analytics::{AnalyticsReport, TextAnalyzer};
pub use audio::Utterance;
pub use logbook::{SessionLogger, SessionRecord};
pub use session::{Session, SessionOutcome};
pub use transcribe::{SpeechError, Transcription, TranscriptionClient};
