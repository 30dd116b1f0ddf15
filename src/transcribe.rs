//! Client for the remote speech-recognition service.
//!
//! Uploads the captured WAV audio together with the locale code, asks the
//! service for every candidate alternative, and keeps the top-ranked one.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::ServiceSettings;

/// The two failure kinds a session recovers from locally. Everything else
/// propagates and terminates the run.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The service responded but produced no usable transcript.
    #[error("could not understand the audio")]
    UnrecognizedSpeech,
    /// The network call or the service itself failed.
    #[error("speech service request failed: {0}")]
    ServiceRequest(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    pub confidence: Option<f32>,
}

/// Ranked candidate list as returned by the service, best first.
#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    alternative: Vec<RankedAlternative>,
}

#[derive(Debug, Deserialize)]
struct RankedAlternative {
    #[serde(default)]
    transcript: String,
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub struct TranscriptionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl TranscriptionClient {
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            api_key: settings.resolve_api_key(),
        })
    }

    /// Send one utterance for recognition and return the top-ranked
    /// transcript with its confidence score, if the service reports one.
    pub async fn recognize(
        &self,
        wav_bytes: Vec<u8>,
        locale: &str,
    ) -> std::result::Result<Transcription, SpeechError> {
        tracing::debug!(bytes = wav_bytes.len(), locale, "sending recognition request");

        let file_part = Part::bytes(wav_bytes)
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| SpeechError::ServiceRequest(e.to_string()))?;

        let form = Form::new()
            .part("file", file_part)
            .text("language", locale.to_string())
            .text("alternatives", "all");

        let mut request = self.http.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SpeechError::ServiceRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message =
                if let Ok(parsed) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    parsed.error.message
                } else {
                    body
                };
            return Err(SpeechError::ServiceRequest(format!(
                "{} ({})",
                message.trim(),
                status.as_u16()
            )));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::ServiceRequest(format!("malformed response: {}", e)))?;

        select_top_alternative(parsed)
    }
}

/// The service ranks alternatives best-first; keep the first and discard the
/// rest. An empty or blank candidate list means the speech was not
/// recognized.
fn select_top_alternative(
    response: RecognizeResponse,
) -> std::result::Result<Transcription, SpeechError> {
    let top = response
        .alternative
        .into_iter()
        .next()
        .ok_or(SpeechError::UnrecognizedSpeech)?;

    if top.transcript.trim().is_empty() {
        return Err(SpeechError::UnrecognizedSpeech);
    }

    Ok(Transcription {
        text: top.transcript,
        confidence: top.confidence,
    })
}
