use anyhow::{Context, Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, unbounded};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use crate::config::AudioSettings;

/// One captured utterance: mono samples at the service sample rate.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Utterance {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Encode the utterance as a 16-bit PCM WAV blob for upload.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .context("failed to start WAV encoder")?;
            for &sample in &self.samples {
                let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                writer.write_sample(value)?;
            }
            writer.finalize().context("failed to finalize WAV data")?;
        }
        Ok(cursor.into_inner())
    }

    pub fn save_wav(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_wav_bytes()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write audio to {}", path.display()))?;
        Ok(())
    }
}

pub fn list_input_devices() -> Result<()> {
    let host = cpal::default_host();

    println!("Available input devices:");
    for (i, device) in host.input_devices()?.enumerate() {
        let name = device.name().unwrap_or("Unknown".to_string());
        println!("  {}: {}", i, name);
    }

    Ok(())
}

/// Capture a single utterance from the microphone.
///
/// Opens the default (or index-selected) input device, calibrates an energy
/// threshold against ambient noise, then records until the speaker falls
/// silent or the utterance cap is hit. The cpal stream lives only for the
/// duration of this call and is released on every exit path.
pub fn capture_utterance(
    device_index: Option<usize>,
    settings: &AudioSettings,
) -> Result<Utterance> {
    let host = cpal::default_host();
    let device = if let Some(index) = device_index {
        host.input_devices()?
            .nth(index)
            .ok_or_else(|| anyhow!("Device index {} not found", index))?
    } else {
        host.default_input_device()
            .ok_or_else(|| anyhow!("No input device available"))?
    };

    let config = device.default_input_config()?;
    let device_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    let target_rate = settings.sample_rate;

    eprintln!(
        "Using input device: {}",
        device.name().unwrap_or("Unknown".to_string())
    );
    tracing::debug!(device_rate, channels, target_rate, "opening input stream");

    let (audio_tx, audio_rx) = unbounded::<Vec<f32>>();

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let config = config.into();
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mono = mix_to_mono(data, channels);
                    let resampled = if device_rate != target_rate {
                        resample_linear(&mono, device_rate, target_rate)
                    } else {
                        mono
                    };
                    let _ = audio_tx.send(resampled);
                },
                |err| tracing::warn!("audio stream error: {err}"),
                None,
            )?
        }
        _ => {
            return Err(anyhow!(
                "Unsupported sample format. Only F32 is supported."
            ));
        }
    };

    stream.play()?;
    let samples = record_until_silence(&audio_rx, target_rate, settings);
    drop(stream);

    Ok(Utterance {
        samples: samples?,
        sample_rate: target_rate,
    })
}

fn record_until_silence(
    audio_rx: &Receiver<Vec<f32>>,
    sample_rate: u32,
    settings: &AudioSettings,
) -> Result<Vec<f32>> {
    let chunk_timeout = Duration::from_secs(2);

    // Ambient-noise calibration window establishes the speech threshold.
    let calibration_target = (settings.calibration_secs * sample_rate as f64) as usize;
    let mut ambient = Vec::with_capacity(calibration_target);
    while ambient.len() < calibration_target {
        let chunk = audio_rx
            .recv_timeout(chunk_timeout)
            .context("audio stream produced no data during calibration")?;
        ambient.extend_from_slice(&chunk);
    }
    let threshold = (rms(&ambient) * settings.energy_multiplier).max(settings.energy_floor);
    tracing::debug!(threshold, "ambient noise calibrated");

    let max_samples = (settings.max_utterance_secs * sample_rate as f64) as usize;
    let silence_target = (settings.silence_secs * sample_rate as f64) as usize;

    let mut recorded = Vec::new();
    let mut speech_started = false;
    let mut trailing_silence = 0usize;

    while recorded.len() < max_samples {
        let chunk = audio_rx
            .recv_timeout(chunk_timeout)
            .context("audio stream stalled while recording")?;

        if rms(&chunk) > threshold {
            speech_started = true;
            trailing_silence = 0;
        } else if speech_started {
            trailing_silence += chunk.len();
        }

        recorded.extend_from_slice(&chunk);

        if speech_started && trailing_silence >= silence_target {
            break;
        }
    }

    // A silent recording is still returned; the recognition service decides
    // whether it contains usable speech.
    Ok(recorded)
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

fn mix_to_mono(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

fn resample_linear(data: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    let ratio = to_rate as f32 / from_rate as f32;
    let new_len = (data.len() as f32 * ratio) as usize;
    let mut resampled = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let pos = i as f32 / ratio;
        let idx = pos as usize;
        let frac = pos - idx as f32;

        if idx + 1 < data.len() {
            let sample = data[idx] * (1.0 - frac) + data[idx + 1] * frac;
            resampled.push(sample);
        } else if idx < data.len() {
            resampled.push(data[idx]);
        }
    }
    resampled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_silence_is_zero() {
        assert_eq!(rms(&[0.0; 1600]), 0.0);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn rms_of_constant_signal() {
        let signal = vec![0.5f32; 800];
        assert!((rms(&signal) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mix_to_mono_averages_frames() {
        let stereo = [0.2f32, 0.4, -0.2, -0.4];
        let mono = mix_to_mono(&stereo, 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.3).abs() < 1e-6);
        assert!((mono[1] + 0.3).abs() < 1e-6);
    }

    #[test]
    fn resample_halves_length_when_downsampling_2x() {
        let input = vec![0.0f32; 3200];
        let output = resample_linear(&input, 32000, 16000);
        assert!((output.len() as i64 - 1600).abs() <= 1);
    }

    #[test]
    fn wav_bytes_carry_riff_header() {
        let utterance = Utterance {
            samples: vec![0.0; 160],
            sample_rate: 16000,
        };
        let bytes = utterance.to_wav_bytes().unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }
}
