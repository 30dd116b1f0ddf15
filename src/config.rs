use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub logging: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Recognition endpoint accepting multipart WAV uploads.
    pub endpoint: String,
    /// Bearer token sent with each request; VOICELOG_API_KEY overrides it.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub calibration_secs: f64,
    pub silence_secs: f64,
    pub max_utterance_secs: f64,
    pub energy_floor: f32,
    pub energy_multiplier: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    pub dir: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8765/recognize".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            calibration_secs: 1.0,
            silence_secs: 0.8,
            max_utterance_secs: 12.0,
            energy_floor: 0.01,
            energy_multiplier: 1.5,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
        }
    }
}

impl ServiceSettings {
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var("VOICELOG_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.clone())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            Ok(default_config)
        } else {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&contents)
                .map_err(|e| anyhow!("Failed to parse config: {}", e))
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let config_dir = if let Some(xdg_config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config_home)
    } else {
        dirs::config_dir().ok_or_else(|| anyhow!("Cannot determine config directory"))?
    };

    Ok(config_dir.join("voicelog").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = AppConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.service.endpoint, config.service.endpoint);
        assert_eq!(parsed.audio.sample_rate, 16_000);
        assert_eq!(parsed.logging.dir, "logs");
    }

    #[test]
    fn partial_config_fills_missing_sections() {
        let parsed: AppConfig = toml::from_str("[service]\nendpoint = \"http://example.test/stt\"\ntimeout_secs = 5\n").unwrap();
        assert_eq!(parsed.service.endpoint, "http://example.test/stt");
        assert_eq!(parsed.service.timeout_secs, 5);
        assert_eq!(parsed.audio.sample_rate, 16_000);
    }
}
