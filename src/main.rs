use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use voicelog::analytics::TextAnalyzer;
use voicelog::audio;
use voicelog::config::AppConfig;
use voicelog::language;
use voicelog::logbook::SessionLogger;
use voicelog::session::Session;
use voicelog::transcribe::TranscriptionClient;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Capture one utterance, transcribe it remotely, and log transcript analytics"
)]
struct Cli {
    /// List available audio input devices
    #[arg(long)]
    list_devices: bool,

    /// Select audio input device by index
    #[arg(long)]
    device: Option<usize>,

    /// Locale code for recognition (e.g. "en-US"); skips the language menu
    #[arg(long)]
    lang: Option<String>,

    /// Save the captured utterance as a WAV file
    #[arg(long)]
    save_audio: Option<PathBuf>,

    /// Override the session log directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list_devices {
        return audio::list_input_devices();
    }

    let config = AppConfig::load()?;

    let locale = match &cli.lang {
        Some(code) => language::option_for_code(code)
            .ok_or_else(|| anyhow!("unsupported language code: {}", code))?,
        None => language::prompt_language()?,
    };

    let client = TranscriptionClient::new(&config.service)?;
    let analyzer = TextAnalyzer::new();
    let log_dir = cli
        .log_dir
        .unwrap_or_else(|| PathBuf::from(&config.logging.dir));
    let logger = SessionLogger::new(log_dir);

    let session = Session::new(
        locale,
        config.audio.clone(),
        cli.device,
        cli.save_audio,
        client,
        analyzer,
        logger,
    );
    session.run().await?;

    Ok(())
}
