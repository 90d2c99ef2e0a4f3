use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use visage::app::AppState;
use visage::{Config, Error, VoiceCommandProcessor, app};

/// Visage - webcam face detection with voice commands
#[derive(Parser)]
#[command(name = "visage", version, about)]
struct Cli {
    /// Transcription model identifier
    #[arg(long, env = "VISAGE_STT_MODEL", default_value = "whisper-1")]
    model: String,

    /// Directory for screenshots (defaults to the pictures directory)
    #[arg(long, env = "VISAGE_SCREENSHOT_DIR")]
    screenshot_dir: Option<PathBuf>,

    /// Disable voice commands even when a credential is present
    #[arg(long)]
    no_voice: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,visage=info",
        1 => "info,visage=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env();
    config.voice.model = cli.model;
    if let Some(dir) = cli.screenshot_dir {
        config.screenshot_dir = dir;
    }

    let state = Arc::new(AppState::new());

    // Voice is optional: a missing credential or capture device disables it
    // without affecting the rest of the demo.
    let mut voice = if cli.no_voice {
        tracing::info!("voice commands disabled by flag");
        None
    } else {
        init_voice(&config, &state)
    };

    if let Some(mut processor) = voice.take() {
        match processor.start_listening() {
            Ok(()) => {
                tracing::info!("voice commands enabled, try saying:");
                tracing::info!("  \"start detection\" / \"stop detection\"");
                tracing::info!("  \"show fps\" / \"hide fps\"");
                tracing::info!("  \"screenshot\" / \"capture\"");
                tracing::info!("  \"exit\" / \"quit\"");
                voice = Some(processor);
            }
            Err(e) => {
                tracing::warn!(error = %e, "voice commands disabled - could not start listening");
            }
        }
    }

    let Some(mut processor) = voice else {
        tracing::info!(
            "nothing to demo without voice; wire a camera through the vision traits \
             or set OPENAI_API_KEY"
        );
        return Ok(());
    };

    // Camera and detector backends plug in through the vision traits; the
    // demo drives the voice channel against the shared host state and
    // reports every toggle through the log.
    while !state.exit_requested() {
        std::thread::sleep(Duration::from_millis(200));
    }

    processor.stop_listening();
    Ok(())
}

/// Construct the voice processor, degrading gracefully on failure
fn init_voice(config: &Config, state: &Arc<AppState>) -> Option<VoiceCommandProcessor> {
    match VoiceCommandProcessor::new(&config.voice) {
        Ok(processor) => {
            app::register_voice_commands(&processor, state);
            Some(processor)
        }
        Err(Error::MissingCredential) => {
            tracing::warn!("OPENAI_API_KEY not set - voice commands disabled");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "voice commands disabled");
            None
        }
    }
}
