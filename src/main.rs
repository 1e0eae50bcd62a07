use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use wavescope::{Settings, prepare, ui};

/// Export a WAV file's RIFF header, then animate its mel spectrogram while it plays
#[derive(Parser, Debug)]
#[command(name = "wavescope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// WAV file to inspect
    #[arg(default_value = "2023-12-16_21h51m41s.wav")]
    input: PathBuf,

    /// INI file overriding the analysis / animation / display defaults
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective settings as INI and exit
    #[arg(long)]
    dump_settings: bool,

    /// Run the pipeline without opening the window
    #[arg(long)]
    no_window: bool,
}

fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let settings = Settings::load(cli.settings.as_deref());
    if cli.dump_settings {
        print!("{}", settings.to_ini());
        return Ok(());
    }

    info!("wavescope v{}", env!("CARGO_PKG_VERSION"));

    // Failures are reported where they happen; the run just ends
    let Ok(prepared) = prepare(&cli.input, &settings, true) else {
        return Ok(());
    };

    if cli.no_window {
        info!(
            "Grid: {} mel bands x {} frames, metadata at {}",
            prepared.spectrogram.num_bands(),
            prepared.spectrogram.num_frames(),
            prepared.info_path.display()
        );
        return Ok(());
    }

    if let Err(e) = ui::run(prepared, settings) {
        tracing::error!("{:#}", e);
    }
    Ok(())
}
