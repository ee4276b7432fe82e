//! Clipper CLI — drive the clip widget from the command line.
//!
//! Usage:
//!   clipper devices            List capture devices
//!   clipper record [OPTIONS]   Record one clip and print its value
//!   clipper decode <VALUE>     Write a clip value to a media file
//!   clipper check              Check capture capabilities
//!
//! Capture runs against the simulated platform.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clipper_common::config::{config_file_path, ClipperConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "clipper",
    about = "Record camera/microphone clips and hand them over as input values",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/clipper/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Shape of the simulated platform.
#[derive(Args, Debug, Clone)]
pub struct PlatformArgs {
    /// Number of cameras
    #[arg(long, default_value = "1")]
    pub cameras: usize,

    /// Number of microphones
    #[arg(long, default_value = "1")]
    pub mics: usize,

    /// Decline capture access
    #[arg(long)]
    pub deny: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List capture devices
    Devices {
        #[command(flatten)]
        platform: PlatformArgs,
    },

    /// Record one clip and emit its value as JSON
    Record {
        #[command(flatten)]
        platform: PlatformArgs,

        /// Camera to pick after startup
        #[arg(long)]
        camera: Option<String>,

        /// Microphone to pick after startup
        #[arg(long)]
        mic: Option<String>,

        /// Fragment sizes in bytes; the last is flushed on stop
        #[arg(long, value_delimiter = ',', default_value = "10,20,30")]
        chunks: Vec<usize>,

        /// Mime type reported by the recorder
        #[arg(long, default_value = "video/webm")]
        mime: String,

        /// Device choice store (JSON file)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Write the value here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a clip value into a media file
    Decode {
        /// Value JSON file, or '-' for stdin
        value: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Check capture capabilities
    Check {
        #[command(flatten)]
        platform: PlatformArgs,

        /// Write the effective config back to the config file
        #[arg(long)]
        write_config: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClipperConfig::load_from(path),
        None => ClipperConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    clipper_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Devices { platform } => commands::devices::run(platform).await,
        Commands::Record {
            platform,
            camera,
            mic,
            chunks,
            mime,
            store,
            output,
        } => {
            commands::record::run(
                &config,
                commands::record::RecordOptions {
                    platform,
                    camera,
                    mic,
                    chunks,
                    mime,
                    store,
                    output,
                },
            )
            .await
        }
        Commands::Decode { value, output_dir } => commands::decode::run(value, output_dir),
        Commands::Check {
            platform,
            write_config,
        } => {
            let config_path = write_config
                .then(|| cli.config.clone().unwrap_or_else(config_file_path));
            commands::check::run(&config, platform, config_path).await
        }
    }
}
