use anyhow::Context;
use clap::{Parser, Subcommand};
use newsreel::{AssemblyConfig, AssemblyJob, Pipeline, UploadMetadata};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "newsreel", version, about = "Assemble a narrated news video")]
struct Cli {
    /// Configuration file (TOML); defaults are used when it doesn't exist
    #[arg(long, global = true, default_value = "newsreel.toml")]
    config: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the final video from a job manifest and print upload metadata
    Assemble {
        /// Job manifest (TOML) listing articles, images and narration clips
        #[arg(long)]
        manifest: PathBuf,

        /// Override the configured output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Check that ffmpeg has the encoders a run needs
    Check,
    /// Print upload metadata for the current time
    Metadata,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> anyhow::Result<AssemblyConfig> {
    AssemblyConfig::load_or_default(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Assemble {
            manifest,
            output_dir,
        } => {
            let mut config = load_config(&cli.config)?;
            if let Some(dir) = output_dir {
                config = config.with_output_dir(dir);
            }

            let job = AssemblyJob::load(&manifest, &config)
                .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;
            let pipeline = Pipeline::new(config)?;
            let report = pipeline.run(&job).context("Assembly failed")?;

            info!(
                path = %report.artifact.path.display(),
                frames = report.video.frame_count,
                narration_seconds = report.audio.duration_seconds(),
                "Done"
            );
            println!("{}", serde_json::to_string_pretty(&report.metadata)?);
        }
        Command::Check => {
            let config = load_config(&cli.config)?;
            Pipeline::new(config)?
                .check_tools()
                .context("FFmpeg is missing required encoders")?;
            println!("ok");
        }
        Command::Metadata => {
            println!("{}", serde_json::to_string_pretty(&UploadMetadata::now())?);
        }
    }

    Ok(())
}
