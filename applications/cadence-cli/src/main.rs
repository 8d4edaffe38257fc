/// Cadence - terminal playback controller demo
use cadence_cli::{commands::HELP, config::AppConfig, demo, terminal::TerminalSurface};
use cadence_control::format_time;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Playback controller with gated play/pause and debounced seeking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session against a simulated track
    Demo {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Format a position in seconds as M:SS
    Format {
        /// Position in seconds
        #[arg(allow_hyphen_values = true)]
        seconds: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with the status line
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_cli=info,cadence_control=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { config } => {
            let config = AppConfig::load(config.as_deref())?;
            println!("{}\n", HELP);

            let input = BufReader::new(tokio::io::stdin());
            let snapshot = demo::run(config, input, TerminalSurface::stdout()).await?;
            println!(
                "\nStopped at {} of {}",
                format_time(snapshot.current_time),
                format_time(snapshot.duration)
            );
        }
        Commands::Config { config } => {
            let config = AppConfig::load(config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
        Commands::Format { seconds } => {
            println!("{}", format_time(seconds));
        }
    }

    Ok(())
}
