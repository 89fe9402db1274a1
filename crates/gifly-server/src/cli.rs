use clap::Parser;
use std::path::PathBuf;

/// Gifly - GitHub App that answers [gifbot: ...] comments with GIFs
#[derive(Parser, Debug)]
#[command(name = "giflyd")]
#[command(version = gifly_core::VERSION)]
#[command(about = "Gifly webhook server daemon", long_about = None)]
pub struct Cli {
    /// Port to listen on (overrides the PORT env var)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Environment file to load before reading configuration
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}
