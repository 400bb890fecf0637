use clap::Parser;
use std::path::PathBuf;

use crate::server::ServerConfig;

/// Serve a directory of static files over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServeArgs {
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    #[arg(short, long, default_value = "docs")]
    pub serve_dir: PathBuf,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig {
            listen_addr: args.listen_addr,
            document_root: args.serve_dir,
        }
    }
}

/// Derive medium (1/3) and small (1/10) PNG variants from a file or directory.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ConvertArgs {
    /// PNG file or directory of PNG files
    pub input: PathBuf,

    /// Destination directory (required for directory input)
    pub output: Option<PathBuf>,

    /// Only convert the first 3 files (or the single given file)
    #[arg(long)]
    pub test: bool,
}
