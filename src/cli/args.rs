use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "procura")]
#[command(version)]
#[command(about = "A terminal assistant for exploring procurement data in natural language", long_about = None)]
pub struct Cli {
    /// Base URL of the procurement API server
    #[arg(short, long, env = "PROCURA_SERVER_URL")]
    pub server: Option<String>,

    /// Directory holding the session snapshot (overrides config)
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,

    /// Keep history in memory only; nothing is written to disk
    #[arg(long, conflicts_with = "storage_dir")]
    pub ephemeral: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Print dataset statistics
    Stats,
    /// List department names in the dataset
    Departments,
    /// List acquisition types in the dataset
    AcquisitionTypes,
    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_without_args() {
        let cli = Cli::parse_from(["procura"]);
        assert!(cli.command.is_none());
        assert!(!cli.ephemeral);
    }

    #[test]
    fn test_cli_parses_server_and_subcommand() {
        let cli = Cli::parse_from(["procura", "--server", "http://api:9000", "stats"]);
        assert_eq!(cli.server.as_deref(), Some("http://api:9000"));
        assert!(matches!(cli.command, Some(Commands::Stats)));
    }

    #[test]
    fn test_ephemeral_conflicts_with_storage_dir() {
        let result = Cli::try_parse_from(["procura", "--ephemeral", "--storage-dir", "/tmp/x"]);
        assert!(result.is_err());
    }
}
