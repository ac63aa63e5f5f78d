use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use procura::{
    app::load_config,
    cli::{handle_command, Cli},
    gateway::HttpGateway,
    session::{
        ConversationController, FileSnapshotRepository, MemorySnapshotRepository,
        SnapshotRepository,
    },
    tui::{run_ui, TuiApp},
    utils::init_logger,
    Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config: {}. Using defaults.", e);
            Config::default()
        }
    };

    // CLI flags override the config file
    if let Some(server) = &cli.server {
        config.server.url = server.clone();
    }
    if let Some(dir) = &cli.storage_dir {
        config.storage.dir = Some(dir.clone());
    }

    let gateway = HttpGateway::new(&config.server.url)?;

    // Subcommands other than chat print and exit
    if let Some(command) = &cli.command {
        if handle_command(command, &gateway).await? {
            return Ok(());
        }
    }

    let repository: Box<dyn SnapshotRepository> = if cli.ephemeral {
        Box::new(MemorySnapshotRepository::new())
    } else {
        Box::new(FileSnapshotRepository::new(config.storage.resolve_dir()?)?)
    };

    let controller = ConversationController::new(repository);
    let app = TuiApp::new(controller, config.ui.show_sidebar);

    run_ui(app, Arc::new(gateway)).await
}
