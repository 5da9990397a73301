//! chatcmd - A two-level text command router for chat bots.

use std::sync::Arc;

use chatcmd::chat::StdoutSink;
use chatcmd::cli::Cli;
use chatcmd::config::Config;
use chatcmd::console::Console;
use chatcmd::logging;
use chatcmd::modules::{self, Permission, UserStore};
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Load config before logging so its level applies
    let config_path = cli.config_path();
    let config = match Config::load_from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            logging::init_stderr_logging("info");
            error!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    };

    if cli.log_file {
        logging::init_file_logging(&config.log_level);
    } else {
        logging::init_stderr_logging(&config.log_level);
    }
    info!("Loaded config from: {}", config_path.display());

    if let Err(e) = run(cli, config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let prefix = cli.effective_prefix(&config);

    let store = Arc::new(UserStore::new());
    store
        .update(&config.bot.owner, |u| u.permission = Permission::Owner)
        .await;

    let dispatcher = modules::build_dispatcher(store, prefix, &config.feed)?;
    info!(
        bot = %config.bot.name,
        channel = config.bot.primary_channel(),
        %prefix,
        "Ready"
    );

    let console = Console::new(
        dispatcher,
        prefix,
        config.bot.primary_channel(),
        cli.user.as_str(),
        Arc::new(StdoutSink),
    );

    if !cli.exec.is_empty() {
        for line in &cli.exec {
            console.handle_line(line).await?;
        }
        return Ok(());
    }

    console.run(BufReader::new(tokio::io::stdin())).await
}
