use std::io::BufReader;

use agentchat_cli::Cli;
use agentchat_cli::Subcommand;
use agentchat_cli::chat::run_chat;
use agentchat_cli::logging;
use agentchat_cli::scenarios::run_scenarios;
use agentchat_core::Config;
use agentchat_core::Coordinator;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_file.as_deref())?;

    let config = Config::load(cli.config_overrides.parse_overrides()?)?;
    tracing::debug!(log_dir = %config.log_dir.display(), vector_dim = config.vector_dim, llm = config.use_llm(), "config loaded");
    let mut coordinator = Coordinator::new(&config)?;

    match cli.resolved_subcommand() {
        Subcommand::Chat => {
            let stdin = BufReader::new(std::io::stdin());
            run_chat(&mut coordinator, stdin, &mut std::io::stdout()).await?;
        }
        Subcommand::Scenarios(cmd) => {
            let out_dir = cmd.out.unwrap_or_else(|| config.log_dir.clone());
            run_scenarios(&mut coordinator, &out_dir).await?;
            println!("Wrote outputs to: {}", out_dir.display());
        }
    }
    Ok(())
}
