pub mod chat;
pub mod logging;
pub mod scenarios;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use agentchat_core::config::parse_override;
use toml::Value as TomlValue;

/// Multi-agent chat
///
/// With no subcommand an interactive chat session is started.
#[derive(Debug, Parser)]
#[clap(author, name = "agentchat", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(flatten)]
    pub config_overrides: CliConfigOverrides,

    /// Also write diagnostic logs to this file.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Run mode used when no subcommand is given.
    #[arg(long = "mode", value_enum)]
    pub mode: Option<Mode>,

    #[clap(subcommand)]
    pub subcommand: Option<Subcommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Cli,
    Scenarios,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    /// Interactive chat loop (default).
    Chat,

    /// Run the fixed scenario prompts and write one transcript per scenario.
    Scenarios(ScenariosCommand),
}

#[derive(Debug, clap::Args)]
pub struct ScenariosCommand {
    /// Directory that receives the transcripts. Defaults to the configured
    /// log directory.
    #[arg(long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,
}

impl Cli {
    /// Resolve `--mode` and the subcommand into one action. An explicit
    /// subcommand wins.
    pub fn resolved_subcommand(&self) -> Subcommand {
        match (&self.subcommand, self.mode) {
            (Some(Subcommand::Chat), _) => Subcommand::Chat,
            (Some(Subcommand::Scenarios(cmd)), _) => {
                Subcommand::Scenarios(ScenariosCommand { out: cmd.out.clone() })
            }
            (None, Some(Mode::Scenarios)) => Subcommand::Scenarios(ScenariosCommand { out: None }),
            (None, Some(Mode::Cli) | None) => Subcommand::Chat,
        }
    }
}

/// Repeatable `-c key=value` flags layered over `config.toml` and the
/// environment.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct CliConfigOverrides {
    /// Override a configuration value, e.g. `-c llm.model=llama3` or
    /// `-c vector_dim=128`. Values are parsed as TOML, falling back to a
    /// plain string.
    #[arg(short = 'c', long = "config", value_name = "key=value", global = true)]
    pub raw_overrides: Vec<String>,
}

impl CliConfigOverrides {
    pub fn parse_overrides(&self) -> agentchat_core::Result<Vec<(String, TomlValue)>> {
        self.raw_overrides.iter().map(|raw| parse_override(raw)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mode_flag_maps_to_subcommand() {
        let cli = Cli::parse_from(["agentchat", "--mode", "scenarios"]);
        assert!(matches!(cli.resolved_subcommand(), Subcommand::Scenarios(ScenariosCommand { out: None })));

        let cli = Cli::parse_from(["agentchat"]);
        assert!(matches!(cli.resolved_subcommand(), Subcommand::Chat));

        let cli = Cli::parse_from(["agentchat", "--mode", "scenarios", "chat"]);
        assert!(matches!(cli.resolved_subcommand(), Subcommand::Chat));
    }

    #[test]
    fn scenarios_out_and_overrides_parse() {
        let cli = Cli::parse_from([
            "agentchat",
            "-c",
            "vector_dim=64",
            "-c",
            "trace=false",
            "scenarios",
            "--out",
            "/tmp/out",
        ]);
        let Subcommand::Scenarios(cmd) = cli.resolved_subcommand() else {
            panic!("expected scenarios");
        };
        assert_eq!(cmd.out, Some(PathBuf::from("/tmp/out")));
        let overrides = cli.config_overrides.parse_overrides().unwrap();
        assert_eq!(
            overrides,
            vec![
                ("vector_dim".to_string(), TomlValue::Integer(64)),
                ("trace".to_string(), TomlValue::Boolean(false)),
            ]
        );
    }

    #[test]
    fn malformed_override_is_rejected() {
        let cli = Cli::parse_from(["agentchat", "-c", "novalue"]);
        assert!(cli.config_overrides.parse_overrides().is_err());
    }
}
