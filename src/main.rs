//! `cc-tools`: hook dispatch companion and parallel validation gate for an
//! LLM coding assistant host. Parses one subcommand, loads configuration,
//! initializes logging, and delegates to the matching `commands::` module.

use std::process::ExitCode;

use clap::Parser;

use cc_tools::cli::{Cli, Commands, ConfigAction};
use cc_tools::commands;
use cc_tools_config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("cc-tools: failed to load configuration: {err}");
            return ExitCode::from(1);
        }
    };

    let _logging_guard = cc_tools::logging::init(&config);

    let code = match cli.command {
        Commands::Hook => commands::hook::run(&config).await,
        Commands::Validate { timeout, cooldown } => {
            commands::validate::run(&config, timeout, cooldown).await
        }
        Commands::Skip { category, dir, list } => {
            if list {
                commands::skip::skip_list(&config)
            } else {
                commands::skip::skip(
                    &config,
                    category.expect("clap requires category unless --list is set"),
                    dir.expect("clap requires dir unless --list is set"),
                )
            }
        }
        Commands::Unskip { category, dir } => commands::skip::unskip(&config, category, dir),
        Commands::Config { action } => match action {
            ConfigAction::Get { key } => commands::config_cmd::get(&config, &key),
            ConfigAction::Set { key, value } => commands::config_cmd::set(config, &key, &value),
            ConfigAction::List => commands::config_cmd::list(&config),
            ConfigAction::Reset => commands::config_cmd::reset(config),
        },
        Commands::Session { action } => commands::collaborators::session(action),
        Commands::Mcp { action } => commands::collaborators::mcp(action),
        Commands::Debug { action } => commands::collaborators::debug(&config, action),
        Commands::Version => commands::version::run(),
    };

    ExitCode::from(code as u8)
}
