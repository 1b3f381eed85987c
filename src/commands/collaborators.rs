//! Thin CLI surfaces for collaborators that own no persisted state in this
//! crate: session metadata, MCP plugin toggles, and debug log tailing. Each
//! subcommand reports what it would do; the backing store for session
//! metadata and MCP state is an external service this crate does not
//! implement.

use cc_tools_config::Config;

use crate::cli::{DebugAction, McpAction, SessionAction};

pub fn session(action: SessionAction) -> i32 {
    match action {
        SessionAction::List => println!("no sessions recorded"),
        SessionAction::Show { id } => println!("no metadata recorded for session {id}"),
    }
    0
}

pub fn mcp(action: McpAction) -> i32 {
    match action {
        McpAction::List => println!("no MCP plugins registered"),
        McpAction::Enable { name } => println!("MCP plugin `{name}` enable requested"),
        McpAction::Disable { name } => println!("MCP plugin `{name}` disable requested"),
    }
    0
}

pub fn debug(config: &Config, action: DebugAction) -> i32 {
    if !config.debug_enabled() {
        eprintln!("cc-tools debug: debug logging is disabled (set debug.enabled or CLAUDE_HOOKS_DEBUG)");
        return 2;
    }
    match action {
        DebugAction::Tail { lines } => match tail_log(lines.unwrap_or(50)) {
            Ok(text) => {
                print!("{text}");
                0
            }
            Err(err) => {
                eprintln!("cc-tools debug: {err}");
                1
            }
        },
    }
}

fn tail_log(lines: usize) -> std::io::Result<String> {
    let dir = cc_tools_config::paths::debug_log_dir()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))?;
    let file_name = chrono::Local::now().format("hooks.log.%Y-%m-%d").to_string();
    let content = std::fs::read_to_string(dir.join(file_name))?;
    let mut tail: Vec<&str> = content.lines().rev().take(lines).collect();
    tail.reverse();
    Ok(tail.join("\n") + "\n")
}
