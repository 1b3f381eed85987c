//! `cc-tools hook`: read one hook event from stdin and dispatch it to the
//! default handler registry. Per the dispatch contract, this always exits 0
//! — a malformed event or a failing handler is a diagnostic, not a gate.

use std::io::{Read, Write};

use cc_tools_config::Config;
use cc_tools_core::{HandlerContext, HandlerRuntime, HookEvent};

use crate::handlers::default_registry;

pub async fn run(config: &Config) -> i32 {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("cc-tools hook: failed to read stdin");
        return 0;
    }
    dispatch(config, &input, &mut std::io::stdout(), &mut std::io::stderr()).await
}

/// Parse `raw_event` and run the default registry against it, writing
/// handler output to `stdout`/`stderr`. Split out from [`run`] so tests can
/// supply canned input and capture output without touching real stdio.
pub async fn dispatch(
    config: &Config,
    raw_event: &str,
    stdout: &mut (dyn Write + Send),
    stderr: &mut (dyn Write + Send),
) -> i32 {
    let event = match HookEvent::parse_str(raw_event) {
        Ok(event) => event,
        Err(err) => {
            let _ = writeln!(stderr, "cc-tools hook: {err}");
            return 0;
        }
    };

    let registry = default_registry(config);
    let handlers = registry.handlers_for(&event.hook_event_name);
    let ctx = HandlerContext::new();
    HandlerRuntime::run(handlers, &ctx, &event, stdout, stderr).await;
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::load_from(std::env::temp_dir().join("cc-tools-hook-cmd-test.json")).unwrap()
    }

    #[tokio::test]
    async fn empty_input_dispatches_to_no_handlers_and_exits_success() {
        let config = test_config();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = dispatch(&config, "", &mut stdout, &mut stderr).await;
        assert_eq!(code, 0);
        assert!(stdout.is_empty());
        assert!(stderr.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_still_exits_success_with_a_stderr_note() {
        let config = test_config();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = dispatch(&config, "{not json", &mut stdout, &mut stderr).await;
        assert_eq!(code, 0);
        assert!(!stderr.is_empty());
    }

    #[tokio::test]
    async fn a_session_start_event_runs_the_session_start_handlers() {
        let config = test_config();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = dispatch(
            &config,
            r#"{"hook_event_name":"SessionStart","session_id":"abc-123","cwd":"/tmp"}"#,
            &mut stdout,
            &mut stderr,
        )
        .await;
        assert_eq!(code, 0);
    }
}
