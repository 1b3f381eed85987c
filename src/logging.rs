//! Structured logging: an env-filtered `fmt` layer on stderr, plus an
//! optional daily-rotating file sink gated by `debug.enabled`/
//! `CLAUDE_HOOKS_DEBUG` so a hook run never pollutes the stdout/stderr
//! contract the host parses.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use cc_tools_config::Config;

/// Initialize tracing for this process. Returns a [`WorkerGuard`] that must
/// be held for the lifetime of `main` when file logging is enabled — dropping
/// it early would stop the background writer before buffered lines flush.
pub fn init(config: &Config) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    if !config.debug_enabled() {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .try_init();
        return None;
    }

    let Ok(debug_dir) = cc_tools_config::paths::debug_log_dir() else {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .try_init();
        return None;
    };
    if std::fs::create_dir_all(&debug_dir).is_err() {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .try_init();
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&debug_dir, "hooks.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    Some(guard)
}
