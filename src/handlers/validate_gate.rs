//! Registers the parallel validation gate as a `PreToolUse` handler so
//! `cc-tools hook` alone surfaces the same lint/test verdict the standalone
//! `cc-tools validate` subcommand reports.
//!
//! This handler never changes `hook`'s exit code: a blocking verdict is
//! reported by returning `Err` from `run`, which the sequential
//! [`cc_tools_core::HandlerRuntime`] logs and isolates exactly like any other
//! handler failure, per the dispatch command's "always exit 0" contract. The
//! authoritative gate the host actually enforces is the separate `cc-tools
//! validate` invocation wired directly into the host's own hook
//! configuration, which reports exit code 2 on `Blocking`.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use cc_tools_config::Config;
use cc_tools_core::{CooldownLock, Handler, HandlerContext, HookEvent, SkipRegistry, Verdict};

pub struct ValidateGateHandler {
    timeout: Duration,
    cooldown: Duration,
}

impl ValidateGateHandler {
    pub fn new(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.validate_timeout_secs().unwrap_or(60)),
            cooldown: Duration::from_secs(config.validate_cooldown_secs().unwrap_or(5)),
        }
    }
}

#[async_trait]
impl Handler for ValidateGateHandler {
    fn name(&self) -> &str {
        "validate-gate"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        stdout: &mut (dyn Write + Send),
        stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        if !event.is_edit_tool() {
            return Ok(());
        }

        let skip_path = cc_tools_config::paths::skip_registry_file()?;
        let legacy_path = cc_tools_config::paths::legacy_skip_registry_file();
        let registry = SkipRegistry::load(skip_path, legacy_path.as_deref())?;
        let lock = CooldownLock::new(cc_tools_config::paths::cooldown_dir()?);
        let cwd = std::env::current_dir().unwrap_or_default();

        let verdict = cc_tools_core::validation::validate(
            Some(event),
            &cwd,
            self.timeout,
            self.cooldown,
            &registry,
            &lock,
        )
        .await;

        match verdict {
            Verdict::Skipped { .. } => Ok(()),
            Verdict::Pass { advisory } => {
                writeln!(stdout, "{advisory}")?;
                Ok(())
            }
            Verdict::Blocking { blocks } => {
                for block in &blocks {
                    writeln!(stderr, "{block}")?;
                }
                warn!(target: "cc_tools::handlers", "validate-gate: blocking verdict on {}", event.file_path());
                anyhow::bail!("validation blocked this edit")
            }
            Verdict::InternalError { message } => {
                writeln!(stderr, "validate-gate: {message}")?;
                anyhow::bail!(message)
            }
        }
    }
}
