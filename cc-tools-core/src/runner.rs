//! Concurrently runs the lint and test commands a project discovery turned
//! up, under a single wall-clock deadline, and collects truncated output.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time;
use tracing::warn;

use crate::discovery::CommandSpec;

const MAX_CAPTURED_BYTES: usize = 64 * 1024;
const HALF_CAPTURED_BYTES: usize = MAX_CAPTURED_BYTES / 2;

/// Which lint/test stage a [`StageOutcome`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lint,
    Test,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Lint => "lint",
            Stage::Test => "test",
        }
    }
}

/// The result of running (or not running) one stage.
#[derive(Debug, Clone)]
pub enum StageOutcome {
    Skipped,
    Ran {
        exit_ok: bool,
        timed_out: bool,
        output: Vec<u8>,
    },
}

impl StageOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, StageOutcome::Ran { exit_ok: true, timed_out: false, .. })
    }
}

/// The combined outcome of a parallel run.
pub struct RunOutcome {
    pub lint: StageOutcome,
    pub test: StageOutcome,
}

impl RunOutcome {
    pub fn all_passed(&self) -> bool {
        let lint_ok = matches!(self.lint, StageOutcome::Skipped) || self.lint.passed();
        let test_ok = matches!(self.test, StageOutcome::Skipped) || self.test.passed();
        lint_ok && test_ok
    }

    pub fn ran_stages(&self) -> Vec<(Stage, &StageOutcome)> {
        let mut ran = Vec::new();
        if !matches!(self.lint, StageOutcome::Skipped) {
            ran.push((Stage::Lint, &self.lint));
        }
        if !matches!(self.test, StageOutcome::Skipped) {
            ran.push((Stage::Test, &self.test));
        }
        ran
    }

    pub fn failed_stages(&self) -> Vec<(Stage, &StageOutcome)> {
        self.ran_stages()
            .into_iter()
            .filter(|(_, outcome)| !outcome.passed())
            .collect()
    }
}

/// Run whichever of `lint`/`test` are `Some`, both concurrently, each bound
/// by the same `timeout`.
pub async fn run(
    lint: Option<CommandSpec>,
    test: Option<CommandSpec>,
    timeout: Duration,
) -> RunOutcome {
    let lint_label = Stage::Lint.label();
    let test_label = Stage::Test.label();
    let (lint_outcome, test_outcome) = tokio::join!(
        run_stage(lint_label, lint, timeout),
        run_stage(test_label, test, timeout),
    );
    RunOutcome {
        lint: lint_outcome,
        test: test_outcome,
    }
}

async fn run_stage(label: &str, spec: Option<CommandSpec>, timeout: Duration) -> StageOutcome {
    let Some(spec) = spec else {
        return StageOutcome::Skipped;
    };

    let mut command = Command::new(&spec.program);
    command.args(&spec.args);
    command.current_dir(&spec.cwd);
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());
    command.kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            let diagnostic = format!("failed to spawn `{}`: {err}", spec.program);
            warn!(target: "cc_tools::runner", stage = label, %err, "stage failed to spawn");
            return StageOutcome::Ran {
                exit_ok: false,
                timed_out: false,
                output: diagnostic.into_bytes(),
            };
        }
    };

    let mut stdout_pipe = child.stdout.take().expect("stdout was piped");
    let mut stderr_pipe = child.stderr.take().expect("stderr was piped");
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf).await;
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        buf
    });

    let (exit_ok, timed_out) = match time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => (status.success(), false),
        Ok(Err(err)) => {
            warn!(target: "cc_tools::runner", stage = label, %err, "failed to wait for stage");
            (false, false)
        }
        Err(_) => {
            let _ = child.start_kill();
            time::sleep(Duration::from_millis(200)).await;
            let _ = child.wait().await;
            warn!(target: "cc_tools::runner", stage = label, "stage exceeded the wall-clock deadline");
            (false, true)
        }
    };

    let mut combined = stdout_task.await.unwrap_or_default();
    combined.extend(stderr_task.await.unwrap_or_default());

    StageOutcome::Ran {
        exit_ok,
        timed_out,
        output: truncate(combined),
    }
}

/// Keep the first and last halves of `bytes`, dropping the middle, once the
/// total exceeds the cap — the start carries the earliest failure context,
/// the end usually carries the actual error.
fn truncate(bytes: Vec<u8>) -> Vec<u8> {
    if bytes.len() <= MAX_CAPTURED_BYTES {
        return bytes;
    }
    let omitted = bytes.len() - 2 * HALF_CAPTURED_BYTES;
    let mut result = Vec::with_capacity(MAX_CAPTURED_BYTES + 32);
    result.extend_from_slice(&bytes[..HALF_CAPTURED_BYTES]);
    result.extend_from_slice(format!("\n... [{omitted} bytes omitted] ...\n").as_bytes());
    result.extend_from_slice(&bytes[bytes.len() - HALF_CAPTURED_BYTES..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec(program: &str, args: &[&str]) -> CommandSpec {
        CommandSpec {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: std::env::temp_dir(),
        }
    }

    #[tokio::test]
    async fn both_stages_pass() {
        let outcome = run(
            Some(spec("true", &[])),
            Some(spec("true", &[])),
            Duration::from_secs(5),
        )
        .await;
        assert!(outcome.all_passed());
        assert!(outcome.failed_stages().is_empty());
    }

    #[tokio::test]
    async fn a_failing_stage_is_reported() {
        let outcome = run(
            Some(spec("false", &[])),
            Some(spec("true", &[])),
            Duration::from_secs(5),
        )
        .await;
        assert!(!outcome.all_passed());
        let failed = outcome.failed_stages();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, Stage::Lint);
    }

    #[tokio::test]
    async fn a_skipped_stage_does_not_block_success() {
        let outcome = run(None, Some(spec("true", &[])), Duration::from_secs(5)).await;
        assert!(outcome.all_passed());
        assert!(matches!(outcome.lint, StageOutcome::Skipped));
    }

    #[tokio::test]
    async fn a_missing_binary_is_reported_as_a_failed_stage_not_a_panic() {
        let outcome = run(
            Some(spec("cc-tools-nonexistent-binary-xyz", &[])),
            None,
            Duration::from_secs(5),
        )
        .await;
        assert!(!outcome.all_passed());
    }

    #[tokio::test]
    async fn a_slow_stage_is_killed_at_the_deadline() {
        let outcome = run(
            Some(spec("sleep", &["5"])),
            None,
            Duration::from_millis(100),
        )
        .await;
        match outcome.lint {
            StageOutcome::Ran { timed_out, exit_ok, .. } => {
                assert!(timed_out);
                assert!(!exit_ok);
            }
            StageOutcome::Skipped => panic!("lint should have run"),
        }
    }

    #[test]
    fn truncation_keeps_head_and_tail() {
        let bytes = vec![b'a'; MAX_CAPTURED_BYTES * 2];
        let out = truncate(bytes);
        assert!(out.len() < MAX_CAPTURED_BYTES * 2);
        assert!(String::from_utf8_lossy(&out).contains("bytes omitted"));
    }

    #[test]
    fn short_output_is_not_truncated() {
        let bytes = b"all good".to_vec();
        assert_eq!(truncate(bytes.clone()), bytes);
    }
}
