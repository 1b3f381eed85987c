//! Wires project discovery, the skip registry, the cooldown lock, and the
//! parallel runner into the pipeline the host treats as authoritative for
//! gating file-edit tool calls.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::cooldown::{AcquireOutcome, CooldownLock};
use crate::discovery;
use crate::event::HookEvent;
use crate::format::HookFormatter;
use crate::runner::{self, RunOutcome, Stage};
use crate::skip_registry::{SkipCategory, SkipRegistry};

/// Why a validation run was skipped without ever invoking the parallel
/// runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkippedReason {
    NotEditTool,
    NoProject,
    InProgress,
    CooledDown,
    RegistryLint,
    RegistryTest,
    RegistryBoth,
}

/// The outcome of one validation invocation, already classified into the
/// exit code and messages the binary should emit.
pub enum Verdict {
    /// Nothing ran; print a benign one-line note and exit 0.
    Skipped { reason: SkippedReason, note: String },
    /// Every ran stage passed; print the advisory line and exit 0.
    Pass { advisory: String },
    /// At least one stage failed or timed out; print the blocking block(s)
    /// and exit 2.
    Blocking { blocks: Vec<String> },
    /// A filesystem/lock/discovery operation failed outright; exit 1.
    InternalError { message: String },
}

impl Verdict {
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Skipped { .. } | Verdict::Pass { .. } => 0,
            Verdict::Blocking { .. } => 2,
            Verdict::InternalError { .. } => 1,
        }
    }
}

/// Run the validation pipeline for one hook invocation.
///
/// `event` is the parsed hook event, if stdin carried one. `process_cwd` is
/// the fallback working directory when the event doesn't carry its own.
pub async fn validate(
    event: Option<&HookEvent>,
    process_cwd: &Path,
    timeout: Duration,
    cooldown: Duration,
    skip_registry: &SkipRegistry,
    cooldown_lock: &CooldownLock,
) -> Verdict {
    let event = match event {
        Some(event) if event.is_edit_tool() => event,
        _ => {
            debug!(target: "cc_tools::validate", "skipping: not an edit-tool hook event");
            return Verdict::Skipped {
                reason: SkippedReason::NotEditTool,
                note: "not an edit-tool event; nothing to validate".to_string(),
            };
        }
    };

    let cwd: PathBuf = if event.cwd.is_empty() {
        process_cwd.to_path_buf()
    } else {
        PathBuf::from(&event.cwd)
    };

    let project = match discovery::discover(&cwd) {
        Ok(Some(project)) => project,
        Ok(None) => {
            debug!(target: "cc_tools::validate", dir = %cwd.display(), "skipping: no recognized project");
            return Verdict::Skipped {
                reason: SkippedReason::NoProject,
                note: format!("no recognized project at {}", cwd.display()),
            };
        }
        Err(err) => {
            return Verdict::InternalError {
                message: format!("project discovery failed: {err}"),
            };
        }
    };

    let skipped = match skip_registry.get_skip_types(&project.root) {
        Ok(set) => set,
        Err(err) => {
            return Verdict::InternalError {
                message: format!("skip registry read failed: {err}"),
            };
        }
    };
    let lint_skipped = skipped.contains("lint");
    let test_skipped = skipped.contains("test");

    if lint_skipped && test_skipped {
        return Verdict::Skipped {
            reason: SkippedReason::RegistryBoth,
            note: format!("validation skipped for {} (lint, test)", project.root.display()),
        };
    }

    let lint_cmd = if lint_skipped { None } else { project.lint_cmd };
    let test_cmd = if test_skipped { None } else { project.test_cmd };

    let max_hold = timeout.saturating_mul(2);
    let guard = match cooldown_lock.acquire(&project.root, cooldown, max_hold) {
        Ok(AcquireOutcome::Acquired(guard)) => guard,
        Ok(AcquireOutcome::InProgress) => {
            info!(target: "cc_tools::validate", dir = %project.root.display(), "skipping: in progress");
            return Verdict::Skipped {
                reason: SkippedReason::InProgress,
                note: "validation already in progress for this directory".to_string(),
            };
        }
        Ok(AcquireOutcome::CooledDown) => {
            info!(target: "cc_tools::validate", dir = %project.root.display(), "skipping: cooled down");
            return Verdict::Skipped {
                reason: SkippedReason::CooledDown,
                note: "validation ran recently for this directory; cooling down".to_string(),
            };
        }
        Err(err) => {
            return Verdict::InternalError {
                message: format!("failed to acquire cooldown lock: {err}"),
            };
        }
    };

    let started = std::time::Instant::now();
    let outcome: RunOutcome = runner::run(lint_cmd, test_cmd, timeout).await;
    info!(
        target: "cc_tools::validate",
        dir = %project.root.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        passed = outcome.all_passed(),
        "validation run finished"
    );

    if let Err(err) = guard.release() {
        return Verdict::InternalError {
            message: format!("failed to release cooldown lock: {err}"),
        };
    }

    classify(&outcome)
}

fn classify(outcome: &RunOutcome) -> Verdict {
    let failed = outcome.failed_stages();
    if failed.is_empty() {
        let ran = outcome.ran_stages();
        let ran_lint = ran.iter().any(|(stage, _)| *stage == Stage::Lint);
        let ran_test = ran.iter().any(|(stage, _)| *stage == Stage::Test);
        let noun = HookFormatter::advisory_noun(ran_lint, ran_test);
        Verdict::Pass {
            advisory: HookFormatter::advisory(noun),
        }
    } else {
        let blocks = failed
            .into_iter()
            .map(|(stage, stage_outcome)| {
                let output = match stage_outcome {
                    crate::runner::StageOutcome::Ran { output, .. } => {
                        String::from_utf8_lossy(output).into_owned()
                    }
                    crate::runner::StageOutcome::Skipped => String::new(),
                };
                HookFormatter::blocking(stage.label(), &output)
            })
            .collect();
        Verdict::Blocking { blocks }
    }
}

/// The set of skip categories the registry records for `dir`, expressed as
/// `(lint, test)` booleans, respecting the `all` alias transparently.
pub fn skip_flags(skip_registry: &SkipRegistry, dir: &Path) -> Result<(bool, bool), crate::error::CcToolsError> {
    let set = skip_registry.get_skip_types(dir)?;
    Ok((set.contains("lint"), set.contains("test")))
}
