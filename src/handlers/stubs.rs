//! Thin, config-gated stand-ins for the non-core collaborators named in §1:
//! notifiers, session-metadata persistence, package-manager detection, the
//! superpowers-injection blob, drift detection, and the observation log.
//! Each owns exactly the one paragraph of behavior the specification
//! documents; nothing more.

use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use chrono::{Local, NaiveTime};
use tracing::{debug, info};

use cc_tools_config::Config;
use cc_tools_core::{Handler, HandlerContext, HookEvent};

/// `SessionStart` — emits the fixed "superpowers" context blob a host-side
/// prompt-augmentation feature reads back. The blob's actual text lives
/// entirely with the host; this collaborator only owns the wiring that
/// would deliver it.
pub struct SuperpowersInjection;

#[async_trait]
impl Handler for SuperpowersInjection {
    fn name(&self) -> &str {
        "superpowers-injection"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        _event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        debug!(target: "cc_tools::handlers", "superpowers-injection: no additional context configured");
        Ok(())
    }
}

/// `SessionStart` — detects the package manager in play for the session's
/// working directory by probing for the usual lockfiles, and logs the
/// finding. Detection never fails the session; an unrecognized directory is
/// simply not reported.
pub struct PackageManagerDetect;

#[async_trait]
impl Handler for PackageManagerDetect {
    fn name(&self) -> &str {
        "package-manager-detect"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        if event.cwd.is_empty() {
            return Ok(());
        }
        if let Some(manager) = detect_package_manager(Path::new(&event.cwd)) {
            info!(target: "cc_tools::handlers", manager, "detected package manager");
        }
        Ok(())
    }
}

fn detect_package_manager(dir: &Path) -> Option<&'static str> {
    const MARKERS: &[(&str, &str)] = &[
        ("pnpm-lock.yaml", "pnpm"),
        ("yarn.lock", "yarn"),
        ("package-lock.json", "npm"),
        ("bun.lockb", "bun"),
        ("Cargo.lock", "cargo"),
        ("poetry.lock", "poetry"),
        ("uv.lock", "uv"),
    ];
    MARKERS
        .iter()
        .find(|(marker, _)| dir.join(marker).try_exists().unwrap_or(false))
        .map(|(_, name)| *name)
}

/// `SessionStart` — logs the session id (by its sanitized [`cc_tools_core::event::file_key`])
/// and cwd so later collaborators (session metadata, observation log) have a
/// consistent first entry to correlate against.
pub struct SessionContext;

#[async_trait]
impl Handler for SessionContext {
    fn name(&self) -> &str {
        "session-context"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        let key = cc_tools_core::event::file_key(&event.session_id);
        info!(target: "cc_tools::handlers", session = %key, cwd = %event.cwd, source = event.source.as_deref().unwrap_or(""), "session started");
        Ok(())
    }
}

/// `SessionEnd` — the external session-metadata store persists session
/// summaries elsewhere; this stub only logs that the session ended, with its
/// stated reason, so the event is never silently dropped.
pub struct SessionMetadataPersist;

#[async_trait]
impl Handler for SessionMetadataPersist {
    fn name(&self) -> &str {
        "session-metadata-persist"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        let key = cc_tools_core::event::file_key(&event.session_id);
        info!(target: "cc_tools::handlers", session = %key, reason = event.reason.as_deref().unwrap_or(""), "session ended");
        Ok(())
    }
}

/// `PreToolUse` — suggests compaction once the host-reported context size
/// crosses `compact.threshold`. The host doesn't report a token count on
/// this event today, so the gate is config presence only: when a nonzero
/// threshold is configured, a debug line records that the suggestion path is
/// armed, ready for a future event field to drive it.
pub struct CompactSuggest {
    threshold: i64,
}

impl CompactSuggest {
    pub fn new(config: &Config) -> Self {
        Self {
            threshold: config.get_int(cc_tools_config::ConfigKey::CompactThreshold, 0).unwrap_or(0),
        }
    }
}

#[async_trait]
impl Handler for CompactSuggest {
    fn name(&self) -> &str {
        "compact-suggest"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        _event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        if self.threshold > 0 {
            debug!(target: "cc_tools::handlers", threshold = self.threshold, "compact-suggest armed");
        }
        Ok(())
    }
}

/// `PreToolUse`/`PostToolUse`/`PostToolUseFailure` — appends a structured
/// observation line to the tracing stream when `observe.enabled` is set. The
/// full observation log (file format, rotation) is an external collaborator;
/// this stub owns only the enable flag and the one-line record.
pub struct ObservationLog {
    enabled: bool,
    phase: &'static str,
}

impl ObservationLog {
    pub fn new(config: &Config, phase: &'static str) -> Self {
        Self {
            enabled: config.get_bool(cc_tools_config::ConfigKey::ObserveEnabled, false).unwrap_or(false),
            phase,
        }
    }
}

#[async_trait]
impl Handler for ObservationLog {
    fn name(&self) -> &str {
        "observation-log"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        info!(
            target: "cc_tools::observe",
            phase = self.phase,
            tool = event.tool_name.as_deref().unwrap_or(""),
            file = %event.file_path(),
            "observation"
        );
        Ok(())
    }
}

/// `PreToolUse` — reminds the user to commit when `pre_commit_reminder.enabled`
/// is set and the tool under inspection is a file edit. The reminder text
/// itself is host-rendered; this stub only decides whether to fire.
pub struct PreCommitReminder {
    enabled: bool,
}

impl PreCommitReminder {
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config
                .get_bool(cc_tools_config::ConfigKey::PreCommitReminderEnabled, false)
                .unwrap_or(false),
        }
    }
}

#[async_trait]
impl Handler for PreCommitReminder {
    fn name(&self) -> &str {
        "pre-commit-reminder"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        if self.enabled && event.is_edit_tool() {
            debug!(target: "cc_tools::handlers", file = %event.file_path(), "pre-commit-reminder armed");
        }
        Ok(())
    }
}

/// `UserPromptSubmit` — the drift-detection collaborator watches for signs
/// the conversation has wandered from its stated task; this stub only logs
/// that a prompt was submitted, leaving the actual heuristic external.
pub struct DriftDetect;

#[async_trait]
impl Handler for DriftDetect {
    fn name(&self) -> &str {
        "drift-detect"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        debug!(target: "cc_tools::handlers", prompt_len = event.prompt.as_deref().unwrap_or("").len(), "prompt submitted");
        Ok(())
    }
}

/// `Stop` — logs that the host stopped, noting whether a stop hook is
/// already active (avoids recommending the user re-run something already in
/// flight).
pub struct StopReminder;

#[async_trait]
impl Handler for StopReminder {
    fn name(&self) -> &str {
        "stop-reminder"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        if event.stop_hook_active.unwrap_or(false) {
            debug!(target: "cc_tools::handlers", "stop hook already active; skipping reminder");
        }
        Ok(())
    }
}

/// `PreCompact` — logs the compaction trigger and whether custom
/// instructions accompanied it.
pub struct CompactionLog;

#[async_trait]
impl Handler for CompactionLog {
    fn name(&self) -> &str {
        "compaction-log"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        info!(
            target: "cc_tools::handlers",
            trigger = event.trigger.as_deref().unwrap_or(""),
            has_custom_instructions = event.custom_instructions.is_some(),
            "context compaction"
        );
        Ok(())
    }
}

fn quiet_hours_active(enabled: bool, start: &str, end: &str) -> bool {
    if !enabled {
        return false;
    }
    let (Some(start), Some(end)) = (parse_hhmm(start), parse_hhmm(end)) else {
        return false;
    };
    let now = Local::now().time();
    if start <= end {
        now >= start && now < end
    } else {
        // Overnight window, e.g. 21:00-07:30: active outside [end, start).
        now >= start || now < end
    }
}

fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    let (h, m) = raw.split_once(':')?;
    NaiveTime::from_hms_opt(h.parse().ok()?, m.parse().ok()?, 0)
}

/// `Notification` — the audio notifier plays a sound from
/// `notify.audio.directory` when `notify.audio.enabled` is set and quiet
/// hours aren't active. Actual playback is external; this stub owns the
/// enable/quiet-hours gate.
pub struct AudioNotify {
    enabled: bool,
    directory: String,
    quiet_hours_enabled: bool,
    quiet_hours_start: String,
    quiet_hours_end: String,
}

impl AudioNotify {
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.get_bool(cc_tools_config::ConfigKey::NotifyAudioEnabled, false).unwrap_or(false),
            directory: config
                .get_string(cc_tools_config::ConfigKey::NotifyAudioDirectory, "")
                .unwrap_or_default(),
            quiet_hours_enabled: config
                .get_bool(cc_tools_config::ConfigKey::NotifyQuietHoursEnabled, false)
                .unwrap_or(false),
            quiet_hours_start: config
                .get_string(cc_tools_config::ConfigKey::NotifyQuietHoursStart, "")
                .unwrap_or_default(),
            quiet_hours_end: config
                .get_string(cc_tools_config::ConfigKey::NotifyQuietHoursEnd, "")
                .unwrap_or_default(),
        }
    }

    fn should_fire(&self) -> bool {
        self.enabled
            && !quiet_hours_active(self.quiet_hours_enabled, &self.quiet_hours_start, &self.quiet_hours_end)
    }
}

#[async_trait]
impl Handler for AudioNotify {
    fn name(&self) -> &str {
        "audio-notify"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        if self.should_fire() {
            debug!(target: "cc_tools::handlers", directory = %self.directory, notification_type = event.notification_type.as_deref().unwrap_or(""), "audio-notify armed");
        }
        Ok(())
    }
}

/// `Notification` — the desktop notifier surfaces a native OS notification
/// when `notify.desktop.enabled` is set. Actual OS integration is external.
pub struct DesktopNotify {
    enabled: bool,
}

impl DesktopNotify {
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.get_bool(cc_tools_config::ConfigKey::NotifyDesktopEnabled, false).unwrap_or(false),
        }
    }
}

#[async_trait]
impl Handler for DesktopNotify {
    fn name(&self) -> &str {
        "desktop-notify"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        if self.enabled {
            debug!(target: "cc_tools::handlers", title = event.title.as_deref().unwrap_or(""), "desktop-notify armed");
        }
        Ok(())
    }
}

/// `Notification` — the push notifier forwards to an `ntfy` topic when
/// `notifications.ntfy_topic` is non-empty. Actual HTTP delivery is external.
pub struct PushNotify {
    topic: String,
}

impl PushNotify {
    pub fn new(config: &Config) -> Self {
        Self {
            topic: config
                .get_string(cc_tools_config::ConfigKey::NotificationsNtfyTopic, "")
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Handler for PushNotify {
    fn name(&self) -> &str {
        "push-notify"
    }

    async fn run(
        &self,
        _ctx: &HandlerContext,
        event: &HookEvent,
        _stdout: &mut (dyn Write + Send),
        _stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()> {
        if !self.topic.is_empty() {
            debug!(target: "cc_tools::handlers", topic = %self.topic, message = event.message.as_deref().unwrap_or(""), "push-notify armed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn detects_cargo_lockfile() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.lock"), "").unwrap();
        assert_eq!(detect_package_manager(dir.path()), Some("cargo"));
    }

    #[test]
    fn detects_nothing_in_an_empty_directory() {
        let dir = tempdir().unwrap();
        assert_eq!(detect_package_manager(dir.path()), None);
    }

    #[test]
    fn pnpm_lockfile_wins_over_npm_when_both_present() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("pnpm-lock.yaml"), "").unwrap();
        std::fs::write(dir.path().join("package-lock.json"), "").unwrap();
        assert_eq!(detect_package_manager(dir.path()), Some("pnpm"));
    }

    #[test]
    fn hhmm_parses_valid_times_and_rejects_garbage() {
        assert!(parse_hhmm("09:30").is_some());
        assert!(parse_hhmm("garbage").is_none());
        assert!(parse_hhmm("25:99").is_none());
    }
}
