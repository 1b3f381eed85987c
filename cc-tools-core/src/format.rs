//! Level-styled output routing, and the exact colored strings the host's
//! validation contract expects.

use std::io::Write;
use std::sync::LazyLock;

use anstyle::{AnsiColor, Color, Style};

/// Severity levels a [`Writer`] can emit at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
    Debug,
}

impl Level {
    fn routes_to_stderr(self) -> bool {
        matches!(self, Level::Error | Level::Debug)
    }

    fn style(self) -> Style {
        match self {
            Level::Info => Style::new(),
            Level::Success => Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))),
            Level::Warning => Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            Level::Error => Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))),
            Level::Debug => Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
        }
    }
}

static COLOR_ENABLED: LazyLock<bool> = LazyLock::new(|| {
    if anstyle_query::no_color() {
        false
    } else {
        anstyle_query::clicolor_force() || anstyle_query::term_supports_color()
    }
});

/// Routes leveled messages to stdout/stderr with an adaptive color palette.
///
/// Info/Success/Warning go to stdout (what the host shows the user inline);
/// Error/Debug go to stderr (operator-facing diagnostics).
pub struct Writer;

impl Writer {
    pub fn line(level: Level, message: &str) {
        let styled = Self::style_line(level, message);
        if level.routes_to_stderr() {
            let _ = writeln!(std::io::stderr(), "{styled}");
        } else {
            let _ = writeln!(std::io::stdout(), "{styled}");
        }
    }

    /// Style `message` without writing it anywhere, for callers composing
    /// larger blocks (e.g. the validation command's multi-stage report).
    pub fn style_line(level: Level, message: &str) -> String {
        if *COLOR_ENABLED {
            let style = level.style();
            format!("{style}{message}{style:#}")
        } else {
            message.to_string()
        }
    }

    /// Write `message` verbatim, bypassing both color and level routing.
    pub fn raw(stream: &mut dyn Write, message: &str) {
        let _ = writeln!(stream, "{message}");
    }
}

/// Emits the exact colored lines the host's hook/validate contract expects.
/// These use hardcoded SGR codes rather than the adaptive palette above: the
/// host owns how its own chrome renders this one contract surface.
pub struct HookFormatter;

impl HookFormatter {
    const RESET: &'static str = "\x1b[0m";
    const RED: &'static str = "\x1b[0;31m";
    const YELLOW: &'static str = "\x1b[0;33m";

    /// The advisory line printed on stdout when every ran stage passed.
    pub fn advisory(noun: &str) -> String {
        format!("{}👉 {noun} pass. Continue with your task.{}", Self::YELLOW, Self::RESET)
    }

    /// The blocking block printed on stderr when any stage failed or timed out.
    /// Leads with the `BLOCKING:` sentinel the host matches on, then the
    /// per-stage `name: FAILED` header and captured output.
    pub fn blocking(stage_name: &str, captured_output: &str) -> String {
        format!(
            "{}BLOCKING: {stage_name}: FAILED\n{captured_output}\n{}",
            Self::RED,
            Self::RESET
        )
    }

    /// The plural noun used in [`advisory`] for a given set of ran stages.
    pub fn advisory_noun(ran_lint: bool, ran_test: bool) -> &'static str {
        match (ran_lint, ran_test) {
            (true, true) => "Validations",
            (true, false) => "Lints",
            (false, true) => "Tests",
            (false, false) => "Validations",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn advisory_noun_picks_the_right_word() {
        assert_eq!(HookFormatter::advisory_noun(true, true), "Validations");
        assert_eq!(HookFormatter::advisory_noun(true, false), "Lints");
        assert_eq!(HookFormatter::advisory_noun(false, true), "Tests");
    }

    #[test]
    fn advisory_line_has_the_expected_shape() {
        let line = HookFormatter::advisory("Tests");
        assert!(line.contains("👉 Tests pass. Continue with your task."));
        assert!(line.starts_with("\x1b[0;33m"));
        assert!(line.ends_with("\x1b[0m"));
    }

    #[test]
    fn blocking_block_names_the_stage_and_carries_the_marker() {
        let block = HookFormatter::blocking("test", "assertion failed");
        assert!(block.contains("BLOCKING:"));
        assert!(block.contains("test: FAILED"));
        assert!(block.contains("assertion failed"));
        assert!(block.starts_with("\x1b[0;31m"));
    }
}
