//! The closed set of recognized configuration keys and their env-var names.
//!
//! Each key encodes its own precedence resolution target (the environment
//! variable name) explicitly rather than deriving it mechanically, because
//! two legacy keys (`validate.timeout`, `validate.cooldown`) don't follow the
//! general dotted-uppercase-with-`CC_TOOLS_`-prefix rule.

/// A recognized dotted configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ValidateTimeout,
    ValidateCooldown,
    NotificationsNtfyTopic,
    NotifyAudioEnabled,
    NotifyAudioDirectory,
    NotifyDesktopEnabled,
    NotifyQuietHoursEnabled,
    NotifyQuietHoursStart,
    NotifyQuietHoursEnd,
    CompactThreshold,
    ObserveEnabled,
    PreCommitReminderEnabled,
    DebugEnabled,
}

/// Type of the value a key holds, used to report `TypeMismatch` precisely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Bool,
    String,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Int => "integer",
            ValueKind::Bool => "boolean",
            ValueKind::String => "string",
        }
    }
}

impl ConfigKey {
    /// All recognized keys, in their canonical documentation order.
    pub const ALL: &'static [ConfigKey] = &[
        ConfigKey::ValidateTimeout,
        ConfigKey::ValidateCooldown,
        ConfigKey::NotificationsNtfyTopic,
        ConfigKey::NotifyAudioEnabled,
        ConfigKey::NotifyAudioDirectory,
        ConfigKey::NotifyDesktopEnabled,
        ConfigKey::NotifyQuietHoursEnabled,
        ConfigKey::NotifyQuietHoursStart,
        ConfigKey::NotifyQuietHoursEnd,
        ConfigKey::CompactThreshold,
        ConfigKey::ObserveEnabled,
        ConfigKey::PreCommitReminderEnabled,
        ConfigKey::DebugEnabled,
    ];

    /// The dotted path used in the JSON config file and on the `config` CLI.
    pub fn dotted(self) -> &'static str {
        match self {
            ConfigKey::ValidateTimeout => "validate.timeout",
            ConfigKey::ValidateCooldown => "validate.cooldown",
            ConfigKey::NotificationsNtfyTopic => "notifications.ntfy_topic",
            ConfigKey::NotifyAudioEnabled => "notify.audio.enabled",
            ConfigKey::NotifyAudioDirectory => "notify.audio.directory",
            ConfigKey::NotifyDesktopEnabled => "notify.desktop.enabled",
            ConfigKey::NotifyQuietHoursEnabled => "notify.quiet_hours.enabled",
            ConfigKey::NotifyQuietHoursStart => "notify.quiet_hours.start",
            ConfigKey::NotifyQuietHoursEnd => "notify.quiet_hours.end",
            ConfigKey::CompactThreshold => "compact.threshold",
            ConfigKey::ObserveEnabled => "observe.enabled",
            ConfigKey::PreCommitReminderEnabled => "pre_commit_reminder.enabled",
            ConfigKey::DebugEnabled => "debug.enabled",
        }
    }

    /// The environment variable consulted before the config file.
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigKey::ValidateTimeout => "CC_TOOLS_HOOKS_VALIDATE_TIMEOUT_SECONDS",
            ConfigKey::ValidateCooldown => "CC_TOOLS_HOOKS_VALIDATE_COOLDOWN_SECONDS",
            ConfigKey::NotificationsNtfyTopic => "CC_TOOLS_NOTIFICATIONS_NTFY_TOPIC",
            ConfigKey::NotifyAudioEnabled => "CC_TOOLS_NOTIFY_AUDIO_ENABLED",
            ConfigKey::NotifyAudioDirectory => "CC_TOOLS_NOTIFY_AUDIO_DIRECTORY",
            ConfigKey::NotifyDesktopEnabled => "CC_TOOLS_NOTIFY_DESKTOP_ENABLED",
            ConfigKey::NotifyQuietHoursEnabled => "CC_TOOLS_NOTIFY_QUIET_HOURS_ENABLED",
            ConfigKey::NotifyQuietHoursStart => "CC_TOOLS_NOTIFY_QUIET_HOURS_START",
            ConfigKey::NotifyQuietHoursEnd => "CC_TOOLS_NOTIFY_QUIET_HOURS_END",
            ConfigKey::CompactThreshold => "CC_TOOLS_COMPACT_THRESHOLD",
            ConfigKey::ObserveEnabled => "CC_TOOLS_OBSERVE_ENABLED",
            ConfigKey::PreCommitReminderEnabled => "CC_TOOLS_PRE_COMMIT_REMINDER_ENABLED",
            // Legacy name, predates the CC_TOOLS_ prefix convention.
            ConfigKey::DebugEnabled => "CLAUDE_HOOKS_DEBUG",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            ConfigKey::ValidateTimeout | ConfigKey::ValidateCooldown | ConfigKey::CompactThreshold => {
                ValueKind::Int
            }
            ConfigKey::NotifyAudioEnabled
            | ConfigKey::NotifyDesktopEnabled
            | ConfigKey::NotifyQuietHoursEnabled
            | ConfigKey::ObserveEnabled
            | ConfigKey::PreCommitReminderEnabled
            | ConfigKey::DebugEnabled => ValueKind::Bool,
            ConfigKey::NotificationsNtfyTopic
            | ConfigKey::NotifyAudioDirectory
            | ConfigKey::NotifyQuietHoursStart
            | ConfigKey::NotifyQuietHoursEnd => ValueKind::String,
        }
    }

    pub fn from_dotted(dotted: &str) -> Option<ConfigKey> {
        Self::ALL.iter().copied().find(|k| k.dotted() == dotted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_resolves_by_dotted_name() {
        for key in ConfigKey::ALL {
            assert_eq!(ConfigKey::from_dotted(key.dotted()), Some(*key));
        }
    }

    #[test]
    fn legacy_env_names_match_the_spec() {
        assert_eq!(
            ConfigKey::ValidateTimeout.env_var(),
            "CC_TOOLS_HOOKS_VALIDATE_TIMEOUT_SECONDS"
        );
        assert_eq!(
            ConfigKey::ValidateCooldown.env_var(),
            "CC_TOOLS_HOOKS_VALIDATE_COOLDOWN_SECONDS"
        );
        assert_eq!(ConfigKey::DebugEnabled.env_var(), "CLAUDE_HOOKS_DEBUG");
    }
}
