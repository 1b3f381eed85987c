//! The default event→handler registry (§4.D) and the thin stub handlers
//! backing every external collaborator named in §1.
//!
//! Each stub owns no filesystem or network logic beyond the one paragraph of
//! behavior the specification documents for it, but fully implements the
//! [`cc_tools_core::Handler`] contract so the registry and runtime are
//! exercised end to end.

mod stubs;
mod validate_gate;

use cc_tools_config::Config;
use cc_tools_core::{Registry, RegistryBuilder};

pub use stubs::*;
pub use validate_gate::ValidateGateHandler;

/// Build the default registry wired per the §4.D table, plus the
/// `validate-gate` handler appended to `PreToolUse` per §4.D's expansion note.
pub fn default_registry(config: &Config) -> Registry {
    RegistryBuilder::default()
        .register("SessionStart", Box::new(SuperpowersInjection))
        .register("SessionStart", Box::new(PackageManagerDetect))
        .register("SessionStart", Box::new(SessionContext))
        .register("SessionEnd", Box::new(SessionMetadataPersist))
        .register("PreToolUse", Box::new(CompactSuggest::new(config)))
        .register("PreToolUse", Box::new(ObservationLog::new(config, "pre")))
        .register("PreToolUse", Box::new(PreCommitReminder::new(config)))
        .register("PreToolUse", Box::new(ValidateGateHandler::new(config)))
        .register("PostToolUse", Box::new(ObservationLog::new(config, "post")))
        .register(
            "PostToolUseFailure",
            Box::new(ObservationLog::new(config, "failure")),
        )
        .register("UserPromptSubmit", Box::new(DriftDetect))
        .register("Stop", Box::new(StopReminder))
        .register("PreCompact", Box::new(CompactionLog))
        .register("Notification", Box::new(AudioNotify::new(config)))
        .register("Notification", Box::new(DesktopNotify::new(config)))
        .register("Notification", Box::new(PushNotify::new(config)))
        .build()
}
