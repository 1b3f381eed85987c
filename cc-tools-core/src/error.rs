use std::path::PathBuf;

/// The closed set of error kinds the core can surface.
///
/// Library boundaries return this typed enum so callers can match on kind;
/// the binary wraps these in `anyhow::Result` at the CLI edge.
#[derive(Debug, thiserror::Error)]
pub enum CcToolsError {
    #[error("malformed hook event JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("path `{}` is not an absolute, non-empty directory", .0.display())]
    InvalidPath(PathBuf),

    #[error("skip registry at {} is corrupted: {reason}", .path.display())]
    Corrupted { path: PathBuf, reason: String },

    #[error("failed to persist state to {}: {source}", .path.display())]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cooldown lock operation failed for {}: {source}", .dir.display())]
    LockFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("project discovery failed for {}: {source}", .dir.display())]
    DiscoveryFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stage `{stage}` failed")]
    StageFailed { stage: &'static str, output: Vec<u8> },

    #[error("validation runner exceeded the {0}s wall-clock deadline")]
    WallTimeout(u64),

    #[error("configuration error: {0}")]
    ConfigError(#[from] cc_tools_config::ConfigError),
}
