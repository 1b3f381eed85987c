//! Library surface behind the `cc-tools` binary: CLI argument shapes, the
//! default handler registry, and the per-subcommand command implementations.
//! Split out from `main.rs` so integration tests can exercise these entry
//! points without spawning the compiled binary.

pub mod cli;
pub mod commands;
pub mod handlers;
pub mod logging;
