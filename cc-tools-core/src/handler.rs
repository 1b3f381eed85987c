//! The `Handler` abstraction every registry entry implements.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::event::HookEvent;

/// Cooperative cancellation token shared by every handler in a dispatch.
///
/// The runtime never preempts a handler; a handler that performs blocking
/// work is expected to poll [`HandlerContext::is_cancelled`] at reasonable
/// intervals.
#[derive(Clone, Default)]
pub struct HandlerContext {
    cancelled: Arc<AtomicBool>,
}

impl HandlerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// A named unit of work bound to one or more hook events.
///
/// `run` receives the fully-parsed, immutable event and exclusive access to
/// the dispatcher's stdout/stderr sinks for the duration of the call — the
/// default scheduling model (the sequential [`crate::runtime::HandlerRuntime`])
/// never calls two handlers concurrently, so exclusivity holds without any
/// locking on the handler's part.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Short, stable identifier used only for diagnostics; no semantic role.
    fn name(&self) -> &str;

    async fn run(
        &self,
        ctx: &HandlerContext,
        event: &HookEvent,
        stdout: &mut (dyn Write + Send),
        stderr: &mut (dyn Write + Send),
    ) -> anyhow::Result<()>;
}
