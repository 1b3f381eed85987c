//! Sequential execution of a handler list with per-handler fault isolation.

use std::io::Write;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{error, warn};

use crate::event::HookEvent;
use crate::handler::{Handler, HandlerContext};

/// Runs an ordered handler list against one event, one handler at a time.
///
/// A handler that returns an error or panics is isolated: its failure is
/// reported on `stderr` and execution proceeds to the next handler. Neither
/// condition changes the dispatch command's exit code — that is a property
/// of the caller, not of this runtime.
pub struct HandlerRuntime;

impl HandlerRuntime {
    /// Execute every handler in `handlers`, in order, against `event`.
    pub async fn run(
        handlers: &[Box<dyn Handler>],
        ctx: &HandlerContext,
        event: &HookEvent,
        stdout: &mut (dyn Write + Send),
        stderr: &mut (dyn Write + Send),
    ) {
        for handler in handlers {
            let outcome = AssertUnwindSafe(handler.run(ctx, event, stdout, stderr))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    let line = format!("[{}] error: {err}", handler.name());
                    warn!(target: "cc_tools::runtime", handler = handler.name(), %err, "handler returned an error");
                    let _ = writeln!(stderr, "{line}");
                }
                Err(panic_payload) => {
                    let info = panic_message(&panic_payload);
                    let line = format!("[{}] panic recovered: {info}", handler.name());
                    error!(target: "cc_tools::runtime", handler = handler.name(), panic = %info, "handler panicked");
                    let _ = writeln!(stderr, "{line}");
                }
            }
        }
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::HookEvent;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        name: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Handler for CountingHandler {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(
            &self,
            _ctx: &HandlerContext,
            _event: &HookEvent,
            _stdout: &mut (dyn Write + Send),
            _stderr: &mut (dyn Write + Send),
        ) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct ErroringHandler;

    #[async_trait]
    impl Handler for ErroringHandler {
        fn name(&self) -> &str {
            "erroring"
        }

        async fn run(
            &self,
            _ctx: &HandlerContext,
            _event: &HookEvent,
            _stdout: &mut (dyn Write + Send),
            _stderr: &mut (dyn Write + Send),
        ) -> anyhow::Result<()> {
            anyhow::bail!("boom")
        }
    }

    struct PanickingHandler;

    #[async_trait]
    impl Handler for PanickingHandler {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn run(
            &self,
            _ctx: &HandlerContext,
            _event: &HookEvent,
            _stdout: &mut (dyn Write + Send),
            _stderr: &mut (dyn Write + Send),
        ) -> anyhow::Result<()> {
            panic!("kaboom");
        }
    }

    #[tokio::test]
    async fn every_handler_runs_exactly_once_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handlers: Vec<Box<dyn Handler>> = vec![
            Box::new(CountingHandler { name: "a", calls: calls.clone() }),
            Box::new(CountingHandler { name: "b", calls: calls.clone() }),
        ];
        let ctx = HandlerContext::new();
        let event = HookEvent::default();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        HandlerRuntime::run(&handlers, &ctx, &event, &mut stdout, &mut stderr).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn an_erroring_handler_does_not_stop_the_rest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handlers: Vec<Box<dyn Handler>> = vec![
            Box::new(ErroringHandler),
            Box::new(CountingHandler { name: "after", calls: calls.clone() }),
        ];
        let ctx = HandlerContext::new();
        let event = HookEvent::default();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        HandlerRuntime::run(&handlers, &ctx, &event, &mut stdout, &mut stderr).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stderr = String::from_utf8(stderr).unwrap();
        assert!(stderr.contains("[erroring] error: boom"));
    }

    #[tokio::test]
    async fn a_panicking_handler_does_not_stop_the_rest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handlers: Vec<Box<dyn Handler>> = vec![
            Box::new(PanickingHandler),
            Box::new(CountingHandler { name: "after", calls: calls.clone() }),
        ];
        let ctx = HandlerContext::new();
        let event = HookEvent::default();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        HandlerRuntime::run(&handlers, &ctx, &event, &mut stdout, &mut stderr).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stderr = String::from_utf8(stderr).unwrap();
        assert!(stderr.contains("[panicking] panic recovered: kaboom"));
    }

    #[tokio::test]
    async fn empty_handler_list_is_a_no_op() {
        let handlers: Vec<Box<dyn Handler>> = Vec::new();
        let ctx = HandlerContext::new();
        let event = HookEvent::default();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        HandlerRuntime::run(&handlers, &ctx, &event, &mut stdout, &mut stderr).await;
        assert!(stdout.is_empty());
        assert!(stderr.is_empty());
    }
}
