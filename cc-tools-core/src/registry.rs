//! Mapping from event name to an ordered handler list.

use std::collections::HashMap;

use crate::handler::Handler;

/// An event→handler-list mapping. Unknown event names resolve to an empty
/// slice, not an error — the dispatch command treats that as "no handlers".
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<String, Vec<Box<dyn Handler>>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn handlers_for(&self, event_name: &str) -> &[Box<dyn Handler>] {
        self.handlers
            .get(event_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Builds a [`Registry`] by appending handlers to named events in order.
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<String, Vec<Box<dyn Handler>>>,
}

impl RegistryBuilder {
    pub fn register(mut self, event_name: &str, handler: Box<dyn Handler>) -> Self {
        self.handlers
            .entry(event_name.to_string())
            .or_default()
            .push(handler);
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            handlers: self.handlers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::HookEvent;
    use crate::handler::HandlerContext;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    struct NamedHandler(&'static str);

    #[async_trait]
    impl Handler for NamedHandler {
        fn name(&self) -> &str {
            self.0
        }

        async fn run(
            &self,
            _ctx: &HandlerContext,
            _event: &HookEvent,
            _stdout: &mut (dyn Write + Send),
            _stderr: &mut (dyn Write + Send),
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unknown_event_name_has_no_handlers() {
        let registry = Registry::builder().build();
        assert!(registry.handlers_for("UnknownEvent").is_empty());
    }

    #[test]
    fn handlers_preserve_registration_order() {
        let registry = Registry::builder()
            .register("PreToolUse", Box::new(NamedHandler("first")))
            .register("PreToolUse", Box::new(NamedHandler("second")))
            .build();
        let names: Vec<&str> = registry
            .handlers_for("PreToolUse")
            .iter()
            .map(|h| h.name())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
