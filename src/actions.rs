//! Named button actions.
//!
//! Buttons refer to actions by name. Only actions registered here can run;
//! the name is never interpreted as code.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::content::reference;
use crate::document::NodeId;
use crate::session::TerminalSession;

/// Errors returned by an action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{0}")]
    Failed(String),
}

/// What an action gets to work with.
pub struct ActionContext<'a> {
    pub session: &'a mut TerminalSession,
    /// The button that was activated
    pub trigger: NodeId,
}

pub type Action = Arc<dyn Fn(&mut ActionContext<'_>) -> Result<(), ActionError> + Send + Sync>;

/// Closed set of actions buttons may run.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, Action>,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

impl ActionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in actions:
    ///
    /// - `restart`: go back to the home page
    /// - `clear`: clear the output
    /// - `show-inputs`: print the value of every input on the page
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("restart", |ctx| {
            let home = reference::internal(ctx.session.home_page());
            ctx.session.navigate(Some(&home));
            Ok(())
        });
        registry.register("clear", |ctx| {
            ctx.session.clear();
            Ok(())
        });
        registry.register("show-inputs", |ctx| {
            let inputs = ctx.session.input_values();
            if inputs.is_empty() {
                ctx.session.print("No input given.");
            }
            for (id, value) in inputs {
                ctx.session.print(&format!("{}: {}", id, value));
            }
            Ok(())
        });
        registry
    }

    /// Register `action` under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&mut ActionContext<'_>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
    }

    pub fn get(&self, name: &str) -> Option<Action> {
        self.actions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }
}
