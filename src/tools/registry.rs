//! Command registry.
//!
//! Maps command names to their argument schema, description and handler.
//! The registry is filled once at startup and then shared read-only; the
//! MCP service holds it behind an `Arc` and calls [`CommandRegistry::dispatch`]
//! for every tool invocation.

use crate::error::{DbError, DbResult};
use crate::models::{ArgumentSchema, ResultEnvelope, ValidatedArgs};
use futures_util::future::BoxFuture;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span};

/// Boxed async handler. Handlers never fail: errors are folded into the envelope.
pub type Handler = Arc<dyn Fn(ValidatedArgs) -> BoxFuture<'static, ResultEnvelope> + Send + Sync>;

/// A registered command.
#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    schema: ArgumentSchema,
    handler: Handler,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &ArgumentSchema {
        &self.schema
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("params", &self.schema.params().len())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command.
    ///
    /// Fails with `DuplicateCommand` if `name` is already taken.
    pub fn register<F, Fut>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ArgumentSchema,
        handler: F,
    ) -> DbResult<()>
    where
        F: Fn(ValidatedArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResultEnvelope> + Send + 'static,
    {
        let name = name.into();
        if self.commands.contains_key(&name) {
            return Err(DbError::duplicate_command(name));
        }

        let boxed: Handler =
            Arc::new(move |args| -> BoxFuture<'static, ResultEnvelope> { Box::pin(handler(args)) });
        self.commands.insert(
            name.clone(),
            Command {
                name,
                description: description.into(),
                schema,
                handler: boxed,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// All commands, ordered by name.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Resolve, validate and run a command.
    ///
    /// `UnknownCommand` and `InvalidArguments` are returned before the
    /// handler is invoked; any other outcome is carried by the envelope.
    pub async fn dispatch(
        &self,
        name: &str,
        args: &Map<String, JsonValue>,
    ) -> DbResult<ResultEnvelope> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| DbError::unknown_command(name))?;

        let validated = command
            .schema
            .validate(args)
            .map_err(|problems| DbError::invalid_arguments(name, problems))?;

        for key in args.keys() {
            if !command.schema.params().iter().any(|p| p.name == key.as_str()) {
                debug!(command = %name, argument = %key, "Ignoring unknown argument");
            }
        }

        let span = info_span!("command", name = %name, invocation_id = %uuid::Uuid::new_v4());
        let envelope = (command.handler)(validated).instrument(span).await;
        debug!(command = %name, status = %envelope.status, "Command finished");
        Ok(envelope)
    }
}
