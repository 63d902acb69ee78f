/// The execution engine: validation followed by a walk of the command tree.
pub mod context;
pub mod validate;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::SieveError;
use crate::mail::MailAdapter;
use crate::model::action::Action;
use crate::model::script::Commands;
use crate::registry::Registries;
use crate::sieve;

use self::context::{ExecutionContext, Flow};

/// A completed execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub actions: Vec<Action>,
    /// Whether `stop` ended the script.
    pub stopped: bool,
}

/// A failed execution, with whatever actions were collected before the error.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct Failure {
    #[source]
    pub error: SieveError,
    pub actions: Vec<Action>,
}

impl From<SieveError> for Failure {
    fn from(error: SieveError) -> Self {
        Self {
            error,
            actions: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct Interpreter {
    registries: Arc<Registries>,
}

impl Interpreter {
    pub fn new(registries: Arc<Registries>) -> Self {
        Self { registries }
    }

    pub fn registries(&self) -> &Arc<Registries> {
        &self.registries
    }

    /// Parse, transform and validate a script.
    pub fn compile(&self, source: &str) -> Result<Commands, SieveError> {
        let commands = sieve::compile(source)?;
        self.validate(&commands)?;
        Ok(commands)
    }

    pub fn validate(&self, commands: &Commands) -> Result<(), SieveError> {
        validate::validate(&self.registries, commands)
    }

    /// Run `commands` against `mail`. Validation runs first, so a script
    /// with a static error produces no actions at all.
    pub fn execute(&self, commands: &Commands, mail: &dyn MailAdapter) -> Result<Outcome, Failure> {
        self.validate(commands)?;

        let mut ctx = ExecutionContext::new(&self.registries);
        match ctx.run_commands(commands, mail) {
            Ok(flow) => {
                let outcome = Outcome {
                    actions: ctx.into_actions(),
                    stopped: flow == Flow::Stop,
                };
                info!(
                    actions = outcome.actions.len(),
                    stopped = outcome.stopped,
                    "script finished"
                );
                Ok(outcome)
            }
            Err(error) => {
                warn!(%error, "script failed");
                Err(Failure {
                    error,
                    actions: ctx.into_actions(),
                })
            }
        }
    }

    pub fn interpret(&self, source: &str, mail: &dyn MailAdapter) -> Result<Outcome, Failure> {
        let commands = sieve::compile(source)?;
        self.execute(&commands, mail)
    }
}
