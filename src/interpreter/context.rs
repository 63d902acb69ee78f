/// Per-execution state: the action list, enabled extensions and the
/// if/elsif/else chain.
use std::collections::HashSet;
use std::mem;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::comparators::Comparator;
use crate::error::{LookupKind, SieveError};
use crate::mail::MailAdapter;
use crate::model::action::Action;
use crate::model::arguments::Test;
use crate::model::script::{Block, Command, Commands};
use crate::registry::Registries;

/// Result of running a command or a command sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// `stop` was executed; unwinds every enclosing block.
    Stop,
}

/// State of the conditional chain the next command may continue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Branch {
    /// The previous command was not part of a chain.
    #[default]
    None,
    /// The chain is open and no branch has run yet.
    Pending,
    /// A branch of the chain has run.
    Taken,
}

pub struct ExecutionContext<'a> {
    registries: &'a Registries,
    actions: Vec<Action>,
    enabled: HashSet<String>,
    branch: Branch,
    preceding: Branch,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(registries: &'a Registries) -> Self {
        Self {
            registries,
            actions: Vec::new(),
            enabled: HashSet::new(),
            branch: Branch::None,
            preceding: Branch::None,
        }
    }

    pub fn registries(&self) -> &'a Registries {
        self.registries
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }

    /// Append an action. A reject can neither join nor be joined by any
    /// other action.
    pub fn add_action(&mut self, action: Action) -> Result<(), SieveError> {
        let has_reject = self.actions.iter().any(Action::is_reject);
        if !self.actions.is_empty() && (action.is_reject() || has_reject) {
            return Err(SieveError::command("reject must be the only action"));
        }
        debug!(%action, "action added");
        self.actions.push(action);
        Ok(())
    }

    pub fn enable_extension(&mut self, name: &str) {
        self.enabled.insert(name.to_string());
    }

    /// The comparator registered under `name`, provided it may be used.
    pub fn comparator(&self, name: &str) -> Result<Arc<dyn Comparator>, SieveError> {
        let comparator = self.registries.comparators.lookup(name)?;
        ensure_enabled(
            self.registries,
            &self.enabled,
            LookupKind::Comparator,
            name,
            comparator.is_extension(),
        )?;
        Ok(comparator)
    }

    /// Branch state left by the command immediately before the current one.
    pub fn preceding_branch(&self) -> Branch {
        self.preceding
    }

    pub fn set_branch(&mut self, branch: Branch) {
        self.branch = branch;
    }

    pub fn run_commands(
        &mut self,
        commands: &Commands,
        mail: &dyn MailAdapter,
    ) -> Result<Flow, SieveError> {
        for command in commands {
            if self.run_command(command, mail)? == Flow::Stop {
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }

    /// Run a nested block. The chain state of the enclosing sequence is
    /// restored afterwards, whatever the block did.
    pub fn run_block(&mut self, block: &Block, mail: &dyn MailAdapter) -> Result<Flow, SieveError> {
        let saved = (mem::take(&mut self.branch), mem::take(&mut self.preceding));
        let result = self.run_commands(&block.body, mail);
        (self.branch, self.preceding) = saved;
        result
    }

    pub fn run_command(
        &mut self,
        command: &Command,
        mail: &dyn MailAdapter,
    ) -> Result<Flow, SieveError> {
        self.preceding = mem::take(&mut self.branch);

        let implementation = self.registries.commands.lookup(&command.name)?;
        implementation
            .validate(command)
            .map_err(|e| e.at(command.position))?;
        ensure_enabled(
            self.registries,
            &self.enabled,
            LookupKind::Command,
            &command.name,
            implementation.is_extension(),
        )?;

        debug!(command = %command.name, line = command.position.line, "dispatch");
        implementation
            .execute(self, mail, command)
            .map_err(|e| e.at(command.position))
    }

    pub fn evaluate(&mut self, test: &Test, mail: &dyn MailAdapter) -> Result<bool, SieveError> {
        let implementation = self.registries.tests.lookup(&test.name)?;
        implementation.validate(test).map_err(|e| e.at(test.position))?;
        ensure_enabled(
            self.registries,
            &self.enabled,
            LookupKind::Test,
            &test.name,
            implementation.is_extension(),
        )?;

        let result = implementation
            .evaluate(self, mail, test)
            .map_err(|e| e.at(test.position))?;
        trace!(test = %test.name, result, "evaluated");
        Ok(result)
    }
}

/// Fail with a not-required lookup error when `name` is an extension that
/// has not been enabled. Comparators are enabled as `comparator-<name>`.
pub(crate) fn ensure_enabled(
    registries: &Registries,
    enabled: &HashSet<String>,
    kind: LookupKind,
    name: &str,
    is_extension: bool,
) -> Result<(), SieveError> {
    if !is_extension || !registries.enforce_require {
        return Ok(());
    }
    let capability = match kind {
        LookupKind::Comparator => format!("comparator-{name}"),
        _ => name.to_string(),
    };
    if enabled.contains(&capability) {
        Ok(())
    } else {
        Err(SieveError::not_required(kind, name))
    }
}
