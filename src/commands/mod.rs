/// Command implementations and the contract they fulfil.
pub mod actions;
pub mod control;

use crate::error::SieveError;
use crate::interpreter::context::{ExecutionContext, Flow};
use crate::mail::MailAdapter;
use crate::model::arguments::Argument;
use crate::model::script::Command;

/// A command implementation registered in the
/// [`CommandManager`](crate::registry::CommandManager).
pub trait SieveCommand: Send + Sync {
    /// Check argument and block shape. Called before the script runs.
    fn validate(&self, command: &Command) -> Result<(), SieveError>;

    fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        command: &Command,
    ) -> Result<Flow, SieveError>;

    /// Extensions must be enabled by `require` before use.
    fn is_extension(&self) -> bool {
        false
    }
}

pub(crate) fn expect_no_block(command: &Command) -> Result<(), SieveError> {
    if command.block.is_some() {
        return Err(SieveError::syntax(format!(
            "'{}' does not take a block",
            command.name
        )));
    }
    Ok(())
}

pub(crate) fn expect_no_tests(command: &Command) -> Result<(), SieveError> {
    if command.arguments.tests.is_some() {
        return Err(SieveError::syntax(format!(
            "'{}' does not take a test",
            command.name
        )));
    }
    Ok(())
}

/// A command taking nothing at all, e.g. `keep;`.
pub(crate) fn expect_bare(command: &Command) -> Result<(), SieveError> {
    expect_no_block(command)?;
    if !command.arguments.is_empty() {
        return Err(SieveError::syntax(format!(
            "'{}' takes no arguments",
            command.name
        )));
    }
    Ok(())
}

/// The single string operand of `fileinto`, `redirect` and `reject`.
pub(crate) fn single_string<'a>(command: &'a Command, what: &str) -> Result<&'a str, SieveError> {
    let args = &command.arguments.positional;
    if args.len() != 1 {
        return Err(SieveError::syntax(format!(
            "'{}' expects exactly 1 argument, found {}",
            command.name,
            args.len()
        )));
    }
    match &args[0] {
        Argument::StringList(list) if list.len() == 1 => Ok(&list[0]),
        Argument::StringList(list) => Err(SieveError::syntax(format!(
            "'{}' expects a single {what}, found a list of {}",
            command.name,
            list.len()
        ))),
        other => Err(SieveError::syntax(format!(
            "'{}' expects a {what} string, found a {}",
            command.name,
            other.describe()
        ))),
    }
}
