/// Control commands (RFC 3028 §3): if/elsif/else, require, stop.
use tracing::debug;

use crate::commands::{expect_bare, expect_no_block, SieveCommand};
use crate::error::{LookupKind, SieveError};
use crate::interpreter::context::{Branch, ExecutionContext, Flow};
use crate::mail::MailAdapter;
use crate::model::arguments::{Argument, Test};
use crate::model::script::{Block, Command};

/// `if <test> <block>`
pub struct If;

/// `elsif <test> <block>`; runs only when no earlier branch of the chain ran.
pub struct Elsif;

/// `else <block>`
pub struct Else;

fn conditional_parts(command: &Command) -> Result<(&Test, &Block), SieveError> {
    let block = command
        .block
        .as_ref()
        .ok_or_else(|| SieveError::syntax(format!("'{}' requires a block", command.name)))?;
    if !command.arguments.positional.is_empty() {
        return Err(SieveError::syntax(format!(
            "'{}' takes a test, not {}",
            command.name,
            command.arguments.positional[0].describe()
        )));
    }
    match command.arguments.tests.as_ref().map(|t| t.0.as_slice()) {
        Some([test]) => Ok((test, block)),
        Some(tests) => Err(SieveError::syntax(format!(
            "'{}' expects exactly one test, found {}",
            command.name,
            tests.len()
        ))),
        None => Err(SieveError::syntax(format!("'{}' requires a test", command.name))),
    }
}

impl SieveCommand for If {
    fn validate(&self, command: &Command) -> Result<(), SieveError> {
        conditional_parts(command).map(|_| ())
    }

    fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        command: &Command,
    ) -> Result<Flow, SieveError> {
        let (test, block) = conditional_parts(command)?;
        run_branch(ctx, mail, test, block)
    }
}

impl SieveCommand for Elsif {
    fn validate(&self, command: &Command) -> Result<(), SieveError> {
        conditional_parts(command).map(|_| ())
    }

    fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        command: &Command,
    ) -> Result<Flow, SieveError> {
        let (test, block) = conditional_parts(command)?;
        match ctx.preceding_branch() {
            Branch::Pending => run_branch(ctx, mail, test, block),
            Branch::Taken => {
                ctx.set_branch(Branch::Taken);
                Ok(Flow::Continue)
            }
            Branch::None => Err(SieveError::syntax("'elsif' must follow 'if' or 'elsif'")),
        }
    }
}

impl SieveCommand for Else {
    fn validate(&self, command: &Command) -> Result<(), SieveError> {
        if command.block.is_none() {
            return Err(SieveError::syntax("'else' requires a block"));
        }
        if !command.arguments.is_empty() {
            return Err(SieveError::syntax("'else' takes no arguments"));
        }
        Ok(())
    }

    fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        command: &Command,
    ) -> Result<Flow, SieveError> {
        match (ctx.preceding_branch(), &command.block) {
            (Branch::Pending, Some(block)) => ctx.run_block(block, mail),
            (Branch::Taken, _) => Ok(Flow::Continue),
            (Branch::None, _) => Err(SieveError::syntax("'else' must follow 'if' or 'elsif'")),
            (Branch::Pending, None) => Err(SieveError::syntax("'else' requires a block")),
        }
    }
}

fn run_branch(
    ctx: &mut ExecutionContext<'_>,
    mail: &dyn MailAdapter,
    test: &Test,
    block: &Block,
) -> Result<Flow, SieveError> {
    if ctx.evaluate(test, mail)? {
        let flow = ctx.run_block(block, mail)?;
        ctx.set_branch(Branch::Taken);
        Ok(flow)
    } else {
        ctx.set_branch(Branch::Pending);
        Ok(Flow::Continue)
    }
}

/// `require <capabilities: string-list>`
pub struct Require;

/// The extension names listed by a `require` command.
pub fn required_extensions(command: &Command) -> Result<&[String], SieveError> {
    expect_no_block(command)?;
    let args = &command.arguments;
    match (args.positional.as_slice(), &args.tests) {
        ([Argument::StringList(names)], None) => Ok(names),
        _ => Err(SieveError::syntax("'require' expects a single string-list")),
    }
}

impl SieveCommand for Require {
    fn validate(&self, command: &Command) -> Result<(), SieveError> {
        required_extensions(command).map(|_| ())
    }

    fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        _mail: &dyn MailAdapter,
        command: &Command,
    ) -> Result<Flow, SieveError> {
        for name in required_extensions(command)? {
            if !ctx.registries().is_extension_available(name) {
                return Err(SieveError::not_registered(LookupKind::Extension, name.clone()));
            }
            debug!(extension = %name, "extension enabled");
            ctx.enable_extension(name);
        }
        Ok(Flow::Continue)
    }
}

/// `stop`: end the script, keeping the actions collected so far.
pub struct Stop;

impl SieveCommand for Stop {
    fn validate(&self, command: &Command) -> Result<(), SieveError> {
        expect_bare(command)
    }

    fn execute(
        &self,
        _ctx: &mut ExecutionContext<'_>,
        _mail: &dyn MailAdapter,
        _command: &Command,
    ) -> Result<Flow, SieveError> {
        Ok(Flow::Stop)
    }
}
