/// Action commands (RFC 3028 §4): keep, discard, redirect, fileinto, reject.
///
/// Each one appends to the action list through
/// [`ExecutionContext::add_action`], which enforces reject exclusivity.
use tracing::debug;

use crate::commands::{expect_bare, expect_no_block, expect_no_tests, single_string, SieveCommand};
use crate::error::SieveError;
use crate::interpreter::context::{ExecutionContext, Flow};
use crate::mail::MailAdapter;
use crate::model::action::Action;
use crate::model::script::Command;

pub struct Keep;

impl SieveCommand for Keep {
    fn validate(&self, command: &Command) -> Result<(), SieveError> {
        expect_bare(command)
    }

    fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        _mail: &dyn MailAdapter,
        _command: &Command,
    ) -> Result<Flow, SieveError> {
        ctx.add_action(Action::Keep)?;
        Ok(Flow::Continue)
    }
}

pub struct Discard;

impl SieveCommand for Discard {
    fn validate(&self, command: &Command) -> Result<(), SieveError> {
        expect_bare(command)
    }

    fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        _mail: &dyn MailAdapter,
        _command: &Command,
    ) -> Result<Flow, SieveError> {
        ctx.add_action(Action::Discard)?;
        Ok(Flow::Continue)
    }
}

pub struct Redirect;

impl SieveCommand for Redirect {
    fn validate(&self, command: &Command) -> Result<(), SieveError> {
        expect_no_block(command)?;
        expect_no_tests(command)?;
        let address = single_string(command, "address")?;
        if address.trim().is_empty() {
            return Err(SieveError::syntax("'redirect' expects a non-empty address"));
        }
        Ok(())
    }

    fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        _mail: &dyn MailAdapter,
        command: &Command,
    ) -> Result<Flow, SieveError> {
        let address = single_string(command, "address")?.to_string();
        ctx.add_action(Action::Redirect { address })?;
        Ok(Flow::Continue)
    }
}

/// `fileinto` (RFC 3028 §4.2). At most one per destination: a repeat is
/// silently dropped.
pub struct FileInto;

impl SieveCommand for FileInto {
    fn validate(&self, command: &Command) -> Result<(), SieveError> {
        expect_no_block(command)?;
        expect_no_tests(command)?;
        single_string(command, "mailbox").map(|_| ())
    }

    fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        _mail: &dyn MailAdapter,
        command: &Command,
    ) -> Result<Flow, SieveError> {
        let destination = single_string(command, "mailbox")?;
        let duplicate = ctx.actions().iter().any(
            |a| matches!(a, Action::FileInto { destination: existing } if existing == destination),
        );
        if duplicate {
            debug!(destination, "duplicate fileinto ignored");
        } else {
            ctx.add_action(Action::FileInto {
                destination: destination.to_string(),
            })?;
        }
        Ok(Flow::Continue)
    }

    fn is_extension(&self) -> bool {
        true
    }
}

/// `reject` (RFC 3028 §4.1). Must be the only action of the execution.
pub struct Reject;

impl SieveCommand for Reject {
    fn validate(&self, command: &Command) -> Result<(), SieveError> {
        expect_no_block(command)?;
        expect_no_tests(command)?;
        single_string(command, "message").map(|_| ())
    }

    fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        _mail: &dyn MailAdapter,
        command: &Command,
    ) -> Result<Flow, SieveError> {
        let message = single_string(command, "message")?.to_string();
        ctx.add_action(Action::Reject { message })?;
        Ok(Flow::Continue)
    }

    fn is_extension(&self) -> bool {
        true
    }
}
