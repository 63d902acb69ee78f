/// Boolean tests: anyof, allof, not, true, false.
use crate::conditions::SieveTest;
use crate::error::SieveError;
use crate::interpreter::context::ExecutionContext;
use crate::mail::MailAdapter;
use crate::model::arguments::{Test, TestList};

fn test_list<'a>(test: &'a Test) -> Result<&'a TestList, SieveError> {
    if let Some(first) = test.arguments.positional.first() {
        return Err(SieveError::syntax(format!(
            "'{}' expects a test-list, found a {}",
            test.name,
            first.describe()
        )));
    }
    match &test.arguments.tests {
        Some(list) if !list.is_empty() => Ok(list),
        _ => Err(SieveError::syntax(format!("'{}' expects a test-list", test.name))),
    }
}

/// True iff at least one test is true; stops at the first true one.
pub struct AnyOf;

impl SieveTest for AnyOf {
    fn validate(&self, test: &Test) -> Result<(), SieveError> {
        test_list(test).map(|_| ())
    }

    fn evaluate(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        test: &Test,
    ) -> Result<bool, SieveError> {
        for inner in test_list(test)? {
            if ctx.evaluate(inner, mail)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// True iff every test is true; stops at the first false one.
pub struct AllOf;

impl SieveTest for AllOf {
    fn validate(&self, test: &Test) -> Result<(), SieveError> {
        test_list(test).map(|_| ())
    }

    fn evaluate(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        test: &Test,
    ) -> Result<bool, SieveError> {
        for inner in test_list(test)? {
            if !ctx.evaluate(inner, mail)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

pub struct Not;

impl Not {
    fn operand(test: &Test) -> Result<&Test, SieveError> {
        let list = test_list(test)?;
        match list.0.as_slice() {
            [only] => Ok(only),
            _ => Err(SieveError::syntax(format!(
                "'not' expects exactly one test, found {}",
                list.len()
            ))),
        }
    }
}

impl SieveTest for Not {
    fn validate(&self, test: &Test) -> Result<(), SieveError> {
        Self::operand(test).map(|_| ())
    }

    fn evaluate(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        test: &Test,
    ) -> Result<bool, SieveError> {
        let operand = Self::operand(test)?;
        Ok(!ctx.evaluate(operand, mail)?)
    }
}

/// `true` / `false`
pub struct Constant(pub bool);

impl SieveTest for Constant {
    fn validate(&self, test: &Test) -> Result<(), SieveError> {
        if !test.arguments.is_empty() {
            return Err(SieveError::syntax(format!(
                "'{}' takes no arguments",
                test.name
            )));
        }
        Ok(())
    }

    fn evaluate(
        &self,
        _ctx: &mut ExecutionContext<'_>,
        _mail: &dyn MailAdapter,
        _test: &Test,
    ) -> Result<bool, SieveError> {
        Ok(self.0)
    }
}
