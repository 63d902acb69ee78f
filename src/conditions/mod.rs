/// Test implementations (RFC 3028 §5) and the contract they fulfil.
pub mod address;
pub mod combinators;
pub mod header;
pub mod matching;

use crate::error::SieveError;
use crate::interpreter::context::ExecutionContext;
use crate::mail::MailAdapter;
use crate::model::arguments::Test;

/// A test implementation registered in the
/// [`TestManager`](crate::registry::TestManager).
pub trait SieveTest: Send + Sync {
    /// Check argument shape. Called before the script runs.
    fn validate(&self, test: &Test) -> Result<(), SieveError>;

    fn evaluate(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        test: &Test,
    ) -> Result<bool, SieveError>;

    /// Extensions must be enabled by `require` before use.
    fn is_extension(&self) -> bool {
        false
    }
}
