/// Address tests: address and envelope (RFC 3028 §5.1, §5.4).
use crate::conditions::matching::{any_match, MatchArguments};
use crate::conditions::SieveTest;
use crate::error::SieveError;
use crate::interpreter::context::ExecutionContext;
use crate::mail::{addresses, MailAdapter};
use crate::model::arguments::Test;

/// `address [ADDRESS-PART] [COMPARATOR] [MATCH-TYPE] <header-list> <key-list>`
pub struct Address;

impl SieveTest for Address {
    fn validate(&self, test: &Test) -> Result<(), SieveError> {
        MatchArguments::parse(test, true, 2).map(|_| ())
    }

    fn evaluate(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        test: &Test,
    ) -> Result<bool, SieveError> {
        let args = MatchArguments::parse(test, true, 2)?;
        let comparator = ctx.comparator(args.comparator)?;
        let (headers, keys) = (args.operands[0], args.operands[1]);

        for header in headers {
            let found: Vec<String> = mail
                .header(header)?
                .iter()
                .flat_map(|value| addresses(value))
                .collect();
            let parts = found.iter().map(|a| args.address_part.extract(a));
            if any_match(comparator.as_ref(), args.match_type, parts, keys) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// `envelope [COMPARATOR] [ADDRESS-PART] [MATCH-TYPE] <envelope-part> <key-list>`
pub struct Envelope;

impl SieveTest for Envelope {
    fn validate(&self, test: &Test) -> Result<(), SieveError> {
        MatchArguments::parse(test, true, 2).map(|_| ())
    }

    fn evaluate(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        test: &Test,
    ) -> Result<bool, SieveError> {
        let args = MatchArguments::parse(test, true, 2)?;
        let comparator = ctx.comparator(args.comparator)?;
        let (parts, keys) = (args.operands[0], args.operands[1]);

        for part in parts {
            let values = mail.envelope(part)?;
            let extracted = values.iter().map(|a| args.address_part.extract(a));
            if any_match(comparator.as_ref(), args.match_type, extracted, keys) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn is_extension(&self) -> bool {
        true
    }
}
