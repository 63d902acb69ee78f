/// Message content tests: header, exists, size, body.
use crate::conditions::matching::{any_match, MatchArguments};
use crate::conditions::SieveTest;
use crate::error::SieveError;
use crate::interpreter::context::ExecutionContext;
use crate::mail::MailAdapter;
use crate::model::arguments::{Argument, Test};
use crate::model::enums::{MatchType, SizeComparator};

/// `header [COMPARATOR] [MATCH-TYPE] <header-names> <key-list>`
pub struct Header;

impl SieveTest for Header {
    fn validate(&self, test: &Test) -> Result<(), SieveError> {
        MatchArguments::parse(test, false, 2).map(|_| ())
    }

    fn evaluate(
        &self,
        ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        test: &Test,
    ) -> Result<bool, SieveError> {
        let args = MatchArguments::parse(test, false, 2)?;
        let comparator = ctx.comparator(args.comparator)?;
        let (names, keys) = (args.operands[0], args.operands[1]);

        for name in names {
            let values = mail.header(name)?;
            if any_match(
                comparator.as_ref(),
                args.match_type,
                values.iter().map(String::as_str),
                keys,
            ) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// `exists <header-names>`: true iff every named header is present.
pub struct Exists;

impl Exists {
    fn names(test: &Test) -> Result<&[String], SieveError> {
        match (test.arguments.positional.as_slice(), &test.arguments.tests) {
            ([Argument::StringList(names)], None) => Ok(names),
            _ => Err(SieveError::syntax("'exists' expects a single string-list")),
        }
    }
}

impl SieveTest for Exists {
    fn validate(&self, test: &Test) -> Result<(), SieveError> {
        Self::names(test).map(|_| ())
    }

    fn evaluate(
        &self,
        _ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        test: &Test,
    ) -> Result<bool, SieveError> {
        for name in Self::names(test)? {
            if mail.header(name)?.is_empty() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// `size <":over" / ":under"> <limit: number>`
pub struct Size;

impl Size {
    fn parts(test: &Test) -> Result<(SizeComparator, u64), SieveError> {
        match (test.arguments.positional.as_slice(), &test.arguments.tests) {
            ([Argument::Tag(tag), Argument::Number(limit)], None) => {
                let comparator = SizeComparator::from_sieve(tag).ok_or_else(|| {
                    SieveError::syntax(format!("'size' expects :over or :under, found {tag}"))
                })?;
                Ok((comparator, *limit))
            }
            _ => Err(SieveError::syntax(
                "'size' expects :over or :under followed by a number",
            )),
        }
    }
}

impl SieveTest for Size {
    fn validate(&self, test: &Test) -> Result<(), SieveError> {
        Self::parts(test).map(|_| ())
    }

    fn evaluate(
        &self,
        _ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        test: &Test,
    ) -> Result<bool, SieveError> {
        let (comparator, limit) = Self::parts(test)?;
        Ok(comparator.holds(mail.size()?, limit))
    }
}

/// `body :contains <key-list>` (RFC 5173, restricted to `:contains`).
///
/// Delegates to [`MailAdapter::is_in_body_text`], so the comparator is the
/// adapter's own.
pub struct Body;

impl Body {
    fn keys(test: &Test) -> Result<&[String], SieveError> {
        let args = MatchArguments::parse(test, false, 1)?;
        if args.match_type != MatchType::Contains {
            return Err(SieveError::syntax("'body' only supports :contains"));
        }
        Ok(args.operands[0])
    }
}

impl SieveTest for Body {
    fn validate(&self, test: &Test) -> Result<(), SieveError> {
        Self::keys(test).map(|_| ())
    }

    fn evaluate(
        &self,
        _ctx: &mut ExecutionContext<'_>,
        mail: &dyn MailAdapter,
        test: &Test,
    ) -> Result<bool, SieveError> {
        for key in Self::keys(test)? {
            if mail.is_in_body_text(key)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn is_extension(&self) -> bool {
        true
    }
}
