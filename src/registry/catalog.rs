/// Built-in implementations, addressed by implementation id.
///
/// Ids equal the Sieve names the implementations are registered under by
/// default, so a configuration can alias an implementation under another
/// name (`{"commands": {"file": "fileinto"}}`).
use std::sync::Arc;

use crate::commands::actions::{Discard, FileInto, Keep, Redirect, Reject};
use crate::commands::control::{Else, Elsif, If, Require, Stop};
use crate::commands::SieveCommand;
use crate::comparators::{AsciiCasemap, Comparator, Octet};
use crate::conditions::address::{Address, Envelope};
use crate::conditions::combinators::{AllOf, AnyOf, Constant, Not};
use crate::conditions::header::{Body, Exists, Header, Size};
use crate::conditions::SieveTest;

pub const COMMANDS: &[&str] = &[
    "if", "elsif", "else", "require", "stop", "keep", "discard", "redirect", "reject", "fileinto",
];

pub const TESTS: &[&str] = &[
    "address", "allof", "anyof", "exists", "false", "header", "not", "size", "true", "envelope",
    "body",
];

pub const COMPARATORS: &[&str] = &["i;octet", "i;ascii-casemap"];

pub fn command(id: &str) -> Option<Arc<dyn SieveCommand>> {
    let implementation: Arc<dyn SieveCommand> = match id {
        "if" => Arc::new(If),
        "elsif" => Arc::new(Elsif),
        "else" => Arc::new(Else),
        "require" => Arc::new(Require),
        "stop" => Arc::new(Stop),
        "keep" => Arc::new(Keep),
        "discard" => Arc::new(Discard),
        "redirect" => Arc::new(Redirect),
        "reject" => Arc::new(Reject),
        "fileinto" => Arc::new(FileInto),
        _ => return None,
    };
    Some(implementation)
}

pub fn condition(id: &str) -> Option<Arc<dyn SieveTest>> {
    let implementation: Arc<dyn SieveTest> = match id {
        "address" => Arc::new(Address),
        "allof" => Arc::new(AllOf),
        "anyof" => Arc::new(AnyOf),
        "exists" => Arc::new(Exists),
        "false" => Arc::new(Constant(false)),
        "header" => Arc::new(Header),
        "not" => Arc::new(Not),
        "size" => Arc::new(Size),
        "true" => Arc::new(Constant(true)),
        "envelope" => Arc::new(Envelope),
        "body" => Arc::new(Body),
        _ => return None,
    };
    Some(implementation)
}

pub fn comparator(id: &str) -> Option<Arc<dyn Comparator>> {
    let implementation: Arc<dyn Comparator> = match id {
        "i;octet" => Arc::new(Octet),
        "i;ascii-casemap" => Arc::new(AsciiCasemap),
        _ => return None,
    };
    Some(implementation)
}

pub fn all_commands() -> impl Iterator<Item = (&'static str, Arc<dyn SieveCommand>)> {
    COMMANDS
        .iter()
        .filter_map(|&id| command(id).map(|implementation| (id, implementation)))
}

pub fn all_tests() -> impl Iterator<Item = (&'static str, Arc<dyn SieveTest>)> {
    TESTS
        .iter()
        .filter_map(|&id| condition(id).map(|implementation| (id, implementation)))
}

pub fn all_comparators() -> impl Iterator<Item = (&'static str, Arc<dyn Comparator>)> {
    COMPARATORS
        .iter()
        .filter_map(|&id| comparator(id).map(|implementation| (id, implementation)))
}
