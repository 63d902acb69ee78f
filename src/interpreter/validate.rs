/// Static checks run over a whole script before any command executes.
use std::collections::HashSet;

use crate::commands::control::required_extensions;
use crate::conditions::matching::comparator_names;
use crate::error::{LookupKind, SieveError};
use crate::interpreter::context::ensure_enabled;
use crate::model::arguments::Test;
use crate::model::script::{Command, Commands};
use crate::registry::Registries;

const REQUIRE: &str = "require";

/// Check names, extension requirements, argument shapes and placement.
pub fn validate(registries: &Registries, commands: &Commands) -> Result<(), SieveError> {
    let mut validator = Validator {
        registries,
        enabled: HashSet::new(),
    };
    validator.sequence(commands, true)
}

struct Validator<'a> {
    registries: &'a Registries,
    enabled: HashSet<String>,
}

impl Validator<'_> {
    fn sequence(&mut self, commands: &Commands, top_level: bool) -> Result<(), SieveError> {
        let mut preamble = top_level;
        let mut previous: Option<&str> = None;

        for command in commands {
            if command.name == REQUIRE {
                if !preamble {
                    let message = if top_level {
                        "'require' must come before any other command"
                    } else {
                        "'require' is only allowed at the top level"
                    };
                    return Err(SieveError::syntax(message).at(command.position));
                }
            } else {
                preamble = false;
            }

            if matches!(command.name.as_str(), "elsif" | "else")
                && !matches!(previous, Some("if" | "elsif"))
            {
                return Err(SieveError::syntax(format!(
                    "'{}' must follow 'if' or 'elsif'",
                    command.name
                ))
                .at(command.position));
            }

            self.command(command)?;
            previous = Some(command.name.as_str());
        }
        Ok(())
    }

    fn command(&mut self, command: &Command) -> Result<(), SieveError> {
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

        if command.name == REQUIRE {
            for name in required_extensions(command)? {
                if !self.registries.is_extension_available(name) {
                    return Err(SieveError::not_registered(LookupKind::Extension, name.clone()));
                }
                self.enabled.insert(name.clone());
            }
        }

        for test in command.arguments.tests.iter().flatten() {
            self.test(test)?;
        }
        if let Some(block) = &command.block {
            self.sequence(&block.body, false)?;
        }
        Ok(())
    }

    fn test(&mut self, test: &Test) -> Result<(), SieveError> {
        let implementation = self.registries.tests.lookup(&test.name)?;
        implementation
            .validate(test)
            .map_err(|e| e.at(test.position))?;
        ensure_enabled(
            self.registries,
            &self.enabled,
            LookupKind::Test,
            &test.name,
            implementation.is_extension(),
        )?;

        for name in comparator_names(&test.arguments) {
            let comparator = self.registries.comparators.lookup(name)?;
            ensure_enabled(
                self.registries,
                &self.enabled,
                LookupKind::Comparator,
                name,
                comparator.is_extension(),
            )?;
        }

        for inner in test.arguments.tests.iter().flatten() {
            self.test(inner)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupFailure;
    use crate::sieve::compile;

    fn check(source: &str) -> Result<(), SieveError> {
        let registries = Registries {
            enforce_require: true,
            ..Registries::default()
        };
        validate(&registries, &compile(source).unwrap())
    }

    #[test]
    fn test_valid_script() {
        let script = r#"
            require ["fileinto", "reject"];
            if header :contains "Subject" "spam" {
                fileinto "Junk";
            } elsif size :over 1M {
                reject "too big";
            } else {
                keep;
            }
        "#;
        check(script).unwrap();
    }

    #[test]
    fn test_require_placement() {
        let late = check("keep;\nrequire \"fileinto\";").unwrap_err();
        assert!(late.is_syntax());
        assert_eq!(late.position().map(|p| p.line), Some(2));

        let nested = check("if true { require \"fileinto\"; }").unwrap_err();
        assert!(nested.is_syntax());
    }

    #[test]
    fn test_dangling_else() {
        assert!(check("keep; else { discard; }").unwrap_err().is_syntax());
        assert!(check("elsif true { discard; }").unwrap_err().is_syntax());
        assert!(check("if false { keep; } keep; else { discard; }").is_err());
    }

    #[test]
    fn test_extension_must_be_required() {
        match check("fileinto \"Junk\";") {
            Err(SieveError::Lookup { kind, name, failure }) => {
                assert_eq!(kind, LookupKind::Command);
                assert_eq!(name, "fileinto");
                assert_eq!(failure, LookupFailure::NotRequired);
            }
            other => panic!("expected lookup error, got {other:?}"),
        }
        assert!(check("if envelope \"from\" \"a@b\" { keep; }").unwrap_err().is_lookup());
    }

    #[test]
    fn test_unknown_names() {
        assert!(check("vacation \"away\";").unwrap_err().is_lookup());
        assert!(check("if spamtest 5 { keep; }").unwrap_err().is_lookup());
        assert!(check("require \"imapflags\";").unwrap_err().is_lookup());
        assert!(check("if header :comparator \"i;nope\" \"a\" \"b\" { keep; }")
            .unwrap_err()
            .is_lookup());
    }

    #[test]
    fn test_nested_test_shapes_are_checked() {
        assert!(check("if anyof (true, size :over) { keep; }").unwrap_err().is_syntax());
        assert!(check("if not (true, false) { keep; }").unwrap_err().is_syntax());
    }

    #[test]
    fn test_lenient_by_default() {
        let registries = Registries::default();
        validate(&registries, &compile("reject \"x\";").unwrap()).unwrap();
        validate(&registries, &compile("if envelope \"from\" \"a@b\" { keep; }").unwrap()).unwrap();
    }

    #[test]
    fn test_shape_checked_before_require() {
        assert!(check("reject;").unwrap_err().is_syntax());
        assert!(check("if envelope \"from\" { keep; }").unwrap_err().is_syntax());
    }

    #[test]
    fn test_core_names_cannot_be_required() {
        match check("require [\"fileinto\", \"if\"];") {
            Err(SieveError::Lookup { kind, name, failure }) => {
                assert_eq!(kind, LookupKind::Extension);
                assert_eq!(name, "if");
                assert_eq!(failure, LookupFailure::NotRegistered);
            }
            other => panic!("expected lookup error, got {other:?}"),
        }
    }
}
