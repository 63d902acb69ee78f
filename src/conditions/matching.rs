/// Tagged-argument parsing and key matching shared by the comparison tests.
use crate::comparators::Comparator;
use crate::error::SieveError;
use crate::model::arguments::{Argument, Arguments, Test};
use crate::model::enums::{AddressPartType, MatchType};

pub const DEFAULT_COMPARATOR: &str = "i;ascii-casemap";

/// `[COMPARATOR] [MATCH-TYPE] [ADDRESS-PART] <string-list>...`
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArguments<'a> {
    pub comparator: &'a str,
    pub match_type: MatchType,
    pub address_part: AddressPartType,
    pub operands: Vec<&'a [String]>,
}

impl<'a> MatchArguments<'a> {
    /// Parse the arguments of `test`, which must end in exactly `operands`
    /// string lists.
    pub fn parse(
        test: &'a Test,
        accepts_address_part: bool,
        operands: usize,
    ) -> Result<Self, SieveError> {
        if test.arguments.tests.is_some() {
            return Err(SieveError::syntax(format!("'{}' does not take a test", test.name)));
        }

        let mut comparator = None;
        let mut match_type = None;
        let mut address_part = None;
        let mut lists = Vec::new();
        let mut args = test.arguments.positional.iter();

        while let Some(arg) = args.next() {
            match arg {
                Argument::Tag(tag) if !lists.is_empty() => {
                    return Err(SieveError::syntax(format!(
                        "'{}': tag {tag} must come before the string lists",
                        test.name
                    )));
                }
                Argument::Tag(tag) if tag == ":comparator" => {
                    let name = match args.next() {
                        Some(Argument::StringList(list)) if list.len() == 1 => list[0].as_str(),
                        _ => {
                            return Err(SieveError::syntax(
                                ":comparator expects a single comparator name",
                            ))
                        }
                    };
                    set_once(&mut comparator, name, &test.name, ":comparator")?;
                }
                Argument::Tag(tag) => {
                    if let Some(m) = MatchType::from_sieve(tag) {
                        set_once(&mut match_type, m, &test.name, "match type")?;
                    } else if let Some(part) =
                        AddressPartType::from_sieve(tag).filter(|_| accepts_address_part)
                    {
                        set_once(&mut address_part, part, &test.name, "address part")?;
                    } else {
                        return Err(SieveError::syntax(format!(
                            "'{}' does not accept tag {tag}",
                            test.name
                        )));
                    }
                }
                Argument::StringList(list) => lists.push(list.as_slice()),
                Argument::Number(n) => {
                    return Err(SieveError::syntax(format!(
                        "'{}' does not take a number ({n})",
                        test.name
                    )));
                }
            }
        }

        if lists.len() != operands {
            return Err(SieveError::syntax(format!(
                "'{}' expects {operands} string-list argument(s), found {}",
                test.name,
                lists.len()
            )));
        }

        Ok(Self {
            comparator: comparator.unwrap_or(DEFAULT_COMPARATOR),
            match_type: match_type.unwrap_or_default(),
            address_part: address_part.unwrap_or_default(),
            operands: lists,
        })
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, test: &str, what: &str) -> Result<(), SieveError> {
    if slot.replace(value).is_some() {
        return Err(SieveError::syntax(format!("'{test}' has more than one {what}")));
    }
    Ok(())
}

/// Comparator names referenced by `:comparator` tags in an argument list.
pub fn comparator_names(arguments: &Arguments) -> Vec<&str> {
    arguments
        .positional
        .windows(2)
        .filter_map(|pair| match pair {
            [Argument::Tag(tag), Argument::StringList(list)] if tag == ":comparator" => {
                list.first().map(String::as_str)
            }
            _ => None,
        })
        .collect()
}

/// Whether any value matches any key.
pub fn any_match<'v>(
    comparator: &dyn Comparator,
    match_type: MatchType,
    values: impl IntoIterator<Item = &'v str>,
    keys: &[String],
) -> bool {
    values.into_iter().any(|value| {
        keys.iter().any(|key| match match_type {
            MatchType::Is => comparator.equals(value, key),
            MatchType::Contains => comparator.contains(value, key),
            MatchType::Matches => comparator.matches(value, key),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparators::{AsciiCasemap, Octet};

    fn test_with(positional: Vec<Argument>) -> Test {
        Test::new("header", Arguments::new(positional, None))
    }

    fn list(items: &[&str]) -> Argument {
        Argument::StringList(items.iter().map(|s| s.to_string()).collect())
    }

    fn tag(t: &str) -> Argument {
        Argument::Tag(t.to_string())
    }

    #[test]
    fn test_defaults() {
        let test = test_with(vec![list(&["Subject"]), list(&["hello"])]);
        let args = MatchArguments::parse(&test, false, 2).unwrap();
        assert_eq!(args.comparator, DEFAULT_COMPARATOR);
        assert_eq!(args.match_type, MatchType::Is);
        assert_eq!(args.operands.len(), 2);
    }

    #[test]
    fn test_tags_in_any_order() {
        let test = test_with(vec![
            tag(":contains"),
            tag(":comparator"),
            list(&["i;octet"]),
            tag(":domain"),
            list(&["From"]),
            list(&["example.com"]),
        ]);
        let args = MatchArguments::parse(&test, true, 2).unwrap();
        assert_eq!(args.comparator, "i;octet");
        assert_eq!(args.match_type, MatchType::Contains);
        assert_eq!(args.address_part, AddressPartType::Domain);
    }

    #[test]
    fn test_rejections() {
        let address_part_on_header = test_with(vec![tag(":domain"), list(&["a"]), list(&["b"])]);
        assert!(MatchArguments::parse(&address_part_on_header, false, 2).is_err());

        let two_match_types = test_with(vec![tag(":is"), tag(":contains"), list(&["a"]), list(&["b"])]);
        assert!(MatchArguments::parse(&two_match_types, false, 2).is_err());

        let trailing_tag = test_with(vec![list(&["a"]), list(&["b"]), tag(":is")]);
        assert!(MatchArguments::parse(&trailing_tag, false, 2).is_err());

        let missing_key = test_with(vec![list(&["a"])]);
        assert!(MatchArguments::parse(&missing_key, false, 2).is_err());
    }

    #[test]
    fn test_comparator_names() {
        let args = Arguments::new(
            vec![tag(":comparator"), list(&["i;octet"]), list(&["x"]), list(&["y"])],
            None,
        );
        assert_eq!(comparator_names(&args), vec!["i;octet"]);
    }

    #[test]
    fn test_any_match() {
        let keys = vec!["SPAM".to_string(), "offer".to_string()];
        assert!(any_match(&AsciiCasemap, MatchType::Contains, ["Big Offer inside"], &keys));
        assert!(!any_match(&Octet, MatchType::Contains, ["Big Offer inside"], &keys));
        assert!(!any_match(&AsciiCasemap, MatchType::Is, std::iter::empty(), &keys));
    }
}
