/// Parse tree → domain model.
///
/// One recursive pass: every node is turned into a [`Fragment`], then the
/// parent partitions its children's fragments by variant (arguments, tests,
/// block) before building itself.
use crate::error::SieveError;
use crate::model::arguments::{Argument, Arguments, Test, TestList};
use crate::model::script::{Block, Command, Commands};
use crate::sieve::parse_tree::Node;

/// Convert a parse tree rooted at [`Node::Start`] into the script body.
pub fn transform(tree: &Node) -> Result<Commands, SieveError> {
    match tree {
        Node::Start(children) => match children.as_slice() {
            [only] => match visit(only)? {
                Fragment::Commands(commands) => Ok(commands),
                other => Err(misplaced(other.kind(), "start")),
            },
            _ => Err(SieveError::syntax(format!(
                "start must have exactly one child, found {}",
                children.len()
            ))),
        },
        other => Err(SieveError::syntax(format!(
            "expected start node, found {}",
            other.kind()
        ))),
    }
}

enum Fragment {
    Commands(Commands),
    Command(Command),
    Block(Block),
    Arguments(Arguments),
    Argument(Argument),
    Test(Test),
    TestList(TestList),
    Strings(Vec<String>),
    Number(u64),
    Tag(String),
}

impl Fragment {
    fn kind(&self) -> &'static str {
        match self {
            Self::Commands(_) => "commands",
            Self::Command(_) => "command",
            Self::Block(_) => "block",
            Self::Arguments(_) => "arguments",
            Self::Argument(_) => "argument",
            Self::Test(_) => "test",
            Self::TestList(_) => "test-list",
            Self::Strings(_) => "string",
            Self::Number(_) => "number",
            Self::Tag(_) => "tag",
        }
    }
}

fn visit(node: &Node) -> Result<Fragment, SieveError> {
    match node {
        Node::Start(_) => Err(misplaced("start", "the tree")),

        Node::Commands(children) => {
            let mut commands = Vec::with_capacity(children.len());
            for child in children {
                match visit(child)? {
                    Fragment::Command(command) => commands.push(command),
                    other => return Err(misplaced(other.kind(), "commands")),
                }
            }
            Ok(Fragment::Commands(Commands(commands)))
        }

        Node::Command {
            name,
            position,
            children,
        } => {
            let mut arguments = None;
            let mut block = None;
            for child in children {
                match visit(child)? {
                    Fragment::Arguments(a) => {
                        if arguments.replace(a).is_some() {
                            return Err(SieveError::syntax(format!(
                                "command '{name}' has more than one argument list"
                            ))
                            .at(*position));
                        }
                    }
                    Fragment::Block(b) => {
                        if block.replace(b).is_some() {
                            return Err(SieveError::syntax(format!(
                                "command '{name}' has more than one block"
                            ))
                            .at(*position));
                        }
                    }
                    other => {
                        return Err(misplaced(other.kind(), "command").at(*position));
                    }
                }
            }
            let command = Command::new(name.clone(), arguments.unwrap_or_default(), block);
            Ok(Fragment::Command(command.at(*position)))
        }

        Node::Block(children) => match children.as_slice() {
            [only] => match visit(only)? {
                Fragment::Commands(body) => Ok(Fragment::Block(Block::new(body))),
                other => Err(misplaced(other.kind(), "block")),
            },
            _ => Err(SieveError::syntax("block must hold exactly one command list")),
        },

        Node::Arguments(children) => {
            let mut positional = Vec::new();
            let mut tests: Option<TestList> = None;
            for child in children {
                let list = match visit(child)? {
                    Fragment::Argument(argument) => {
                        positional.push(argument);
                        continue;
                    }
                    Fragment::Test(test) => TestList(vec![test]),
                    Fragment::TestList(list) => list,
                    other => return Err(misplaced(other.kind(), "arguments")),
                };
                if tests.replace(list).is_some() {
                    return Err(SieveError::syntax("more than one test list in arguments"));
                }
            }
            Ok(Fragment::Arguments(Arguments::new(positional, tests)))
        }

        Node::Argument(children) => {
            let mut strings: Option<Vec<String>> = None;
            let mut single = None;
            for child in children {
                match visit(child)? {
                    Fragment::Strings(s) => strings.get_or_insert_with(Vec::new).extend(s),
                    Fragment::Number(n) => single = Some(Argument::Number(n)),
                    Fragment::Tag(t) => single = Some(Argument::Tag(t)),
                    other => return Err(misplaced(other.kind(), "argument")),
                }
            }
            match (strings, single) {
                (Some(list), None) => Ok(Fragment::Argument(Argument::StringList(list))),
                (None, Some(arg)) if children.len() == 1 => Ok(Fragment::Argument(arg)),
                (None, None) => Err(SieveError::syntax("empty argument")),
                _ => Err(SieveError::syntax("argument mixes strings, numbers and tags")),
            }
        }

        Node::Test {
            name,
            position,
            children,
        } => {
            let mut arguments = None;
            for child in children {
                match visit(child)? {
                    Fragment::Arguments(a) => {
                        if arguments.replace(a).is_some() {
                            return Err(SieveError::syntax(format!(
                                "test '{name}' has more than one argument list"
                            ))
                            .at(*position));
                        }
                    }
                    other => return Err(misplaced(other.kind(), "test").at(*position)),
                }
            }
            let test = Test::new(name.clone(), arguments.unwrap_or_default());
            Ok(Fragment::Test(test.at(*position)))
        }

        Node::TestList(children) => {
            let mut tests = Vec::with_capacity(children.len());
            for child in children {
                match visit(child)? {
                    Fragment::Test(test) => tests.push(test),
                    other => return Err(misplaced(other.kind(), "test-list")),
                }
            }
            Ok(Fragment::TestList(TestList(tests)))
        }

        Node::StringList(children) => {
            let mut strings = Vec::with_capacity(children.len());
            for child in children {
                match visit(child)? {
                    Fragment::Strings(s) => strings.extend(s),
                    other => return Err(misplaced(other.kind(), "string-list")),
                }
            }
            Ok(Fragment::Strings(strings))
        }

        Node::String(raw) => Ok(Fragment::Strings(vec![unquote(raw)?])),
        Node::Number(raw) => Ok(Fragment::Number(parse_number(raw)?)),
        Node::Tag(tag) => Ok(Fragment::Tag(tag.to_lowercase())),
    }
}

fn misplaced(found: &str, parent: &str) -> SieveError {
    SieveError::syntax(format!("unexpected {found} inside {parent}"))
}

/// Strip the delimiters from a string literal and resolve its escapes.
pub fn unquote(raw: &str) -> Result<String, SieveError> {
    if let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                // RFC 3028 §2.4.2: "\" followed by any character is that character
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        return Ok(out);
    }

    if raw.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("text:")) {
        return Ok(multiline_body(raw));
    }

    Err(SieveError::syntax(format!("malformed string literal {raw}")))
}

fn multiline_body(raw: &str) -> String {
    // Everything after the `text:` line, minus the terminating "." line
    let body = raw.split_once('\n').map_or("", |(_, rest)| rest);
    let mut lines: Vec<&str> = body.split_inclusive('\n').collect();
    if lines
        .last()
        .is_some_and(|l| l.trim_end_matches(['\r', '\n']) == ".")
    {
        lines.pop();
    }

    let mut out = String::with_capacity(body.len());
    for line in lines {
        // Dot-stuffing: a leading ".." stands for "."
        out.push_str(line.strip_prefix('.').filter(|l| l.starts_with('.')).unwrap_or(line));
    }
    out
}

/// Parse a number with an optional K/M/G quantifier (RFC 3028 §2.4.1).
pub fn parse_number(raw: &str) -> Result<u64, SieveError> {
    let (digits, multiplier) = match raw.chars().last() {
        Some('K' | 'k') => (&raw[..raw.len() - 1], 1u64 << 10),
        Some('M' | 'm') => (&raw[..raw.len() - 1], 1u64 << 20),
        Some('G' | 'g') => (&raw[..raw.len() - 1], 1u64 << 30),
        _ => (raw, 1),
    };
    digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| SieveError::syntax(format!("number out of range: {raw}")))
}
