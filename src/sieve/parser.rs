/// Recursive descent SIEVE parser (RFC 3028 §8.2).
///
/// Produces the generic parse tree in [`parse_tree`](crate::sieve::parse_tree).
/// The parser knows nothing about individual commands or tests; it only
/// checks the grammar. Comments are dropped here.
use crate::error::SieveError;
use crate::model::script::Position;
use crate::sieve::lexer::{tokenize, Span, Token};
use crate::sieve::parse_tree::Node;

/// Blocks and tests nested deeper than this are rejected.
pub const MAX_NESTING: usize = 256;

pub fn parse(input: &str) -> Result<Node, SieveError> {
    let spans: Vec<Span> = tokenize(input)?
        .into_iter()
        .filter(|s| !s.token.is_comment())
        .collect();
    let mut pos = 0;

    let commands = parse_commands(&spans, &mut pos, 0)?;
    if let Some(span) = spans.get(pos) {
        return Err(unexpected(span, "a command"));
    }

    Ok(Node::Start(vec![commands]))
}

fn parse_commands(tokens: &[Span], pos: &mut usize, depth: usize) -> Result<Node, SieveError> {
    let mut commands = Vec::new();
    while let Some(span) = tokens.get(*pos) {
        if span.token == Token::RBrace {
            break;
        }
        commands.push(parse_command(tokens, pos, depth)?);
    }
    Ok(Node::Commands(commands))
}

fn parse_command(tokens: &[Span], pos: &mut usize, depth: usize) -> Result<Node, SieveError> {
    let (name, position) = expect_identifier(tokens, pos, "a command")?;
    let mut children = vec![parse_arguments(tokens, pos, depth)?];

    match tokens.get(*pos) {
        Some(Span {
            token: Token::Semicolon,
            ..
        }) => {
            *pos += 1;
        }
        Some(Span {
            token: Token::LBrace,
            ..
        }) => {
            children.push(parse_block(tokens, pos, depth + 1)?);
        }
        Some(span) => return Err(unexpected(span, "';' or '{'")),
        None => return Err(end_of_input("';' or '{'")),
    }

    Ok(Node::Command {
        name,
        position,
        children,
    })
}

fn parse_block(tokens: &[Span], pos: &mut usize, depth: usize) -> Result<Node, SieveError> {
    let open = expect(tokens, pos, Token::LBrace)?;
    check_depth(depth, open)?;
    let commands = parse_commands(tokens, pos, depth)?;
    match tokens.get(*pos) {
        Some(Span {
            token: Token::RBrace,
            ..
        }) => {
            *pos += 1;
            Ok(Node::Block(vec![commands]))
        }
        _ => Err(SieveError::syntax("unclosed block").at(open)),
    }
}

fn parse_arguments(tokens: &[Span], pos: &mut usize, depth: usize) -> Result<Node, SieveError> {
    let mut children = Vec::new();

    // Collect plain arguments
    loop {
        let argument = match tokens.get(*pos).map(|s| &s.token) {
            Some(Token::QuotedString(s)) | Some(Token::MultiLineString(s)) => {
                let node = Node::String(s.clone());
                *pos += 1;
                node
            }
            Some(Token::Number(n)) => {
                let node = Node::Number(n.clone());
                *pos += 1;
                node
            }
            Some(Token::Tag(t)) => {
                let node = Node::Tag(t.clone());
                *pos += 1;
                node
            }
            Some(Token::LBracket) => parse_string_list(tokens, pos)?,
            _ => break,
        };
        children.push(Node::Argument(vec![argument]));
    }

    // Optional trailing test or test list
    match tokens.get(*pos).map(|s| &s.token) {
        Some(Token::Identifier(_)) => children.push(parse_test(tokens, pos, depth + 1)?),
        Some(Token::LParen) => children.push(parse_test_list(tokens, pos, depth + 1)?),
        _ => {}
    }

    Ok(Node::Arguments(children))
}

fn parse_string_list(tokens: &[Span], pos: &mut usize) -> Result<Node, SieveError> {
    expect(tokens, pos, Token::LBracket)?;
    let mut items = Vec::new();
    loop {
        match tokens.get(*pos) {
            Some(Span {
                token: Token::QuotedString(s) | Token::MultiLineString(s),
                ..
            }) => {
                items.push(Node::String(s.clone()));
                *pos += 1;
            }
            Some(span) => return Err(unexpected(span, "a string")),
            None => return Err(end_of_input("a string")),
        }
        match tokens.get(*pos) {
            Some(Span {
                token: Token::Comma,
                ..
            }) => *pos += 1,
            Some(Span {
                token: Token::RBracket,
                ..
            }) => {
                *pos += 1;
                break;
            }
            Some(span) => return Err(unexpected(span, "',' or ']'")),
            None => return Err(end_of_input("',' or ']'")),
        }
    }
    Ok(Node::StringList(items))
}

fn parse_test(tokens: &[Span], pos: &mut usize, depth: usize) -> Result<Node, SieveError> {
    let (name, position) = expect_identifier(tokens, pos, "a test")?;
    check_depth(depth, position)?;
    let arguments = parse_arguments(tokens, pos, depth)?;
    Ok(Node::Test {
        name,
        position,
        children: vec![arguments],
    })
}

fn parse_test_list(tokens: &[Span], pos: &mut usize, depth: usize) -> Result<Node, SieveError> {
    let open = expect(tokens, pos, Token::LParen)?;
    check_depth(depth, open)?;
    let mut tests = Vec::new();
    loop {
        tests.push(parse_test(tokens, pos, depth)?);
        match tokens.get(*pos) {
            Some(Span {
                token: Token::Comma,
                ..
            }) => *pos += 1,
            Some(Span {
                token: Token::RParen,
                ..
            }) => {
                *pos += 1;
                break;
            }
            Some(span) => return Err(unexpected(span, "',' or ')'")),
            None => return Err(end_of_input("',' or ')'")),
        }
    }
    Ok(Node::TestList(tests))
}

fn expect_identifier(
    tokens: &[Span],
    pos: &mut usize,
    what: &str,
) -> Result<(String, Position), SieveError> {
    match tokens.get(*pos) {
        Some(Span {
            token: Token::Identifier(name),
            position,
            ..
        }) => {
            *pos += 1;
            Ok((name.clone(), *position))
        }
        Some(span) => Err(unexpected(span, what)),
        None => Err(end_of_input(what)),
    }
}

fn expect(tokens: &[Span], pos: &mut usize, token: Token) -> Result<Position, SieveError> {
    match tokens.get(*pos) {
        Some(span) if span.token == token => {
            *pos += 1;
            Ok(span.position)
        }
        Some(span) => Err(unexpected(span, &token.describe())),
        None => Err(end_of_input(&token.describe())),
    }
}

fn check_depth(depth: usize, position: Position) -> Result<(), SieveError> {
    if depth > MAX_NESTING {
        return Err(SieveError::syntax("nesting too deep").at(position));
    }
    Ok(())
}

fn unexpected(span: &Span, expected: &str) -> SieveError {
    SieveError::syntax(format!("expected {expected}, found {}", span.token.describe()))
        .at(span.position)
}

fn end_of_input(expected: &str) -> SieveError {
    SieveError::syntax(format!("expected {expected}, found end of input"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(tree: &Node) -> &[Node] {
        match tree {
            Node::Start(children) => children[0].children(),
            other => panic!("Expected start node, got {}", other.kind()),
        }
    }

    #[test]
    fn test_parse_empty() {
        let tree = parse("").unwrap();
        assert!(commands(&tree).is_empty());
    }

    #[test]
    fn test_parse_require() {
        let tree = parse("require \"fileinto\";").unwrap();
        let cmds = commands(&tree);
        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            Node::Command { name, children, .. } => {
                assert_eq!(name, "require");
                assert_eq!(children.len(), 1);
                let args = children[0].children();
                assert_eq!(args, &[Node::Argument(vec![Node::String("\"fileinto\"".into())])]);
            }
            other => panic!("Expected command, got {}", other.kind()),
        }
    }

    #[test]
    fn test_parse_require_list() {
        let tree = parse("require [\"fileinto\", \"reject\"];").unwrap();
        let args = commands(&tree)[0].children()[0].children();
        match &args[0] {
            Node::Argument(inner) => match &inner[0] {
                Node::StringList(items) => assert_eq!(items.len(), 2),
                other => panic!("Expected string-list, got {}", other.kind()),
            },
            other => panic!("Expected argument, got {}", other.kind()),
        }
    }

    #[test]
    fn test_parse_if_with_block() {
        let input = r#"
# Filter: Move spam
if header :contains "Subject" "SPAM" {
    fileinto "Junk";
    stop;
}
"#;
        let tree = parse(input).unwrap();
        let cmds = commands(&tree);
        assert_eq!(cmds.len(), 1);
        let Node::Command {
            name,
            position,
            children,
        } = &cmds[0]
        else {
            panic!("Expected command");
        };
        assert_eq!(name, "if");
        assert_eq!(*position, Position { line: 3, column: 1 });
        assert_eq!(children.len(), 2);
        assert!(matches!(&children[0].children()[0], Node::Test { name, .. } if name == "header"));
        assert!(matches!(&children[1], Node::Block(body) if body[0].children().len() == 2));
    }

    #[test]
    fn test_parse_allof_test_list() {
        let input = r#"
if allof (header :is "From" "boss@example.com", header :contains "Subject" "urgent") {
    fileinto "Important";
}
"#;
        let tree = parse(input).unwrap();
        let if_args = commands(&tree)[0].children()[0].children();
        let Node::Test { name, children, .. } = &if_args[0] else {
            panic!("Expected test");
        };
        assert_eq!(name, "allof");
        assert!(matches!(&children[0].children()[0], Node::TestList(tests) if tests.len() == 2));
    }

    #[test]
    fn test_parse_not_nests_a_test() {
        let tree = parse("if not exists \"X-Spam\" { keep; }").unwrap();
        let if_args = commands(&tree)[0].children()[0].children();
        let Node::Test { name, children, .. } = &if_args[0] else {
            panic!("Expected test");
        };
        assert_eq!(name, "not");
        assert!(matches!(&children[0].children()[0], Node::Test { name, .. } if name == "exists"));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("keep").unwrap_err();
        assert!(err.is_syntax());
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn test_stray_closing_brace() {
        let err = parse("keep; }").unwrap_err();
        assert_eq!(err.position(), Some(Position { line: 1, column: 7 }));
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse("if true {\n keep;").unwrap_err();
        assert!(err.to_string().contains("unclosed block"));
        assert_eq!(err.position(), Some(Position { line: 1, column: 9 }));
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!("if {}true {{ keep; }}", "not ".repeat(MAX_NESTING - 1));
        assert!(parse(&at_limit).is_ok());

        let too_deep = format!("if {}true {{ keep; }}", "not ".repeat(MAX_NESTING));
        let err = parse(&too_deep).unwrap_err();
        assert!(err.to_string().contains("nesting too deep"));
        let column = 4 + 4 * MAX_NESTING;
        assert_eq!(err.position(), Some(Position { line: 1, column }));

        let blocks = format!("{}keep;{}", "if true {".repeat(MAX_NESTING + 1), "}".repeat(MAX_NESTING + 1));
        assert!(parse(&blocks).unwrap_err().is_syntax());
    }

    #[test]
    fn test_empty_string_list_is_rejected() {
        assert!(parse("fileinto [];").is_err());
    }
}
