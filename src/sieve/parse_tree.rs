/// Typed parse tree produced by the parser and consumed by
/// [`transform`](crate::sieve::transform::transform).
///
/// The tree mirrors the RFC 3028 grammar one node per production. It is
/// loose: shape rules (one block per command, no tests inside an
/// argument, ...) are checked by the transform, not by the type system.
use crate::model::script::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Root; holds a single `Commands`.
    Start(Vec<Node>),
    Commands(Vec<Node>),
    /// Holds an `Arguments` and, for block-taking commands, a `Block`.
    Command {
        name: String,
        position: Position,
        children: Vec<Node>,
    },
    /// Holds a single `Commands`.
    Block(Vec<Node>),
    /// `Argument` nodes optionally followed by a `Test` or `TestList`.
    Arguments(Vec<Node>),
    /// A `StringList`, `String`, `Number` or `Tag`.
    Argument(Vec<Node>),
    /// Holds an `Arguments`.
    Test {
        name: String,
        position: Position,
        children: Vec<Node>,
    },
    TestList(Vec<Node>),
    StringList(Vec<Node>),
    /// Literal as written, including its delimiters (`"..."` or `text: ... .`).
    String(String),
    /// Number as written, including any K/M/G quantifier.
    Number(String),
    Tag(String),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::Commands(_) => "commands",
            Self::Command { .. } => "command",
            Self::Block(_) => "block",
            Self::Arguments(_) => "arguments",
            Self::Argument(_) => "argument",
            Self::Test { .. } => "test",
            Self::TestList(_) => "test-list",
            Self::StringList(_) => "string-list",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Tag(_) => "tag",
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Self::Start(children)
            | Self::Commands(children)
            | Self::Block(children)
            | Self::Arguments(children)
            | Self::Argument(children)
            | Self::TestList(children)
            | Self::StringList(children)
            | Self::Command { children, .. }
            | Self::Test { children, .. } => children,
            Self::String(_) | Self::Number(_) | Self::Tag(_) => &[],
        }
    }

}
