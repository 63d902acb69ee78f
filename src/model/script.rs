use std::fmt;

use crate::model::arguments::Arguments;

/// Line and column (both 1-based) of a token in the script source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// An ordered command sequence: a script body or a block body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Commands(pub Vec<Command>);

impl Commands {
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Commands {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One command invocation, e.g. `fileinto "Junk";` or `if ... { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub arguments: Arguments,
    /// Present only on block-taking commands (`if`, `elsif`, `else`).
    pub block: Option<Block>,
    pub position: Position,
}

impl Command {
    pub fn new(name: impl Into<String>, arguments: Arguments, block: Option<Block>) -> Self {
        Self {
            name: name.into(),
            arguments,
            block,
            position: Position::default(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub body: Commands,
}

impl Block {
    pub fn new(body: Commands) -> Self {
        Self { body }
    }
}
