use crate::model::script::Position;

/// The argument list of a command or test.
///
/// Control commands and combinator tests carry their operands in `tests`;
/// action commands only ever use `positional`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub positional: Vec<Argument>,
    pub tests: Option<TestList>,
}

impl Arguments {
    pub fn new(positional: Vec<Argument>, tests: Option<TestList>) -> Self {
        Self { positional, tests }
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.tests.is_none()
    }

    /// Number of tests attached, zero when there is no test list.
    pub fn test_count(&self) -> usize {
        self.tests.as_ref().map_or(0, TestList::len)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A single string is stored as a one-element list.
    StringList(Vec<String>),
    /// A number with its K/M/G quantifier applied.
    Number(u64),
    /// A `:tag`, lowercased.
    Tag(String),
}

impl Argument {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::StringList(_) => "string-list",
            Self::Number(_) => "number",
            Self::Tag(_) => "tag",
        }
    }
}

/// A named predicate invocation, e.g. `header :is "From" "a@b"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Test {
    pub name: String,
    pub arguments: Arguments,
    pub position: Position,
}

impl Test {
    pub fn new(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            name: name.into(),
            arguments,
            position: Position::default(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestList(pub Vec<Test>);

impl TestList {
    pub fn iter(&self) -> std::slice::Iter<'_, Test> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a TestList {
    type Item = &'a Test;
    type IntoIter = std::slice::Iter<'a, Test>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
