/// Errors raised while compiling or running a SIEVE script.
use std::fmt;

use crate::mail::MailError;
use crate::model::script::Position;

/// Which registry a failed lookup went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Command,
    Test,
    Comparator,
    Extension,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Test => "test",
            Self::Comparator => "comparator",
            Self::Extension => "extension",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a name could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    /// Nothing is registered under the name.
    NotRegistered,
    /// The name is an extension the script never `require`d.
    NotRequired,
}

#[derive(Debug, thiserror::Error)]
pub enum SieveError {
    #[error("syntax error{}: {message}", at(.position))]
    Syntax {
        message: String,
        position: Option<Position>,
    },
    #[error("{}", lookup_message(.kind, .name, .failure))]
    Lookup {
        kind: LookupKind,
        name: String,
        failure: LookupFailure,
    },
    #[error("command error{}: {message}", at(.position))]
    Command {
        message: String,
        position: Option<Position>,
    },
    #[error("mail access error: {0}")]
    MailAccess(#[from] MailError),
}

impl SieveError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
            position: None,
        }
    }

    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
            position: None,
        }
    }

    pub fn not_registered(kind: LookupKind, name: impl Into<String>) -> Self {
        Self::Lookup {
            kind,
            name: name.into(),
            failure: LookupFailure::NotRegistered,
        }
    }

    pub fn not_required(kind: LookupKind, name: impl Into<String>) -> Self {
        Self::Lookup {
            kind,
            name: name.into(),
            failure: LookupFailure::NotRequired,
        }
    }

    /// Attach a source position unless the error already carries one.
    pub fn at(mut self, at: Position) -> Self {
        match &mut self {
            Self::Syntax { position, .. } | Self::Command { position, .. } => {
                position.get_or_insert(at);
            }
            Self::Lookup { .. } | Self::MailAccess(_) => {}
        }
        self
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Syntax { position, .. } | Self::Command { position, .. } => *position,
            Self::Lookup { .. } | Self::MailAccess(_) => None,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup { .. })
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command { .. })
    }
}

fn at(position: &Option<Position>) -> String {
    match position {
        Some(p) => format!(" at {p}"),
        None => String::new(),
    }
}

fn lookup_message(kind: &LookupKind, name: &str, failure: &LookupFailure) -> String {
    match failure {
        LookupFailure::NotRegistered => format!("unknown {kind} '{name}'"),
        LookupFailure::NotRequired => {
            format!("{kind} '{name}' is an extension and must be declared with require")
        }
    }
}
