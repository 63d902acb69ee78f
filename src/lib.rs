//! Interpreter for RFC 3028 SIEVE mail filters.
//!
//! A script is compiled into a [`Commands`] tree, validated against the
//! [`Registries`], then run against a [`MailAdapter`] to produce the list of
//! [`Action`]s the host should apply.
//!
//! ```no_run
//! use sievers_interp::{Interpreter, MessageMail};
//!
//! let mail = MessageMail::parse(b"Subject: cheap pills\r\n\r\nbuy now\r\n")?;
//! let outcome = Interpreter::default().interpret(
//!     "require \"fileinto\";\nif header :contains \"subject\" \"pills\" { fileinto \"Junk\"; }",
//!     &mail,
//! )?;
//! assert_eq!(outcome.actions.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod commands;
pub mod comparators;
pub mod conditions;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod interpreter;
pub mod mail;
pub mod model;
pub mod registry;
pub mod sieve;
pub mod store;
pub mod telemetry;

pub use config::{ConfigError, RegistryConfig};
pub use dispatch::{apply_all, ActionDispatcher, LoggingDispatcher};
pub use error::{LookupFailure, LookupKind, SieveError};
pub use interpreter::context::{ExecutionContext, Flow};
pub use interpreter::{Failure, Interpreter, Outcome};
pub use mail::{MailAdapter, MailError, MessageMail};
pub use model::{Action, Argument, Arguments, Block, Command, Commands, Position, Test, TestList};
pub use registry::{
    CommandManager, ComparatorManager, DuplicatePolicy, Registries, Registry, RegistryError,
    TestManager,
};
