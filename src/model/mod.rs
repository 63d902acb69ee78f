pub mod action;
pub mod arguments;
pub mod enums;
pub mod script;

pub use action::Action;
pub use arguments::{Argument, Arguments, Test, TestList};
pub use script::{Block, Command, Commands, Position};
