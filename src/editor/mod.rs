mod command;
mod editor;

pub use self::command::{Command, CommandError};
pub use self::editor::Editor;
