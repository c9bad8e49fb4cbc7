pub mod editor;
pub mod rope;
pub mod util;

pub use crate::editor::Editor;
pub use crate::rope::{Rope, RopeError};
