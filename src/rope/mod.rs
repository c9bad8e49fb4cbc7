mod balance;
mod error;
mod node;
mod rope;
mod traversal;


pub use self::error::RopeError;
pub use self::rope::{Rope, DEFAULT_LEAF_SIZE};
pub use self::traversal::{Chars, Chunks};
