pub mod config;
pub mod escape;
pub mod logging;

pub use self::config::Config;
pub use self::escape::unescape;
