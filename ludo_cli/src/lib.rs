mod command;
mod config;
mod session;
pub use command::*;
pub use config::*;
pub use session::*;
