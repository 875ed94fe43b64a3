pub mod args;
pub mod commands;

pub use args::{Cli, Commands, FeedArgs};
pub use commands::run;
