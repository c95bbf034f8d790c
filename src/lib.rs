pub mod cli;
pub mod github;
pub mod load_config;

pub use cli::{run, AuthCommand, Cli, Commands};
