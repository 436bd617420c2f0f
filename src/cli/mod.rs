pub mod config;
pub mod types;

pub use types::{Cli, Commands, GenerateArgs, GenerateSettings, VerifyArgs};
