use std::any::Any;
use std::path::Path;
use std::process::ExitCode;

use crate::cli::{Commands, OutputMode};
use crate::errors::AppResult;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, mode: OutputMode, config_path: Option<&Path>) -> AppResult<ExitCode>;
    fn as_any(&self) -> &dyn Any;
}

mod compare;
mod detect;

pub use compare::CompareHandler;
pub use detect::DetectHandler;

impl From<Commands> for Box<dyn CommandHandler> {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Compare(args) => Box::new(CompareHandler::new(args)),
            Commands::Detect(args) => Box::new(DetectHandler::new(args)),
        }
    }
}
