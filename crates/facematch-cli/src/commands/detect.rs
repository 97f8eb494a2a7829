use std::any::Any;
use std::path::Path;
use std::process::ExitCode;

use facematch_config::ResolvedConfig;
use facematch_core::runner::{self, DetectionConfig, DetectionOutcome};

use crate::cli::{DetectArgs, OutputMode};
use crate::commands::CommandHandler;
use crate::config::{self, build_detection_config};
use crate::errors::AppResult;
use crate::output::{print_progress, render_detection};

type ConfigLoader = dyn Fn(Option<&Path>) -> AppResult<ResolvedConfig> + Send + Sync;

pub struct DetectHandler {
    args: DetectArgs,
    load_config: Box<ConfigLoader>,
    run: Box<dyn Fn(&DetectionConfig, &mut dyn FnMut(&str)) -> AppResult<DetectionOutcome> + Send + Sync>,
    render: Box<dyn Fn(&DetectionOutcome, OutputMode) -> AppResult<()> + Send + Sync>,
}

impl DetectHandler {
    pub fn new(args: DetectArgs) -> Self {
        Self::with_dependencies(
            args,
            config::load_resolved_config,
            runner::run_detection_blocking,
            render_detection,
        )
    }

    pub fn with_dependencies(
        args: DetectArgs,
        load_config: impl Fn(Option<&Path>) -> AppResult<ResolvedConfig> + Send + Sync + 'static,
        run: impl Fn(&DetectionConfig, &mut dyn FnMut(&str)) -> AppResult<DetectionOutcome> + Send + Sync + 'static,
        render: impl Fn(&DetectionOutcome, OutputMode) -> AppResult<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            args,
            load_config: Box::new(load_config),
            run: Box::new(run),
            render: Box::new(render),
        }
    }
}

impl CommandHandler for DetectHandler {
    fn execute(&self, mode: OutputMode, config_path: Option<&Path>) -> AppResult<ExitCode> {
        let defaults = (self.load_config)(config_path)?;
        let config = build_detection_config(&self.args, &defaults);
        let mut progress = |line: &str| print_progress(line, mode);
        let outcome = (self.run)(&config, &mut progress)?;
        (self.render)(&outcome, mode)?;
        Ok(ExitCode::SUCCESS)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
