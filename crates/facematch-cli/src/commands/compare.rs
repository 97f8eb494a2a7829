use std::any::Any;
use std::path::Path;
use std::process::ExitCode;

use facematch_config::ResolvedConfig;
use facematch_core::runner::{self, ComparisonConfig, ComparisonOutcome};

use crate::cli::{CompareArgs, OutputMode};
use crate::commands::CommandHandler;
use crate::config::{self, build_comparison_config};
use crate::errors::AppResult;
use crate::output::{print_progress, render_comparison};

type ConfigLoader = dyn Fn(Option<&Path>) -> AppResult<ResolvedConfig> + Send + Sync;
type ComparisonRunner = dyn Fn(&ComparisonConfig, &mut dyn FnMut(&str)) -> AppResult<ComparisonOutcome> + Send + Sync;
type ComparisonRenderer = dyn Fn(&ComparisonOutcome, OutputMode) -> AppResult<()> + Send + Sync;

pub struct CompareHandler {
    args: CompareArgs,
    load_config: Box<ConfigLoader>,
    run: Box<ComparisonRunner>,
    render: Box<ComparisonRenderer>,
}

impl CompareHandler {
    pub fn new(args: CompareArgs) -> Self {
        Self::with_dependencies(
            args,
            config::load_resolved_config,
            runner::run_comparison_blocking,
            render_comparison,
        )
    }

    pub fn with_dependencies(
        args: CompareArgs,
        load_config: impl Fn(Option<&Path>) -> AppResult<ResolvedConfig> + Send + Sync + 'static,
        run: impl Fn(&ComparisonConfig, &mut dyn FnMut(&str)) -> AppResult<ComparisonOutcome> + Send + Sync + 'static,
        render: impl Fn(&ComparisonOutcome, OutputMode) -> AppResult<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            args,
            load_config: Box::new(load_config),
            run: Box::new(run),
            render: Box::new(render),
        }
    }
}

impl CommandHandler for CompareHandler {
    fn execute(&self, mode: OutputMode, config_path: Option<&Path>) -> AppResult<ExitCode> {
        let defaults = (self.load_config)(config_path)?;
        let config = build_comparison_config(&self.args, &defaults);
        tracing::debug!(
            source = %config.source.display(),
            target = %config.target.display(),
            threshold = config.similarity_threshold,
            "starting comparison"
        );
        let mut progress = |line: &str| print_progress(line, mode);
        let outcome = (self.run)(&config, &mut progress)?;
        (self.render)(&outcome, mode)?;
        Ok(ExitCode::SUCCESS)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
