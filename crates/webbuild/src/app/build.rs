//! Whole-build orchestration: config to written output tree.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::app::actions::ActionContext;
use crate::app::pipeline::{Outcome, Pipeline};
use crate::app::plan::BuildPlan;
use crate::app::resolve;
use crate::domain::action::Action;
use crate::domain::errors::BuildResult;
use crate::domain::model::{BuildMode, ResolvedFile};
use crate::infra::config::Config;
use crate::infra::highlight::Highlighter;

/// Inputs of one build invocation.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub output: PathBuf,
    pub config: PathBuf,
    pub mode: BuildMode,
    pub strict: bool,
}

/// Counts reported after a successful build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub files_copied: usize,
    pub files_transformed: usize,
    pub records_written: usize,
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} transformed, {} files written",
            self.files_copied,
            self.files_transformed,
            self.files_copied + self.records_written
        )
    }
}

/// Load the config file and run the build it describes.
pub fn build(options: &BuildOptions) -> BuildResult<BuildSummary> {
    let config = Config::load(&options.config)?;
    let plan = BuildPlan::from_config(&config, options.mode, options.strict)?;
    Builder::new(plan, &options.output).run()
}

/// Executes a [`BuildPlan`] into an output root.
#[derive(Debug)]
pub struct Builder {
    plan: BuildPlan,
    output_root: PathBuf,
    highlighter: Highlighter,
}

impl Builder {
    pub fn new(plan: BuildPlan, output_root: impl AsRef<Path>) -> Self {
        Self {
            plan,
            output_root: output_root.as_ref().to_path_buf(),
            highlighter: Highlighter::new(),
        }
    }

    /// Resolve every path spec, then build files one at a time.
    ///
    /// All sources are resolved before anything is written, so a missing
    /// source aborts the build up front.
    pub fn run(&self) -> BuildResult<BuildSummary> {
        let jobs = self.resolve_jobs()?;
        tracing::info!(
            mode = self.plan.mode.as_str(),
            files = jobs.len(),
            replacements = self.plan.replacements.len(),
            output = %self.output_root.display(),
            "starting build"
        );

        let pipeline = Pipeline::new(ActionContext {
            replacements: &self.plan.replacements,
            constants: &self.plan.constants,
            mode: self.plan.mode,
            highlighter: &self.highlighter,
        });

        let mut summary = BuildSummary::default();
        for (file, actions) in jobs {
            match pipeline.execute(&file.source, &file.dest, actions)? {
                Outcome::Copied => summary.files_copied += 1,
                Outcome::Transformed { records } => {
                    summary.files_transformed += 1;
                    summary.records_written += records;
                }
            }
            tracing::info!(source = %file.source.display(), "built");
        }

        tracing::info!(%summary, "build finished");
        Ok(summary)
    }

    fn resolve_jobs(&self) -> BuildResult<Vec<(ResolvedFile, &[Action])>> {
        let mut jobs = Vec::new();
        for spec in &self.plan.paths {
            for file in resolve::resolve(spec, &self.output_root)? {
                jobs.push((file, spec.actions.as_slice()));
            }
        }
        Ok(jobs)
    }
}
