//! Per-file action pipeline.

use std::path::Path;

use crate::app::actions::{self, ActionContext};
use crate::domain::action::Action;
use crate::domain::errors::BuildResult;
use crate::domain::model::{OutputRecord, OutputRecords};
use crate::infra::fs;

/// What happened to one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No actions; bytes copied as-is.
    Copied,
    /// Actions ran and this many records were written.
    Transformed { records: usize },
}

/// Runs action lists for individual files against shared build state.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    ctx: ActionContext<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(ctx: ActionContext<'a>) -> Self {
        Self { ctx }
    }

    /// Build `source` into `dest` through `actions` and write the results.
    ///
    /// A list with nothing but unknown actions is an identity pipeline, so the
    /// source is copied byte for byte.
    pub fn execute(&self, source: &Path, dest: &Path, actions: &[Action]) -> BuildResult<Outcome> {
        if actions.iter().all(Action::is_unknown) {
            for action in actions {
                actions::warn_skipped(action.name(), source);
            }
            fs::copy_file(source, dest)?;
            tracing::debug!(source = %source.display(), dest = %dest.display(), "copied");
            return Ok(Outcome::Copied);
        }

        let contents = fs::read_source(source)?;
        let seed = OutputRecords::new(OutputRecord::new(dest, contents).with_source(source));
        let records = self.run(seed, actions)?;
        let written = fs::write_records(&records)?;
        tracing::debug!(source = %source.display(), records = written, "transformed");
        Ok(Outcome::Transformed { records: written })
    }

    /// Fold `actions` over `records` in order.
    pub fn run(&self, records: OutputRecords, actions: &[Action]) -> BuildResult<OutputRecords> {
        actions.iter().try_fold(records, |records, action| {
            tracing::trace!(action = action.name(), "applying action");
            actions::apply(action, records, &self.ctx)
        })
    }
}
