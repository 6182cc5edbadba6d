//! Turning a loaded config into an immutable, validated build plan.

use crate::app::replacements::ReplacementSet;
use crate::domain::action::Action;
use crate::domain::errors::{BuildError, BuildResult};
use crate::domain::model::{BuildMode, Constants, PathSpec};
use crate::infra::config::{Config, PathEntry};

/// Everything a build needs, resolved once for the active mode.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub mode: BuildMode,
    pub constants: Constants,
    pub replacements: ReplacementSet,
    pub paths: Vec<PathSpec>,
}

impl BuildPlan {
    /// Resolve `config` for `mode`.
    ///
    /// With `strict`, an action name outside the catalog is a config error
    /// instead of a skipped step.
    pub fn from_config(config: &Config, mode: BuildMode, strict: bool) -> BuildResult<Self> {
        let replacements = ReplacementSet::build(
            &config.common.replacements,
            &config.mode_section(mode).replacements,
        )?;

        let paths = config
            .paths_for(mode)
            .map(|entry| path_spec(entry, strict))
            .collect::<BuildResult<Vec<_>>>()?;

        Ok(Self {
            mode,
            constants: config.constants.clone(),
            replacements,
            paths,
        })
    }
}

fn path_spec(entry: &PathEntry, strict: bool) -> BuildResult<PathSpec> {
    let mut actions = Vec::with_capacity(entry.actions.len());
    for raw in &entry.actions {
        let action = Action::resolve(&raw.action, raw.options.clone())?;
        if action.is_unknown() {
            if strict {
                return Err(BuildError::Config(format!(
                    "unknown action '{}' for {}",
                    raw.action,
                    entry.source.display()
                )));
            }
            tracing::debug!(action = %raw.action, source = %entry.source.display(), "unknown action will be skipped");
        }
        actions.push(action);
    }

    Ok(PathSpec {
        kind: entry.kind,
        source: entry.source.clone(),
        dest: entry.dest.clone(),
        include: entry.include.clone(),
        actions,
    })
}
