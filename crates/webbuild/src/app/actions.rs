//! Transform implementations for each action kind.
//!
//! Every transform takes the record list by value and returns the next one,
//! so a pipeline is a plain fold over its actions.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::codeblock;
use crate::app::replacements::{Occurrences, ReplacementSet};
use crate::domain::action::{
    self, Action, LiteralReplaceOptions, MarkdownOptions, MinifyOptions, RenameOptions,
    StylesheetOptions, StylesheetStyle, TemplateOptions,
};
use crate::domain::errors::{BuildError, BuildResult};
use crate::domain::model::{BuildMode, Constants, OutputRecord, OutputRecords};
use crate::infra::highlight::Highlighter;
use crate::infra::{markdown, minify, stylesheet, svg};

const SOURCE_MAP_SUFFIX: &str = ".map";

/// Suffixes of side artifacts that follow the primary's extension.
const SIDE_ARTIFACT_SUFFIXES: &[&str] = &[SOURCE_MAP_SUFFIX];

/// Read-only build state shared with every action.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub replacements: &'a ReplacementSet,
    pub constants: &'a Constants,
    pub mode: BuildMode,
    pub highlighter: &'a Highlighter,
}

/// Run one action over `records`.
pub fn apply(
    action: &Action,
    records: OutputRecords,
    ctx: &ActionContext<'_>,
) -> BuildResult<OutputRecords> {
    match action {
        Action::CompileStylesheet(options) => compile_stylesheet(records, options, ctx),
        Action::OptimizeVectorImage => optimize_vector_image(records),
        Action::MinifyMarkup(options) => minify_markup(records, options, ctx),
        Action::LiteralReplace(options) => Ok(literal_replace(records, options, ctx)),
        Action::InsertIntoTemplate(options) => insert_into_template(records, options, ctx),
        Action::CompileMarkdown(options) => Ok(compile_markdown(records, options)),
        Action::RenameOutputExtension(options) => rename_output_extension(records, options, ctx),
        Action::HighlightEmbeddedCode => highlight_embedded_code(records, ctx),
        Action::Unknown { name } => {
            warn_skipped(name, &subject(&records));
            Ok(records)
        }
    }
}

/// Log an action name outside the catalog that is being passed over.
pub fn warn_skipped(name: &str, file: &Path) {
    tracing::warn!(action = %name, file = %file.display(), "skipping unknown action");
}

/// Path used in diagnostics: the source when known, else the primary dest.
fn subject(records: &OutputRecords) -> PathBuf {
    let primary = records.primary();
    primary
        .source_path
        .clone()
        .unwrap_or_else(|| primary.dest.clone())
}

fn compile_stylesheet(
    records: OutputRecords,
    options: &StylesheetOptions,
    ctx: &ActionContext<'_>,
) -> BuildResult<OutputRecords> {
    let primary = records.primary();
    let style = options.style.unwrap_or(match ctx.mode {
        BuildMode::Debug => StylesheetStyle::Expanded,
        BuildMode::Release => StylesheetStyle::Compressed,
    });
    let load_path = primary
        .source_path
        .as_deref()
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty());

    let css = stylesheet::compile_scss(&primary.contents, load_path, style).map_err(|message| {
        BuildError::action(action::COMPILE_STYLESHEET, subject(&records), message)
    })?;

    let map = if options.source_map {
        let file = primary
            .dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = subject(&records).display().to_string();
        let contents = stylesheet::source_map(&file, &source, &primary.contents).map_err(|err| {
            BuildError::action(action::COMPILE_STYLESHEET, subject(&records), err)
        })?;
        Some(OutputRecord::new(with_suffix(&primary.dest, SOURCE_MAP_SUFFIX), contents))
    } else {
        None
    };

    let records = records.with_primary_contents(css);
    Ok(match map {
        Some(map) => records.with_record(map),
        None => records,
    })
}

fn optimize_vector_image(records: OutputRecords) -> BuildResult<OutputRecords> {
    let optimized = svg::optimize_svg(&records.primary().contents).map_err(|err| {
        BuildError::action(action::OPTIMIZE_VECTOR_IMAGE, subject(&records), err)
    })?;
    Ok(records.with_primary_contents(optimized))
}

fn minify_markup(
    records: OutputRecords,
    options: &MinifyOptions,
    ctx: &ActionContext<'_>,
) -> BuildResult<OutputRecords> {
    if ctx.mode.is_debug() {
        tracing::debug!(file = %subject(&records).display(), "debug build, markup left unminified");
        return Ok(records);
    }
    let minified = minify::minify_markup(&records.primary().contents, options);
    Ok(records.with_primary_contents(minified))
}

fn literal_replace(
    records: OutputRecords,
    options: &LiteralReplaceOptions,
    ctx: &ActionContext<'_>,
) -> OutputRecords {
    let occurrences = if options.all_occurrences {
        Occurrences::All
    } else {
        Occurrences::First
    };
    let replaced = ctx.replacements.apply_with(
        &records.primary().contents,
        &options.replacements,
        occurrences,
    );
    records.with_primary_contents(replaced)
}

fn insert_into_template(
    records: OutputRecords,
    options: &TemplateOptions,
    ctx: &ActionContext<'_>,
) -> BuildResult<OutputRecords> {
    let marker = options
        .marker
        .as_deref()
        .unwrap_or(&ctx.constants.template_marker);
    if marker.is_empty() {
        return Err(BuildError::action(
            action::INSERT_INTO_TEMPLATE,
            subject(&records),
            "template marker is empty",
        ));
    }

    let template = fs::read_to_string(&options.template).map_err(|err| {
        BuildError::action(
            action::INSERT_INTO_TEMPLATE,
            subject(&records),
            format!("failed to read template {}: {err}", options.template.display()),
        )
    })?;
    if !template.contains(marker) {
        tracing::warn!(
            template = %options.template.display(),
            marker,
            "template does not contain the content marker"
        );
    }

    let rendered = template.replace(marker, &records.primary().contents);
    Ok(records.with_primary_contents(rendered))
}

fn compile_markdown(records: OutputRecords, options: &MarkdownOptions) -> OutputRecords {
    let html = markdown::render_markdown(&records.primary().contents, options);
    records.with_primary_contents(html)
}

fn rename_output_extension(
    mut records: OutputRecords,
    options: &RenameOptions,
    ctx: &ActionContext<'_>,
) -> BuildResult<OutputRecords> {
    let from = options
        .from
        .as_deref()
        .unwrap_or(&ctx.constants.stylesheet_extension);
    if from.is_empty() {
        return Err(BuildError::action(
            action::RENAME_OUTPUT_EXTENSION,
            subject(&records),
            "suffix to replace is empty",
        ));
    }

    for (index, record) in records.iter_mut().enumerate() {
        let Some(renamed) = renamed_dest(&record.dest, from, &options.to) else {
            continue;
        };
        tracing::trace!(from = %record.dest.display(), to = %renamed.display(), "renamed output");
        record.dest = renamed;
        if index > 0 {
            retarget_side_artifact(record)?;
        }
    }
    Ok(records)
}

/// Keep a renamed source map's `file` field in step with its new name.
fn retarget_side_artifact(record: &mut OutputRecord) -> BuildResult<()> {
    let Some(target) = record
        .dest
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(SOURCE_MAP_SUFFIX))
    else {
        return Ok(());
    };
    record.contents = stylesheet::retarget_source_map(&record.contents, target)
        .map_err(|err| BuildError::action(action::RENAME_OUTPUT_EXTENSION, &record.dest, err))?;
    Ok(())
}

/// `dest` with a trailing `from` swapped for `to`.
///
/// A side artifact such as `site.scss.map` keeps its own suffix and has the
/// `from` part before it replaced.
fn renamed_dest(dest: &Path, from: &str, to: &str) -> Option<PathBuf> {
    let dest = dest.to_str()?;
    if let Some(stem) = dest.strip_suffix(from) {
        return Some(PathBuf::from(format!("{stem}{to}")));
    }
    SIDE_ARTIFACT_SUFFIXES.iter().find_map(|suffix| {
        let stem = dest.strip_suffix(suffix)?.strip_suffix(from)?;
        Some(PathBuf::from(format!("{stem}{to}{suffix}")))
    })
}

fn highlight_embedded_code(
    records: OutputRecords,
    ctx: &ActionContext<'_>,
) -> BuildResult<OutputRecords> {
    let text = &records.primary().contents;
    let segments = codeblock::locate_code_blocks(text).map_err(|err| {
        BuildError::action(action::HIGHLIGHT_EMBEDDED_CODE, subject(&records), err)
    })?;
    if segments.is_empty() {
        return Ok(records);
    }

    let highlighted = codeblock::splice(text, &segments, |segment, raw| {
        let code = html_escape::decode_html_entities(raw);
        let result = match segment.language.as_deref() {
            Some(language) => ctx.highlighter.highlight_language(&code, language),
            None => ctx.highlighter.highlight_auto(&code),
        }?;
        tracing::trace!(language = %result.language, mode = ?result.mode, "highlighted code block");
        Ok::<_, syntect::Error>(result.html)
    })
    .map_err(|err| BuildError::action(action::HIGHLIGHT_EMBEDDED_CODE, subject(&records), err))?;

    Ok(records.with_primary_contents(highlighted))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}
