//! Closed catalog of action kinds and their validated options.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::{BuildError, BuildResult};
use crate::domain::model::Replacement;

pub const COMPILE_STYLESHEET: &str = "compile-stylesheet";
pub const OPTIMIZE_VECTOR_IMAGE: &str = "optimize-vector-image";
pub const MINIFY_MARKUP: &str = "minify-markup";
pub const LITERAL_REPLACE: &str = "literal-replace";
pub const INSERT_INTO_TEMPLATE: &str = "insert-into-template";
pub const COMPILE_MARKDOWN: &str = "compile-markdown";
pub const RENAME_OUTPUT_EXTENSION: &str = "rename-output-extension";
pub const HIGHLIGHT_EMBEDDED_CODE: &str = "highlight-embedded-code";

/// A transform step, resolved from its wire name once at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CompileStylesheet(StylesheetOptions),
    OptimizeVectorImage,
    MinifyMarkup(MinifyOptions),
    LiteralReplace(LiteralReplaceOptions),
    InsertIntoTemplate(TemplateOptions),
    CompileMarkdown(MarkdownOptions),
    RenameOutputExtension(RenameOptions),
    HighlightEmbeddedCode,
    /// Name not in the catalog. Skipped at execution time.
    Unknown { name: String },
}

impl Action {
    /// Resolve a wire action name and its raw options.
    pub fn resolve(name: &str, options: Option<Value>) -> BuildResult<Self> {
        let options = match options {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value,
        };

        let action = match name {
            COMPILE_STYLESHEET => Action::CompileStylesheet(parse_options(name, options)?),
            OPTIMIZE_VECTOR_IMAGE => {
                parse_options::<NoOptions>(name, options)?;
                Action::OptimizeVectorImage
            }
            MINIFY_MARKUP => Action::MinifyMarkup(parse_options(name, options)?),
            LITERAL_REPLACE => Action::LiteralReplace(parse_options(name, options)?),
            INSERT_INTO_TEMPLATE => Action::InsertIntoTemplate(parse_options(name, options)?),
            COMPILE_MARKDOWN => Action::CompileMarkdown(parse_options(name, options)?),
            RENAME_OUTPUT_EXTENSION => {
                Action::RenameOutputExtension(parse_options(name, options)?)
            }
            HIGHLIGHT_EMBEDDED_CODE => {
                parse_options::<NoOptions>(name, options)?;
                Action::HighlightEmbeddedCode
            }
            other => Action::Unknown {
                name: other.to_owned(),
            },
        };
        Ok(action)
    }

    pub fn name(&self) -> &str {
        match self {
            Action::CompileStylesheet(_) => COMPILE_STYLESHEET,
            Action::OptimizeVectorImage => OPTIMIZE_VECTOR_IMAGE,
            Action::MinifyMarkup(_) => MINIFY_MARKUP,
            Action::LiteralReplace(_) => LITERAL_REPLACE,
            Action::InsertIntoTemplate(_) => INSERT_INTO_TEMPLATE,
            Action::CompileMarkdown(_) => COMPILE_MARKDOWN,
            Action::RenameOutputExtension(_) => RENAME_OUTPUT_EXTENSION,
            Action::HighlightEmbeddedCode => HIGHLIGHT_EMBEDDED_CODE,
            Action::Unknown { name } => name,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Action::Unknown { .. })
    }
}

fn parse_options<T: DeserializeOwned>(name: &str, options: Value) -> BuildResult<T> {
    serde_json::from_value(options)
        .map_err(|err| BuildError::Config(format!("invalid options for action '{name}': {err}")))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoOptions {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylesheetStyle {
    Expanded,
    Compressed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StylesheetOptions {
    #[serde(default, alias = "sourceMap")]
    pub source_map: bool,
    /// Overrides the mode-derived output style.
    #[serde(default)]
    pub style: Option<StylesheetStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinifyOptions {
    #[serde(default)]
    pub keep_comments: bool,
    #[serde(default)]
    pub keep_closing_tags: bool,
    #[serde(default = "MinifyOptions::default_minify_css")]
    pub minify_css: bool,
    #[serde(default)]
    pub minify_js: bool,
}

impl MinifyOptions {
    fn default_minify_css() -> bool {
        true
    }
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            keep_comments: false,
            keep_closing_tags: false,
            minify_css: Self::default_minify_css(),
            minify_js: false,
        }
    }
}

/// Extra substitutions applied after the build-wide replacement set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiteralReplaceOptions {
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    /// Rewrite every match of each entry instead of the leftmost one.
    #[serde(default)]
    pub all_occurrences: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateOptions {
    pub template: PathBuf,
    /// Falls back to the build-wide template marker.
    #[serde(default)]
    pub marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkdownOptions {
    #[serde(default = "enabled")]
    pub tables: bool,
    #[serde(default = "enabled")]
    pub footnotes: bool,
    #[serde(default = "enabled")]
    pub strikethrough: bool,
    #[serde(default = "enabled")]
    pub tasklists: bool,
    #[serde(default)]
    pub smart_punctuation: bool,
    #[serde(default)]
    pub heading_attributes: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            smart_punctuation: false,
            heading_attributes: false,
        }
    }
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenameOptions {
    /// Falls back to the build-wide stylesheet extension.
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default = "RenameOptions::default_to")]
    pub to: String,
}

impl RenameOptions {
    fn default_to() -> String {
        ".css".into()
    }
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            from: None,
            to: Self::default_to(),
        }
    }
}
