//! Domain models for path specs, output records, and build settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::action::Action;

/// Which mode-specific config section is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    Debug,
    #[default]
    Release,
}

impl BuildMode {
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug {
            BuildMode::Debug
        } else {
            BuildMode::Release
        }
    }

    pub fn is_debug(self) -> bool {
        self == BuildMode::Debug
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }
}

/// Build-wide constants read once from config and passed to every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constants {
    #[serde(
        default = "Constants::default_stylesheet_extension",
        alias = "sass_file_extension"
    )]
    pub stylesheet_extension: String,
    #[serde(default = "Constants::default_template_marker")]
    pub template_marker: String,
}

impl Constants {
    fn default_stylesheet_extension() -> String {
        ".scss".into()
    }

    fn default_template_marker() -> String {
        "{{content}}".into()
    }
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            stylesheet_extension: Self::default_stylesheet_extension(),
            template_marker: Self::default_template_marker(),
        }
    }
}

/// A single literal substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

impl Replacement {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathKind {
    File,
    Directory,
}

/// Declares one source location, where it lands, and what happens on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    pub kind: PathKind,
    pub source: PathBuf,
    pub dest: PathBuf,
    pub include: Vec<String>,
    pub actions: Vec<Action>,
}

/// A concrete (source, destination) pair produced by path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// One pending output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub dest: PathBuf,
    pub contents: String,
    pub source_path: Option<PathBuf>,
}

impl OutputRecord {
    pub fn new(dest: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            contents: contents.into(),
            source_path: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source_path = Some(source.into());
        self
    }
}

/// Non-empty, append-only list of output records for one source file.
///
/// The first record is the primary output. Records can be appended or have
/// their `dest` / `contents` rewritten, but never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecords {
    records: Vec<OutputRecord>,
}

impl OutputRecords {
    pub fn new(primary: OutputRecord) -> Self {
        Self {
            records: vec![primary],
        }
    }

    pub fn primary(&self) -> &OutputRecord {
        &self.records[0]
    }

    pub fn primary_mut(&mut self) -> &mut OutputRecord {
        &mut self.records[0]
    }

    /// Replace the primary record's contents.
    pub fn with_primary_contents(mut self, contents: String) -> Self {
        self.primary_mut().contents = contents;
        self
    }

    /// Append a side artifact.
    pub fn with_record(mut self, record: OutputRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutputRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, OutputRecord> {
        self.records.iter_mut()
    }

    pub fn dests(&self) -> Vec<&Path> {
        self.records.iter().map(|r| r.dest.as_path()).collect()
    }
}

impl<'a> IntoIterator for &'a OutputRecords {
    type Item = &'a OutputRecord;
    type IntoIter = std::slice::Iter<'a, OutputRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Byte range of one embedded code block's content inside markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSegment {
    pub language: Option<String>,
    pub start: usize,
    pub end: usize,
}
