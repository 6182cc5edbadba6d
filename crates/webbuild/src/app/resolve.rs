//! Expanding path specs into concrete (source, destination) file pairs.

use std::io;
use std::path::{Component, Path};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::domain::errors::{BuildError, BuildResult};
use crate::domain::model::{PathKind, PathSpec, ResolvedFile};

/// Every file `spec` produces, in lexical source order.
///
/// Destination directories are not created here.
pub fn resolve(spec: &PathSpec, build_root: &Path) -> BuildResult<Vec<ResolvedFile>> {
    ensure_relative(&spec.dest)?;
    let dest_root = build_root.join(&spec.dest);

    match spec.kind {
        PathKind::File => {
            if !spec.source.is_file() {
                return Err(not_found_or_wrong_kind(&spec.source, "file"));
            }
            Ok(vec![ResolvedFile {
                source: spec.source.clone(),
                dest: dest_root,
            }])
        }
        PathKind::Directory => {
            if !spec.source.is_dir() {
                return Err(not_found_or_wrong_kind(&spec.source, "directory"));
            }
            let include = build_include_matcher(&spec.include)?;
            let mut files = Vec::new();

            // Every file counts, hidden or ignored by VCS rules included.
            let mut builder = WalkBuilder::new(&spec.source);
            builder.standard_filters(false).follow_links(true);

            for result in builder.build() {
                let entry = result.map_err(|err| walk_error(&spec.source, err))?;
                if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                    continue;
                }
                let relative = entry
                    .path()
                    .strip_prefix(&spec.source)
                    .unwrap_or(entry.path());
                if include.as_ref().is_some_and(|set| !set.is_match(relative)) {
                    continue;
                }
                files.push(ResolvedFile {
                    source: entry.path().to_path_buf(),
                    dest: dest_root.join(relative),
                });
            }

            files.sort_by(|a, b| a.source.cmp(&b.source));
            Ok(files)
        }
    }
}

fn ensure_relative(dest: &Path) -> BuildResult<()> {
    let escapes = dest
        .components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_) | Component::ParentDir));
    if escapes {
        return Err(BuildError::Config(format!(
            "destination {} must stay inside the build root",
            dest.display()
        )));
    }
    Ok(())
}

fn not_found_or_wrong_kind(source: &Path, expected: &str) -> BuildError {
    if source.exists() {
        BuildError::Config(format!(
            "{} is declared as a {expected} but is not one",
            source.display()
        ))
    } else {
        BuildError::SourceNotFound(source.to_path_buf())
    }
}

fn build_include_matcher(patterns: &[String]) -> BuildResult<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|err| BuildError::Config(format!("invalid include glob '{pattern}': {err}")))?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|err| BuildError::Config(format!("failed to build include matcher: {err}")))?;
    Ok(Some(set))
}

fn walk_error(root: &Path, err: ignore::Error) -> BuildError {
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message));
    BuildError::io(root, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn spec(kind: PathKind, source: &Path, dest: &str, include: &[&str]) -> PathSpec {
        PathSpec {
            kind,
            source: source.to_path_buf(),
            dest: PathBuf::from(dest),
            include: include.iter().map(|s| s.to_string()).collect(),
            actions: Vec::new(),
        }
    }

    #[test]
    fn file_spec_maps_to_build_root() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let source = temp.path().join("index.html");
        fs::write(&source, "<p/>")?;

        let files = resolve(
            &spec(PathKind::File, &source, "site/index.html", &[]),
            Path::new("build"),
        )?;
        assert_eq!(
            files,
            vec![ResolvedFile {
                source,
                dest: PathBuf::from("build/site/index.html"),
            }]
        );
        Ok(())
    }

    #[test]
    fn directory_spec_is_recursive_and_sorted() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path().join("img");
        fs::create_dir_all(root.join("icons/small"))?;
        fs::write(root.join("z.png"), b"z")?;
        fs::write(root.join("a.svg"), b"a")?;
        fs::write(root.join("icons/small/x.svg"), b"x")?;
        fs::write(root.join(".hidden"), b"h")?;

        let files = resolve(&spec(PathKind::Directory, &root, "images", &[]), Path::new("out"))?;
        let dests: Vec<_> = files.iter().map(|f| f.dest.clone()).collect();
        assert_eq!(
            dests,
            vec![
                PathBuf::from("out/images/.hidden"),
                PathBuf::from("out/images/a.svg"),
                PathBuf::from("out/images/icons/small/x.svg"),
                PathBuf::from("out/images/z.png"),
            ]
        );
        assert!(!Path::new("out/images").exists());
        Ok(())
    }

    #[test]
    fn include_globs_filter_directory_entries() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path().join("styles");
        fs::create_dir_all(root.join("parts"))?;
        fs::write(root.join("site.scss"), "")?;
        fs::write(root.join("parts/nav.scss"), "")?;
        fs::write(root.join("README.md"), "")?;

        let files = resolve(
            &spec(PathKind::Directory, &root, "css", &["**/*.scss", "*.scss"]),
            Path::new("out"),
        )?;
        let sources: Vec<_> = files
            .iter()
            .map(|f| f.source.strip_prefix(&root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            sources,
            vec![PathBuf::from("parts/nav.scss"), PathBuf::from("site.scss")]
        );
        Ok(())
    }

    #[test]
    fn missing_sources_are_reported() {
        let err = resolve(
            &spec(PathKind::Directory, Path::new("no/such/dir"), "x", &[]),
            Path::new("out"),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::SourceNotFound(_)));

        let err = resolve(
            &spec(PathKind::File, Path::new("no/such/file.txt"), "x", &[]),
            Path::new("out"),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::SourceNotFound(_)));
    }

    #[test]
    fn kind_mismatch_is_a_config_error() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let err = resolve(&spec(PathKind::File, temp.path(), "x", &[]), Path::new("out"))
            .unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
        Ok(())
    }

    #[test]
    fn destinations_cannot_escape_build_root() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let source = temp.path().join("a.txt");
        fs::write(&source, "")?;
        let err = resolve(&spec(PathKind::File, &source, "../a.txt", &[]), Path::new("out"))
            .unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
        Ok(())
    }
}
