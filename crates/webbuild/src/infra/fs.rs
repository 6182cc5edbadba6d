//! Filesystem access for sources and build output.

use std::fs;
use std::io;
use std::path::Path;

use crate::domain::errors::{BuildError, BuildResult};
use crate::domain::model::OutputRecords;

/// Read a declared source file as UTF-8 text.
pub fn read_source(path: &Path) -> BuildResult<String> {
    fs::read_to_string(path).map_err(|err| source_error(path, err))
}

/// Byte-for-byte copy of `source` to `dest`, creating parent directories.
pub fn copy_file(source: &Path, dest: &Path) -> BuildResult<u64> {
    ensure_parent(dest)?;
    fs::copy(source, dest).map_err(|err| source_error(source, err))
}

/// Write every record verbatim, creating parent directories as needed.
pub fn write_records(records: &OutputRecords) -> BuildResult<usize> {
    for record in records {
        ensure_parent(&record.dest)?;
        fs::write(&record.dest, &record.contents)
            .map_err(|err| BuildError::io(&record.dest, err))?;
        tracing::trace!(dest = %record.dest.display(), bytes = record.contents.len(), "wrote record");
    }
    Ok(records.len())
}

fn ensure_parent(path: &Path) -> BuildResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        // create_dir_all succeeds when the directory already exists.
        fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
    }
    Ok(())
}

fn source_error(path: &Path, err: io::Error) -> BuildError {
    match err.kind() {
        io::ErrorKind::NotFound => BuildError::SourceNotFound(path.to_path_buf()),
        _ => BuildError::io(path, err),
    }
}
