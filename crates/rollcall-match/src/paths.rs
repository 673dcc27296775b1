use crate::error::{MatchError, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const PARTIAL_SUFFIX: &str = ".partial";

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Rejects an output path that would overwrite one of the inputs.
pub fn check_output_path(output: &Path, inputs: &[&Path]) -> Result<PathBuf> {
    let target = canonicalize_path(output)?;
    for input in inputs {
        if !input.exists() {
            continue;
        }
        let source = fs::canonicalize(input)?;
        if source == target || is_same_file_identity(&target, &source)? {
            return Err(MatchError::InvalidOutputPath(output.to_path_buf()));
        }
    }
    Ok(target)
}

/// Sibling path the output is written to before it is renamed into place.
pub fn partial_path(target: &Path) -> Result<PathBuf> {
    let file_name = target
        .file_name()
        .ok_or_else(|| MatchError::InvalidOutputPath(target.to_path_buf()))?;
    let mut partial = OsString::from(".");
    partial.push(file_name);
    partial.push(PARTIAL_SUFFIX);
    Ok(target.with_file_name(partial))
}

fn canonicalize_path(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(fs::canonicalize(path)?);
    }
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let parent = fs::canonicalize(parent)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| MatchError::InvalidOutputPath(path.to_path_buf()))?;
    Ok(parent.join(file_name))
}

#[cfg(unix)]
fn is_same_file_identity(target: &Path, source: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;
    if !target.exists() || !source.exists() {
        return Ok(false);
    }
    let target_meta = fs::metadata(target)?;
    let source_meta = fs::metadata(source)?;
    Ok(target_meta.dev() == source_meta.dev() && target_meta.ino() == source_meta.ino())
}

#[cfg(not(unix))]
fn is_same_file_identity(_target: &Path, _source: &Path) -> Result<bool> {
    Ok(false)
}
