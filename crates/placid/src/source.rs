//! Source excerpts around a failing call site.
//!
//! Purely diagnostic: callers treat any error here as "no excerpt" and still
//! report the failure.

use crate::error::{Error, Result};
use std::panic::Location;
use std::path::{Path, PathBuf};

/// A few numbered lines of a source file around one focus line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    pub file_name: String,
    pub focus: usize,
    pub lines: Vec<(usize, String)>,
}

/// Read the lines around `location`, with `context` lines on each side.
pub fn excerpt(location: &Location<'_>, context: usize) -> Result<Excerpt> {
    let path = resolve(location.file());
    let text = std::fs::read_to_string(&path).map_err(|source| Error::SourceUnreadable {
        path: path.clone(),
        source,
    })?;
    excerpt_from(&text, &path, location.line() as usize, context)
}

/// Cut an excerpt out of already-loaded source text. `line` is 1-based.
pub fn excerpt_from(text: &str, path: &Path, line: usize, context: usize) -> Result<Excerpt> {
    let lines: Vec<&str> = text.lines().collect();
    if line == 0 || line > lines.len() {
        return Err(Error::LineOutOfRange {
            path: path.to_path_buf(),
            line,
        });
    }

    let start = line.saturating_sub(context).max(1);
    let end = (line + context).min(lines.len());
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Excerpt {
        file_name,
        focus: line,
        lines: (start..=end)
            .map(|n| (n, lines[n - 1].replace('\t', "  ")))
            .collect(),
    })
}

/// Caller locations are relative to wherever rustc was invoked (usually the
/// workspace root) while tests run from the package directory, so walk up
/// from the working directory until the path resolves.
fn resolve(file: &str) -> PathBuf {
    let candidate = PathBuf::from(file);
    if candidate.is_absolute() || candidate.is_file() {
        return candidate;
    }
    if let Ok(cwd) = std::env::current_dir() {
        for dir in cwd.ancestors() {
            let joined = dir.join(&candidate);
            if joined.is_file() {
                return joined;
            }
        }
    }
    candidate
}
