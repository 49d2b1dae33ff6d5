//! Crate-wide error type.
//!
//! Assertion failures are never errors; they go to a [`Reporter`](crate::Reporter).
//! These variants cover the diagnostic plumbing around a failure.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read source file `{}`", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line} is out of range for `{}`", path.display())]
    LineOutOfRange { path: PathBuf, line: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
