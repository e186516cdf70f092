use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of the compiler. Most problems in the TML error taxonomy
/// (unknown names, type mismatches, unreadable includes, ...) are not
/// fatal: they are logged at `warn`/`info` and the offending directive is
/// skipped. This enum only covers the handful of cases that leave the
/// compiler with nothing to compile at all.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("could not read model file {path:?}: {source}")]
    RootFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CompileError>;
