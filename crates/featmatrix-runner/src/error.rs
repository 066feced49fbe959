use std::io;

use thiserror::Error;

/// Errors raised while driving the matrix.
///
/// A build that exits non-zero is not an error here; it is a recorded
/// outcome (see [`Status`](crate::Status)).
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write progress output: {0}")]
    Output(#[from] io::Error),
}
