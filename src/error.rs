use std::io;
use thiserror::Error;

/// Errors from the surface lifecycle.
#[derive(Error, Debug)]
pub enum Error {
    #[error("surface is already initialized")]
    AlreadyInitialized,

    #[error("surface is not initialized")]
    NotInitialized,

    #[error("surface has been shut down")]
    ShutDown,

    #[error("terminal mode unavailable: {0}")]
    TerminalModeUnavailable(#[source] io::Error),

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
