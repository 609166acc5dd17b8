//! Errors surfaced by the visualizer.
//!
//! Drawing and decoding are infallible. What can fail is talking to the
//! terminal and starting the input thread.

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Writing a frame, switching modes or reading the tty failed.
    Io(io::Error),
    /// Interactive mode was requested without a tty on stdin or stdout.
    NotATerminal,
    /// The input reader thread could not be started.
    ThreadSpawn(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal I/O failed: {err}"),
            Self::NotATerminal => f.write_str("stdin and stdout must be a terminal"),
            Self::ThreadSpawn(msg) => write!(f, "failed to spawn input reader: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Io(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
