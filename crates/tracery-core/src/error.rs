use std::time::Duration;

/// Errors raised by a [`crate::source::LedgerSource`] while executing a query.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("query result did not arrive within {}s", .timeout.as_secs())]
    Timeout { timeout: Duration },

    #[error("query service error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("invalid query response: {0}")]
    InvalidResponse(String),
}

impl SourceError {
    /// Whether a failed attempt is worth repeating.
    ///
    /// Dropped connections, elapsed result timeouts, and server-side (5xx)
    /// failures are transient. Client-side rejections (4xx) and undecodable
    /// response bodies are permanent: repeating the same query cannot fix
    /// them.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => true,
            Self::Server { status, .. } => *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("credential configuration error: {0}")]
    Credentials(String),

    #[error("unparseable timestamp `{0}`: expected `YYYY-MM-DD HH:MM:SS` or RFC 3339")]
    InvalidTimestamp(String),

    #[error("result table is missing required column `{name}`")]
    MissingColumn { name: &'static str },

    #[error("invalid row {index}: {message}")]
    InvalidRow { index: usize, message: String },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}
