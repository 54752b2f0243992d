use crate::fault::TransportError;

/// Failures surfaced to callers of the WinRM client.
///
/// The variants are the routing contract for callers: a retry loop keys on
/// [`WinRmError::OperationTimeout`] to re-issue a long-poll request, while
/// every other variant reports a genuine failure.
#[derive(Debug, thiserror::Error)]
pub enum WinRmError {
    /// Generic WinRM protocol failure.
    #[error("{0}")]
    Protocol(String),

    /// Unexpected HTTP response from the remote endpoint.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A WinRM-level operation timeout, not a connection-level one. The
    /// server reports that a long-running operation produced no output
    /// within the negotiated window; callers retry transparently while
    /// waiting for output from a long-running command.
    #[error("operation timed out on the server and should be retried")]
    OperationTimeout,

    /// Authentication failure.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
}

impl WinRmError {
    /// HTTP-style status code associated with the failure.
    pub fn code(&self) -> u16 {
        match self {
            Self::Protocol(_) | Self::OperationTimeout => 500,
            Self::Transport(error) => error.status_code,
            Self::Authentication(error) => error.code(),
        }
    }

    /// Whether a retry loop may re-issue the failed request as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OperationTimeout)
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Basic authentication is not enabled on the remote host")]
    BasicAuthDisabled,

    #[error("the specified credentials were rejected by the server")]
    InvalidCredentials,
}

impl AuthenticationError {
    pub fn code(&self) -> u16 {
        match self {
            Self::BasicAuthDisabled | Self::InvalidCredentials => 401,
        }
    }
}
