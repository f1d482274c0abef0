use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The retrieval context of an exchange could not be resolved.
    ContextUnavailable,
    /// An exchange failed to render itself.
    RenderFailed,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ContextUnavailable => write!(f, "Context unavailable"),
            ErrorKind::RenderFailed => write!(f, "Render failed"),
            ErrorKind::Other => write!(f, "Other error"),
        }
    }
}

/// Describes a failure reported by an exchange.
///
/// The error is cheap to clone, so a context that failed to resolve once
/// can report the same failure to every later caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
}

impl Error {
    /// Creates a new error with the `ContextUnavailable` kind.
    #[inline]
    pub fn context_unavailable() -> Self {
        Self {
            kind: ErrorKind::ContextUnavailable,
            reason: None,
        }
    }

    /// Creates a new error with the `RenderFailed` kind.
    #[inline]
    pub fn render_failed() -> Self {
        Self {
            kind: ErrorKind::RenderFailed,
            reason: None,
        }
    }

    /// Creates a new error with the `Other` kind.
    #[inline]
    pub fn other() -> Self {
        Self {
            kind: ErrorKind::Other,
            reason: None,
        }
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            kind: self.kind,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {reason}", self.kind),
            None => Display::fmt(&self.kind, f),
        }
    }
}

impl StdError for Error {}
