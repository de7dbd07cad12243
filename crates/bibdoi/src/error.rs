use std::{error, fmt};

pub(crate) type DynError = Box<dyn error::Error + Send + Sync>;

/// Error returned by the bibdoi functions.
///
/// The [`ErrorKind`] tells what failed, the optional message gives the context and the optional
/// source is the underlying error.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// What failed in an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading or writing a file, or talking to the metadata service.
    IO,
    /// A bibliography or a service response could not be parsed.
    Deserialize,
    /// Invalid user supplied configuration, such as a malformed etiquette.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::IO => "IO error",
            Self::Deserialize => "Deserialize error",
            Self::Config => "Configuration error",
        })
    }
}

impl Error {
    /// An error of `kind` described by `message`.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// An error of `kind` caused by `source`.
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// An error of `kind` caused by `source`, with `message` as context.
    pub fn wrap_with<E, S>(kind: ErrorKind, source: E, message: S) -> Self
    where
        E: Into<DynError>,
        S: Into<String>,
    {
        Self {
            message: Some(message.into()),
            ..Self::wrap(kind, source)
        }
    }

    /// What failed.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source.as_deref().map(|e| e as _)
    }
}
