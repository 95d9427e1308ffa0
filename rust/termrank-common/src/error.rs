use thiserror::Error;

/// Error type shared by all termrank crates.
///
/// Boxes the underlying [`ErrorKind`] to keep `Result<T>` payloads pointer-sized.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }
}

/// The set of failure conditions surfaced by the termrank crates.
///
/// All of these are contract violations detected eagerly at an API boundary;
/// none are transient. Absence of a word or prefix from a corpus is never an
/// error and is reported through ordinary empty/zero results instead.
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
