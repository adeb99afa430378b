use std::{error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The expression does not have six or seven fields.
    FieldCount(usize),
    /// A field could not be parsed.
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::FieldCount(count) => {
                write!(f, "Invalid cron expression: expected 6 or 7 fields, found {}", count)
            }
            ErrorKind::Expression(msg) => write!(f, "Invalid cron expression: {}", msg),
        }
    }
}

impl error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error { kind }
    }
}
