use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IoError {
    /// File could not be opened or read.
    Read { path: PathBuf, source: std::io::Error },
    /// File could not be created or written.
    Write { path: PathBuf, source: std::io::Error },
    /// Registry export is not the expected JSON shape.
    Json { path: PathBuf, message: String },
    /// Retailer CSV header lacks a configured column.
    MissingColumn { path: PathBuf, column: String },
    /// Retailer CSV row that cannot be parsed. Aborts the load.
    MalformedRow { path: PathBuf, line: u64, message: String },
    /// Configured CSV delimiter is not a single-byte character.
    Delimiter(char),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Write { path, source } => write!(f, "cannot write {}: {source}", path.display()),
            Self::Json { path, message } => write!(f, "{}: {message}", path.display()),
            Self::MissingColumn { path, column } => {
                write!(f, "{}: missing column '{column}'", path.display())
            }
            Self::MalformedRow { path, line, message } => {
                write!(f, "file {}, line {line}: {message}", path.display())
            }
            Self::Delimiter(c) => write!(f, "delimiter '{c}' is not a single-byte character"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}
