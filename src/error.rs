//! Module for the error management
use crate::objects::ObjectType;
use thiserror::Error;

/// Reason a single record could not be turned into an entity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A required column is absent (or empty for non-string fields)
    #[error("Expected required field {0}")]
    MissingField(String),
    /// The raw text could not be coerced to the field's type
    #[error("Expected {expected} for field {field}, found {value}")]
    InvalidValue {
        /// Column name
        field: String,
        /// Raw text of the field
        value: String,
        /// Human readable description of the expected type
        expected: &'static str,
    },
    /// A `YYYYMMDD` date is malformed
    #[error("Invalid date {value} for field {field}: {reason}")]
    InvalidDate {
        /// Column name
        field: String,
        /// Raw text of the field
        value: String,
        /// Why the date was rejected
        reason: &'static str,
    },
    /// A numeric or date value is outside its declared bounds
    #[error("Value {value} for field {field} is out of range, expected {bound}")]
    ValueRange {
        /// Column name
        field: String,
        /// Raw text of the field
        value: String,
        /// The violated bound, e.g. `0..=7` or `> 0`
        bound: String,
    },
    /// The record references an identifier that is not loaded
    #[error("No {object_type} with id {id} found")]
    Reference {
        /// Table the identifier was looked up in
        object_type: ObjectType,
        /// The unresolved identifier
        id: String,
    },
}

/// Coarse classification of an [Error]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The feed location cannot be stat'ed or opened
    SourceUnavailable,
    /// A required file is not in the feed
    RequiredFileMissing,
    /// Missing required field, wrong type or malformed token
    MalformedRecord,
    /// Numeric or date value out of its declared bounds
    ValueRange,
    /// A foreign identifier is not in its table
    ReferentialIntegrity,
    /// Reading an entry of the feed failed midway
    Io,
}

/// An error that can occur when processing GTFS data.
#[derive(Error, Debug)]
pub enum Error {
    /// The given path or reader could not be opened as a directory or an archive
    #[error("Could not read GTFS at {path}")]
    SourceUnavailable {
        /// The path given by the caller
        path: String,
        /// The underlying failure
        #[source]
        source: std::io::Error,
    },
    /// A mandatory file is not present in the feed
    #[error("Could not open required file {0}")]
    RequiredFileMissing(String),
    /// A record of a file failed validation or reference resolution
    #[error("{file_name}:{line} - {kind}")]
    Record {
        /// File containing the record
        file_name: String,
        /// 1-based line of the record, the header being line 1
        line: u64,
        /// What went wrong
        kind: RecordError,
    },
    /// An identifier looked up in a loaded feed is not known
    #[error("The {object_type} id {id} is not known")]
    ReferenceError {
        /// Table the identifier was looked up in
        object_type: ObjectType,
        /// The unknown identifier
        id: String,
    },
    /// The tokenizer could not read a row
    #[error("impossible to read csv file '{file_name}' at line {line}")]
    Csv {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// Line at which reading failed
        line: u64,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
    },
    /// Impossible to read a file
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The inital error that caused the unability to read the file
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Error when trying to unzip an entry of the GTFS archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

impl RecordError {
    /// Classification of this record error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::MissingField(_)
            | RecordError::InvalidValue { .. }
            | RecordError::InvalidDate { .. } => ErrorKind::MalformedRecord,
            RecordError::ValueRange { .. } => ErrorKind::ValueRange,
            RecordError::Reference { .. } => ErrorKind::ReferentialIntegrity,
        }
    }
}

impl Error {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            Error::RequiredFileMissing(_) => ErrorKind::RequiredFileMissing,
            Error::Record { kind, .. } => kind.kind(),
            Error::ReferenceError { .. } => ErrorKind::ReferentialIntegrity,
            Error::Csv { .. } => ErrorKind::MalformedRecord,
            Error::NamedFileIO { .. } | Error::Zip(_) => ErrorKind::Io,
        }
    }

    /// File and line of a record-level error
    pub fn location(&self) -> Option<(&str, u64)> {
        match self {
            Error::Record {
                file_name, line, ..
            }
            | Error::Csv {
                file_name, line, ..
            } => Some((file_name.as_str(), *line)),
            _ => None,
        }
    }
}
