//! Error types that can be emitted from this library

use derive_more::Display;
use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`serde_json::Error`]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// file does not start with the ToC magic number
    #[error("file is not a ToC archive, found magic {found:#010x}")]
    #[diagnostic(help("ToC files start with 0xF0000011"))]
    FormatMismatch {
        /// The value found where the magic number was expected
        found: u32,
    },

    /// ran out of data while reading {field}
    #[error("ran out of data while reading {field}")]
    TruncatedInput {
        /// The part of the file being read when the failure happened
        field: Field,
        /// The underlying read or seek failure
        #[source]
        source: binrw::Error,
    },

    /// two records share the same file id
    #[error("duplicate file id {file_id:#018x} at record {index} of {count}")]
    DuplicateFileId {
        /// The repeated file id
        file_id: u64,
        /// Position in the record table of the second occurrence
        index: u32,
        /// Number of records the header declared
        count: u32,
    },

    /// the number of records does not match the declared count
    #[error("header declares {declared} records but {found} were given")]
    RecordCountMismatch {
        /// Number of records the header declared
        declared: u32,
        /// Number of records present
        found: usize,
    },
}

/// Identifies what was being read when a [`Error::TruncatedInput`] happened
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    /// The magic number
    #[display("magic")]
    Magic,

    /// The type count
    #[display("type count")]
    NumTypes,

    /// The file count
    #[display("file count")]
    NumFiles,

    /// The unknown header field
    #[display("unknown header field")]
    Unknown,

    /// The 56 byte reserved block
    #[display("reserved block")]
    ReservedBlock,

    /// The skip over the type description table
    #[display("type table")]
    TypeTable,

    /// The record at this position in the record table
    #[display("record {_0}")]
    Record(u32),
}

impl Error {
    pub(crate) fn truncated(field: Field) -> impl FnOnce(std::io::Error) -> Error {
        move |e| Error::TruncatedInput {
            field,
            source: binrw::Error::Io(e),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
