use strum::EnumIs;
use thiserror::Error;

use crate::intern::TableKind;

/// Structural violation found while decoding export data.
///
/// Every variant is fatal for the current decode.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum FormatError {
    #[error("unexpected end of export data at byte {offset}")]
    UnexpectedEof { offset: usize },

    #[error("unexpected escape sequence in export data at byte {offset}")]
    BadEscape { offset: usize },

    #[error("varint overflows a 64-bit integer at byte {offset}")]
    VarintOverflow { offset: usize },

    #[error("exported integer too large: {0}")]
    IntegerTooLarge(i64),

    #[error("incorrect marker: got {got:?}; want {want:?} (pos = {offset})")]
    BadMarker { got: char, want: char, offset: usize },

    #[error("incorrect position: got {got}; want {want}")]
    BadMarkerPosition { got: i64, want: usize },

    #[error("unknown export format version {version} ({text:?})")]
    UnknownVersion { version: i64, text: String },

    #[error("{table} index {index} out of range (table has {len} entries)")]
    IndexOutOfRange {
        table: TableKind,
        index: i64,
        len: usize,
    },

    #[error("{table} entry {index} is referenced before it is complete")]
    IncompleteEntry { table: TableKind, index: usize },

    #[error("string of length {len} exceeds the {remaining} remaining bytes")]
    LengthOutOfRange { len: u64, remaining: usize },

    #[error("unexpected {context} tag {tag}")]
    UnexpectedTag { context: &'static str, tag: i64 },

    #[error("empty package name in import")]
    EmptyPackageName,

    #[error("package path {path:?} for pkg index {index}")]
    BadPackagePath { path: String, index: usize },

    #[error("conflicting names {existing} and {name} for package {path:?}")]
    ConflictingNames {
        existing: String,
        name: String,
        path: String,
    },

    #[error("pkg = {pkg}, name = {name} does not denote a named type")]
    NotANamedType { pkg: String, name: String },

    #[error("named base type expected for embedded field")]
    EmbeddedNotNamed,

    #[error("unexpected embedded interface")]
    EmbeddedInterface,

    #[error("unexpected channel dir {0}")]
    BadChanDir(i64),

    #[error("expected named parameter")]
    UnnamedParameter,

    #[error("variadic type outside of a parameter list")]
    StrayVariadic,

    #[error("file name prefix {len} exceeds previous file name {previous:?}")]
    BadFilePrefix { len: i64, previous: String },

    #[error("float exponent {0} out of range")]
    ExponentOutOfRange(i64),

    #[error("type nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),

    #[error("export data of {len} bytes exceeds the limit of {max} bytes")]
    InputTooLarge { len: usize, max: usize },

    #[error("inconsistent import:\n\t{new}\npreviously imported as:\n\t{old}")]
    InconsistentImport { new: String, old: String },

    #[error("got {got} objects; want {want}")]
    ObjectCountMismatch { got: usize, want: i64 },

    #[error(transparent)]
    Types(#[from] gotypes::TypesError),
}

pub type FormatResult<T> = Result<T, FormatError>;

/// The error reported by [`import_data`](crate::import_data).
///
/// Wraps the first [`FormatError`] encountered; no package is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot import, possibly version skew ({source}) - reinstall package")]
pub struct ImportError {
    #[source]
    pub source: FormatError,
}

impl From<FormatError> for ImportError {
    fn from(source: FormatError) -> Self {
        Self { source }
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
