use std::borrow::Cow;
use std::fmt::Display;

/// Error types used throughout the `elf_inspect` library.
/// These errors represent the failure conditions that can occur while
/// reading, validating and resolving ELF32 structures. Every error is
/// returned to the caller; the library never terminates the process and
/// never retries an operation.
#[derive(Debug)]
pub enum Error {
    /// The requested thing does not exist: the target file when opening,
    /// or a section with the requested name when resolving.
    NotFound {
        /// What was looked up and missed.
        what: Cow<'static, str>,
    },

    /// An OS-level read or seek failure that is not a missing file and
    /// not a truncation.
    IoError {
        /// A descriptive message about the I/O error.
        msg: Cow<'static, str>,
    },

    /// The file ended before a requested range could be read in full.
    ///
    /// Partial reads are never treated as success; either the whole
    /// range is read or this error is returned.
    TooShort {
        /// Number of bytes requested.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },

    /// The first four bytes are not the ELF signature `0x7F 'E' 'L' 'F'`.
    ///
    /// All further parsing of the file is undefined once this fails.
    InvalidMagic {
        /// The bytes actually found at the start of the file.
        found: [u8; 4],
    },

    /// The class byte `e_ident[EI_CLASS]` is outside the recognized range.
    InvalidClass {
        /// The raw class byte.
        class: u8,
    },

    /// The data-encoding byte `e_ident[EI_DATA]` is neither little- nor
    /// big-endian.
    InvalidEncoding {
        /// The raw encoding byte.
        encoding: u8,
    },

    /// The section header table is inconsistent with the file header or
    /// with the file itself.
    ///
    /// Covers zero section counts, undersized `e_shentsize`, a non-zero
    /// reserved entry 0, a string-table index past the table, sections
    /// overrunning the end of the file, and name bytes that are not
    /// valid UTF-8.
    MalformedTable {
        /// A descriptive message about the inconsistency.
        msg: Cow<'static, str>,
    },

    /// A section index at or past the number of sections.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of entries in the section table.
        count: usize,
    },

    /// A name offset outside the string table, or a name that runs to
    /// the end of the table without a NUL terminator.
    NameOffsetOutOfRange {
        /// The requested offset into the string table.
        offset: usize,
        /// The length of the string table in bytes.
        len: usize,
    },

    /// A query was issued against an inspector with no open session.
    NotOpen,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound { what } => write!(f, "not found: {what}"),
            Error::IoError { msg } => write!(f, "I/O error: {msg}"),
            Error::TooShort { expected, actual } => {
                write!(f, "file too short: needed {expected} bytes, got {actual}")
            }
            Error::InvalidMagic { found } => {
                write!(f, "invalid ELF magic: {found:02x?}")
            }
            Error::InvalidClass { class } => write!(f, "invalid ELF class: {class}"),
            Error::InvalidEncoding { encoding } => {
                write!(f, "invalid ELF data encoding: {encoding}")
            }
            Error::MalformedTable { msg } => write!(f, "malformed section table: {msg}"),
            Error::IndexOutOfRange { index, count } => {
                write!(f, "section index {index} out of range (table has {count} entries)")
            }
            Error::NameOffsetOutOfRange { offset, len } => {
                write!(f, "name offset {offset} out of range (string table is {len} bytes)")
            }
            Error::NotOpen => write!(f, "no file is open"),
        }
    }
}

impl std::error::Error for Error {}

/// Creates an I/O error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn io_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::IoError { msg: msg.into() }
}

/// Creates a malformed-table error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn malformed_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::MalformedTable { msg: msg.into() }
}

/// Creates a not-found error for the specified file or section.
#[cold]
#[inline(never)]
pub(crate) fn not_found_error(what: impl Into<Cow<'static, str>>) -> Error {
    Error::NotFound { what: what.into() }
}
