//! Positioned reads of byte ranges from a file path.
//!
//! Every read in this module is scoped: the file is opened read-only,
//! the requested range is read in full, and the descriptor is released
//! before the call returns, on success and on every error path. No
//! descriptor outlives a function call.

use crate::{Error, Result, io_error, not_found_error};
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// Opens `path` read-only, mapping a missing file to [`Error::NotFound`].
fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            not_found_error(format!("file {}", path.display()))
        } else {
            io_error(format!("open {}: {err}", path.display()))
        }
    })
}

/// Returns the length of the file at `path` in bytes.
pub(crate) fn file_size(path: &Path) -> Result<u64> {
    let file = open(path)?;
    let metadata = file
        .metadata()
        .map_err(|err| io_error(format!("stat {}: {err}", path.display())))?;
    Ok(metadata.len())
}

/// Reads exactly `length` bytes starting at `offset`.
///
/// Either the full buffer is populated or an error is returned; a range
/// that extends past the end of the file fails with [`Error::TooShort`]
/// before any bytes are consumed.
pub(crate) fn read_at(path: &Path, offset: u64, length: usize) -> Result<Vec<u8>> {
    let mut file = open(path)?;
    let total = file
        .metadata()
        .map_err(|err| io_error(format!("stat {}: {err}", path.display())))?
        .len();
    let end = offset.checked_add(length as u64).ok_or(Error::TooShort {
        expected: length,
        actual: 0,
    })?;
    if end > total {
        return Err(Error::TooShort {
            expected: length,
            actual: total.saturating_sub(offset) as usize,
        });
    }

    file.seek(SeekFrom::Start(offset))
        .map_err(|err| io_error(format!("seek {}: {err}", path.display())))?;
    let mut buf = vec![0u8; length];
    file.read_exact(&mut buf).map_err(|err| match err.kind() {
        // The range was validated above; hitting EOF anyway means the
        // file shrank between the two calls.
        ErrorKind::UnexpectedEof => Error::TooShort {
            expected: length,
            actual: 0,
        },
        _ => io_error(format!("read {}: {err}", path.display())),
    })?;

    #[cfg(feature = "log")]
    log::trace!(
        "read {} bytes at offset {:#x} from {}",
        length,
        offset,
        path.display()
    );
    Ok(buf)
}
