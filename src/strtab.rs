//! Section-name string table resolution.
//!
//! Section names are NUL-terminated runs inside the contents of the
//! section at `e_shstrndx`. Resolution re-reads that section from the
//! file rather than holding a long-lived cache, which trades a little
//! I/O for the absence of stale-buffer hazards; an open session may opt
//! into caching with the `strtab-cache` feature, whose cache lives and
//! dies with the session state.

use crate::ehdr::ElfHeader;
use crate::shdr::SectionTable;
use crate::{Error, Result, malformed_error};
use std::path::Path;

/// The raw contents of the section-name string table.
#[derive(Debug)]
pub struct StringTable {
    data: Vec<u8>,
}

impl StringTable {
    /// Loads the full contents of the string-table section named by
    /// `e_shstrndx`.
    pub fn load(
        path: impl AsRef<Path>,
        header: &ElfHeader,
        table: &SectionTable,
    ) -> Result<Self> {
        let shdr = table.get(header.e_shstrndx())?;
        let data = shdr.read_contents(path)?;
        Ok(Self { data })
    }

    /// Resolves `offset` to the NUL-terminated string starting there.
    ///
    /// The scan never runs past the end of the table: an offset outside
    /// the buffer, or a run with no NUL terminator before the buffer
    /// end, fails with [`Error::NameOffsetOutOfRange`].
    pub fn get(&self, offset: usize) -> Result<&str> {
        if offset >= self.data.len() {
            return Err(Error::NameOffsetOutOfRange {
                offset,
                len: self.data.len(),
            });
        }
        let nul = memchr::memchr(0, &self.data[offset..]).ok_or(Error::NameOffsetOutOfRange {
            offset,
            len: self.data.len(),
        })?;
        core::str::from_utf8(&self.data[offset..offset + nul])
            .map_err(|_| malformed_error("section name is not valid UTF-8"))
    }

    /// Length of the table in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Resolves one name offset against the file's string-table section.
///
/// This reads the string-table section for each call, so the returned
/// string is owned and no buffer survives the resolution.
pub fn resolve_name(
    path: impl AsRef<Path>,
    header: &ElfHeader,
    table: &SectionTable,
    name_offset: usize,
) -> Result<String> {
    let strtab = StringTable::load(path, header, table)?;
    Ok(strtab.get(name_offset)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strtab(bytes: &[u8]) -> StringTable {
        StringTable {
            data: bytes.to_vec(),
        }
    }

    #[test]
    fn resolves_nul_terminated_runs() {
        let table = strtab(b"\0.text\0.data\0");
        assert_eq!(table.get(0).unwrap(), "");
        assert_eq!(table.get(1).unwrap(), ".text");
        assert_eq!(table.get(7).unwrap(), ".data");
        // An offset into the middle of a run yields its suffix.
        assert_eq!(table.get(3).unwrap(), "ext");
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        let table = strtab(b"\0.text\0");
        assert!(matches!(
            table.get(7),
            Err(Error::NameOffsetOutOfRange { offset: 7, len: 7 })
        ));
        assert!(matches!(
            table.get(100),
            Err(Error::NameOffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_unterminated_runs() {
        let table = strtab(b"\0.text");
        assert!(matches!(
            table.get(1),
            Err(Error::NameOffsetOutOfRange { offset: 1, len: 6 })
        ));
    }

    #[test]
    fn rejects_non_utf8_names() {
        let table = strtab(b"\0\xff\xfe\0");
        assert!(matches!(
            table.get(1),
            Err(Error::MalformedTable { .. })
        ));
    }
}
