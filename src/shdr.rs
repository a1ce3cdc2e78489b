//! Section header table loading and section content access.
//!
//! The table is read in one bulk operation of `e_shentsize * e_shnum`
//! bytes at `e_shoff` and then sliced into records. Entries are sliced
//! at the on-disk entry size, never at the in-memory struct size, so
//! vendor-padded tables decode correctly from each entry's 40-byte
//! prefix.

use crate::defs::{SHDR_SIZE, Shdr, ShdrFlags};
use crate::ehdr::ElfHeader;
use crate::{Error, Result, malformed_error, reader};
use core::ops::Deref;
use elf::abi::{SHT_NOBITS, SHT_NULL};
use std::path::Path;

/// One section header entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfShdr {
    shdr: Shdr,
}

impl Deref for ElfShdr {
    type Target = Shdr;

    fn deref(&self) -> &Self::Target {
        &self.shdr
    }
}

impl ElfShdr {
    /// Decodes one entry from its 40-byte on-disk prefix.
    fn from_bytes(data: &[u8], header: &ElfHeader) -> Self {
        debug_assert!(data.len() >= SHDR_SIZE);
        let encoding = header.encoding();
        Self {
            shdr: Shdr {
                sh_name: encoding.read_u32(data, 0),
                sh_type: encoding.read_u32(data, 4),
                sh_flags: encoding.read_u32(data, 8),
                sh_addr: encoding.read_u32(data, 12),
                sh_offset: encoding.read_u32(data, 16),
                sh_size: encoding.read_u32(data, 20),
                sh_link: encoding.read_u32(data, 24),
                sh_info: encoding.read_u32(data, 28),
                sh_addralign: encoding.read_u32(data, 32),
                sh_entsize: encoding.read_u32(data, 36),
            },
        }
    }

    /// Offset of this section's name in the string table.
    #[inline]
    pub fn name_offset(&self) -> usize {
        self.shdr.sh_name as usize
    }

    /// Section type.
    #[inline]
    pub fn section_type(&self) -> u32 {
        self.shdr.sh_type
    }

    /// Section attribute flags.
    #[inline]
    pub fn flags(&self) -> ShdrFlags {
        ShdrFlags::from_bits_retain(self.shdr.sh_flags)
    }

    /// Virtual address of the section in memory.
    #[inline]
    pub fn addr(&self) -> u32 {
        self.shdr.sh_addr
    }

    /// Offset of the section contents in the file.
    #[inline]
    pub fn offset(&self) -> usize {
        self.shdr.sh_offset as usize
    }

    /// Size of the section contents in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.shdr.sh_size as usize
    }

    /// Cross-reference to another section.
    #[inline]
    pub fn link(&self) -> u32 {
        self.shdr.sh_link
    }

    /// Extra type-dependent information.
    #[inline]
    pub fn info(&self) -> u32 {
        self.shdr.sh_info
    }

    /// Required address alignment.
    #[inline]
    pub fn addralign(&self) -> u32 {
        self.shdr.sh_addralign
    }

    /// Fixed entry size, 0 if the section is not a table.
    #[inline]
    pub fn entsize(&self) -> u32 {
        self.shdr.sh_entsize
    }

    /// Returns true for the reserved null section type.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.shdr.sh_type == SHT_NULL
    }

    /// Returns true if the section occupies no space in the file.
    #[inline]
    pub fn is_nobits(&self) -> bool {
        self.shdr.sh_type == SHT_NOBITS
    }

    fn is_zeroed(&self) -> bool {
        self.shdr == ZERO_SHDR
    }

    /// Reads this section's contents from the file.
    ///
    /// Exactly `sh_size` bytes are read starting at `sh_offset`. A
    /// NOBITS section has no file-backed data; it yields an empty
    /// buffer without touching the file.
    pub fn read_contents(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        if self.is_nobits() {
            return Ok(Vec::new());
        }
        reader::read_at(path.as_ref(), self.shdr.sh_offset as u64, self.size())
    }
}

const ZERO_SHDR: Shdr = Shdr {
    sh_name: 0,
    sh_type: 0,
    sh_flags: 0,
    sh_addr: 0,
    sh_offset: 0,
    sh_size: 0,
    sh_link: 0,
    sh_info: 0,
    sh_addralign: 0,
    sh_entsize: 0,
};

/// The ordered section header table of one file.
#[derive(Debug)]
pub struct SectionTable {
    shdrs: Vec<ElfShdr>,
}

impl SectionTable {
    /// Loads the section header table described by `header`.
    ///
    /// The header counts and sizes are validated first, then the whole
    /// table is read in one operation and sliced. Entry 0 must be the
    /// reserved all-zero null section, and every section with
    /// file-backed contents must lie inside the file.
    pub fn load(path: impl AsRef<Path>, header: &ElfHeader) -> Result<Self> {
        let path = path.as_ref();
        let data = reader::read_at(
            path,
            header.e_shoff() as u64,
            table_byte_len(header)?,
        )?;
        let table = Self::parse_entries(&data, header)?;
        table.validate_bounds(reader::file_size(path)?)?;
        #[cfg(feature = "log")]
        log::trace!(
            "loaded {} section headers from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Slices a bulk table read into decoded entries.
    pub(crate) fn parse_entries(data: &[u8], header: &ElfHeader) -> Result<Self> {
        let entsize = header.e_shentsize();
        let shdrs: Vec<ElfShdr> = data
            .chunks_exact(entsize)
            .map(|entry| ElfShdr::from_bytes(entry, header))
            .collect();
        debug_assert_eq!(shdrs.len(), header.e_shnum());

        match shdrs.first() {
            Some(first) if first.is_zeroed() => {}
            Some(_) => return Err(malformed_error("reserved entry 0 is not null")),
            None => return Err(malformed_error("section table has no entries")),
        }
        Ok(Self { shdrs })
    }

    /// Checks that every file-backed section lies inside the file.
    pub(crate) fn validate_bounds(&self, file_len: u64) -> Result<()> {
        for (index, shdr) in self.shdrs.iter().enumerate() {
            if shdr.is_nobits() {
                continue;
            }
            let end = shdr.sh_offset as u64 + shdr.sh_size as u64;
            if end > file_len {
                return Err(malformed_error(format!(
                    "section {index} ends at {end:#x}, past the end of the file ({file_len:#x} bytes)"
                )));
            }
        }
        Ok(())
    }

    /// Gets the section header at `index`, bounds-checked.
    pub fn get(&self, index: usize) -> Result<&ElfShdr> {
        self.shdrs.get(index).ok_or(Error::IndexOutOfRange {
            index,
            count: self.shdrs.len(),
        })
    }

    /// Number of entries, including the reserved null entry.
    #[inline]
    pub fn len(&self) -> usize {
        self.shdrs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shdrs.is_empty()
    }

    /// Iterates the entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = &ElfShdr> {
        self.shdrs.iter()
    }
}

/// Validates the header's table geometry and returns the byte length of
/// the table on disk.
fn table_byte_len(header: &ElfHeader) -> Result<usize> {
    if header.e_shnum() == 0 {
        return Err(malformed_error("header reports no section headers"));
    }
    if header.e_shentsize() < SHDR_SIZE {
        return Err(malformed_error(format!(
            "section header entry size {} is below the ELF32 size {SHDR_SIZE}",
            header.e_shentsize()
        )));
    }
    if header.e_shstrndx() >= header.e_shnum() {
        return Err(malformed_error(format!(
            "string table index {} is past the last section ({})",
            header.e_shstrndx(),
            header.e_shnum() - 1
        )));
    }
    Ok(header.e_shentsize() * header.e_shnum())
}
