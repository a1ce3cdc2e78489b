//! ELF32 format definitions and utilities.
//!
//! This module provides the core ELF32 data structures and helper
//! definitions used when parsing object files: the fixed on-disk record
//! layouts, the decoded forms of enumerated header fields, and the
//! section flag bits.

use bitflags::bitflags;
use elf::abi::{
    EM_386, EM_68K, EM_AARCH64, EM_ARM, EM_MIPS, EM_PPC, EM_PPC64, EM_RISCV, EM_S390, EM_SPARC,
    EM_X86_64, ET_CORE, ET_DYN, ET_EXEC, ET_NONE, ET_REL,
};

// Not present in the `elf` crate's abi tables.
const EM_LOONGARCH: u16 = 258;

/// Size of the ELF32 file header on disk.
pub(crate) const EHDR_SIZE: usize = 52;
/// Size of an ELF32 section header on disk. Files may carry larger
/// `e_shentsize` values (vendor extensions); never smaller.
pub(crate) const SHDR_SIZE: usize = 40;
/// Length of the identification block at the start of the file header.
pub(crate) const EI_NIDENT: usize = 16;

/// The ELF32 file header record.
///
/// Field layout follows the on-disk format; the record itself is always
/// built by an endian-aware decode, never by casting raw bytes, because
/// the file's own data encoding governs every multi-byte field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ehdr {
    pub e_ident: [u8; EI_NIDENT],
    pub e_type: u16,
    pub e_machine: u16,
    pub e_version: u32,
    pub e_entry: u32,
    pub e_phoff: u32,
    pub e_shoff: u32,
    pub e_flags: u32,
    pub e_ehsize: u16,
    pub e_phentsize: u16,
    pub e_phnum: u16,
    pub e_shentsize: u16,
    pub e_shnum: u16,
    pub e_shstrndx: u16,
}

/// The ELF32 section header record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shdr {
    pub sh_name: u32,
    pub sh_type: u32,
    pub sh_flags: u32,
    pub sh_addr: u32,
    pub sh_offset: u32,
    pub sh_size: u32,
    pub sh_link: u32,
    pub sh_info: u32,
    pub sh_addralign: u32,
    pub sh_entsize: u32,
}

/// File class decoded from `e_ident[EI_CLASS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// 32-bit object.
    Elf32,
    /// 64-bit object.
    Elf64,
}

impl Class {
    /// Decodes the class byte. Returns `None` for values outside the
    /// recognized range.
    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            elf::abi::ELFCLASS32 => Some(Class::Elf32),
            elf::abi::ELFCLASS64 => Some(Class::Elf64),
            _ => None,
        }
    }
}

/// Data encoding decoded from `e_ident[EI_DATA]`.
///
/// The encoding is resolved before any multi-byte header field is
/// interpreted; it selects the byte order of every subsequent integer
/// read from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Two's complement, little endian.
    Little,
    /// Two's complement, big endian.
    Big,
}

impl Encoding {
    /// Decodes the data-encoding byte. Returns `None` for values outside
    /// the recognized range.
    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            elf::abi::ELFDATA2LSB => Some(Encoding::Little),
            elf::abi::ELFDATA2MSB => Some(Encoding::Big),
            _ => None,
        }
    }

    /// Reads a `u16` at `pos` in this byte order.
    #[inline]
    pub(crate) fn read_u16(self, buf: &[u8], pos: usize) -> u16 {
        let bytes = [buf[pos], buf[pos + 1]];
        match self {
            Encoding::Little => u16::from_le_bytes(bytes),
            Encoding::Big => u16::from_be_bytes(bytes),
        }
    }

    /// Reads a `u32` at `pos` in this byte order.
    #[inline]
    pub(crate) fn read_u32(self, buf: &[u8], pos: usize) -> u32 {
        let bytes = [buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]];
        match self {
            Encoding::Little => u32::from_le_bytes(bytes),
            Encoding::Big => u32::from_be_bytes(bytes),
        }
    }
}

/// Object file type decoded from `e_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// No file type.
    None,
    /// Relocatable file.
    Rel,
    /// Executable file.
    Exec,
    /// Shared object file.
    Dyn,
    /// Core file.
    Core,
    /// An OS- or processor-specific type.
    Other(u16),
}

impl From<u16> for FileType {
    fn from(e_type: u16) -> Self {
        match e_type {
            ET_NONE => FileType::None,
            ET_REL => FileType::Rel,
            ET_EXEC => FileType::Exec,
            ET_DYN => FileType::Dyn,
            ET_CORE => FileType::Core,
            other => FileType::Other(other),
        }
    }
}

/// Returns a human-readable name for the common `e_machine` codes, or
/// `None` for codes this library does not name. The raw code is always
/// available from the header.
pub fn machine_name(machine: u16) -> Option<&'static str> {
    let name = match machine {
        EM_386 => "i386",
        EM_68K => "m68k",
        EM_ARM => "arm",
        EM_AARCH64 => "aarch64",
        EM_X86_64 => "x86-64",
        EM_RISCV => "riscv",
        EM_MIPS => "mips",
        EM_PPC => "powerpc",
        EM_PPC64 => "powerpc64",
        EM_SPARC => "sparc",
        EM_S390 => "s390",
        EM_LOONGARCH => "loongarch",
        _ => return None,
    };
    Some(name)
}

bitflags! {
    /// Section attribute flags from `sh_flags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShdrFlags: u32 {
        /// Writable during execution.
        const WRITE = elf::abi::SHF_WRITE;
        /// Occupies memory during execution.
        const ALLOC = elf::abi::SHF_ALLOC;
        /// Contains executable instructions.
        const EXECINSTR = elf::abi::SHF_EXECINSTR;
        /// May be merged to eliminate duplicates.
        const MERGE = elf::abi::SHF_MERGE;
        /// Contains NUL-terminated strings.
        const STRINGS = elf::abi::SHF_STRINGS;
        /// `sh_info` holds a section index.
        const INFO_LINK = elf::abi::SHF_INFO_LINK;
        /// Ordering requirement on the linked section.
        const LINK_ORDER = elf::abi::SHF_LINK_ORDER;
        /// Requires OS-specific processing.
        const OS_NONCONFORMING = elf::abi::SHF_OS_NONCONFORMING;
        /// Member of a section group.
        const GROUP = elf::abi::SHF_GROUP;
        /// Holds thread-local storage.
        const TLS = elf::abi::SHF_TLS;
        /// Holds compressed data.
        const COMPRESSED = elf::abi::SHF_COMPRESSED;

        const _ = !0;
    }
}
