//! The inspection session facade.
//!
//! An [`Inspector`] owns the parsed header and section table of one
//! file at a time. It is an explicit two-state machine: `Closed` (no
//! file open) and `Open` (header and table loaded). Queries compose the
//! lower layers into section lookup by index or name, name resolution
//! and content reads; every query outside an open session fails with
//! [`Error::NotOpen`](crate::Error::NotOpen). Distinct inspectors are
//! fully independent: each owns its buffers and reads the file through
//! its own scoped descriptors.

use crate::ehdr::ElfHeader;
use crate::shdr::{ElfShdr, SectionTable};
use crate::strtab::StringTable;
use crate::{Error, Result, not_found_error};
use core::ops::Deref;
use std::path::{Path, PathBuf};

#[cfg(feature = "strtab-cache")]
use std::cell::OnceCell;

/// A section header paired with its resolved name.
#[derive(Debug, Clone)]
pub struct Section {
    index: usize,
    name: String,
    shdr: ElfShdr,
}

impl Section {
    /// Index of the section in the table.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The resolved section name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying section header.
    #[inline]
    pub fn shdr(&self) -> &ElfShdr {
        &self.shdr
    }
}

impl Deref for Section {
    type Target = ElfShdr;

    fn deref(&self) -> &Self::Target {
        &self.shdr
    }
}

/// State held while a session is open.
struct OpenSession {
    path: PathBuf,
    header: ElfHeader,
    table: SectionTable,
    #[cfg(feature = "strtab-cache")]
    strtab: OnceCell<StringTable>,
}

cfg_if::cfg_if! {
    if #[cfg(feature = "strtab-cache")] {
        impl OpenSession {
            /// Runs `f` against the section-name string table.
            ///
            /// The table loads once into this session's cell, which is
            /// dropped wholesale on close, keeping cache invalidation
            /// structural.
            fn with_strtab<T>(&self, f: impl FnOnce(&StringTable) -> Result<T>) -> Result<T> {
                if let Some(strtab) = self.strtab.get() {
                    return f(strtab);
                }
                let loaded = StringTable::load(&self.path, &self.header, &self.table)?;
                f(self.strtab.get_or_init(|| loaded))
            }
        }
    } else {
        impl OpenSession {
            /// Runs `f` against the section-name string table.
            ///
            /// The table is re-read from the file for every call, so no
            /// name buffer outlives the call that resolved it.
            fn with_strtab<T>(&self, f: impl FnOnce(&StringTable) -> Result<T>) -> Result<T> {
                let strtab = StringTable::load(&self.path, &self.header, &self.table)?;
                f(&strtab)
            }
        }
    }
}

impl OpenSession {
    fn section_at(&self, index: usize, strtab: &StringTable) -> Result<Section> {
        let shdr = self.table.get(index)?;
        Ok(Section {
            index,
            name: strtab.get(shdr.name_offset())?.to_string(),
            shdr: *shdr,
        })
    }
}

/// A read-only inspection session over one ELF32 file.
///
/// # Examples
/// ```no_run
/// use elf_inspect::Inspector;
///
/// let mut inspector = Inspector::new();
/// inspector.open("app.o")?;
/// let text = inspector.section_by_name(".text")?;
/// let bytes = inspector.contents_of(text.shdr())?;
/// inspector.close();
/// # Ok::<(), elf_inspect::Error>(())
/// ```
pub struct Inspector {
    session: Option<OpenSession>,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    /// Creates a closed inspector.
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Opens `path`, parsing its file header and section table.
    ///
    /// A session that is already open is closed first, so teardown of
    /// the previous file always completes before the new one loads. On
    /// any parse error the inspector is left closed.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.close();
        let path = path.as_ref();
        let header = ElfHeader::parse(path)?;
        let table = SectionTable::load(path, &header)?;
        #[cfg(feature = "log")]
        log::debug!(
            "opened {} ({} sections)",
            path.display(),
            table.len()
        );
        self.session = Some(OpenSession {
            path: path.to_path_buf(),
            header,
            table,
            #[cfg(feature = "strtab-cache")]
            strtab: OnceCell::new(),
        });
        Ok(())
    }

    /// Closes the session, releasing the owned header and table.
    ///
    /// Calling this on a closed inspector is a no-op.
    pub fn close(&mut self) {
        #[cfg(feature = "log")]
        if let Some(session) = &self.session {
            log::debug!("closed {}", session.path.display());
        }
        self.session = None;
    }

    /// Returns true while a session is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn session(&self) -> Result<&OpenSession> {
        self.session.as_ref().ok_or(Error::NotOpen)
    }

    /// The path of the open file.
    pub fn path(&self) -> Result<&Path> {
        Ok(&self.session()?.path)
    }

    /// The parsed file header.
    pub fn header(&self) -> Result<&ElfHeader> {
        Ok(&self.session()?.header)
    }

    /// Number of entries in the section table.
    pub fn section_count(&self) -> Result<usize> {
        Ok(self.session()?.table.len())
    }

    /// Looks up a section by table index and resolves its name.
    pub fn section_by_index(&self, index: usize) -> Result<Section> {
        let session = self.session()?;
        session.with_strtab(|strtab| session.section_at(index, strtab))
    }

    /// Looks up a section by name.
    ///
    /// Scans the non-null sections in index order and returns the first
    /// whose resolved name matches; on duplicate names the lowest index
    /// wins. Fails with [`Error::NotFound`](crate::Error::NotFound) when
    /// no section matches, leaving the session untouched.
    pub fn section_by_name(&self, name: &str) -> Result<Section> {
        let session = self.session()?;
        session.with_strtab(|strtab| {
            for (index, shdr) in session.table.iter().enumerate() {
                if shdr.is_null() {
                    continue;
                }
                if strtab.get(shdr.name_offset())? == name {
                    return session.section_at(index, strtab);
                }
            }
            Err(not_found_error(format!("section {name:?}")))
        })
    }

    /// The full ordered section listing, names resolved.
    pub fn sections(&self) -> Result<Vec<Section>> {
        let session = self.session()?;
        session.with_strtab(|strtab| {
            (0..session.table.len())
                .map(|index| session.section_at(index, strtab))
                .collect()
        })
    }

    /// Reads the contents of `shdr` from the open file.
    ///
    /// The buffer is read fresh for each request and ownership passes
    /// to the caller; nothing is cached. NOBITS sections yield an empty
    /// buffer without a file read.
    pub fn contents_of(&self, shdr: &ElfShdr) -> Result<Vec<u8>> {
        let session = self.session()?;
        shdr.read_contents(&session.path)
    }
}
