//! # elf_inspect
//! A `safe`, `lightweight` library for read-only introspection of ELF32
//! object files: the file header, the section header table, section
//! names and raw section contents.
//! ## Usage
//! It implements the structural-metadata layer beneath an objdump-style
//! inspection tool and leaves flag parsing, table formatting and exit
//! policy to the caller.
//! ## Example
//! ```no_run
//! use elf_inspect::Inspector;
//!
//! let mut inspector = Inspector::new();
//! inspector.open("app.o")?;
//! let header = inspector.header()?;
//! println!("machine: {}", header.machine_name().unwrap_or("unknown"));
//! for section in inspector.sections()? {
//!     println!("{:2} {:<20} {:#x}", section.index(), section.name(), section.size());
//! }
//! inspector.close();
//! # Ok::<(), elf_inspect::Error>(())
//! ```

mod defs;
mod ehdr;
mod error;
mod inspector;
mod macros;
mod reader;
mod shdr;
mod strtab;

pub use defs::{Class, Ehdr, Encoding, FileType, Shdr, ShdrFlags, machine_name};
pub use ehdr::ElfHeader;
pub use error::Error;
pub use inspector::{Inspector, Section};
pub use shdr::{ElfShdr, SectionTable};
pub use strtab::{StringTable, resolve_name};

pub use elf::abi;

pub(crate) use error::{io_error, malformed_error, not_found_error};

/// Result type used throughout the library.
pub type Result<T> = core::result::Result<T, Error>;
