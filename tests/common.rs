use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

/// Byte order used when assembling fixture images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Le,
    Be,
}

impl Endian {
    pub fn u16(self, value: u16) -> [u8; 2] {
        match self {
            Endian::Le => value.to_le_bytes(),
            Endian::Be => value.to_be_bytes(),
        }
    }

    pub fn u32(self, value: u32) -> [u8; 4] {
        match self {
            Endian::Le => value.to_le_bytes(),
            Endian::Be => value.to_be_bytes(),
        }
    }

    pub fn ident_byte(self) -> u8 {
        match self {
            Endian::Le => 1,
            Endian::Be => 2,
        }
    }
}

static FIXTURE_SEQ: AtomicU32 = AtomicU32::new(0);

/// Routes `log` output into the test harness when the `log` feature of
/// the library is enabled.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Writes `bytes` to a unique scratch file and returns its path.
pub fn write_fixture(tag: &str, bytes: &[u8]) -> PathBuf {
    let seq = FIXTURE_SEQ.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "elf_inspect_fixture_{}_{seq}_{tag}",
        std::process::id()
    ));
    std::fs::write(&path, bytes).unwrap();
    path
}

fn put(image: &mut [u8], offset: usize, bytes: &[u8]) {
    image[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// Describes one non-null section of a fixture image.
pub struct FixtureSection {
    pub name_offset: u32,
    pub sh_type: u32,
    pub sh_flags: u32,
    pub sh_addr: u32,
    pub sh_offset: u32,
    pub sh_size: u32,
    pub sh_addralign: u32,
}

/// Assembles a complete ELF32 relocatable image.
///
/// Layout: file header at 0, string table contents at `strtab_offset`,
/// payloads wherever the caller placed them, section header table at
/// `shoff` with `shentsize`-byte entries. Entry 0 is the null section;
/// the string table section is always the last entry and `e_shstrndx`
/// points at it.
pub struct FixtureBuilder {
    pub endian: Endian,
    pub shentsize: u16,
    pub strtab: Vec<u8>,
    pub sections: Vec<FixtureSection>,
    pub payload: Vec<(u32, Vec<u8>)>,
}

impl FixtureBuilder {
    pub fn new(endian: Endian) -> Self {
        Self {
            endian,
            shentsize: 40,
            strtab: vec![0],
            sections: Vec::new(),
            payload: Vec::new(),
        }
    }

    /// Appends `name` to the string table and returns its offset.
    pub fn intern(&mut self, name: &str) -> u32 {
        let offset = self.strtab.len() as u32;
        self.strtab.extend_from_slice(name.as_bytes());
        self.strtab.push(0);
        offset
    }

    pub fn section(&mut self, section: FixtureSection) {
        self.sections.push(section);
    }

    pub fn data(&mut self, offset: u32, bytes: &[u8]) {
        self.payload.push((offset, bytes.to_vec()));
    }

    pub fn build(&self) -> Vec<u8> {
        let endian = self.endian;
        let strtab_name = {
            // The interned names already include ".shstrtab" only if the
            // caller added it; the builder appends its own entry.
            let mut strtab = self.strtab.clone();
            let offset = strtab.len() as u32;
            strtab.extend_from_slice(b".shstrtab");
            strtab.push(0);
            (strtab, offset)
        };
        let (strtab, strtab_name_offset) = strtab_name;

        let strtab_offset = 52u32;
        let payload_end = self
            .payload
            .iter()
            .map(|(offset, bytes)| offset + bytes.len() as u32)
            .max()
            .unwrap_or(0);
        let shoff = (strtab_offset + strtab.len() as u32)
            .max(payload_end)
            .next_multiple_of(4);
        let shnum = self.sections.len() as u16 + 2;
        let shstrndx = shnum - 1;

        let mut image = vec![0u8; shoff as usize + self.shentsize as usize * shnum as usize];

        // File header.
        put(&mut image, 0, &[0x7f, b'E', b'L', b'F']);
        image[4] = 1; // ELFCLASS32
        image[5] = endian.ident_byte();
        image[6] = 1; // EV_CURRENT
        put(&mut image, 16, &endian.u16(1)); // ET_REL
        put(&mut image, 18, &endian.u16(3)); // EM_386
        put(&mut image, 20, &endian.u32(1));
        put(&mut image, 32, &endian.u32(shoff));
        put(&mut image, 40, &endian.u16(52));
        put(&mut image, 46, &endian.u16(self.shentsize));
        put(&mut image, 48, &endian.u16(shnum));
        put(&mut image, 50, &endian.u16(shstrndx));

        // String table contents and payloads.
        put(&mut image, strtab_offset as usize, &strtab);
        for (offset, bytes) in &self.payload {
            put(&mut image, *offset as usize, bytes);
        }

        // Section header table: null entry, caller sections, .shstrtab.
        let mut entry = shoff as usize + self.shentsize as usize;
        for section in &self.sections {
            put(&mut image, entry, &endian.u32(section.name_offset));
            put(&mut image, entry + 4, &endian.u32(section.sh_type));
            put(&mut image, entry + 8, &endian.u32(section.sh_flags));
            put(&mut image, entry + 12, &endian.u32(section.sh_addr));
            put(&mut image, entry + 16, &endian.u32(section.sh_offset));
            put(&mut image, entry + 20, &endian.u32(section.sh_size));
            put(&mut image, entry + 32, &endian.u32(section.sh_addralign));
            entry += self.shentsize as usize;
        }
        put(&mut image, entry, &endian.u32(strtab_name_offset));
        put(&mut image, entry + 4, &endian.u32(3)); // SHT_STRTAB
        put(&mut image, entry + 16, &endian.u32(strtab_offset));
        put(&mut image, entry + 20, &endian.u32(strtab.len() as u32));
        put(&mut image, entry + 32, &endian.u32(1));

        image
    }
}

/// The canonical fixture: a null section, a 16-byte `.text` PROGBITS
/// section at file offset 84, and the trailing `.shstrtab`.
pub fn sample_object(endian: Endian) -> Vec<u8> {
    let mut builder = FixtureBuilder::new(endian);
    let text_name = builder.intern(".text");
    builder.data(84, &TEXT_PAYLOAD);
    builder.section(FixtureSection {
        name_offset: text_name,
        sh_type: 1, // SHT_PROGBITS
        sh_flags: 0x6, // ALLOC | EXECINSTR
        sh_addr: 0x0804_8000,
        sh_offset: 84,
        sh_size: 16,
        sh_addralign: 4,
    });
    builder.build()
}

/// The 16 bytes of `.text` in [`sample_object`].
pub const TEXT_PAYLOAD: [u8; 16] = [
    0x55, 0x89, 0xe5, 0xb8, 0x2a, 0x00, 0x00, 0x00, 0x5d, 0xc3, 0x90, 0x90, 0x90, 0x90, 0x90,
    0x90,
];
