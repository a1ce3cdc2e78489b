/// Open an inspection session over an ELF32 file in one step
/// # Example
/// ```no_run
/// # use elf_inspect::inspect;
/// let inspector = inspect!("app.o").unwrap();
/// for section in inspector.sections().unwrap() {
///     println!("{} {}", section.index(), section.name());
/// }
/// ```
#[macro_export]
macro_rules! inspect {
    ($path:expr) => {{
        let mut inspector = $crate::Inspector::new();
        inspector.open($path).map(|_| inspector)
    }};
}
