//! PE (Portable Executable) import table inspection.

use crate::core::error::{Error, Result};
use goblin::pe::PE;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// DOS `MZ` magic at the start of every PE image.
pub const MZ_MAGIC: [u8; 2] = [0x4D, 0x5A];

/// goblin reports by-ordinal imports under this synthetic name prefix.
const ORDINAL_NAME_PREFIX: &str = "ORDINAL ";

/// Check if data starts with the DOS executable magic.
pub fn has_mz_magic(data: &[u8]) -> bool {
    data.len() >= MZ_MAGIC.len() && data[..MZ_MAGIC.len()] == MZ_MAGIC
}

/// Read at most the first two bytes of a file and check for `MZ`.
///
/// Files shorter than two bytes are simply not executables.
pub fn file_has_mz_magic(path: &Path) -> Result<bool> {
    let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
    let mut header = Vec::with_capacity(MZ_MAGIC.len());
    file.take(MZ_MAGIC.len() as u64)
        .read_to_end(&mut header)
        .map_err(|e| Error::file_read(path, e))?;
    Ok(has_mz_magic(&header))
}

/// A function imported by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// DLL name
    pub dll: String,
    /// Function name
    pub function: String,
}

/// Imports of one executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportList {
    entries: Vec<ImportEntry>,
}

impl ImportList {
    pub fn new(entries: Vec<ImportEntry>) -> Self {
        Self { entries }
    }

    /// Check whether `function` is imported. Import-table casing differs
    /// between toolchains, so the comparison ignores ASCII case.
    pub fn contains(&self, function: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.function.eq_ignore_ascii_case(function))
    }

    /// Imported function names in table order.
    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.function.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImportEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// PE import table inspector.
#[derive(Debug, Clone, Default)]
pub struct ImportInspector;

impl ImportInspector {
    pub fn new() -> Self {
        Self
    }

    /// Read a file and list its imports.
    ///
    /// Fails with [`Error::MalformedExecutable`] when the bytes cannot be
    /// parsed as a PE image and with [`Error::FileRead`] on I/O failure.
    pub fn imports(&self, path: &Path) -> Result<ImportList> {
        let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
        self.imports_from_bytes(&data, path)
    }

    /// List the imports of an in-memory image. `path` is used for errors only.
    pub fn imports_from_bytes(&self, data: &[u8], path: &Path) -> Result<ImportList> {
        let pe = PE::parse(data)
            .map_err(|e| Error::malformed_executable(path, format!("Failed to parse PE: {}", e)))?;

        // An image without an import directory parses to an empty list.
        let entries = pe
            .imports
            .iter()
            .filter(|import| !import.name.starts_with(ORDINAL_NAME_PREFIX))
            .map(|import| ImportEntry {
                dll: import.dll.to_string(),
                function: import.name.to_string(),
            })
            .collect();

        Ok(ImportList::new(entries))
    }

    /// Check whether the file at `path` imports `function`.
    ///
    /// Any failure, including an unparsable image, counts as "not imported".
    pub fn contains_function(&self, path: &Path, function: &str) -> bool {
        match self.imports(path) {
            Ok(imports) => imports.contains(function),
            Err(e) => {
                log::debug!("Import inspection failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pe_with_imports, truncated_pe};
    use tempfile::tempdir;

    #[test]
    fn test_has_mz_magic() {
        assert!(has_mz_magic(b"MZ\x90\x00"));
        assert!(!has_mz_magic(b"M"));
        assert!(!has_mz_magic(b""));
        assert!(!has_mz_magic(b"ZM"));
        assert!(!has_mz_magic(b"plain text"));
    }

    #[test]
    fn test_file_has_mz_magic() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("a.bin");
        let short = dir.path().join("short.bin");
        let text = dir.path().join("notes.txt");
        std::fs::write(&exe, b"MZ rest is ignored").unwrap();
        std::fs::write(&short, b"M").unwrap();
        std::fs::write(&text, b"hello").unwrap();

        assert!(file_has_mz_magic(&exe).unwrap());
        assert!(!file_has_mz_magic(&short).unwrap());
        assert!(!file_has_mz_magic(&text).unwrap());
        assert!(matches!(
            file_has_mz_magic(&dir.path().join("missing")),
            Err(Error::FileRead { .. })
        ));
    }

    #[test]
    fn test_imports_are_listed() {
        let image = pe_with_imports(&[
            ("KERNEL32.dll", &["VirtualAlloc", "ExitProcess"]),
            ("USER32.dll", &["MessageBoxA"]),
        ]);

        let imports = ImportInspector::new()
            .imports_from_bytes(&image, Path::new("sample.exe"))
            .unwrap();

        let functions: Vec<&str> = imports.functions().collect();
        assert_eq!(functions, vec!["VirtualAlloc", "ExitProcess", "MessageBoxA"]);
        assert_eq!(imports.iter().next().unwrap().dll, "KERNEL32.dll");
    }

    #[test]
    fn test_contains_ignores_case() {
        let image = pe_with_imports(&[("KERNEL32.dll", &["VirtualAlloc"])]);
        let imports = ImportInspector::new()
            .imports_from_bytes(&image, Path::new("sample.exe"))
            .unwrap();

        assert!(imports.contains("virtualalloc"));
        assert!(imports.contains("VIRTUALALLOC"));
        assert!(!imports.contains("VirtualAllocEx"));
    }

    #[test]
    fn test_ordinal_imports_are_skipped() {
        let image = pe_with_imports(&[("WS2_32.dll", &["#5", "connect"])]);
        let imports = ImportInspector::new()
            .imports_from_bytes(&image, Path::new("net.exe"))
            .unwrap();

        assert_eq!(imports.len(), 1);
        assert_eq!(imports.functions().collect::<Vec<_>>(), vec!["connect"]);
        assert!(!imports.contains("ORDINAL 5"));
    }

    #[test]
    fn test_no_import_directory() {
        let image = pe_with_imports(&[]);
        let imports = ImportInspector::new()
            .imports_from_bytes(&image, Path::new("empty.exe"))
            .unwrap();
        assert!(imports.is_empty());
    }

    #[test]
    fn test_malformed_executable() {
        let inspector = ImportInspector::new();

        let err = inspector
            .imports_from_bytes(b"MZ but nothing else", Path::new("bad.exe"))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedExecutable { .. }));

        let err = inspector
            .imports_from_bytes(&truncated_pe(), Path::new("cut.exe"))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedExecutable { .. }));
    }

    #[test]
    fn test_contains_function_from_file() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("tool.exe");
        let bad = dir.path().join("broken.exe");
        std::fs::write(&good, pe_with_imports(&[("KERNEL32.dll", &["CreateRemoteThread"])]))
            .unwrap();
        std::fs::write(&bad, truncated_pe()).unwrap();

        let inspector = ImportInspector::new();
        assert!(inspector.contains_function(&good, "createremotethread"));
        assert!(!inspector.contains_function(&good, "VirtualAlloc"));
        assert!(!inspector.contains_function(&bad, "CreateRemoteThread"));
        assert!(!inspector.contains_function(&dir.path().join("missing.exe"), "X"));
    }
}
