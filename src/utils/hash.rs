//! Content digest calculation.

use crate::core::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Buffer size for reading files (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Length of a rendered SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Hash calculator for files and streams.
///
/// Digests are rendered as uppercase hex so they compare directly against
/// signature rows written in either case after an ASCII case fold.
pub struct HashCalculator;

impl HashCalculator {
    /// Calculate the SHA-256 digest of everything readable from `reader`.
    pub fn sha256_reader<R: Read>(mut reader: R) -> io::Result<String> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(hex::encode_upper(hasher.finalize()))
    }

    /// Calculate the SHA-256 digest of a file.
    pub fn sha256_file(path: &Path) -> Result<String> {
        let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
        Self::sha256_reader(file).map_err(|e| Error::file_read(path, e))
    }

    /// Calculate the SHA-256 digest of bytes.
    pub fn sha256_bytes(data: &[u8]) -> String {
        hex::encode_upper(Sha256::digest(data))
    }

    /// Verify a file matches an expected SHA-256 digest.
    pub fn verify_sha256(path: &Path, expected: &str) -> Result<bool> {
        let actual = Self::sha256_file(path)?;
        Ok(actual.eq_ignore_ascii_case(expected.trim()))
    }

    /// Check that `digest` looks like a rendered SHA-256 value.
    pub fn is_sha256_hex(digest: &str) -> bool {
        digest.len() == DIGEST_HEX_LEN && digest.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HELLO_SHA256: &str = "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824";

    #[test]
    fn test_sha256_bytes() {
        assert_eq!(HashCalculator::sha256_bytes(b"hello"), HELLO_SHA256);
        assert_eq!(
            HashCalculator::sha256_bytes(b""),
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
    }

    #[test]
    fn test_reader_matches_bytes() {
        // Larger than one buffer so the streaming loop runs more than once.
        let data: Vec<u8> = (0..(BUFFER_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        let streamed = HashCalculator::sha256_reader(&data[..]).unwrap();
        assert_eq!(streamed, HashCalculator::sha256_bytes(&data));
        assert_eq!(streamed, HashCalculator::sha256_reader(&data[..]).unwrap());
    }

    #[test]
    fn test_digest_ignores_file_name() {
        let mut a = NamedTempFile::new().unwrap();
        let mut b = NamedTempFile::new().unwrap();
        a.write_all(b"same content").unwrap();
        b.write_all(b"same content").unwrap();

        let da = HashCalculator::sha256_file(a.path()).unwrap();
        let db = HashCalculator::sha256_file(b.path()).unwrap();
        assert_eq!(da, db);
        assert!(HashCalculator::is_sha256_hex(&da));
        assert_eq!(da, da.to_uppercase());
    }

    #[test]
    fn test_verify_hash() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();

        assert!(HashCalculator::verify_sha256(file.path(), HELLO_SHA256).unwrap());
        assert!(
            HashCalculator::verify_sha256(file.path(), &HELLO_SHA256.to_lowercase()).unwrap()
        );
        assert!(!HashCalculator::verify_sha256(file.path(), "invalid_hash").unwrap());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = HashCalculator::sha256_file(&dir.path().join("gone.bin")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.is_recoverable());
    }
}
