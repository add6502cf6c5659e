use crate::{
  error::{FileSigError, FileSigResult},
  trace::*,
};
use sha2::{Digest, Sha256};
use std::{fs::File, io::Read, path::Path};

/// Digest length in bytes (SHA-256)
pub const DIGEST_SIZE: usize = 32;

/// Read length for streamed file hashing
const CHUNK_SIZE: usize = 4096;

/// Computes the SHA-256 digest of the file at `path`.
///
/// The file is streamed in fixed-size chunks so memory use stays constant
/// regardless of file size. The result is identical to hashing the whole
/// content in one pass.
pub fn hash_file(path: impl AsRef<Path>) -> FileSigResult<[u8; DIGEST_SIZE]> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|e| FileSigError::from_io(path, e))?;
  let digest = hash_reader(file).map_err(|e| FileSigError::from_io(path, e))?;
  debug!(path = %path.display(), "hashed file content");
  Ok(digest)
}

/// Streams `reader` through a SHA-256 accumulator until EOF.
pub fn hash_reader(mut reader: impl Read) -> std::io::Result<[u8; DIGEST_SIZE]> {
  let mut hasher = Sha256::new();
  let mut chunk = [0u8; CHUNK_SIZE];
  loop {
    let read = reader.read(&mut chunk)?;
    if read == 0 {
      break;
    }
    hasher.update(&chunk[..read]);
  }
  Ok(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  // SHA-256("abc")
  const ABC_DIGEST: [u8; DIGEST_SIZE] = [
    0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae, 0x22, 0x23,
    0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61, 0xf2, 0x00, 0x15, 0xad,
  ];

  #[test]
  fn test_hash_reader_known_vector() {
    let digest = hash_reader(&b"abc"[..]).unwrap();
    assert_eq!(digest, ABC_DIGEST);
  }

  #[test]
  fn test_hash_reader_chunking_is_transparent() {
    // content longer than one chunk must hash identically to a single-pass digest
    let content = (0u32..3000).flat_map(|i| i.to_be_bytes()).collect::<Vec<u8>>();
    assert!(content.len() > CHUNK_SIZE);
    let streamed = hash_reader(content.as_slice()).unwrap();
    let single_pass: [u8; DIGEST_SIZE] = Sha256::digest(&content).into();
    assert_eq!(streamed, single_pass);
  }

  #[test]
  fn test_hash_file_matches_content_digest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    let mut file = File::create(&path).unwrap();
    file.write_all(b"abc").unwrap();
    drop(file);

    let digest = hash_file(&path).unwrap();
    assert_eq!(digest, ABC_DIGEST);

    // equal content hashes equal, different content hashes differ
    let other = dir.path().join("other.bin");
    std::fs::write(&other, b"abd").unwrap();
    assert_ne!(hash_file(&other).unwrap(), digest);
  }

  #[test]
  fn test_hash_file_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty");
    std::fs::write(&path, b"").unwrap();
    let digest = hash_file(&path).unwrap();
    let expected: [u8; DIGEST_SIZE] = Sha256::digest(b"").into();
    assert_eq!(digest, expected);
  }

  #[test]
  fn test_hash_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let res = hash_file(dir.path().join("nope.txt"));
    assert!(matches!(res, Err(FileSigError::NotFound(_))));
  }
}
