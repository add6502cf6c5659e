use crate::{
  crypto::VerifyingKey,
  digest,
  error::{FileSigError, FileSigResult},
  keys,
  trace::*,
};
use base64::{engine::general_purpose, Engine as _};
use std::{fs, path::Path};

/// Reads signature bytes from `path`. A `.b64` suffix selects base64
/// decoding (whitespace is ignored); any other suffix is read as raw binary.
pub fn load_signature(path: impl AsRef<Path>) -> FileSigResult<Vec<u8>> {
  let path = path.as_ref();
  let bytes = fs::read(path).map_err(|e| FileSigError::from_io(path, e))?;
  let is_base64 = path
    .extension()
    .is_some_and(|ext| ext.eq_ignore_ascii_case("b64"));
  if !is_base64 {
    return Ok(bytes);
  }
  let compact = bytes
    .into_iter()
    .filter(|b| !b.is_ascii_whitespace())
    .collect::<Vec<u8>>();
  let signature = general_purpose::STANDARD.decode(compact)?;
  debug!(path = %path.display(), "decoded base64 signature");
  Ok(signature)
}

/// Recomputes the digest of the file at `path` and checks `signature`
/// against it.
///
/// `Ok(false)` is the verdict for a cryptographic mismatch; only operational
/// failures such as an unreadable file surface as errors.
pub fn verify(
  path: impl AsRef<Path>,
  signature: &[u8],
  key: &impl VerifyingKey,
) -> FileSigResult<bool> {
  let path = path.as_ref();
  let digest = digest::hash_file(path)?;
  let valid = key.verify(&digest, signature);
  if valid {
    info!(path = %path.display(), "signature valid");
  } else {
    warn!(path = %path.display(), "signature invalid");
  }
  Ok(valid)
}

/// Verifies the file at `path` against the signature at `signature_path`
/// using the public key at `public_key_path`.
pub fn verify_file(
  path: impl AsRef<Path>,
  signature_path: impl AsRef<Path>,
  public_key_path: impl AsRef<Path>,
) -> FileSigResult<bool> {
  let signature = load_signature(signature_path)?;
  let public_key = keys::load_public_key(public_key_path)?;
  verify(path, &signature, &public_key)
}
