use crate::{
  crypto::{SignatureFormat, SigningKey},
  digest,
  error::{FileSigError, FileSigResult},
  keys,
  trace::*,
};
use base64::{engine::general_purpose, Engine as _};
use std::{
  fs,
  path::{Path, PathBuf},
};

/// Hashes the file at `path` and signs the digest with RSA-PSS.
pub fn sign(path: impl AsRef<Path>, key: &impl SigningKey) -> FileSigResult<Vec<u8>> {
  let path = path.as_ref();
  let digest = digest::hash_file(path)?;
  let signature = key.sign(&digest)?;
  info!(path = %path.display(), signature_len = signature.len(), "signed file");
  Ok(signature)
}

/// Encodes signature bytes for transport.
pub fn encode_signature(signature: &[u8], format: SignatureFormat) -> Vec<u8> {
  match format {
    SignatureFormat::Binary => signature.to_vec(),
    SignatureFormat::Base64 => general_purpose::STANDARD.encode(signature).into_bytes(),
  }
}

/// Default signature path: the format suffix appended to the file's full
/// name, keeping any existing extension (`document.txt` becomes
/// `document.txt.sig`).
pub fn default_signature_path(path: impl AsRef<Path>, format: SignatureFormat) -> PathBuf {
  let mut name = path.as_ref().as_os_str().to_os_string();
  name.push(".");
  name.push(format.suffix());
  PathBuf::from(name)
}

/// Writes a signature at `out_path` in the given transport format, creating
/// missing parent directories.
pub fn save_signature(
  signature: &[u8],
  out_path: impl AsRef<Path>,
  format: SignatureFormat,
) -> FileSigResult<()> {
  let out_path = out_path.as_ref();
  if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(|e| FileSigError::from_io(parent, e))?;
  }
  fs::write(out_path, encode_signature(signature, format))
    .map_err(|e| FileSigError::from_io(out_path, e))?;
  info!(path = %out_path.display(), format = %format, "saved signature");
  Ok(())
}

/// Signs the file at `path` with the private key at `private_key_path` and
/// writes the signature, returning its path. When `signature_path` is `None`
/// the path is derived from `path` and the format suffix. Any failure aborts
/// before the signature file is written.
pub fn sign_and_save(
  path: impl AsRef<Path>,
  private_key_path: impl AsRef<Path>,
  signature_path: Option<&Path>,
  passphrase: Option<&str>,
  format: SignatureFormat,
) -> FileSigResult<PathBuf> {
  let path = path.as_ref();
  let secret_key = keys::load_private_key(private_key_path, passphrase)?;
  let signature = sign(path, &secret_key)?;
  let out_path = signature_path
    .map(Path::to_path_buf)
    .unwrap_or_else(|| default_signature_path(path, format));
  save_signature(&signature, &out_path, format)?;
  Ok(out_path)
}
