use std::path::Path;
use thiserror::Error;

/// Result type for file signing
pub type FileSigResult<T> = std::result::Result<T, FileSigError>;

/// Describes things that can go wrong when signing and verifying files
#[derive(Error, Debug)]
pub enum FileSigError {
  /// Parameter outside the supported set, e.g. an unsupported key size
  #[error("Invalid parameter: {0}")]
  InvalidParameter(String),

  /* ----- Filesystem errors ----- */
  /// Target file or key file does not exist
  #[error("File not found: {0}")]
  NotFound(String),

  /// Target file or key file is not accessible
  #[error("Permission denied: {0}")]
  PermissionDenied(String),

  /// Any other filesystem failure
  #[error("I/O error: {0}")]
  Io(String),

  /* ----- Key container errors ----- */
  /// Private key decryption or PEM parsing failed. The container format
  /// cannot distinguish a wrong passphrase from corrupted bytes.
  #[error("Wrong passphrase or corrupt key file: {0}")]
  WrongPassphraseOrCorruptFile(String),

  /// The container holds a key of a different algorithm family
  #[error("Not an RSA key: {0}")]
  NotRsaKey(String),

  /* ----- Signature errors ----- */
  /// Signature file content is not valid base64
  #[error("Malformed signature encoding: {0}")]
  MalformedEncoding(#[from] base64::DecodeError),

  /// The signing primitive itself failed, distinct from an invalid verdict
  #[error("Signing failed: {0}")]
  SigningFailed(String),
}

impl FileSigError {
  /// Maps a filesystem error onto the crate taxonomy, keeping the offending path.
  pub(crate) fn from_io(path: &Path, e: std::io::Error) -> Self {
    match e.kind() {
      std::io::ErrorKind::NotFound => Self::NotFound(path.display().to_string()),
      std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.display().to_string()),
      _ => Self::Io(format!("{}: {e}", path.display())),
    }
  }
}
