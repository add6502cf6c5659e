mod asymmetric;

use crate::error::{FileSigError, FileSigResult};

pub use asymmetric::{PublicKey, SecretKey};

/// Supported RSA modulus sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeySize {
  #[default]
  Rsa2048,
  Rsa3072,
}

impl KeySize {
  /// Modulus length in bits
  pub fn bits(&self) -> usize {
    match self {
      KeySize::Rsa2048 => 2048,
      KeySize::Rsa3072 => 3072,
    }
  }

  /// Modulus length in bytes, which is also the signature length
  pub fn modulus_size(&self) -> usize {
    self.bits() / 8
  }

  /// Builds a key size from a modulus bit length
  pub fn try_from_bits(bits: usize) -> FileSigResult<Self> {
    match bits {
      2048 => Ok(KeySize::Rsa2048),
      3072 => Ok(KeySize::Rsa3072),
      _ => Err(FileSigError::InvalidParameter(format!(
        "unsupported key size: {bits} (expected 2048 or 3072)"
      ))),
    }
  }
}

impl std::fmt::Display for KeySize {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.bits())
  }
}

impl std::str::FromStr for KeySize {
  type Err = FileSigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let bits = s
      .parse::<usize>()
      .map_err(|_| FileSigError::InvalidParameter(format!("unsupported key size: {s}")))?;
    Self::try_from_bits(bits)
  }
}

/// Transport format for signature bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureFormat {
  #[default]
  Binary,
  Base64,
}

impl SignatureFormat {
  pub fn as_str(&self) -> &str {
    match self {
      SignatureFormat::Binary => "binary",
      SignatureFormat::Base64 => "base64",
    }
  }

  /// Suffix appended to the signed file's full name
  pub fn suffix(&self) -> &str {
    match self {
      SignatureFormat::Binary => "sig",
      SignatureFormat::Base64 => "b64",
    }
  }
}

impl std::fmt::Display for SignatureFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for SignatureFormat {
  type Err = FileSigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "binary" => Ok(SignatureFormat::Binary),
      "base64" => Ok(SignatureFormat::Base64),
      _ => Err(FileSigError::InvalidParameter(format!(
        "unsupported signature format: {s}"
      ))),
    }
  }
}

/// SigningKey trait
pub trait SigningKey {
  /// Signs a content digest, returning raw signature bytes
  fn sign(&self, digest: &[u8]) -> FileSigResult<Vec<u8>>;
  /// Length in bytes of signatures this key produces
  fn signature_size(&self) -> usize;
}

/// VerifyingKey trait
pub trait VerifyingKey {
  /// Checks `signature` against a content digest. A cryptographic mismatch
  /// is `false`, never an error.
  fn verify(&self, digest: &[u8], signature: &[u8]) -> bool;
  /// Length in bytes of signatures this key accepts
  fn signature_size(&self) -> usize;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_key_size_from_bits() {
    assert!(matches!(KeySize::try_from_bits(2048), Ok(KeySize::Rsa2048)));
    assert!(matches!(KeySize::try_from_bits(3072), Ok(KeySize::Rsa3072)));
    for bits in [0, 512, 1024, 4096] {
      assert!(matches!(
        KeySize::try_from_bits(bits),
        Err(FileSigError::InvalidParameter(_))
      ));
    }
  }

  #[test]
  fn test_key_size_parse_and_display() {
    assert_eq!("2048".parse::<KeySize>().unwrap(), KeySize::Rsa2048);
    assert_eq!("3072".parse::<KeySize>().unwrap(), KeySize::Rsa3072);
    assert!("1024".parse::<KeySize>().is_err());
    assert!("rsa".parse::<KeySize>().is_err());
    assert_eq!(KeySize::Rsa2048.to_string(), "2048");
    assert_eq!(KeySize::Rsa3072.modulus_size(), 384);
  }

  #[test]
  fn test_signature_format_parse_and_suffix() {
    assert_eq!("binary".parse::<SignatureFormat>().unwrap(), SignatureFormat::Binary);
    assert_eq!("base64".parse::<SignatureFormat>().unwrap(), SignatureFormat::Base64);
    assert!("hex".parse::<SignatureFormat>().is_err());
    assert_eq!(SignatureFormat::Binary.suffix(), "sig");
    assert_eq!(SignatureFormat::Base64.suffix(), "b64");
    assert_eq!(SignatureFormat::default(), SignatureFormat::Binary);
  }
}
