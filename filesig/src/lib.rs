mod crypto;
mod digest;
mod error;
mod keys;
mod signer;
mod timestamp;
mod trace;
mod verifier;

pub mod prelude {
  pub use crate::{
    crypto::{KeySize, PublicKey, SecretKey, SignatureFormat, SigningKey, VerifyingKey},
    digest::{hash_file, hash_reader, DIGEST_SIZE},
    error::{FileSigError, FileSigResult},
    keys::{
      generate_keypair, load_private_key, load_public_key, save_private_key, save_public_key,
      KeyPair,
    },
    signer::{default_signature_path, encode_signature, save_signature, sign, sign_and_save},
    timestamp::{timestamp_path_for, TimestampRecord},
    verifier::{load_signature, verify, verify_file},
  };
}

/* ----------------------------------------------------------------- */
#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::fs;

  const SAMPLE_CONTENT: &[u8] = b"The quick brown fox jumps over the lazy dog!!!\n";

  #[test]
  fn test_sign_verify_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("document.txt");
    let private_path = dir.path().join("keys/private_key.pem");
    let public_path = dir.path().join("keys/public_key.pem");
    fs::write(&file_path, SAMPLE_CONTENT).unwrap();

    let keypair = generate_keypair(KeySize::Rsa2048).unwrap();
    save_private_key(&keypair.secret_key, &private_path, None).unwrap();
    save_public_key(&keypair.public_key, &public_path).unwrap();

    let sig_path =
      sign_and_save(&file_path, &private_path, None, None, SignatureFormat::Binary).unwrap();
    assert_eq!(sig_path, dir.path().join("document.txt.sig"));
    assert_eq!(fs::read(&sig_path).unwrap().len(), 256);

    assert!(verify_file(&file_path, &sig_path, &public_path).unwrap());

    // tampering flips the verdict, restoring the content flips it back
    fs::write(&file_path, b"The quick brown fox jumps over the lazy cat!!!\n").unwrap();
    assert!(!verify_file(&file_path, &sig_path, &public_path).unwrap());
    fs::write(&file_path, SAMPLE_CONTENT).unwrap();
    assert!(verify_file(&file_path, &sig_path, &public_path).unwrap());

    // a signature from a different key pair never validates
    let other = generate_keypair(KeySize::Rsa2048).unwrap();
    let other_public = dir.path().join("keys/other_public_key.pem");
    save_public_key(&other.public_key, &other_public).unwrap();
    assert!(!verify_file(&file_path, &sig_path, &other_public).unwrap());
  }

  #[test]
  fn test_encrypted_key_base64_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("release.tar.gz");
    let private_path = dir.path().join("private_key.pem");
    let public_path = dir.path().join("public_key.pem");
    fs::write(&file_path, SAMPLE_CONTENT).unwrap();

    let keypair = generate_keypair(KeySize::Rsa2048).unwrap();
    save_private_key(&keypair.secret_key, &private_path, Some("release-signing")).unwrap();
    save_public_key(&keypair.public_key, &public_path).unwrap();

    let sig_path = sign_and_save(
      &file_path,
      &private_path,
      None,
      Some("release-signing"),
      SignatureFormat::Base64,
    )
    .unwrap();
    assert_eq!(sig_path, dir.path().join("release.tar.gz.b64"));

    let record = TimestampRecord::now();
    let ts_path = timestamp_path_for(&sig_path);
    record.save(&ts_path).unwrap();
    assert_eq!(ts_path, dir.path().join("release.tar.gz.timestamp.json"));

    assert!(verify_file(&file_path, &sig_path, &public_path).unwrap());
    assert_eq!(TimestampRecord::load(&ts_path).unwrap(), record);
  }
}
