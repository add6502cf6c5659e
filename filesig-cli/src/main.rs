//! filesig command line tool
//!
//! Generates RSA key pairs, signs files with RSA-PSS, and verifies
//! signatures. Logs go to stderr; verdicts and output paths go to stdout,
//! and `verify` exits with code 1 when the signature does not match.

use anyhow::Context;
use clap::{Parser, Subcommand};
use filesig::prelude::*;
use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

#[derive(Parser)]
#[command(name = "filesig", version, about = "RSA-PSS file signing and verification")]
struct Cli {
  /// Enable debug logging on stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Generate an RSA key pair and save both PEM files
  Genkey {
    /// Modulus size in bits (2048 or 3072)
    #[arg(long, default_value = "2048")]
    key_size: KeySize,

    /// Output path for the PKCS#8 private key
    #[arg(long, default_value = "private_key.pem")]
    private_key: PathBuf,

    /// Output path for the public key
    #[arg(long, default_value = "public_key.pem")]
    public_key: PathBuf,

    /// Prompt for a passphrase and encrypt the private key with it
    #[arg(long)]
    password: bool,
  },
  /// Sign a file and save the signature next to it
  Sign {
    /// File to sign
    file: PathBuf,

    /// Path of the PKCS#8 private key
    #[arg(long, default_value = "private_key.pem")]
    private_key: PathBuf,

    /// Signature output path (derived from FILE when omitted)
    #[arg(long)]
    signature: Option<PathBuf>,

    /// Signature transport format (binary or base64)
    #[arg(long, default_value = "binary")]
    format: SignatureFormat,

    /// Prompt for the private key passphrase
    #[arg(long)]
    password: bool,

    /// Record the signing time next to the signature
    #[arg(long)]
    timestamp: bool,
  },
  /// Verify a file against a signature
  Verify {
    /// Signed file
    file: PathBuf,

    /// Signature file (a `.b64` suffix selects base64 decoding)
    signature: PathBuf,

    /// Path of the public key
    #[arg(long, default_value = "public_key.pem")]
    public_key: PathBuf,

    /// Timestamp record to display after a valid verdict
    #[arg(long)]
    timestamp: Option<PathBuf>,
  },
}

fn main() -> anyhow::Result<ExitCode> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match cli.command {
    Command::Genkey {
      key_size,
      private_key,
      public_key,
      password,
    } => genkey(key_size, &private_key, &public_key, password),
    Command::Sign {
      file,
      private_key,
      signature,
      format,
      password,
      timestamp,
    } => sign_command(&file, &private_key, signature.as_deref(), format, password, timestamp),
    Command::Verify {
      file,
      signature,
      public_key,
      timestamp,
    } => verify_command(&file, &signature, &public_key, timestamp.as_deref()),
  }
}

fn init_tracing(verbose: bool) {
  let level = if verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("filesig={level},filesig_cli={level}").into()),
    )
    .with_writer(std::io::stderr)
    .init();
}

fn genkey(key_size: KeySize, private_path: &Path, public_path: &Path, password: bool) -> anyhow::Result<ExitCode> {
  let passphrase = if password { prompt_new_passphrase()? } else { None };
  let keypair = generate_keypair(key_size)?;
  save_private_key(&keypair.secret_key, private_path, passphrase.as_deref())?;
  save_public_key(&keypair.public_key, public_path)?;

  println!("Generated RSA {key_size}-bit key pair");
  println!("  private key: {}", private_path.display());
  println!("  public key:  {}", public_path.display());
  if passphrase.is_some() {
    println!("  private key is passphrase protected");
  }
  Ok(ExitCode::SUCCESS)
}

fn sign_command(
  file: &Path,
  private_key: &Path,
  signature: Option<&Path>,
  format: SignatureFormat,
  password: bool,
  timestamp: bool,
) -> anyhow::Result<ExitCode> {
  let passphrase = if password { prompt_passphrase()? } else { None };
  let sig_path = sign_and_save(file, private_key, signature, passphrase.as_deref(), format)
    .with_context(|| format!("failed to sign {}", file.display()))?;

  println!("Signed {}", file.display());
  println!("  signature: {}", sig_path.display());
  if timestamp {
    let record = TimestampRecord::now();
    let ts_path = timestamp_path_for(&sig_path);
    record.save(&ts_path)?;
    println!("  timestamp: {}", ts_path.display());
  }
  Ok(ExitCode::SUCCESS)
}

/// Prints the verdict; exit code 1 signals an invalid signature. The
/// `--timestamp` record is advisory and is displayed only when the file
/// exists.
fn verify_command(
  file: &Path,
  signature: &Path,
  public_key: &Path,
  timestamp: Option<&Path>,
) -> anyhow::Result<ExitCode> {
  let valid = verify_file(file, signature, public_key)
    .with_context(|| format!("failed to verify {}", file.display()))?;

  if valid {
    println!("VALID: {} matches {}", file.display(), signature.display());
    if let Some(ts_path) = timestamp.filter(|p| p.exists()) {
      let record = TimestampRecord::load(ts_path)?;
      println!("  signed at {} ({})", record.timestamp, record.timezone);
    }
    Ok(ExitCode::SUCCESS)
  } else {
    println!("INVALID: {} does not match {}", file.display(), signature.display());
    Ok(ExitCode::from(1))
  }
}

/// Prompts twice for a new passphrase and aborts on mismatch before any file
/// is written. An empty entry leaves the private key unencrypted.
fn prompt_new_passphrase() -> anyhow::Result<Option<String>> {
  let passphrase: String = cliclack::password("Passphrase for the new private key (empty for none)")
    .mask('▪')
    .interact()?;
  let confirm: String = cliclack::password("Confirm passphrase").mask('▪').interact()?;
  anyhow::ensure!(passphrase == confirm, "passphrases do not match");
  Ok(Some(passphrase).filter(|p| !p.is_empty()))
}

fn prompt_passphrase() -> anyhow::Result<Option<String>> {
  let passphrase: String = cliclack::password("Private key passphrase").mask('▪').interact()?;
  Ok(Some(passphrase).filter(|p| !p.is_empty()))
}
