//! filesig web interface
//!
//! A small HTTP frontend over the filesig core: generate RSA key pairs,
//! upload a file to sign it, or upload a file with its signature to verify
//! it. Uploads and produced signatures live under a working directory and
//! are served back through the download route.

mod forms;
mod html;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use clap::Parser;
use std::path::PathBuf;
use tower_http::trace::TraceLayer;

/// Upload cap shared by all form routes (16 MiB)
pub(crate) const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "filesig-web", version, about = "Web interface for RSA-PSS file signing")]
struct Args {
  /// Listen address
  #[arg(short, long, default_value = "127.0.0.1:5000", env = "FILESIG_LISTEN")]
  listen: String,

  /// Directory for uploads, signatures and generated keys
  #[arg(short, long, default_value = "uploads", env = "FILESIG_UPLOAD_DIR")]
  upload_dir: PathBuf,
}

/// Shared application state
#[derive(Clone)]
pub(crate) struct AppState {
  pub upload_dir: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "filesig=info,filesig_web=info,tower_http=info".into()),
    )
    .init();

  let args = Args::parse();
  std::fs::create_dir_all(&args.upload_dir)?;
  let state = AppState {
    upload_dir: args.upload_dir,
  };

  let app = Router::new()
    .route("/", get(forms::index))
    .route("/generate-keys", get(forms::generate_keys_form).post(forms::generate_keys))
    .route("/sign-file", get(forms::sign_file_form).post(forms::sign_file))
    .route(
      "/verify-signature",
      get(forms::verify_signature_form).post(forms::verify_signature),
    )
    .route("/download/:filename", get(forms::download))
    .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
    .layer(TraceLayer::new_for_http())
    .with_state(state);

  let listener = tokio::net::TcpListener::bind(&args.listen).await?;
  tracing::info!(listen = %args.listen, "filesig web interface started");
  axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn test_args_definition() {
    Args::command().debug_assert();
  }

  #[test]
  fn test_args_defaults() {
    let args = Args::parse_from(["filesig-web"]);
    assert_eq!(args.listen, "127.0.0.1:5000");
    assert_eq!(args.upload_dir, PathBuf::from("uploads"));
  }
}
