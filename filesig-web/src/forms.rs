use crate::{html, AppState};
use axum::{
  body::Body,
  extract::{Multipart, Path, State},
  http::{header, HeaderMap, HeaderValue, StatusCode},
  response::{Html, IntoResponse, Response},
};
use filesig::prelude::*;

/// GET /
pub async fn index() -> Html<String> {
  Html(html::index_page())
}

/// GET /generate-keys
pub async fn generate_keys_form() -> Html<String> {
  Html(html::generate_keys_page())
}

/// POST /generate-keys
///
/// Form fields: `key_size` (2048 or 3072) and an optional `password` that
/// encrypts the private key. The pair is written into a fresh scratch
/// directory under the working directory and both paths are rendered.
pub async fn generate_keys(State(state): State<AppState>, mut multipart: Multipart) -> Response {
  let mut key_size = String::from("2048");
  let mut password = String::new();

  loop {
    let field = match multipart.next_field().await {
      Ok(Some(field)) => field,
      Ok(None) => break,
      Err(e) => {
        tracing::warn!(error = %e, "multipart upload rejected");
        return error_page(e.status(), "upload rejected: too large or malformed");
      }
    };
    let name = field.name().unwrap_or("").to_string();
    match name.as_str() {
      "key_size" => {
        if let Ok(text) = field.text().await {
          key_size = text;
        }
      }
      "password" => {
        if let Ok(text) = field.text().await {
          password = text;
        }
      }
      _ => {}
    }
  }

  let key_size = match key_size.parse::<KeySize>() {
    Ok(size) => size,
    Err(e) => return error_page(StatusCode::BAD_REQUEST, &e.to_string()),
  };
  let passphrase = Some(password.as_str()).filter(|p| !p.is_empty());

  let scratch_dir = state.upload_dir.join(format!("keys-{}", uuid::Uuid::new_v4()));
  let private_path = scratch_dir.join("private_key.pem");
  let public_path = scratch_dir.join("public_key.pem");

  let result = generate_keypair(key_size).and_then(|keypair| {
    save_private_key(&keypair.secret_key, &private_path, passphrase)?;
    save_public_key(&keypair.public_key, &public_path)
  });
  match result {
    Ok(()) => Html(html::keys_generated_page(
      key_size,
      &private_path,
      &public_path,
      passphrase.is_some(),
    ))
    .into_response(),
    Err(e) => {
      tracing::warn!(error = %e, "key generation failed");
      error_page(status_for(&e), &e.to_string())
    }
  }
}

/// GET /sign-file
pub async fn sign_file_form() -> Html<String> {
  Html(html::sign_file_page())
}

/// POST /sign-file
///
/// Form fields: `file` (content to sign), `private_key` (PKCS#8 PEM),
/// optional `password`, and `format` (binary or base64). The uploaded
/// private key is stored under a transient name and removed after the
/// attempt, success or failure.
pub async fn sign_file(State(state): State<AppState>, mut multipart: Multipart) -> Response {
  let mut file: Option<(String, Vec<u8>)> = None;
  let mut private_key: Option<Vec<u8>> = None;
  let mut password = String::new();
  let mut format = String::from("binary");

  loop {
    let field = match multipart.next_field().await {
      Ok(Some(field)) => field,
      Ok(None) => break,
      Err(e) => {
        tracing::warn!(error = %e, "multipart upload rejected");
        return error_page(e.status(), "upload rejected: too large or malformed");
      }
    };
    let name = field.name().unwrap_or("").to_string();
    match name.as_str() {
      "file" => {
        let file_name = sanitize_file_name(field.file_name().unwrap_or(""));
        match field.bytes().await {
          Ok(bytes) => file = Some((file_name, bytes.to_vec())),
          Err(e) => {
            tracing::warn!(error = %e, "failed to read the uploaded file");
            return error_page(e.status(), "failed to read the uploaded file");
          }
        }
      }
      "private_key" => match field.bytes().await {
        Ok(bytes) => private_key = Some(bytes.to_vec()),
        Err(e) => {
          tracing::warn!(error = %e, "failed to read the uploaded private key");
          return error_page(e.status(), "failed to read the uploaded private key");
        }
      },
      "password" => {
        if let Ok(text) = field.text().await {
          password = text;
        }
      }
      "format" => {
        if let Ok(text) = field.text().await {
          format = text;
        }
      }
      _ => {}
    }
  }

  let (file_name, file_data) = match file {
    Some(file) => file,
    None => return error_page(StatusCode::BAD_REQUEST, "no file uploaded"),
  };
  let key_data = match private_key {
    Some(key) => key,
    None => return error_page(StatusCode::BAD_REQUEST, "no private key uploaded"),
  };
  let format = match format.parse::<SignatureFormat>() {
    Ok(format) => format,
    Err(e) => return error_page(StatusCode::BAD_REQUEST, &e.to_string()),
  };
  let passphrase = Some(password.as_str()).filter(|p| !p.is_empty());

  let file_path = state.upload_dir.join(&file_name);
  let key_path = state.upload_dir.join(format!("upload-key-{}.pem", uuid::Uuid::new_v4()));
  if let Err(e) = std::fs::write(&file_path, &file_data).and_then(|_| std::fs::write(&key_path, &key_data)) {
    tracing::warn!(error = %e, "failed to store the upload");
    return error_page(StatusCode::INTERNAL_SERVER_ERROR, "failed to store the upload");
  }

  let result = sign_and_save(&file_path, &key_path, None, passphrase, format);
  if let Err(e) = std::fs::remove_file(&key_path) {
    tracing::warn!(error = %e, "failed to remove the uploaded private key");
  }

  match result {
    Ok(sig_path) => {
      let sig_name = base_name(&sig_path);
      Html(html::sign_result_page(&file_name, &sig_name)).into_response()
    }
    Err(e) => {
      tracing::warn!(error = %e, "signing failed");
      error_page(status_for(&e), &e.to_string())
    }
  }
}

/// GET /verify-signature
pub async fn verify_signature_form() -> Html<String> {
  Html(html::verify_signature_page())
}

/// POST /verify-signature
///
/// Form fields: `file`, `signature` (a `.b64` name selects base64 decoding)
/// and `public_key`. Renders the verdict; an invalid signature is a normal
/// page, not an error.
pub async fn verify_signature(State(state): State<AppState>, mut multipart: Multipart) -> Response {
  let mut file: Option<(String, Vec<u8>)> = None;
  let mut signature: Option<(String, Vec<u8>)> = None;
  let mut public_key: Option<Vec<u8>> = None;

  loop {
    let field = match multipart.next_field().await {
      Ok(Some(field)) => field,
      Ok(None) => break,
      Err(e) => {
        tracing::warn!(error = %e, "multipart upload rejected");
        return error_page(e.status(), "upload rejected: too large or malformed");
      }
    };
    let name = field.name().unwrap_or("").to_string();
    match name.as_str() {
      "file" => {
        let file_name = sanitize_file_name(field.file_name().unwrap_or(""));
        match field.bytes().await {
          Ok(bytes) => file = Some((file_name, bytes.to_vec())),
          Err(e) => {
            tracing::warn!(error = %e, "failed to read the uploaded file");
            return error_page(e.status(), "failed to read the uploaded file");
          }
        }
      }
      "signature" => {
        let sig_name = sanitize_file_name(field.file_name().unwrap_or(""));
        match field.bytes().await {
          Ok(bytes) => signature = Some((sig_name, bytes.to_vec())),
          Err(e) => {
            tracing::warn!(error = %e, "failed to read the uploaded signature");
            return error_page(e.status(), "failed to read the uploaded signature");
          }
        }
      }
      "public_key" => match field.bytes().await {
        Ok(bytes) => public_key = Some(bytes.to_vec()),
        Err(e) => {
          tracing::warn!(error = %e, "failed to read the uploaded public key");
          return error_page(e.status(), "failed to read the uploaded public key");
        }
      },
      _ => {}
    }
  }

  let (file_name, file_data) = match file {
    Some(file) => file,
    None => return error_page(StatusCode::BAD_REQUEST, "no file uploaded"),
  };
  let (sig_name, sig_data) = match signature {
    Some(signature) => signature,
    None => return error_page(StatusCode::BAD_REQUEST, "no signature uploaded"),
  };
  let key_data = match public_key {
    Some(key) => key,
    None => return error_page(StatusCode::BAD_REQUEST, "no public key uploaded"),
  };

  let file_path = state.upload_dir.join(&file_name);
  let sig_path = state.upload_dir.join(&sig_name);
  let key_path = state.upload_dir.join(format!("upload-key-{}.pem", uuid::Uuid::new_v4()));
  if let Err(e) = std::fs::write(&file_path, &file_data)
    .and_then(|_| std::fs::write(&sig_path, &sig_data))
    .and_then(|_| std::fs::write(&key_path, &key_data))
  {
    tracing::warn!(error = %e, "failed to store the upload");
    return error_page(StatusCode::INTERNAL_SERVER_ERROR, "failed to store the upload");
  }

  let result = verify_file(&file_path, &sig_path, &key_path);
  if let Err(e) = std::fs::remove_file(&key_path) {
    tracing::warn!(error = %e, "failed to remove the uploaded public key");
  }

  match result {
    Ok(valid) => Html(html::verify_result_page(&file_name, valid)).into_response(),
    Err(e) => {
      tracing::warn!(error = %e, "verification failed");
      error_page(status_for(&e), &e.to_string())
    }
  }
}

/// GET /download/{filename}
///
/// Serves a file from the working directory as an attachment. The name is
/// reduced to its final path component before lookup.
pub async fn download(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
  let name = sanitize_file_name(&filename);
  let path = state.upload_dir.join(&name);
  match tokio::fs::read(&path).await {
    Ok(data) => {
      let mut headers = HeaderMap::new();
      headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
      let disposition = format!("attachment; filename=\"{name}\"");
      headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).unwrap_or_else(|_| HeaderValue::from_static("attachment")),
      );
      (StatusCode::OK, headers, Body::from(data)).into_response()
    }
    Err(_) => StatusCode::NOT_FOUND.into_response(),
  }
}

/// Keeps only the final path component of a client-supplied name so an
/// upload can never escape the working directory.
pub(crate) fn sanitize_file_name(name: &str) -> String {
  let name = name.replace('\\', "/");
  let base = name.rsplit('/').next().unwrap_or("").trim();
  if base.is_empty() || base == "." || base == ".." {
    "upload.bin".to_string()
  } else {
    base.to_string()
  }
}

fn base_name(path: &std::path::Path) -> String {
  path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default()
}

fn status_for(e: &FileSigError) -> StatusCode {
  match e {
    FileSigError::InvalidParameter(_)
    | FileSigError::WrongPassphraseOrCorruptFile(_)
    | FileSigError::NotRsaKey(_)
    | FileSigError::MalformedEncoding(_) => StatusCode::BAD_REQUEST,
    FileSigError::NotFound(_) => StatusCode::NOT_FOUND,
    _ => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

fn error_page(status: StatusCode, message: &str) -> Response {
  (status, Html(html::error_page(message))).into_response()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  #[test]
  fn test_sanitize_file_name() {
    assert_eq!(sanitize_file_name("report.txt"), "report.txt");
    assert_eq!(sanitize_file_name("dir/report.txt"), "report.txt");
    assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_file_name("..\\..\\boot.ini"), "boot.ini");
    assert_eq!(sanitize_file_name(""), "upload.bin");
    assert_eq!(sanitize_file_name(".."), "upload.bin");
    assert_eq!(sanitize_file_name("dir/"), "upload.bin");
  }

  #[test]
  fn test_sanitized_signature_name_keeps_suffix() {
    assert_eq!(sanitize_file_name("a/b/report.txt.b64"), "report.txt.b64");
    let name = sanitize_file_name("signatures/report.txt.sig");
    assert_eq!(PathBuf::from(name).extension().unwrap(), "sig");
  }

  #[test]
  fn test_status_for_taxonomy() {
    let e = FileSigError::InvalidParameter("key size".into());
    assert_eq!(status_for(&e), StatusCode::BAD_REQUEST);
    let e = FileSigError::NotFound("x".into());
    assert_eq!(status_for(&e), StatusCode::NOT_FOUND);
    let e = FileSigError::Io("disk".into());
    assert_eq!(status_for(&e), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
