//! Inline HTML for the form pages. No template engine; pages are assembled
//! with `format!`, user-controlled text is escaped before interpolation, and
//! file names placed in URLs are percent-encoded first.

use filesig::prelude::KeySize;
use std::path::Path;

fn page(title: &str, body: &str) -> String {
  format!(
    r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - filesig</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; color: #222; }}
h1 {{ font-size: 1.4rem; }}
form {{ display: grid; gap: .8rem; margin-top: 1rem; }}
label {{ display: grid; gap: .2rem; font-weight: 600; }}
input, select {{ font: inherit; padding: .3rem; }}
button {{ font: inherit; padding: .4rem 1rem; width: fit-content; }}
code {{ background: #f4f4f4; padding: .1rem .3rem; }}
.valid {{ color: #0a7a2f; font-weight: 700; }}
.invalid {{ color: #b00020; font-weight: 700; }}
.error {{ color: #b00020; }}
nav a {{ margin-right: 1rem; }}
</style>
</head>
<body>
<nav><a href="/">filesig</a><a href="/generate-keys">Generate keys</a><a href="/sign-file">Sign</a><a href="/verify-signature">Verify</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#
  )
}

pub(crate) fn index_page() -> String {
  page(
    "RSA file signatures",
    r#"<p>Sign files with RSA-PSS and verify them later.</p>
<ul>
<li><a href="/generate-keys">Generate an RSA key pair</a></li>
<li><a href="/sign-file">Sign a file</a></li>
<li><a href="/verify-signature">Verify a signature</a></li>
</ul>"#,
  )
}

pub(crate) fn generate_keys_page() -> String {
  page(
    "Generate keys",
    r#"<form method="post" enctype="multipart/form-data">
<label>Key size
<select name="key_size">
<option value="2048" selected>RSA 2048</option>
<option value="3072">RSA 3072</option>
</select>
</label>
<label>Passphrase (optional, encrypts the private key)
<input type="password" name="password">
</label>
<button type="submit">Generate</button>
</form>"#,
  )
}

pub(crate) fn keys_generated_page(key_size: KeySize, private_path: &Path, public_path: &Path, encrypted: bool) -> String {
  let note = if encrypted {
    "<p>The private key is encrypted with your passphrase.</p>"
  } else {
    "<p>The private key is not encrypted.</p>"
  };
  let body = format!(
    "<p>Generated an RSA {key_size}-bit key pair.</p>\n<p>Private key: <code>{}</code></p>\n<p>Public key: <code>{}</code></p>\n{note}",
    escape(&private_path.display().to_string()),
    escape(&public_path.display().to_string()),
  );
  page("Keys generated", &body)
}

pub(crate) fn sign_file_page() -> String {
  page(
    "Sign a file",
    r#"<form method="post" enctype="multipart/form-data">
<label>File to sign
<input type="file" name="file" required>
</label>
<label>Private key (PKCS#8 PEM)
<input type="file" name="private_key" required>
</label>
<label>Key passphrase (leave empty for an unencrypted key)
<input type="password" name="password">
</label>
<label>Signature format
<select name="format">
<option value="binary" selected>Binary (.sig)</option>
<option value="base64">Base64 (.b64)</option>
</select>
</label>
<button type="submit">Sign</button>
</form>"#,
  )
}

pub(crate) fn sign_result_page(file_name: &str, signature_name: &str) -> String {
  let body = format!(
    "<p>Signed <code>{}</code>.</p>\n<p>Signature: <a href=\"/download/{}\">{}</a></p>",
    escape(file_name),
    escape(&urlencoding::encode(signature_name)),
    escape(signature_name),
  );
  page("File signed", &body)
}

pub(crate) fn verify_signature_page() -> String {
  page(
    "Verify a signature",
    r#"<form method="post" enctype="multipart/form-data">
<label>Signed file
<input type="file" name="file" required>
</label>
<label>Signature file (.sig or .b64)
<input type="file" name="signature" required>
</label>
<label>Public key (PEM)
<input type="file" name="public_key" required>
</label>
<button type="submit">Verify</button>
</form>"#,
  )
}

pub(crate) fn verify_result_page(file_name: &str, valid: bool) -> String {
  let body = if valid {
    format!(
      "<p class=\"valid\">VALID</p>\n<p><code>{}</code> matches the signature.</p>",
      escape(file_name)
    )
  } else {
    format!(
      "<p class=\"invalid\">INVALID</p>\n<p><code>{}</code> does not match the signature. \
       The file or the signature has been altered, or a different key pair was used.</p>",
      escape(file_name)
    )
  };
  page("Verification result", &body)
}

pub(crate) fn error_page(message: &str) -> String {
  page("Error", &format!("<p class=\"error\">{}</p>", escape(message)))
}

pub(crate) fn escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#39;")
}
