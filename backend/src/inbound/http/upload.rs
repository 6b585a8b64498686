//! Reading the plain-text upload of the bulk file endpoint.

use actix_multipart::{Field, Multipart, MultipartError};
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

const DEFAULT_FILENAME: &str = "upload.txt";
const TEXT_PLAIN: &str = "text/plain";

/// A decoded text upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUpload {
    /// Client-supplied filename, or `upload.txt` when absent.
    pub filename: String,
    /// File body decoded as UTF-8.
    pub contents: String,
}

fn file_error(message: impl Into<String>, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": FILE_FIELD,
        "code": code,
    }))
}

fn malformed(err: MultipartError) -> Error {
    debug!(error = %err, "rejected multipart body");
    file_error(format!("malformed multipart body: {err}"), "malformed_multipart")
}

fn is_text_file(field: &Field, filename: &str) -> bool {
    let text_mime = field
        .content_type()
        .is_some_and(|mime| mime.essence_str() == TEXT_PLAIN);
    text_mime || filename.to_ascii_lowercase().ends_with(".txt")
}

async fn read_capped(field: &mut Field) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
            return Err(Error::invalid_request("file exceeds the 5 MiB limit").with_details(
                json!({
                    "field": FILE_FIELD,
                    "code": "file_too_large",
                    "limitBytes": MAX_UPLOAD_BYTES,
                }),
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Extract the `file` field as UTF-8 text.
///
/// Other fields are skipped.
///
/// # Errors
/// `invalid_request` when the body is malformed, the field is missing, the
/// file is not plain text, exceeds [`MAX_UPLOAD_BYTES`], or is not UTF-8.
pub async fn read_text_upload(mut payload: Multipart) -> Result<TextUpload, Error> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        if field.name() != Some(FILE_FIELD) {
            while field.try_next().await.map_err(malformed)?.is_some() {}
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_owned();
        if !is_text_file(&field, &filename) {
            return Err(file_error(
                "file must be plain text (.txt)",
                "unsupported_file_type",
            ));
        }

        let bytes = read_capped(&mut field).await?;
        let contents = String::from_utf8(bytes)
            .map_err(|_| file_error("file must be UTF-8 encoded text", "invalid_encoding"))?;
        return Ok(TextUpload { filename, contents });
    }

    Err(file_error("missing required field: file", "missing_field"))
}
