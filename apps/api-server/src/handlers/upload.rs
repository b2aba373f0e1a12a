//! Multipart form reading with a per-part size cap.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::TryStreamExt;

use scribe_core::domain::media::{
    image_content_type, image_extension, is_safe_file_name, stored_image_name,
};
use scribe_core::ports::FileStorage;

use crate::middleware::error::{AppError, AppResult};

/// A file part of a multipart body.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Store as an image under a random name; returns the stored name.
    pub async fn store_image(self, storage: &dyn FileStorage, folder: &str) -> AppResult<String> {
        let ext = image_extension(&self.file_name)?;
        let name = stored_image_name(&ext);
        storage.put(folder, &name, self.bytes).await?;
        Ok(name)
    }
}

/// Combined size cap for all text fields of one form.
pub const MAX_TEXT_BYTES: usize = 64 * 1024;

/// Field names a multipart endpoint accepts.
#[derive(Debug, Clone, Copy)]
pub struct FormSpec {
    pub fields: &'static [&'static str],
    pub files: &'static [&'static str],
}

/// Text fields and files of a multipart body, keyed by field name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Read a form whose parts must all be named in `spec`, each at most once.
    ///
    /// Every file part is capped at `max_file_bytes` and the text parts share
    /// [`MAX_TEXT_BYTES`], so one request buffers a bounded amount.
    pub async fn read(
        mut payload: Multipart,
        spec: FormSpec,
        max_file_bytes: usize,
    ) -> AppResult<Self> {
        let mut form = MultipartForm::default();
        let mut text_bytes = 0usize;

        while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_string) else {
                return Err(AppError::bad_request("multipart part without a name"));
            };
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            let expected = match file_name {
                Some(_) => spec.files,
                None => spec.fields,
            };
            if !expected.contains(&name.as_str()) {
                return Err(AppError::bad_request(format!("unexpected field '{name}'")));
            }
            if form.fields.contains_key(&name) || form.files.contains_key(&name) {
                return Err(AppError::bad_request(format!("duplicate field '{name}'")));
            }

            let mut bytes = Vec::new();
            while let Some(chunk) = field.try_next().await.map_err(malformed)? {
                let over = match file_name {
                    Some(_) => bytes.len() + chunk.len() > max_file_bytes,
                    None => text_bytes + bytes.len() + chunk.len() > MAX_TEXT_BYTES,
                };
                if over {
                    return Err(AppError::bad_request(format!(
                        "field '{name}' exceeds the upload size limit"
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            match file_name {
                Some(file_name) => {
                    form.files.insert(name, UploadedFile { file_name, bytes });
                }
                None => {
                    text_bytes += bytes.len();
                    let text = String::from_utf8(bytes)
                        .map_err(|_| AppError::bad_request(format!("field '{name}' is not UTF-8")))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text field; empty when absent.
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

fn malformed(err: actix_multipart::MultipartError) -> AppError {
    AppError::bad_request(format!("malformed multipart body: {err}"))
}

/// Respond with a stored image, or 404 when the name is unsafe or unknown.
pub async fn serve_image(
    storage: &dyn FileStorage,
    folder: &str,
    name: &str,
) -> AppResult<actix_web::HttpResponse> {
    if !is_safe_file_name(name) {
        return Err(AppError::not_found("image", name));
    }

    match storage.get(folder, name).await? {
        Some(bytes) => Ok(actix_web::HttpResponse::Ok()
            .content_type(image_content_type(name))
            .body(bytes)),
        None => Err(AppError::not_found("image", name)),
    }
}
