//! Buffered reading of `multipart/form-data` bodies.
//!
//! Forms accept the same field under more than one name (for example
//! `titulo` and `title`), so fields are collected first and looked up by
//! alias afterwards.

use std::collections::HashMap;

use axum::extract::Multipart;
use tracing::debug;

use crate::core::error::{AppError, Result};

/// A file part received in a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// Read every part of the form.
    ///
    /// File parts without a filename or without content are treated as
    /// "no file selected" and dropped.
    pub async fn read(multipart: &mut Multipart) -> Result<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let name = field.name().unwrap_or("").to_string();
            if name.is_empty() {
                continue;
            }

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content_type = field
                        .content_type()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "application/octet-stream".to_string());

                    let data = field.bytes().await.map_err(|e| {
                        debug!("Failed to read file bytes: {}", e);
                        AppError::BadRequest(format!("Failed to read file data: {}", e))
                    })?;

                    if filename.trim().is_empty() || data.is_empty() {
                        continue;
                    }

                    form.files.insert(
                        name,
                        UploadedFile {
                            filename,
                            content_type,
                            data: data.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field.text().await.map_err(|e| {
                        debug!("Failed to read text field '{}': {}", name, e);
                        AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// First text field present under any of `names`
    pub fn text(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|n| self.fields.get(*n).cloned())
    }

    /// Take the first file present under any of `names`
    pub fn take_file(&mut self, names: &[&str]) -> Option<UploadedFile> {
        names.iter().find_map(|n| self.files.remove(*n))
    }
}

#[cfg(test)]
impl FormData {
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prefers_first_alias() {
        let form = FormData::default()
            .with_field("title", "english")
            .with_field("titulo", "portugues");

        assert_eq!(form.text(&["titulo", "title"]).as_deref(), Some("portugues"));
        assert_eq!(form.text(&["title", "titulo"]).as_deref(), Some("english"));
        assert_eq!(form.text(&["categoria"]), None);
    }
}
