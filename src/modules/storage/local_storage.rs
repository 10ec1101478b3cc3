//! Local filesystem storage for attachments
//!
//! Files are written to a single upload directory under the name
//! `{YYYYmmdd_HHMMSS}_{original}` (response attachments carry an extra
//! `resposta_` prefix) and are referenced by that name in the database.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::shared::constants::{ATTACHMENT_TIMESTAMP_FORMAT, RESPONSE_ATTACHMENT_PREFIX};
use crate::shared::validation::sanitize_filename;

/// Who an attachment belongs to; decides the stored name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Uploaded by a citizen together with an occurrence
    Occurrence,
    /// Uploaded by an administrator together with a response
    Response,
}

/// Attachment store backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_path: String,
    max_upload_size: usize,
}

impl LocalStorage {
    const MAX_NAME_ATTEMPTS: u32 = 100;

    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.upload_dir.clone(),
            public_path: config.public_path.clone(),
            max_upload_size: config.max_upload_size,
        }
    }

    /// Directory the attachments live in
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL prefix attachments are served under
    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!("Upload directory ready: {}", self.root.display());
        Ok(())
    }

    /// Build the stored name for an upload received at `now`
    pub fn stored_name(
        kind: AttachmentKind,
        original_filename: &str,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let safe_name = sanitize_filename(original_filename)?;
        let timestamp = now.format(ATTACHMENT_TIMESTAMP_FORMAT);

        Some(match kind {
            AttachmentKind::Occurrence => format!("{}_{}", timestamp, safe_name),
            AttachmentKind::Response => {
                format!("{}{}_{}", RESPONSE_ATTACHMENT_PREFIX, timestamp, safe_name)
            }
        })
    }

    /// Write an attachment and return the name it was stored under.
    ///
    /// Existing files are never overwritten; when two uploads land on the
    /// same name within one second a numeric suffix is added.
    pub async fn save(
        &self,
        kind: AttachmentKind,
        original_filename: &str,
        data: &[u8],
    ) -> Result<String> {
        if data.len() > self.max_upload_size {
            return Err(AppError::Validation(format!(
                "Attachment exceeds the maximum size of {} bytes",
                self.max_upload_size
            )));
        }

        let base = Self::stored_name(kind, original_filename, Utc::now()).ok_or_else(|| {
            AppError::Validation(format!("Invalid attachment filename: {}", original_filename))
        })?;

        for attempt in 0..Self::MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                base.clone()
            } else {
                with_suffix(&base, attempt)
            };

            let path = self.root.join(&name);
            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match file {
                Ok(mut file) => {
                    file.write_all(data).await?;
                    file.flush().await?;
                    debug!("Attachment stored: {} ({} bytes)", name, data.len());
                    return Ok(name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(AppError::Storage(e)),
            }
        }

        Err(AppError::Internal(format!(
            "Could not find a free attachment name for {}",
            base
        )))
    }

    /// Remove a stored attachment; missing files are ignored
    pub async fn delete(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    /// URL under which a stored attachment is served
    pub fn public_url(&self, name: &str) -> String {
        format!("{}/{}", self.public_path, name)
    }
}

/// `a_photo.png` + 2 -> `a_photo-2.png`
fn with_suffix(name: &str, n: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, n, ext),
        _ => format!("{}-{}", name, n),
    }
}
