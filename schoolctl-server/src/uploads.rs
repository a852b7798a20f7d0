//! Image upload storage
//!
//! Files land in a single directory under a server-generated name
//! `<unix-millis>-<sanitized original name>` and are served back under
//! `/images/`. Names are claimed with `create_new`; when one is taken the
//! next candidate is `<unix-millis>-<n>-<sanitized original name>`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::models::ValidationError;

/// Maximum accepted upload size (5 MB)
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// URL prefix uploaded files are served under
pub const PUBLIC_PREFIX: &str = "/images";

/// Candidate names tried before giving up on a save
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Upload failure
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Upload directory and limits
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }

    /// Override the size limit (tests use small limits).
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Reject anything whose declared content type is not `image/*`.
    pub fn check_content_type(&self, content_type: Option<&str>) -> Result<(), ValidationError> {
        match content_type {
            Some(ct) if ct.starts_with("image/") => Ok(()),
            _ => Err(ValidationError::NotAnImage),
        }
    }

    /// Size check for a body that has grown to `len` bytes.
    pub fn check_size(&self, len: usize) -> Result<(), ValidationError> {
        if len > self.max_bytes {
            Err(ValidationError::FileTooLarge {
                max_bytes: self.max_bytes,
            })
        } else {
            Ok(())
        }
    }

    /// Write the file and return its stored name.
    ///
    /// Never overwrites an existing upload.
    pub async fn save(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        self.check_content_type(content_type)?;
        self.check_size(bytes.len())?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let (filename, mut file) = self
            .claim_name(Utc::now().timestamp_millis(), original_name)
            .await?;

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            self.discard(&filename).await;
            return Err(e.into());
        }

        tracing::info!(file = %filename, bytes = bytes.len(), "image stored");
        Ok(filename)
    }

    /// Create the first free candidate name, atomically.
    async fn claim_name(
        &self,
        millis: i64,
        original_name: Option<&str>,
    ) -> Result<(String, File), UploadError> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = candidate_name(millis, attempt, original_name);
            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&candidate))
                .await;

            match opened {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free upload name after {MAX_NAME_ATTEMPTS} attempts"),
        )
        .into())
    }

    /// Remove a stored file whose record was never created. Best effort.
    pub async fn discard(&self, filename: &str) {
        if let Err(e) = tokio::fs::remove_file(self.dir.join(filename)).await {
            tracing::warn!(file = %filename, "failed to remove orphaned upload: {}", e);
        }
    }
}

/// Public URL for a stored file name.
pub fn public_url(filename: &str) -> String {
    format!("{PUBLIC_PREFIX}/{filename}")
}

/// `<millis>-<name>` with path separators and other unsafe characters
/// replaced by `_`.
pub fn stored_name(millis: i64, original_name: Option<&str>) -> String {
    format!("{millis}-{}", sanitize(original_name))
}

/// Name tried on the given attempt; attempt 0 is the plain stored name.
fn candidate_name(millis: i64, attempt: u32, original_name: Option<&str>) -> String {
    if attempt == 0 {
        stored_name(millis, original_name)
    } else {
        format!("{millis}-{attempt}-{}", sanitize(original_name))
    }
}

fn sanitize(original_name: Option<&str>) -> String {
    let base = original_name
        .and_then(|n| n.rsplit(['/', '\\']).next())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload");

    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
