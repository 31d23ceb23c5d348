//! On-disk storage for uploaded media.
//!
//! Files are named `<unix-millis><.ext>` after the upload time. When two
//! uploads land in the same millisecond the later one gets a `-<n>` suffix,
//! so a stored name is never reused. Records keep the relative path
//! `uploads/<name>`, which is also the URL path the router serves it under.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use safecampus_shared::constants::UPLOADS_PREFIX;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::ServerError;

const MAX_EXTENSION_LEN: usize = 10;
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Verify that a resolved path stays within the expected base directory.
/// Prevents path traversal attacks.
fn ensure_within(base: &Path, relative: &Path) -> Result<PathBuf, ServerError> {
    let mut resolved = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(c) => resolved.push(c),
            Component::CurDir => {}
            _ => {
                return Err(ServerError::BadRequest(
                    "Path traversal detected".to_string(),
                ));
            }
        }
    }
    if !resolved.starts_with(base) || resolved == base {
        return Err(ServerError::BadRequest("Invalid media path".to_string()));
    }
    Ok(resolved)
}

/// Lower-cased `.ext` of the original file name, or nothing when it is
/// missing or not a plain short alphanumeric extension.
fn sanitized_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| {
            !e.is_empty()
                && e.len() <= MAX_EXTENSION_LEN
                && e.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Write `data` into a freshly created file. A file that could not be
/// written completely is removed again.
async fn fill(mut file: fs::File, path: &Path, data: &[u8]) -> std::io::Result<()> {
    let written = match file.write_all(data).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        drop(file);
        if let Err(e) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Could not remove partial upload");
        }
    }
    written
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    base_path: PathBuf,
    max_size: usize,
}

impl MediaStore {
    pub async fn new(base_path: PathBuf, max_size: usize) -> Result<Self, ServerError> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            ServerError::MediaStorage(format!(
                "Failed to create upload directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;

        info!(path = %base_path.display(), "Media store initialized");

        Ok(Self {
            base_path,
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write an uploaded file and return its relative path.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<String, ServerError> {
        if data.is_empty() {
            return Err(ServerError::BadRequest("Uploaded file is empty".to_string()));
        }
        if data.len() > self.max_size {
            return Err(ServerError::PayloadTooLarge(format!(
                "File too large: {} bytes (max {})",
                data.len(),
                self.max_size
            )));
        }

        let stem = Utc::now().timestamp_millis().to_string();
        let ext = sanitized_extension(original_name);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 0 {
                format!("{stem}{ext}")
            } else {
                format!("{stem}-{attempt}{ext}")
            };
            let path = ensure_within(&self.base_path, Path::new(&file_name))?;

            let file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(ServerError::MediaStorage(format!(
                        "Failed to create {file_name}: {e}"
                    )))
                }
            };

            fill(file, &path, data).await.map_err(|e| {
                ServerError::MediaStorage(format!("Failed to write {file_name}: {e}"))
            })?;

            debug!(file = %file_name, size = data.len(), "Stored upload");
            return Ok(format!("{UPLOADS_PREFIX}/{file_name}"));
        }

        Err(ServerError::MediaStorage(format!(
            "No free file name for timestamp {stem}"
        )))
    }

    pub async fn remove(&self, relative_path: &str) -> Result<(), ServerError> {
        let path = self.resolve(relative_path)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %relative_path, "Removed upload");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ServerError::NotFound(format!("Media not found: {relative_path}")))
            }
            Err(e) => Err(ServerError::MediaStorage(format!(
                "Failed to remove {relative_path}: {e}"
            ))),
        }
    }

    /// Remove a file whose record is gone. Failures are logged, never
    /// returned: the record operation has already succeeded.
    pub async fn discard(&self, relative_path: &str) {
        if let Err(e) = self.remove(relative_path).await {
            warn!(path = %relative_path, error = %e, "Could not remove orphaned upload");
        }
    }

    /// Map `uploads/<name>` (or a bare `<name>`) onto the upload directory.
    fn resolve(&self, relative_path: &str) -> Result<PathBuf, ServerError> {
        let normalized = relative_path.replace('\\', "/");
        let name = normalized
            .strip_prefix(&format!("{UPLOADS_PREFIX}/"))
            .unwrap_or(&normalized);
        ensure_within(&self.base_path, Path::new(name))
    }
}
