//! File upload collaborator and the background task that drives it
//!
//! Uploads run on a worker thread so the UI keeps drawing. The widget owns
//! at most one `UploadTask` and polls it once per frame.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use log::{debug, info};

use crate::error::UploadError;

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Storage path the backend resolved for the file
    pub file_path: String,
}

/// Stores a picked file somewhere the flow runtime can read it
pub trait FileUploader: Send + Sync {
    /// `context` scopes the upload (usually the node or flow id)
    fn upload(&self, file: &Path, context: &str) -> Result<UploadedFile, UploadError>;
}

/// Copies uploads into `<root>/<context>/<uuid>_<file name>`
#[derive(Debug, Clone)]
pub struct LocalUploader {
    root: PathBuf,
}

impl LocalUploader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileUploader for LocalUploader {
    fn upload(&self, file: &Path, context: &str) -> Result<UploadedFile, UploadError> {
        if !file.is_file() {
            return Err(UploadError::NotFound {
                path: file.display().to_string(),
            });
        }

        let dir = self.root.join(sanitize_component(context));
        std::fs::create_dir_all(&dir).map_err(|source| UploadError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;

        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let target = dir.join(format!("{}_{}", uuid::Uuid::new_v4(), file_name));

        std::fs::copy(file, &target).map_err(|source| UploadError::Copy {
            from: file.display().to_string(),
            to: target.display().to_string(),
            source,
        })?;

        info!("Uploaded {} to {}", file.display(), target.display());
        Ok(UploadedFile {
            file_path: target.display().to_string(),
        })
    }
}

/// Keep a context string from escaping the upload root
fn sanitize_component(context: &str) -> String {
    let cleaned: String = context
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "default".to_string()
    } else {
        cleaned
    }
}

/// An upload running on a worker thread
pub struct UploadTask {
    file_name: String,
    receiver: Receiver<Result<UploadedFile, UploadError>>,
}

impl UploadTask {
    pub fn spawn(uploader: Arc<dyn FileUploader>, file: PathBuf, context: String) -> Self {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (sender, receiver) = mpsc::channel();

        debug!("Starting upload of {} for {}", file.display(), context);
        thread::spawn(move || {
            let result = uploader.upload(&file, &context);
            // The widget may have been reset and dropped the receiver
            let _ = sender.send(result);
        });

        Self { file_name, receiver }
    }

    /// Display name of the file being uploaded
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Non-blocking check; `None` while the worker is still running
    pub fn poll(&self) -> Option<Result<UploadedFile, UploadError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(UploadError::Disconnected)),
        }
    }
}
