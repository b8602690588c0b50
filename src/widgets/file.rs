//! File picker with client-side extension check and background upload
//!
//! The widget tracks two values per file: the name shown to the user and
//! the storage path the uploader resolved. Both travel in the same payload
//! (`value` and `file_path`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info, warn};

use super::{show_error, FieldWidget, WidgetEnv, WidgetKind};
use crate::error::FieldError;
use crate::fields::{FieldDescriptor, FieldValue, UpdatePayload};
use crate::upload::{FileUploader, UploadTask};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickedFile {
    pub display_name: String,
    pub file_path: String,
}

pub struct FilePickerWidget {
    name: String,
    suffixes: Vec<String>,
    list: bool,
    files: Vec<PickedFile>,
    pending: Option<UploadTask>,
    error: Option<FieldError>,
}

impl FilePickerWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue, file_path: Option<&FieldValue>) -> Self {
        let names = value.to_string_list();
        let paths = file_path.map(FieldValue::to_string_list).unwrap_or_default();
        let files = names
            .into_iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(i, display_name)| PickedFile {
                display_name,
                file_path: paths.get(i).cloned().unwrap_or_default(),
            })
            .collect();

        Self {
            name: descriptor.name.clone(),
            suffixes: descriptor.suffixes.clone(),
            list: descriptor.list,
            files,
            pending: None,
            error: None,
        }
    }

    pub fn files(&self) -> &[PickedFile] {
        &self.files
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Validate and start uploading `path`. Nothing is emitted until the
    /// upload finishes; see [`FilePickerWidget::poll`].
    pub fn select(&mut self, path: &Path, uploader: Arc<dyn FileUploader>) -> Result<(), FieldError> {
        if self.pending.is_some() {
            warn!("Upload already running for '{}', ignoring {}", self.name, path.display());
            return Ok(());
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !accepts(&file_name, &self.suffixes) {
            let error = FieldError::InvalidFileType {
                file_name,
                allowed: self.suffixes.clone(),
            };
            warn!("{}", error);
            self.error = Some(error.clone());
            return Err(error);
        }

        self.error = None;
        self.pending = Some(UploadTask::spawn(uploader, path.to_path_buf(), self.name.clone()));
        Ok(())
    }

    /// Collect a finished upload. Failures clear the loading state, log, and
    /// show a banner without emitting.
    pub fn poll(&mut self) -> Option<UpdatePayload> {
        let result = self.pending.as_ref()?.poll()?;
        let task = self.pending.take()?;

        match result {
            Ok(uploaded) => {
                info!("Field '{}' received {}", self.name, uploaded.file_path);
                let picked = PickedFile {
                    display_name: task.file_name().to_string(),
                    file_path: uploaded.file_path,
                };
                let mut next = if self.list { self.files.clone() } else { Vec::new() };
                next.push(picked);
                self.files = next;
                Some(self.payload())
            }
            Err(e) => {
                error!("Upload for field '{}' failed: {}", self.name, e);
                self.error = Some(FieldError::Upload(e.to_string()));
                None
            }
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<UpdatePayload> {
        if index >= self.files.len() {
            return None;
        }
        let mut next = self.files.clone();
        next.remove(index);
        self.files = next;
        Some(self.payload())
    }

    fn payload(&self) -> UpdatePayload {
        if self.list {
            let names = self.files.iter().map(|f| f.display_name.clone()).collect();
            let paths: Vec<String> = self.files.iter().map(|f| f.file_path.clone()).collect();
            UpdatePayload::new(FieldValue::List(names)).with_file_path(FieldValue::List(paths))
        } else {
            let file = self.files.first().cloned().unwrap_or_default();
            UpdatePayload::new(file.display_name).with_file_path(file.file_path)
        }
    }

    fn pick_with_dialog(&self) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new();
        let extensions: Vec<String> = self.suffixes.iter().map(|s| normalize_suffix(s)).collect();
        if !extensions.is_empty() {
            dialog = dialog.add_filter("Allowed files", &extensions);
        }
        dialog.pick_file()
    }
}

fn normalize_suffix(suffix: &str) -> String {
    suffix.trim().trim_start_matches('.').to_lowercase()
}

/// True when `file_name` ends in one of `suffixes`. Suffixes may be given
/// with or without the leading dot; an empty list accepts everything.
pub fn accepts(file_name: &str, suffixes: &[String]) -> bool {
    if suffixes.is_empty() {
        return true;
    }
    let lower = file_name.to_lowercase();
    suffixes
        .iter()
        .map(|s| normalize_suffix(s))
        .filter(|s| !s.is_empty())
        .any(|s| lower.ends_with(&format!(".{}", s)))
}

impl FieldWidget for FilePickerWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::FilePicker
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let mut change = self.poll();
        if self.is_loading() {
            ui.ctx().request_repaint();
        }

        let mut remove_index = None;
        ui.add_enabled_ui(!env.disabled, |ui| {
            for (index, file) in self.files.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(format!("📄 {}", file.display_name))
                        .on_hover_text(file.file_path.as_str());
                    if ui.small_button("✖").clicked() {
                        remove_index = Some(index);
                    }
                });
            }

            ui.horizontal(|ui| {
                if let Some(task) = &self.pending {
                    ui.spinner();
                    ui.label(format!("Uploading {}...", task.file_name()));
                } else if ui.button("📁 Select file").clicked() {
                    match (self.pick_with_dialog(), env.uploader.clone()) {
                        (Some(path), Some(uploader)) => {
                            // Errors are already stored for the banner
                            let _ = self.select(&path, uploader);
                        }
                        (Some(_), None) => {
                            self.error = Some(FieldError::Upload("no upload service configured".to_string()));
                        }
                        (None, _) => {}
                    }
                }
            });
        });

        if let Some(index) = remove_index {
            change = self.remove(index).or(change);
        }
        if let Some(error) = &self.error {
            show_error(ui, error);
        }
        change
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.files = empty
            .to_string_list()
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(|display_name| PickedFile {
                display_name,
                file_path: String::new(),
            })
            .collect();
        // A late upload result must not overwrite the reset value
        self.pending = None;
        self.error = None;
    }

    fn value(&self) -> FieldValue {
        self.payload().value
    }

    fn file_path(&self) -> Option<FieldValue> {
        self.payload().file_path
    }

    fn is_busy(&self) -> bool {
        self.is_loading()
    }

    fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use crate::fields::TypeTag;
    use crate::upload::UploadedFile;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingUploader {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FileUploader for RecordingUploader {
        fn upload(&self, file: &Path, context: &str) -> Result<UploadedFile, UploadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(UploadError::NotFound {
                    path: file.display().to_string(),
                });
            }
            Ok(UploadedFile {
                file_path: format!("{}/{}", context, file.file_name().unwrap().to_string_lossy()),
            })
        }
    }

    fn picker(list: bool) -> FilePickerWidget {
        let descriptor = FieldDescriptor::new("document", TypeTag::File)
            .with_suffixes([".pdf", ".csv"])
            .with_list(list);
        FilePickerWidget::new(&descriptor, &FieldValue::text("old.pdf"), Some(&FieldValue::text("flows/old.pdf")))
    }

    fn wait_for_payload(widget: &mut FilePickerWidget) -> Option<UpdatePayload> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while widget.is_loading() {
            if let Some(payload) = widget.poll() {
                return Some(payload);
            }
            assert!(Instant::now() < deadline, "upload did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_accepts_suffixes_with_or_without_dot() {
        let suffixes = vec![".pdf".to_string(), "CSV".to_string()];
        assert!(accepts("report.PDF", &suffixes));
        assert!(accepts("data.csv", &suffixes));
        assert!(!accepts("notes.txt", &suffixes));
        assert!(!accepts("pdf", &suffixes));
        assert!(accepts("anything.bin", &[]));
    }

    #[test]
    fn test_wrong_extension_never_uploads() {
        let uploader = Arc::new(RecordingUploader::default());
        let mut w = picker(false);

        let err = w.select(Path::new("/tmp/image.png"), uploader.clone()).unwrap_err();
        assert_eq!(
            err,
            FieldError::InvalidFileType {
                file_name: "image.png".into(),
                allowed: vec![".pdf".into(), ".csv".into()],
            }
        );
        assert!(err.to_string().contains(".pdf, .csv"));
        assert!(!w.is_loading());
        assert!(w.poll().is_none());
        assert_eq!(uploader.calls.load(Ordering::SeqCst), 0);
        assert_eq!(w.files()[0].display_name, "old.pdf");
    }

    #[test]
    fn test_successful_upload_emits_name_and_path() {
        let uploader = Arc::new(RecordingUploader::default());
        let mut w = picker(false);

        w.select(Path::new("/tmp/new.csv"), uploader).unwrap();
        assert!(w.is_loading());

        let payload = wait_for_payload(&mut w).unwrap();
        assert_eq!(payload.value, FieldValue::text("new.csv"));
        assert_eq!(payload.file_path, Some(FieldValue::text("document/new.csv")));
        assert!(!w.is_loading());
    }

    #[test]
    fn test_failed_upload_clears_loading_without_payload() {
        let uploader = Arc::new(RecordingUploader {
            fail: true,
            ..Default::default()
        });
        let mut w = picker(false);

        w.select(Path::new("/tmp/new.pdf"), uploader).unwrap();
        assert!(wait_for_payload(&mut w).is_none());
        assert!(matches!(w.error(), Some(FieldError::Upload(_))));
        assert_eq!(w.files()[0].display_name, "old.pdf");
    }

    #[test]
    fn test_list_variant_appends() {
        let uploader = Arc::new(RecordingUploader::default());
        let mut w = picker(true);

        w.select(Path::new("/tmp/b.csv"), uploader).unwrap();
        let payload = wait_for_payload(&mut w).unwrap();
        assert_eq!(payload.value, FieldValue::List(vec!["old.pdf".into(), "b.csv".into()]));
        assert_eq!(
            payload.file_path,
            Some(FieldValue::List(vec!["flows/old.pdf".into(), "document/b.csv".into()]))
        );
    }

    #[test]
    fn test_reset_drops_pending_upload() {
        let uploader = Arc::new(RecordingUploader::default());
        let mut w = picker(false);
        w.select(Path::new("/tmp/new.csv"), uploader).unwrap();
        w.reset(&FieldValue::text(""));
        assert!(!w.is_loading());
        assert!(w.poll().is_none());
        assert!(w.files().is_empty());
    }
}
