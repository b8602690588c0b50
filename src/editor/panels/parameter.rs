//! Parameter panel implementation
//!
//! One window listing every field of a node form, each drawn through the
//! dispatcher. Editors are cached per field name so widgets keep their local
//! editing state between frames.

use std::collections::HashMap;
use std::sync::Arc;

use egui::{Color32, Context, Pos2, RichText};
use log::{debug, info, warn};

use crate::config::Settings;
use crate::constants::panel::{DEFAULT_PARAMETER_SIZE, EDGE_MARGIN, MAX_PARAMETER_SIZE, MIN_PARAMETER_SIZE};
use crate::dispatch::FieldEditor;
use crate::editor::panels::PanelAction;
use crate::fields::FieldChange;
use crate::form::NodeForm;
use crate::globals::GlobalVariables;
use crate::upload::FileUploader;
use crate::widgets::WidgetEnv;

/// Parameter panel renderer
pub struct ParameterPanel {
    editors: HashMap<String, FieldEditor>,
    /// Form revision the cached editors reflect
    seen_revision: Option<u64>,
    open: bool,
}

impl Default for ParameterPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterPanel {
    pub fn new() -> Self {
        Self {
            editors: HashMap::new(),
            seen_revision: None,
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn editor(&self, field: &str) -> Option<&FieldEditor> {
        self.editors.get(field)
    }

    /// Bring the editors in line with the form without drawing: rebuild them
    /// after edits made elsewhere (undo, reload), follow connection state and
    /// apply any disabled resets. Returns the number of resets applied.
    pub fn sync(&mut self, form: &mut NodeForm) -> usize {
        self.refresh_cache(form);
        let mut changes = Vec::new();
        for field in form.fields() {
            if let Some(editor) = self.editors.get_mut(&field.descriptor.name) {
                editor.sync(&mut changes);
            }
        }
        let count = changes.len();
        self.commit(form, changes);
        count
    }

    fn refresh_cache(&mut self, form: &NodeForm) {
        if self.seen_revision != Some(form.revision()) {
            if self.seen_revision.is_some() {
                debug!("Form '{}' changed outside the panel, rebuilding editors", form.title);
            }
            // Editors with an upload in flight survive so its result still lands
            let carried: HashMap<String, FieldEditor> = self
                .editors
                .drain()
                .filter(|(name, editor)| editor.is_busy() && form.field(name).is_some())
                .collect();
            for name in carried.keys() {
                warn!("Field '{}' kept its editor across a rebuild; an upload is still running", name);
            }
            self.editors = carried;
            self.seen_revision = Some(form.revision());
        }
        for field in form.fields() {
            self.editors
                .entry(field.descriptor.name.clone())
                .or_insert_with(|| {
                    FieldEditor::new(
                        field.descriptor.clone(),
                        &field.value,
                        field.file_path.as_ref(),
                        field.connected,
                    )
                })
                .set_disabled(field.connected);
        }
    }

    fn commit(&mut self, form: &mut NodeForm, changes: Vec<FieldChange>) {
        for change in changes {
            form.apply(change);
        }
        self.seen_revision = Some(form.revision());
    }

    /// Render the panel window for `form`
    pub fn render(
        &mut self,
        ctx: &Context,
        form: &mut NodeForm,
        globals: &mut dyn GlobalVariables,
        uploader: Arc<dyn FileUploader>,
        settings: &Settings,
        menu_bar_height: f32,
    ) -> PanelAction {
        if !self.open {
            return PanelAction::None;
        }
        self.refresh_cache(form);

        let mut panel_action = PanelAction::None;
        let mut changes = Vec::new();
        let mut window_open = self.open;

        // Top right corner, close to edge
        let screen_rect = ctx.screen_rect();
        let position = Pos2::new(
            screen_rect.max.x - EDGE_MARGIN,
            screen_rect.min.y + menu_bar_height + EDGE_MARGIN,
        );

        let window_title = format!("{} Parameters", form.title);
        egui::Window::new(window_title)
            .id(egui::Id::new("parameter_panel"))
            .default_pos(position)
            .default_size(DEFAULT_PARAMETER_SIZE)
            .min_size(MIN_PARAMETER_SIZE)
            .max_size(MAX_PARAMETER_SIZE)
            .resizable(true)
            .collapsible(true)
            .open(&mut window_open)
            .show(ctx, |ui| {
                let control_action = Self::render_panel_controls(ui, form);
                if control_action != PanelAction::None {
                    panel_action = control_action;
                }

                ui.separator();

                egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    egui::Frame::new()
                        .inner_margin(egui::Margin::same(8))
                        .fill(Color32::from_gray(40))
                        .corner_radius(4)
                        .show(ui, |ui| {
                            let field_action = self.render_fields(
                                ui,
                                form,
                                globals,
                                &uploader,
                                settings.preview_chars,
                                &mut changes,
                            );
                            if field_action != PanelAction::None {
                                panel_action = field_action;
                            }
                        });
                });
            });

        self.commit(form, changes);

        if panel_action == PanelAction::Undo && form.undo() {
            info!("Undid last change on '{}'", form.title);
        }

        self.open = window_open;
        if !window_open {
            panel_action = PanelAction::Close;
        }

        panel_action
    }

    /// Render panel controls (undo)
    fn render_panel_controls(ui: &mut egui::Ui, form: &NodeForm) -> PanelAction {
        let mut panel_action = PanelAction::None;
        ui.horizontal(|ui| {
            ui.label(RichText::new(&form.title).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let undo = ui
                    .add_enabled(form.can_undo(), egui::Button::new("↶ Undo"))
                    .on_hover_text(format!("{} checkpoints", form.history_len()));
                if undo.clicked() {
                    panel_action = PanelAction::Undo;
                }
            });
        });
        panel_action
    }

    fn render_fields(
        &mut self,
        ui: &mut egui::Ui,
        form: &NodeForm,
        globals: &mut dyn GlobalVariables,
        uploader: &Arc<dyn FileUploader>,
        preview_chars: usize,
        changes: &mut Vec<FieldChange>,
    ) -> PanelAction {
        let mut panel_action = PanelAction::None;

        if form.fields().is_empty() {
            ui.weak("This node has no parameters");
            return panel_action;
        }

        for field in form.fields() {
            let descriptor = &field.descriptor;
            let Some(editor) = self.editors.get_mut(&descriptor.name) else {
                continue;
            };

            ui.horizontal(|ui| {
                let label = if descriptor.required {
                    format!("{} *", descriptor.label())
                } else {
                    descriptor.label().to_string()
                };
                let response = ui.label(RichText::new(label).strong());
                if !descriptor.info.is_empty() {
                    response.on_hover_text(&descriptor.info);
                }
                if field.connected {
                    ui.weak("connected");
                }
                if descriptor.refreshable {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let refresh = ui
                            .add_enabled(!field.connected, egui::Button::new("⟳").small())
                            .on_hover_text("Refresh");
                        if refresh.clicked() {
                            panel_action = PanelAction::Refresh(descriptor.name.clone());
                        }
                    });
                }
            });

            let mut env = WidgetEnv::new(field.connected)
                .with_globals(&mut *globals)
                .with_uploader(Arc::clone(uploader));
            env.preview_chars = preview_chars;
            ui.push_id(descriptor.name.as_str(), |ui| {
                editor.show(ui, &mut env, changes);
            });
            ui.add_space(6.0);
        }

        panel_action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{mpsc, Mutex};

    use crate::error::UploadError;
    use crate::fields::{FieldDescriptor, FieldValue, TypeTag, UpdatePayload};
    use crate::form::FormField;
    use crate::upload::UploadedFile;
    use crate::widgets::{FieldWidget, FilePickerWidget};

    /// Holds every upload until the test releases it
    struct GatedUploader {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl FileUploader for GatedUploader {
        fn upload(&self, file: &Path, context: &str) -> Result<UploadedFile, UploadError> {
            let released = self.gate.lock().map(|gate| gate.recv().is_ok()).unwrap_or(false);
            if !released {
                return Err(UploadError::NotFound {
                    path: file.display().to_string(),
                });
            }
            Ok(UploadedFile {
                file_path: format!("{}/{}", context, file.display()),
            })
        }
    }

    fn form() -> NodeForm {
        NodeForm::new(
            "Loader",
            vec![
                FormField::new(FieldDescriptor::new("name", TypeTag::Str), FieldValue::text("a")),
                FormField::new(
                    FieldDescriptor::new("doc", TypeTag::File).with_suffixes(["pdf"]),
                    FieldValue::text(""),
                ),
            ],
        )
    }

    #[test]
    fn test_external_edit_rebuilds_editors() {
        let mut form = form();
        let mut panel = ParameterPanel::new();
        panel.sync(&mut form);

        form.apply(FieldChange::new("name", UpdatePayload::new("b")));
        panel.sync(&mut form);
        assert_eq!(panel.editor("name").unwrap().widget().value(), FieldValue::text("b"));

        assert!(form.undo());
        panel.sync(&mut form);
        assert_eq!(panel.editor("name").unwrap().widget().value(), FieldValue::text("a"));
        assert!(!panel.editor("doc").unwrap().is_busy());
    }

    #[test]
    fn test_rebuild_keeps_editor_with_running_upload() {
        let mut form = form();
        let mut panel = ParameterPanel::new();
        panel.sync(&mut form);

        let (release, gate) = mpsc::channel();
        let uploader: Arc<dyn FileUploader> = Arc::new(GatedUploader { gate: Mutex::new(gate) });
        let descriptor = form.field("doc").unwrap().descriptor.clone();
        let mut picker = FilePickerWidget::new(&descriptor, &FieldValue::text(""), None);
        picker.select(Path::new("report.pdf"), uploader).unwrap();
        assert!(picker.is_busy());
        panel
            .editors
            .insert("doc".to_string(), FieldEditor::with_widget(descriptor, Box::new(picker), false));

        form.apply(FieldChange::new("name", UpdatePayload::new("b")));
        assert!(form.undo());
        assert_eq!(panel.sync(&mut form), 0);

        assert!(panel.editor("doc").unwrap().is_busy());
        assert_eq!(panel.editor("name").unwrap().widget().value(), FieldValue::text("a"));

        // Connecting the field resets it, which drops the upload
        form.set_connected("doc", true);
        assert_eq!(panel.sync(&mut form), 1);
        assert!(!panel.editor("doc").unwrap().is_busy());
        drop(release);
    }
}
