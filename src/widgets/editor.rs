//! Prompt and code fields, edited in a modal window opened on demand

use log::debug;

use super::{show_error, FieldWidget, WidgetEnv, WidgetKind};
use crate::constants::widget::{EDITOR_ROWS, EDITOR_SIZE};
use crate::error::FieldError;
use crate::fields::{FieldDescriptor, FieldValue, UpdatePayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Prompt,
    Code,
}

#[derive(Debug, Clone)]
pub struct TextEditorWidget {
    name: String,
    title: String,
    mode: EditorMode,
    text: String,
    /// Working copy while the modal is open
    draft: Option<String>,
    error: Option<FieldError>,
}

impl TextEditorWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue, mode: EditorMode) -> Self {
        Self {
            name: descriptor.name.clone(),
            title: descriptor.label().to_string(),
            mode,
            text: value.text_or_empty(),
            draft: None,
            error: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn open(&mut self) {
        self.draft = Some(self.text.clone());
        self.error = None;
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        if self.draft.is_some() {
            self.draft = Some(text.into());
        }
    }

    /// Variables referenced by the current draft (prompt mode only)
    pub fn variables(&self) -> Result<Vec<String>, FieldError> {
        match (self.mode, &self.draft) {
            (EditorMode::Prompt, Some(draft)) => extract_prompt_variables(draft),
            (EditorMode::Prompt, None) => extract_prompt_variables(&self.text),
            (EditorMode::Code, _) => Ok(Vec::new()),
        }
    }

    /// Commit the draft. Read-only editors never save.
    pub fn save(&mut self, read_only: bool) -> Result<Option<UpdatePayload>, FieldError> {
        if read_only {
            self.draft = None;
            return Ok(None);
        }
        let Some(draft) = self.draft.clone() else {
            return Ok(None);
        };
        if let Err(error) = self.variables() {
            self.error = Some(error.clone());
            return Err(error);
        }

        debug!("Saved {:?} field '{}'", self.mode, self.name);
        self.draft = None;
        self.error = None;
        self.text = draft;
        Ok(Some(UpdatePayload::new(self.text.clone())))
    }

    pub fn cancel(&mut self) {
        self.draft = None;
        self.error = None;
    }

    fn preview(&self, max_chars: usize) -> String {
        let first_line = self.text.lines().next().unwrap_or("");
        let mut preview: String = first_line.chars().take(max_chars).collect();
        if preview.chars().count() < self.text.chars().count() {
            preview.push('…');
        }
        preview
    }

    fn show_modal(&mut self, ctx: &egui::Context, read_only: bool) -> Option<UpdatePayload> {
        let mut change = None;
        let mut open = true;
        let mut close = false;
        let title = match self.mode {
            EditorMode::Prompt => format!("Edit Prompt: {}", self.title),
            EditorMode::Code => format!("Edit Code: {}", self.title),
        };

        egui::Window::new(title)
            .id(egui::Id::new(("text_editor", self.name.as_str())))
            .default_size(EDITOR_SIZE)
            .collapsible(false)
            .resizable(true)
            .open(&mut open)
            .show(ctx, |ui| {
                let mut draft = self.draft.clone().unwrap_or_default();
                let mut edit = egui::TextEdit::multiline(&mut draft)
                    .desired_rows(EDITOR_ROWS)
                    .desired_width(f32::INFINITY)
                    .interactive(!read_only);
                if self.mode == EditorMode::Code {
                    edit = edit.code_editor();
                }
                if ui.add(edit).changed() {
                    self.set_draft(draft);
                }

                if self.mode == EditorMode::Prompt {
                    match self.variables() {
                        Ok(variables) if !variables.is_empty() => {
                            ui.label(format!("Prompt variables: {}", variables.join(", ")));
                        }
                        Ok(_) => {}
                        Err(error) => show_error(ui, &error),
                    }
                }
                if let Some(error) = &self.error {
                    show_error(ui, error);
                }
                if read_only {
                    ui.weak("Value is provided by a connection");
                }

                ui.horizontal(|ui| {
                    if !read_only && ui.button("Save").clicked() {
                        if let Ok(saved) = self.save(read_only) {
                            change = saved;
                        }
                    }
                    if ui.button(if read_only { "Close" } else { "Cancel" }).clicked() {
                        close = true;
                    }
                });
            });

        if close || !open {
            self.cancel();
        }
        change
    }
}

/// Names referenced as `{name}` in a prompt template, in order of first use.
///
/// `{{` and `}}` are literal braces. A name must be an identifier.
pub fn extract_prompt_variables(template: &str) -> Result<Vec<String>, FieldError> {
    let mut variables: Vec<String> = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    name.push(next);
                }
                if !closed {
                    return Err(FieldError::UnclosedPromptVariable);
                }
                let name = name.trim().to_string();
                if !is_identifier(&name) {
                    return Err(FieldError::InvalidPromptVariable { name });
                }
                if !variables.contains(&name) {
                    variables.push(name);
                }
            }
            _ => {}
        }
    }
    Ok(variables)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl FieldWidget for TextEditorWidget {
    fn kind(&self) -> WidgetKind {
        match self.mode {
            EditorMode::Prompt => WidgetKind::PromptEditor,
            EditorMode::Code => WidgetKind::CodeEditor,
        }
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let read_only = env.disabled;

        ui.horizontal(|ui| {
            let preview = self.preview(env.preview_chars);
            if preview.is_empty() {
                ui.weak("Empty");
            } else if self.mode == EditorMode::Code {
                ui.monospace(preview);
            } else {
                ui.label(preview);
            }
            let label = if read_only { "👁 View" } else { "✏ Edit" };
            if ui.small_button(label).clicked() && !self.is_open() {
                self.open();
            }
        });

        if self.is_open() {
            self.show_modal(ui.ctx(), read_only)
        } else {
            None
        }
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.text = empty.text_or_empty();
        self.draft = None;
        self.error = None;
    }

    fn value(&self) -> FieldValue {
        FieldValue::Text(self.text.clone())
    }

    fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }
}
