//! Flowparams demo - parameter panel for a single node template
//!
//! Usage: `flowparams [--config <settings.json>] [template.json]`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eframe::egui;
use log::{error, info, warn};

use flowparams::{
    FileUploader, InMemoryGlobals, LocalUploader, NodeForm, PanelAction, ParameterPanel, Settings,
};

const DEMO_TEMPLATE: &str = include_str!("../demos/agent_node.json");

/// Parameter panel demo for a node template
#[derive(Debug, Parser)]
#[command(name = "flowparams", version, about = "Edit a node template's parameters")]
struct Args {
    /// Settings file (defaults to the per-user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Node template JSON; the built-in demo node when omitted
    template: Option<PathBuf>,
}

/// Main application state
struct FlowParamsApp {
    form: NodeForm,
    panel: ParameterPanel,
    globals: InMemoryGlobals,
    uploader: Arc<dyn FileUploader>,
    settings: Settings,
    status: Option<String>,
}

impl FlowParamsApp {
    fn new(form: NodeForm, settings: Settings) -> Self {
        let uploader: Arc<dyn FileUploader> = Arc::new(LocalUploader::new(settings.resolved_upload_dir()));
        Self {
            form,
            panel: ParameterPanel::new(),
            globals: settings.globals(),
            uploader,
            settings,
            status: None,
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) -> f32 {
        let response = egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("View", |ui| {
                    if ui.button("Parameters").clicked() {
                        self.panel.set_open(true);
                        ui.close_menu();
                    }
                });
                ui.separator();
                ui.label(format!("{} globals", self.globals.len()));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.weak(status);
                }
            });
        });
        response.response.rect.height()
    }

    /// Connection toggles and the current values of the form
    fn render_inspector(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.form.title);
            ui.label("Connected inputs are disabled and cleared:");

            let connections: Vec<(String, bool)> = self
                .form
                .fields()
                .iter()
                .map(|f| (f.descriptor.name.clone(), f.connected))
                .collect();
            ui.horizontal_wrapped(|ui| {
                for (name, mut connected) in connections {
                    if ui.checkbox(&mut connected, &name).changed() {
                        self.form.set_connected(&name, connected);
                    }
                }
            });

            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                let values = serde_json::to_string_pretty(&self.form.values_json()).unwrap_or_default();
                ui.monospace(values);
            });
        });
    }
}

impl eframe::App for FlowParamsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let menu_bar_height = self.render_menu_bar(ctx);
        self.render_inspector(ctx);

        let action = self.panel.render(
            ctx,
            &mut self.form,
            &mut self.globals,
            Arc::clone(&self.uploader),
            &self.settings,
            menu_bar_height,
        );
        match action {
            PanelAction::None => {}
            PanelAction::Close => info!("Parameter panel closed"),
            PanelAction::Refresh(field) => {
                info!("Refresh requested for '{}'", field);
                self.status = Some(format!("Refreshed {}", field));
            }
            PanelAction::Undo => self.status = Some(format!("{} undo steps left", self.form.history_len())),
        }
    }
}

fn load_settings(args: &Args) -> Settings {
    let path = match &args.config {
        Some(path) => Ok(path.clone()),
        None => Settings::default_path(),
    };
    match path.and_then(|path| Settings::load(&path)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            Settings::default()
        }
    }
}

fn load_form(args: &Args, settings: &Settings) -> NodeForm {
    let form = match &args.template {
        Some(path) => NodeForm::from_template_file(path),
        None => NodeForm::from_template_json(DEMO_TEMPLATE),
    };
    let form = form.unwrap_or_else(|e| {
        error!("Failed to load template: {}", e);
        warn!("Falling back to an empty form");
        NodeForm::new("Untitled", Vec::new())
    });
    form.with_history_depth(settings.history_depth)
}

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();
    let settings = load_settings(&args);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.log_level.as_str())).init();

    let form = load_form(&args, &settings);
    info!("Editing '{}' ({} fields)", form.title, form.fields().len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Flowparams",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(FlowParamsApp::new(form, settings)))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_config_and_template() {
        let args = Args::try_parse_from(["flowparams", "--config", "s.json", "node.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("s.json")));
        assert_eq!(args.template, Some(PathBuf::from("node.json")));
    }

    #[test]
    fn test_args_reject_bad_input() {
        assert!(Args::try_parse_from(["flowparams", "--config"]).is_err());
        assert!(Args::try_parse_from(["flowparams", "--unknown"]).is_err());
        let help = Args::try_parse_from(["flowparams", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_demo_template_is_valid() {
        let form = NodeForm::from_template_json(DEMO_TEMPLATE).unwrap();
        assert!(!form.fields().is_empty());
    }
}
