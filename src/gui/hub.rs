//! Utility hub window: module list, function chooser, parameter form, console

use anyhow::Result;
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;
use tracing::{info, warn};

use crate::constants::window::{HUB_SIZE, HUB_TITLE};
use crate::gui::components::message::MessageBox;
use crate::gui::components::{console, param_form};
use crate::gui::constants::*;
use crate::hub::{Console, ConsoleEvent, Registry, Runner, Selection};

pub struct HubApp {
    plugin_dirs: Vec<PathBuf>,
    registry: Registry,
    selection: Selection,
    console: Console,
    events: Receiver<ConsoleEvent>,
    console_text: String,
    runner: Runner,
    message: Option<MessageBox>,
}

impl HubApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, plugin_dirs: Vec<PathBuf>) -> Self {
        let (console, events) = Console::new();
        let registry = Registry::discover(&plugin_dirs, &console);
        Self {
            plugin_dirs,
            registry,
            selection: Selection::default(),
            console,
            events,
            console_text: String::new(),
            runner: Runner::new(),
            message: None,
        }
    }

    fn reload(&mut self) {
        info!(dirs = ?self.plugin_dirs, "reloading utility modules");
        self.registry = Registry::discover(&self.plugin_dirs, &self.console);
        self.selection.reset();
    }

    fn execute(&mut self) {
        let Some(function) = self.selection.function(&self.registry).cloned() else {
            self.message = Some(MessageBox::warning("Warning", "No function selected"));
            return;
        };

        let args = match self.selection.form.coerce() {
            Ok(args) => args,
            Err(e) => {
                self.console_text.push_str(&format!("Error: {e}\n"));
                return;
            }
        };

        self.console_text.clear();
        if let Err(e) = self.runner.spawn(function, args, self.console.clone()) {
            warn!(error = %e, "could not start execution");
            self.console_text.push_str(&format!("Error: {e}\n"));
        }
    }

    fn drain_console(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                ConsoleEvent::Text(text) => self.console_text.push_str(&text),
                ConsoleEvent::Finished { success } => {
                    info!(success, "execution finished");
                }
            }
        }
    }

    fn module_list(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Available Utilities").strong());
        ui.add_space(ITEM_SPACING);

        let names: Vec<String> = self.registry.names().map(String::from).collect();
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("module_list")
            .max_height(ui.available_height() - 40.0)
            .show(ui, |ui| {
                if self.registry.is_empty() {
                    ui.label(egui::RichText::new("No utilities loaded").italics().weak());
                }
                for name in &names {
                    let selected = self.selection.module_name() == Some(name.as_str());
                    if ui.selectable_label(selected, name).clicked() {
                        clicked = Some(name.clone());
                    }
                }
            });
        if let Some(name) = clicked {
            self.selection.select_module(&self.registry, &name);
        }

        ui.add_space(ITEM_SPACING);
        if ui
            .add_enabled(!self.runner.is_running(), egui::Button::new("🔄 Reload"))
            .clicked()
        {
            self.reload();
        }
    }

    fn details(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Utility Information").strong());
            if let Some(module) = self.selection.module(&self.registry) {
                ui.label(egui::RichText::new(&module.name).heading());
                ui.label(&module.description);
            }
        });

        ui.add_space(ITEM_SPACING);

        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Available Functions").strong());
            let functions: Vec<String> = self
                .selection
                .module(&self.registry)
                .map(|module| module.function_names().map(String::from).collect())
                .unwrap_or_default();

            let mut chosen = None;
            egui::ComboBox::from_id_salt("function_combo")
                .width(ui.available_width())
                .selected_text(self.selection.function_name().unwrap_or_default().to_string())
                .show_ui(ui, |ui| {
                    for name in &functions {
                        let selected = self.selection.function_name() == Some(name.as_str());
                        if ui.selectable_label(selected, name).clicked() {
                            chosen = Some(name.clone());
                        }
                    }
                });
            if let Some(name) = chosen {
                self.selection.select_function(&self.registry, &name);
            }

            if let Some(function) = self.selection.function(&self.registry) {
                if !function.spec().doc.is_empty() {
                    ui.label(egui::RichText::new(&function.spec().doc).small().weak());
                }
            }
        });

        ui.add_space(ITEM_SPACING);

        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Parameters").strong());
            ui.add_space(ITEM_SPACING);
            param_form::ui(ui, &mut self.selection.form);
        });

        ui.add_space(ITEM_SPACING);
        ui.vertical_centered(|ui| {
            if ui
                .add_enabled(!self.runner.is_running(), egui::Button::new("Execute"))
                .clicked()
            {
                self.execute();
            }
        });
        ui.add_space(ITEM_SPACING);

        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Output Console").strong());
            console::ui(ui, "hub_console", &self.console_text);
        });
    }
}

impl eframe::App for HubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_console();

        egui::SidePanel::left("utilities")
            .resizable(true)
            .default_width(230.0)
            .show(ctx, |ui| self.module_list(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.details(ui));

        if let Some(message) = &self.message {
            if message.show(ctx).is_some() {
                self.message = None;
            }
        }

        if self.runner.is_running() {
            ctx.request_repaint_after(Duration::from_millis(WORKER_REPAINT_MS));
        }
    }
}

pub fn run_hub(plugin_dirs: Vec<PathBuf>) -> Result<()> {
    let options = super::native_options(HUB_TITLE, HUB_SIZE, None);
    super::run_app(HUB_TITLE, options, move |cc| HubApp::new(cc, plugin_dirs))
}
