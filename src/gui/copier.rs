//! Empty file copier window

use anyhow::Result;
use eframe::egui;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use tracing::{error, info};

use crate::config::{AppConfig, ConfigFile};
use crate::constants::window::{COPIER_SIZE, COPIER_TITLE};
use crate::gui::components::message::MessageBox;
use crate::gui::components::path_field;
use crate::gui::constants::*;
use crate::gui::dialogs::{self, Picker};
use crate::tools::copier::{self, CopyError, CopyEvent, CopyReport};

const READY: &str = "Ready to copy files";

enum CopierMessage {
    Event(CopyEvent),
    Finished(Result<CopyReport, CopyError>),
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Source,
    Target,
}

pub struct CopierApp {
    file: ConfigFile,
    source: String,
    target: String,
    status: String,
    /// 0.0..=1.0
    progress: f32,
    worker: Option<Receiver<CopierMessage>>,
    picker: Option<Picker<Slot>>,
    message: Option<MessageBox>,
}

impl CopierApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, file: ConfigFile) -> Self {
        Self {
            source: config.copier.last_source,
            target: config.copier.last_target,
            file,
            status: READY.to_string(),
            progress: 0.0,
            worker: None,
            picker: None,
            message: None,
        }
    }

    fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    fn start(&mut self, ctx: &egui::Context) {
        let (source, target) = match copier::validate(&self.source, &self.target) {
            Ok(paths) => paths,
            Err(e) => {
                self.message = Some(MessageBox::warning(e.title(), e.to_string()));
                return;
            }
        };

        let (tx, rx) = mpsc::channel();
        let repaint = ctx.clone();
        let spawned = thread::Builder::new().name("empty-copier".into()).spawn(move || {
            let events = tx.clone();
            let notify = repaint.clone();
            let result = copier::create_empty_copies(&source, &target, move |event| {
                let _ = events.send(CopierMessage::Event(event));
                notify.request_repaint();
            });
            let _ = tx.send(CopierMessage::Finished(result));
            repaint.request_repaint();
        });

        match spawned {
            Ok(_) => {
                self.progress = 0.0;
                self.worker = Some(rx);
            }
            Err(e) => {
                error!(error = %e, "failed to start copier thread");
                self.status = format!("Error: {e}");
                self.message = Some(MessageBox::error("Error", e.to_string()));
            }
        }
    }

    fn poll_worker(&mut self) {
        let Some(rx) = &self.worker else {
            return;
        };
        let mut finished = None;
        while let Ok(message) = rx.try_recv() {
            match message {
                CopierMessage::Event(CopyEvent::Status(text)) => self.status = text,
                CopierMessage::Event(CopyEvent::Progress(percent)) => self.progress = percent / 100.0,
                CopierMessage::Finished(result) => finished = Some(result),
            }
        }

        match finished {
            Some(Ok(report)) => {
                self.worker = None;
                if report.created > 0 {
                    self.message = Some(MessageBox::info(
                        "Complete",
                        format!("Successfully created {} empty files.", report.created),
                    ));
                }
            }
            Some(Err(e)) => {
                self.worker = None;
                self.status = format!("Error: {e}");
                self.message = Some(MessageBox::error("Error", e.to_string()));
            }
            None => {}
        }
    }

    fn poll_picker(&mut self) {
        let Some(picker) = &self.picker else {
            return;
        };
        let Some(answer) = picker.poll() else {
            return;
        };
        let slot = picker.slot;
        self.picker = None;
        if let Some(path) = answer {
            let path = path.display().to_string();
            match slot {
                Slot::Source => self.source = path,
                Slot::Target => self.target = path,
            }
        }
    }
}

impl eframe::App for CopierApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        self.poll_picker();

        let idle = !self.is_running() && self.picker.is_none();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Source Directory:");
            if path_field::ui(ui, &mut self.source, "Browse", idle) {
                self.picker = Some(dialogs::pick_folder(ctx, Slot::Source, &self.source));
            }
            ui.add_space(ITEM_SPACING);

            ui.label("Target Directory:");
            if path_field::ui(ui, &mut self.target, "Browse", idle) {
                self.picker = Some(dialogs::pick_folder(ctx, Slot::Target, &self.target));
            }
            ui.add_space(SECTION_SPACING);

            ui.add(egui::ProgressBar::new(self.progress).show_percentage());
            ui.label(&self.status);
            ui.add_space(ITEM_SPACING);

            ui.vertical_centered(|ui| {
                if ui
                    .add_enabled(!self.is_running(), egui::Button::new("Create Empty Copies"))
                    .clicked()
                {
                    self.start(ctx);
                }
            });
        });

        if let Some(message) = &self.message {
            if message.show(ctx).is_some() {
                self.message = None;
            }
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let source = self.source.trim().to_string();
        let target = self.target.trim().to_string();
        match self.file.update(|stored| {
            stored.copier.last_source = source;
            stored.copier.last_target = target;
        }) {
            Ok(true) => info!(path = %self.file.path().display(), "saved copier directories"),
            Ok(false) => {}
            Err(e) => error!(error = ?e, "failed to save config"),
        }
    }
}

pub fn run_copier(config: AppConfig, file: ConfigFile) -> Result<()> {
    let options = super::native_options(COPIER_TITLE, COPIER_SIZE, None);
    super::run_app(COPIER_TITLE, options, move |cc| CopierApp::new(cc, config, file))
}
