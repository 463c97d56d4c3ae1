//! Filename exporter window

use anyhow::Result;
use chrono::Local;
use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use tracing::{error, info};

use crate::config::{AppConfig, ConfigFile, exe_dir};
use crate::constants::window::{LISTER_MIN_SIZE, LISTER_SIZE, LISTER_TITLE};
use crate::gui::components::message::{Answer, MessageBox};
use crate::gui::components::{console, path_field};
use crate::gui::constants::*;
use crate::gui::dialogs::{self, Picker};
use crate::tools::lister::{self, ExportError};
use crate::tools::open_with_default_app;

const READY: &str = "Bereit. Bitte wählen Sie ein Verzeichnis und klicken Sie auf 'Dateinamen exportieren'.";
const BROWSE: &str = "Durchsuchen...";

enum ListerMessage {
    Status(String),
    Finished(Result<PathBuf, ExportError>),
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Folder,
    Output,
}

/// What the open dialog is asking about
enum Pending {
    Notice,
    OpenFile(PathBuf),
}

pub struct ListerApp {
    file: ConfigFile,
    folder: String,
    output: String,
    auto_output: bool,
    log: String,
    worker: Option<Receiver<ListerMessage>>,
    picker: Option<Picker<Slot>>,
    message: Option<(MessageBox, Pending)>,
}

impl ListerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, file: ConfigFile) -> Self {
        let folder = if config.lister.last_folder.trim().is_empty() {
            exe_dir().display().to_string()
        } else {
            config.lister.last_folder
        };
        let mut app = Self {
            folder,
            output: String::new(),
            auto_output: config.lister.auto_output,
            file,
            log: String::new(),
            worker: None,
            picker: None,
            message: None,
        };
        app.log_status(READY);
        app
    }

    fn log_status(&mut self, message: &str) {
        self.log
            .push_str(&format!("{} - {message}\n", Local::now().format("%H:%M:%S")));
    }

    fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    fn notice(&mut self, body: &str) {
        self.message = Some((MessageBox::error("Fehler", body), Pending::Notice));
    }

    fn start(&mut self, ctx: &egui::Context) {
        let folder = self.folder.trim().to_string();
        if folder.is_empty() {
            self.notice("Bitte wählen Sie ein Verzeichnis aus.");
            return;
        }

        let output = if self.auto_output {
            None
        } else {
            let output = self.output.trim();
            if output.is_empty() {
                self.notice("Bitte wählen Sie eine Ausgabedatei oder aktivieren Sie die automatische Generierung.");
                return;
            }
            Some(PathBuf::from(output))
        };

        self.log_status(&format!("Starte Export aus Verzeichnis: {folder}"));

        let (tx, rx) = mpsc::channel();
        let repaint = ctx.clone();
        let spawned = thread::Builder::new().name("filename-export".into()).spawn(move || {
            let status = tx.clone();
            let notify = repaint.clone();
            let result = lister::export_filenames_list(
                Path::new(&folder),
                output.as_deref(),
                Local::now(),
                move |text| {
                    let _ = status.send(ListerMessage::Status(text));
                    notify.request_repaint();
                },
            );
            let _ = tx.send(ListerMessage::Finished(result));
            repaint.request_repaint();
        });

        match spawned {
            Ok(_) => self.worker = Some(rx),
            Err(e) => {
                error!(error = %e, "failed to start export thread");
                self.log_status(&format!("Fehler während des Exports: {e}"));
            }
        }
    }

    fn poll_worker(&mut self) {
        let Some(rx) = self.worker.take() else {
            return;
        };
        let mut finished = None;
        while let Ok(message) = rx.try_recv() {
            match message {
                ListerMessage::Status(text) => self.log_status(&text),
                ListerMessage::Finished(result) => finished = Some(result),
            }
        }

        match finished {
            Some(Ok(path)) => {
                let body = format!(
                    "Dateiliste wurde exportiert nach:\n{}\n\nMöchten Sie die Datei öffnen?",
                    path.display()
                );
                self.message = Some((
                    MessageBox::question("Export erfolgreich", body, "Ja", "Nein"),
                    Pending::OpenFile(path),
                ));
            }
            // already reported through the status log
            Some(Err(_)) => {}
            None => self.worker = Some(rx),
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
                Slot::Folder => self.folder = path,
                Slot::Output => self.output = path,
            }
        }
    }

    fn browse_output(&mut self, ctx: &egui::Context) {
        let base = if self.output.trim().is_empty() {
            PathBuf::from(self.folder.trim())
        } else {
            PathBuf::from(self.output.trim())
        };
        let dir = base
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        self.picker = Some(dialogs::pick_save_file(ctx, Slot::Output, &dir, "filenames_list.txt"));
    }

    fn show_message(&mut self, ctx: &egui::Context) {
        let Some((message, _)) = &self.message else {
            return;
        };
        let Some(answer) = message.show(ctx) else {
            return;
        };
        let Some((_, pending)) = self.message.take() else {
            return;
        };
        if let (Pending::OpenFile(path), Answer::Yes) = (pending, answer) {
            info!(path = %path.display(), "opening exported list");
            if let Err(e) = open_with_default_app(&path) {
                error!(error = ?e, "failed to open exported list");
                self.log_status(&format!("Fehler beim Öffnen der Datei: {e}"));
            }
        }
    }
}

impl eframe::App for ListerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        self.poll_picker();

        let idle = !self.is_running() && self.picker.is_none();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Verzeichnis:");
            if path_field::ui(ui, &mut self.folder, BROWSE, idle) {
                self.picker = Some(dialogs::pick_folder(ctx, Slot::Folder, &self.folder));
            }
            ui.add_space(ITEM_SPACING);

            ui.label("Ausgabedatei:");
            if path_field::ui(ui, &mut self.output, BROWSE, idle && !self.auto_output) {
                self.browse_output(ctx);
            }
            ui.add_space(ITEM_SPACING);

            if ui
                .checkbox(&mut self.auto_output, "Ausgabedateinamen automatisch generieren")
                .changed()
                && self.auto_output
            {
                self.output.clear();
            }
            ui.add_space(SECTION_SPACING);

            ui.vertical_centered(|ui| {
                if ui
                    .add_enabled(!self.is_running(), egui::Button::new("Dateinamen exportieren"))
                    .clicked()
                {
                    self.start(ctx);
                }
            });
            ui.add_space(SECTION_SPACING);

            ui.label("Status:");
            console::ui(ui, "lister_status", &self.log);
        });

        self.show_message(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let folder = self.folder.trim().to_string();
        let auto_output = self.auto_output;
        match self.file.update(|stored| {
            stored.lister.last_folder = folder;
            stored.lister.auto_output = auto_output;
        }) {
            Ok(true) => info!(path = %self.file.path().display(), "saved exporter settings"),
            Ok(false) => {}
            Err(e) => error!(error = ?e, "failed to save config"),
        }
    }
}

pub fn run_lister(config: AppConfig, file: ConfigFile) -> Result<()> {
    let options = super::native_options(LISTER_TITLE, LISTER_SIZE, Some(LISTER_MIN_SIZE));
    super::run_app(LISTER_TITLE, options, move |cc| ListerApp::new(cc, config, file))
}
