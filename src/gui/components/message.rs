//! Modal message dialogs (info, warning, error, yes/no question)

use eframe::egui;

use crate::gui::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
    Question { yes: &'static str, no: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Ok,
    Yes,
    No,
}

#[derive(Debug, Clone)]
pub struct MessageBox {
    pub title: String,
    pub body: String,
    pub kind: MessageKind,
}

impl MessageBox {
    fn new(kind: MessageKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind,
        }
    }

    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(MessageKind::Info, title, body)
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(MessageKind::Warning, title, body)
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, title, body)
    }

    pub fn question(
        title: impl Into<String>,
        body: impl Into<String>,
        yes: &'static str,
        no: &'static str,
    ) -> Self {
        Self::new(MessageKind::Question { yes, no }, title, body)
    }

    fn icon(&self) -> &'static str {
        match self.kind {
            MessageKind::Info => "ℹ",
            MessageKind::Warning => "⚠",
            MessageKind::Error => "❌",
            MessageKind::Question { .. } => "❓",
        }
    }

    /// Draws the dialog; returns the answer once a button was pressed
    pub fn show(&self, ctx: &egui::Context) -> Option<Answer> {
        let mut answer = None;
        egui::Window::new(self.title.as_str())
            .id(egui::Id::new("message_box"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(self.icon()).size(22.0));
                    ui.label(&self.body);
                });
                ui.add_space(SECTION_SPACING);
                ui.horizontal(|ui| match self.kind {
                    MessageKind::Question { yes, no } => {
                        if ui.button(yes).clicked() {
                            answer = Some(Answer::Yes);
                        }
                        if ui.button(no).clicked() {
                            answer = Some(Answer::No);
                        }
                    }
                    _ => {
                        if ui.button("OK").clicked() {
                            answer = Some(Answer::Ok);
                        }
                    }
                });
            });
        answer
    }
}
