//! Input rows synthesized from a function's parameters

use eframe::egui;

use crate::gui::constants::*;
use crate::hub::{Field, FieldInput, ParamForm, Widget};

pub fn ui(ui: &mut egui::Ui, form: &mut ParamForm) {
    if form.is_empty() {
        ui.label(egui::RichText::new("This function takes no parameters").italics().weak());
        return;
    }

    egui::Grid::new("param_grid")
        .num_columns(2)
        .spacing([SECTION_SPACING, ITEM_SPACING])
        .show(ui, |ui| {
            for field in form.fields_mut() {
                ui.label(format!("{}:", field.spec.name))
                    .on_hover_text(field.spec.kind.as_str());
                field_ui(ui, field);
                ui.end_row();
            }
        });
}

fn field_ui(ui: &mut egui::Ui, field: &mut Field) {
    let mut step = 0;
    let widget = field.widget();
    match (&mut field.input, widget) {
        (FieldInput::Flag(flag), _) => {
            ui.checkbox(flag, "");
        }
        (FieldInput::Text(text), Widget::IntSpin { .. } | Widget::FloatSpin { .. }) => {
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(text).desired_width(SPIN_ENTRY_WIDTH));
                if ui.small_button("▲").clicked() {
                    step = 1;
                }
                if ui.small_button("▼").clicked() {
                    step = -1;
                }
            });
        }
        (FieldInput::Text(text), _) => {
            ui.add(egui::TextEdit::singleline(text).desired_width(f32::INFINITY));
        }
    }
    if step != 0 {
        field.step(step);
    }
}
