use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use ppp_tesis_dashboard::{Area, Dimension};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    let options = match &state.dataset {
        Some(ds) => ds.options.clone(),
        None => {
            ui.label("No hay datos cargados.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Area: driven by the participation flags ----
            ui.strong("Área");
            for area in Area::ALL {
                let mut checked = state.draft.area.contains(&area);
                if ui.checkbox(&mut checked, area.label()).changed() {
                    state.toggle_area(area);
                }
            }
            ui.separator();

            // ---- Per-dimension checklists (collapsible) ----
            for dimension in Dimension::ALL {
                let values = options.get(dimension);
                let n_selected = state.draft.selection(dimension).len();
                let header_text = format!("{}  ({n_selected}/{})", dimension.title(), values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dimension.title())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("Ninguno").clicked() {
                            state.draft.selection_mut(dimension).clear();
                        }
                        for value in values {
                            let mut checked = state.draft.selection(dimension).contains(value);
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                state.toggle_value(dimension, value);
                            }
                        }
                    });
            }
            ui.separator();

            // ---- Date range ----
            ui.strong("Rango de fechas");
            ui.horizontal(|ui: &mut Ui| {
                ui.checkbox(&mut state.dates.use_from, "Desde");
                ui.add_enabled(
                    state.dates.use_from,
                    DatePickerButton::new(&mut state.dates.from).id_salt("date_from"),
                );
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.checkbox(&mut state.dates.use_to, "Hasta");
                ui.add_enabled(
                    state.dates.use_to,
                    DatePickerButton::new(&mut state.dates.to).id_salt("date_to"),
                );
            });
            if state.dates.use_from != state.dates.use_to {
                ui.label(
                    RichText::new("El filtro por fechas requiere ambos extremos.")
                        .small()
                        .weak(),
                );
            }
            ui.separator();

            ui.horizontal(|ui: &mut Ui| {
                let apply = egui::Button::new("Aplicar filtros");
                if ui.add_enabled(state.has_pending_changes(), apply).clicked() {
                    state.apply_filters();
                }
                if ui.button("Limpiar filtros").clicked() {
                    state.clear_filters();
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!(
                "{} registros cargados, {} visibles",
                view.total, view.filtered
            ));
        }

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir datos PPP / Tesis")
        .add_filter("Formatos soportados", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
