use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, ProgressBar, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};
use ppp_tesis_dashboard::data::grouping::AggregateBucket;
use ppp_tesis_dashboard::DashboardView;

use crate::color::{self, ColorMap};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render every chart of the current view in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Abre un archivo para ver el tablero  (Archivo → Abrir…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                card(&mut cols[0], "Distribución por Facultad", |ui| {
                    faculty_distribution(ui, &view.by_faculty, &state.faculty_colors)
                });
                card(&mut cols[1], "Estados de Actividad (PPP o Tesis)", |ui| {
                    category_bars(ui, "status", &view.by_status, color::STATUS_BARS)
                });
            });

            card(ui, "Comparativa de Evolución Anual: PPP vs Tesis", |ui| {
                yearly_evolution(ui, view)
            });
            card(ui, "Distribución Mensual: PPP vs Tesis", |ui| {
                monthly_distribution(ui, view)
            });

            ui.columns(3, |cols| {
                card(&mut cols[0], "Indicador de Progreso General", |ui| {
                    progress(ui, view)
                });
                card(
                    &mut cols[1],
                    &format!("Top {} Escuelas con más registros", state.config.top_n),
                    |ui| ranking(ui, "top_programs", &view.top_programs, color::TOP_BARS),
                );
                card(
                    &mut cols[2],
                    &format!("Top {} Escuelas con menos registros", state.config.top_n),
                    |ui| ranking(ui, "bottom_programs", &view.bottom_programs, color::BOTTOM_BARS),
                );
            });

            card(ui, "Promedio de calificaciones de tesis por Facultad", |ui| {
                grade_averages(ui, view, &state.faculty_colors)
            });
        });
}

fn card(ui: &mut Ui, title: &str, body: impl FnOnce(&mut Ui)) {
    ui.group(|ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong(title);
        body(ui);
    });
    ui.add_space(8.0);
}

/// Axis labels for bar charts whose arguments are category indices.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let index = mark.value.round();
        if (mark.value - index).abs() > 1e-6 || index < 0.0 {
            return String::new();
        }
        labels.get(index as usize).cloned().unwrap_or_default()
    }
}

fn static_plot<'a>(id: &str) -> Plot<'a> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

/// One coloured bar per faculty, each with its own legend entry.
fn faculty_distribution(ui: &mut Ui, buckets: &[AggregateBucket], colors: &ColorMap) {
    let total: usize = buckets.iter().map(|b| b.value).sum();
    static_plot("by_faculty")
        .legend(Legend::default())
        .show_axes([false, true])
        .include_y(0.0)
        .show(ui, |plot_ui| {
            for (i, bucket) in buckets.iter().enumerate() {
                let share = if total == 0 {
                    0.0
                } else {
                    bucket.value as f64 * 100.0 / total as f64
                };
                let name = format!("{}: {share:.0}%", bucket.label);
                let color = colors.color_for(&bucket.label);
                let bar = Bar::new(i as f64, bucket.value as f64).width(0.7).fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(name).color(color));
            }
        });
}

fn category_bars(ui: &mut Ui, id: &str, buckets: &[AggregateBucket], fill: Color32) {
    let labels = buckets.iter().map(|b| b.label.clone()).collect();
    let bars: Vec<Bar> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| Bar::new(i as f64, b.value as f64).name(&b.label).width(0.7))
        .collect();

    static_plot(id)
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Cantidad").color(fill));
        });
}

fn yearly_evolution(ui: &mut Ui, view: &DashboardView) {
    let internship: PlotPoints = view
        .yearly
        .iter()
        .map(|p| [p.year as f64, p.internship as f64])
        .collect();
    let thesis: PlotPoints = view
        .yearly
        .iter()
        .map(|p| [p.year as f64, p.thesis as f64])
        .collect();

    static_plot("yearly")
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| {
            if mark.value.fract() == 0.0 {
                format!("{:.0}", mark.value)
            } else {
                String::new()
            }
        })
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(internship).name("PPP").color(color::INTERNSHIP).width(2.0));
            plot_ui.line(Line::new(thesis).name("Tesis").color(color::THESIS).width(2.0));
        });
}

/// Grouped bars: PPP left of each month, Tesis right of it.
fn monthly_distribution(ui: &mut Ui, view: &DashboardView) {
    let labels = view.monthly.iter().map(|p| p.month.to_string()).collect();
    let internship: Vec<Bar> = view
        .monthly
        .iter()
        .enumerate()
        .map(|(i, p)| Bar::new(i as f64 - 0.2, p.internship as f64).width(0.4))
        .collect();
    let thesis: Vec<Bar> = view
        .monthly
        .iter()
        .enumerate()
        .map(|(i, p)| Bar::new(i as f64 + 0.2, p.thesis as f64).width(0.4))
        .collect();

    static_plot("monthly")
        .legend(Legend::default())
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(internship).name("PPP").color(color::INTERNSHIP));
            plot_ui.bar_chart(BarChart::new(thesis).name("Tesis").color(color::THESIS));
        });
}

fn progress(ui: &mut Ui, view: &DashboardView) {
    ui.add_space(16.0);
    ui.add(
        ProgressBar::new(view.progress as f32)
            .show_percentage()
            .desired_height(28.0),
    );
    ui.add_space(8.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(format!(
            "{} de {} registros ({:.0}%)",
            view.filtered,
            view.total,
            view.progress * 100.0
        ));
    });
}

/// Horizontal bars, first bucket on top.
fn ranking(ui: &mut Ui, id: &str, buckets: &[AggregateBucket], fill: Color32) {
    let n = buckets.len();
    let labels: Vec<String> = buckets.iter().rev().map(|b| b.label.clone()).collect();
    let bars: Vec<Bar> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new((n - 1 - i) as f64, b.value as f64)
                .name(&b.label)
                .width(0.7)
        })
        .collect();

    static_plot(id)
        .y_axis_formatter(category_formatter(labels))
        .include_x(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Proyectos").color(fill));
        });
}

fn grade_averages(ui: &mut Ui, view: &DashboardView, colors: &ColorMap) {
    let labels = view
        .grade_by_faculty
        .iter()
        .map(|g| g.label.clone())
        .collect();
    let bars: Vec<Bar> = view
        .grade_by_faculty
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.mean)
                .name(format!("{} ({} tesis)", g.label, g.samples))
                .fill(colors.color_for(&g.label))
                .width(0.6)
        })
        .collect();

    static_plot("grade_by_faculty")
        .legend(Legend::default())
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .include_y(20.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Promedio de calificación")
                    .color(color::GRADE_BARS),
            );
        });

    if view.grade_by_faculty.is_empty() {
        ui.label(egui::RichText::new("Sin calificaciones válidas en la selección.").weak());
    }
}
