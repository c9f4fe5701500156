use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, LineStyle, Plot, VLine};
use lift_stats::chart::ColorHint;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Histogram plot (central panel)
// ---------------------------------------------------------------------------

fn color32(hint: ColorHint) -> Color32 {
    let c = hint.0;
    Color32::from_rgba_unmultiplied(c.red, c.green, c.blue, c.alpha)
}

/// Render the histogram with its mean / σ lines, or a placeholder.
pub fn histogram_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading {
                ui.spinner();
            } else {
                ui.heading("Open a file to view lift results  (File → Open…)");
            }
        });
        return;
    }

    if !state.has_chart() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data");
        });
        return;
    }

    let chart = &state.chart;
    let width = chart.bucket_width.unwrap_or(1.0);
    let fill = color32(chart.bar_fill);
    let border = color32(chart.bar_border);

    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .zip(&chart.labels)
        .enumerate()
        .map(|(i, (&count, label))| {
            Bar::new(i as f64, count as f64)
                .width(0.9)
                .fill(fill)
                .stroke(Stroke::new(1.0, border))
                .name(format!("{label} kg"))
        })
        .collect();

    Plot::new("histogram_plot")
        .legend(Legend::default())
        .x_axis_label(chart.x_axis_title.as_str())
        .y_axis_label(chart.y_axis_title.as_str())
        .x_axis_formatter(move |mark, _range| format!("{}", mark.value * width))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(chart.dataset_label.as_str())
                    .color(border),
            );

            for line in &chart.annotations {
                plot_ui.vline(
                    VLine::new(line.position)
                        .name(format!("{} ({:.1} kg)", line.label, line.value))
                        .color(color32(line.color))
                        .width(line.width)
                        .style(LineStyle::Dashed {
                            length: line.dash[0] * 2.0,
                        }),
                );
            }
        });
}
