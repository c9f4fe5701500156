use std::time::Duration;

use eframe::egui;
use lift_stats::data::{DatasetSource, LiftType};
use lift_stats::stats::HistogramConfig;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LiftStatsApp {
    pub state: AppState,
}

impl LiftStatsApp {
    /// Start loading `source` right away; the UI shows a spinner meanwhile.
    pub fn new(source: DatasetSource, config: HistogramConfig, lift: LiftType) -> Self {
        let mut state = AppState::new(config);
        state.set_lift(lift);
        state.start_load(source);
        Self { state }
    }
}

impl eframe::App for LiftStatsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();
        if self.state.loading {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: lift + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: histogram ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::histogram_plot(ui, &self.state);
        });
    }
}
