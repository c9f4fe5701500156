mod app;
mod state;
mod ui;

use app::LiftStatsApp;
use clap::Parser;
use eframe::egui;
use lift_stats::data::{DatasetSource, LiftType};
use lift_stats::stats::{HistogramConfig, DEFAULT_BUCKET_COUNT, DEFAULT_DOMAIN_MAX};

/// Explore powerlifting meet results: filter lifters and chart the
/// distribution of their best bench, squat or deadlift.
#[derive(Parser, Debug)]
#[command(name = "lift-stats", version, about)]
struct Args {
    /// Dataset file or http(s) URL (.parquet, .csv, .csv.gz, .json)
    #[arg(long, env = "LIFT_STATS_DATA", default_value = "lift_data.parquet")]
    data: String,

    /// Upper end of the histogram domain in kg
    #[arg(long, default_value_t = DEFAULT_DOMAIN_MAX)]
    max_kg: u32,

    /// Number of histogram buckets
    #[arg(long, default_value_t = DEFAULT_BUCKET_COUNT)]
    buckets: usize,

    /// Lift charted at startup (Bench, Squat or Deadlift)
    #[arg(long, default_value_t = LiftType::Bench)]
    lift: LiftType,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let source = DatasetSource::parse(&args.data);
    let config = HistogramConfig::new(args.max_kg, args.buckets);
    let lift = args.lift;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Lift Stats",
        options,
        Box::new(move |_cc| Ok(Box::new(LiftStatsApp::new(source, config, lift)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lift_flag_parses_case_insensitively() {
        let args = Args::try_parse_from(["lift-stats", "--lift", "squat"]).unwrap();
        assert_eq!(args.lift, LiftType::Squat);

        let args = Args::try_parse_from(["lift-stats"]).unwrap();
        assert_eq!(args.lift, LiftType::Bench);

        assert!(Args::try_parse_from(["lift-stats", "--lift", "curl"]).is_err());
    }
}
