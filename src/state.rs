use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use lift_stats::chart::{self, ChartDescriptor};
use lift_stats::data::{self, DatasetSource, FilterColumn, FilterSelection, LiftDataset, LiftType, LoadError};
use lift_stats::stats::{self, HistogramConfig, Summary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until the first load finishes).
    pub dataset: Option<LiftDataset>,

    /// Current filter constraints.
    pub selection: FilterSelection,

    /// Lift whose best results are charted.
    pub lift: LiftType,

    pub config: HistogramConfig,

    /// Statistics of the current sample (cached).
    pub summary: Summary,

    /// Chart derived from `summary` (cached).
    pub chart: ChartDescriptor,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a load is in progress.
    pub loading: bool,

    pending: Option<Receiver<Result<LiftDataset, LoadError>>>,
}

impl AppState {
    pub fn new(config: HistogramConfig) -> Self {
        let lift = LiftType::default();
        Self {
            dataset: None,
            selection: FilterSelection::new(),
            lift,
            config,
            summary: Summary::empty(),
            chart: ChartDescriptor::from_summary(&Summary::empty(), lift),
            status_message: None,
            loading: false,
            pending: None,
        }
    }

    /// Fetch and decode `source` on a worker thread. The result is picked up
    /// by [`AppState::poll_load`].
    pub fn start_load(&mut self, source: DatasetSource) {
        log::info!("Loading dataset from {source}");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(data::load(&source));
        });
        self.pending = Some(rx);
        self.loading = true;
        self.status_message = None;
    }

    /// Returns `true` when a pending load finished during this call.
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(LoadError::Decode(
                "loader thread exited without a result".to_string(),
            )),
        };
        self.pending = None;

        match result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
                self.loading = false;
            }
        }
        true
    }

    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: LiftDataset) {
        self.dataset = Some(dataset);
        self.selection.clear();
        self.status_message = None;
        self.loading = false;
        self.recompute();
    }

    pub fn set_filter(&mut self, column: FilterColumn, value: Option<String>) {
        self.selection.set(column, value);
        self.recompute();
    }

    pub fn set_lift(&mut self, lift: LiftType) {
        self.lift = lift;
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.selection.clear();
        self.recompute();
    }

    /// Filter → statistics → chart for the current selection and lift.
    pub fn recompute(&mut self) {
        let values = match &self.dataset {
            Some(ds) => ds.values(self.lift, &self.selection),
            None => Vec::new(),
        };
        self.summary = stats::summarize(&values, &self.config);
        self.chart = chart::build(
            &self.summary.buckets,
            self.summary.mean,
            self.summary.std_dev,
            self.lift.name(),
        );
        log::debug!(
            "{} {:?}: n={} mean={:.1} std={:.1}",
            self.lift,
            self.selection,
            self.summary.count,
            self.summary.mean,
            self.summary.std_dev
        );
        if log::log_enabled!(log::Level::Trace) {
            match self.chart.to_json() {
                Ok(json) => log::trace!("chart descriptor: {json}"),
                Err(e) => log::warn!("Could not serialize chart descriptor: {e}"),
            }
        }
    }

    /// A zero standard deviation is shown as "no data" rather than a chart.
    pub fn has_chart(&self) -> bool {
        self.summary.std_dev != 0.0 && !self.chart.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use lift_stats::data::LiftRecord;

    fn fixture() -> LiftDataset {
        let row = |sex: &str, bench: f64| LiftRecord {
            sex: sex.into(),
            max_lift: "Bench".into(),
            best3_bench_kg: Some(bench),
            ..Default::default()
        };
        LiftDataset::from_rows(vec![row("M", 100.0), row("F", 60.0), row("M", 140.0)])
    }

    #[test]
    fn filter_changes_recompute_summary() {
        let mut state = AppState::new(HistogramConfig::default());
        state.set_dataset(fixture());
        assert_eq!(state.summary.count, 3);
        assert!(state.has_chart());

        state.set_filter(FilterColumn::Sex, Some("M".into()));
        assert_eq!(state.summary.count, 2);
        assert!((state.summary.mean - 120.0).abs() < 1e-9);

        state.set_filter(FilterColumn::Sex, Some("F".into()));
        assert_eq!(state.summary.count, 1);
        assert!(!state.has_chart());

        state.clear_filters();
        state.set_lift(LiftType::Squat);
        assert_eq!(state.summary, Summary::empty());
        assert!(state.chart.is_empty());
    }

    #[test]
    fn failed_load_stops_loading() {
        let mut state = AppState::new(HistogramConfig::default());
        state.start_load(DatasetSource::parse("/no/such/dir/lifts.csv"));
        assert!(state.loading);

        let deadline = Instant::now() + Duration::from_secs(10);
        while !state.poll_load() {
            assert!(Instant::now() < deadline, "load did not finish");
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!state.loading);
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_some());
    }
}
