use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use ppp_tesis_dashboard::data::loader;
use ppp_tesis_dashboard::{Area, DashboardConfig, DashboardView, Dataset, Dimension, FilterCriteria};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Date inputs
// ---------------------------------------------------------------------------

/// Backing values of the two date pickers. A picker only contributes a bound
/// while its checkbox is ticked.
#[derive(Debug, Clone)]
pub struct DateInputs {
    pub use_from: bool,
    pub from: NaiveDate,
    pub use_to: bool,
    pub to: NaiveDate,
}

impl Default for DateInputs {
    fn default() -> Self {
        let today = Local::now().date_naive();
        DateInputs {
            use_from: false,
            from: NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            use_to: false,
            to: today,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Selections being edited in the side panel.
    pub draft: FilterCriteria,
    pub dates: DateInputs,

    /// Criteria behind the charts currently shown.
    pub applied: FilterCriteria,

    /// Charts for `applied`, recomputed whenever it is replaced.
    pub view: Option<DashboardView>,

    /// Faculty colours shared across charts.
    pub faculty_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            draft: FilterCriteria::cleared(),
            dates: DateInputs::default(),
            applied: FilterCriteria::cleared(),
            view: None,
            faculty_colors: ColorMap::default(),
            status_message: None,
            loading: false,
        }
    }

    /// Load a table from disk, reporting failures in the status line.
    pub fn load_path(&mut self, path: &Path) {
        self.loading = true;
        match loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.loading = false;
            }
        }
    }

    /// Ingest a newly loaded table and reset every filter.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.faculty_colors = ColorMap::new(&dataset.options.faculty);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
        self.clear_filters();
    }

    /// Replace the applied criteria with the draft and recompute the charts.
    pub fn apply_filters(&mut self) {
        let mut criteria = self.draft.clone();
        criteria.date_from = self.dates.use_from.then_some(self.dates.from);
        criteria.date_to = self.dates.use_to.then_some(self.dates.to);
        self.applied = criteria;
        self.recompute();
    }

    /// Reset draft and applied criteria to "match all".
    pub fn clear_filters(&mut self) {
        self.draft = FilterCriteria::cleared();
        self.dates = DateInputs::default();
        self.applied = FilterCriteria::cleared();
        self.recompute();
    }

    /// Rebuild the charts from the current applied criteria.
    pub fn recompute(&mut self) {
        self.view = self.dataset.as_ref().map(|ds| {
            DashboardView::compute(ds, &self.applied, &self.config.view_options())
        });
    }

    /// Toggle an area in the draft.
    pub fn toggle_area(&mut self, area: Area) {
        if !self.draft.area.remove(&area) {
            self.draft.area.insert(area);
        }
    }

    /// Toggle a single value in a dimension of the draft.
    pub fn toggle_value(&mut self, dimension: Dimension, value: &str) {
        let selected = self.draft.selection_mut(dimension);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Whether the draft differs from what the charts show.
    pub fn has_pending_changes(&self) -> bool {
        let mut draft = self.draft.clone();
        draft.date_from = self.dates.use_from.then_some(self.dates.from);
        draft.date_to = self.dates.use_to.then_some(self.dates.to);
        draft != self.applied
    }
}
