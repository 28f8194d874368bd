use serde::Serialize;

use super::filter::{self, FilterCriteria};
use super::grouping::{self, AggregateBucket, SortDirection};
use super::model::{Dataset, Field};
use super::ratio::completion_ratio;
use super::series::{self, MonthLabels, MonthPoint, YearPoint, YearWindow};
use super::stats::{self, GroupAverage};

/// Knobs for [`DashboardView::compute`] that do not belong to the criteria.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    /// Length of the most/least represented program rankings.
    pub top_n: usize,
    pub years: YearWindow,
    pub month_labels: MonthLabels,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            top_n: 10,
            years: YearWindow::default(),
            month_labels: MonthLabels::default(),
        }
    }
}

/// Every chart of the dashboard for one criteria snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub total: usize,
    pub filtered: usize,
    /// `filtered / total`, 0 for an empty table.
    pub progress: f64,
    pub by_faculty: Vec<AggregateBucket>,
    pub by_status: Vec<AggregateBucket>,
    pub yearly: Vec<YearPoint>,
    pub monthly: Vec<MonthPoint>,
    pub top_programs: Vec<AggregateBucket>,
    pub bottom_programs: Vec<AggregateBucket>,
    pub grade_by_faculty: Vec<GroupAverage>,
}

impl DashboardView {
    /// Filter once, then run each aggregator over the filtered records.
    pub fn compute(dataset: &Dataset, criteria: &FilterCriteria, options: &ViewOptions) -> Self {
        let rows = filter::apply(&dataset.records, criteria);
        log::debug!(
            "computing dashboard over {} of {} records",
            rows.len(),
            dataset.len()
        );

        DashboardView {
            total: dataset.len(),
            filtered: rows.len(),
            progress: completion_ratio(rows.len(), dataset.len()),
            by_faculty: grouping::count_by(&rows, Field::Faculty),
            by_status: grouping::count_by_either(
                &rows,
                Field::InternshipStatus,
                Field::ThesisStatus,
            ),
            yearly: series::year_series_within(&rows, criteria, options.years),
            monthly: series::month_series_labeled(&rows, criteria, options.month_labels),
            top_programs: grouping::top_n(
                &rows,
                Field::Program,
                options.top_n,
                SortDirection::Descending,
            ),
            bottom_programs: grouping::top_n(
                &rows,
                Field::Program,
                options.top_n,
                SortDirection::Ascending,
            ),
            grade_by_faculty: stats::group_average(&rows, Field::Faculty),
        }
    }
}
