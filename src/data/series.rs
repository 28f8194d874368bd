//! Time-bucketed PPP-vs-Tesis series.
//!
//! Each record contributes one count per valid date in the columns that
//! belong to an included area. Dates outside the criteria bounds are dropped
//! one bound at a time, so a lone "from" or "to" still narrows the series.

use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::filter::FilterCriteria;
use super::model::{Area, DateField, Record};

/// Columns feeding the yearly series. The internship end date is left out so
/// each placement counts once, in the year it started.
const YEAR_FIELDS: [DateField; 3] = [
    DateField::InternshipStart,
    DateField::ThesisStart,
    DateField::Defense,
];

/// Columns feeding the monthly series.
const MONTH_FIELDS: [DateField; 4] = DateField::ALL;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub internship: usize,
    pub thesis: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthPoint {
    pub month: &'static str,
    pub internship: usize,
    pub thesis: usize,
}

/// Inclusive range of years admitted into the yearly series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub first: i32,
    pub last: i32,
}

impl YearWindow {
    pub const DEFAULT_FIRST_YEAR: i32 = 2000;

    /// From `first` through the current local year.
    pub fn through_current_year(first: i32) -> Self {
        YearWindow {
            first,
            last: Local::now().year(),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.first <= year && year <= self.last
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self::through_current_year(Self::DEFAULT_FIRST_YEAR)
    }
}

/// Month abbreviations used as series labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthLabels {
    #[default]
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "en")]
    English,
}

impl MonthLabels {
    pub fn names(self) -> [&'static str; 12] {
        match self {
            MonthLabels::Spanish => [
                "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
            ],
            MonthLabels::English => [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ],
        }
    }
}

/// Valid, in-bounds dates of `record` tagged with their area.
fn dated_contributions<'a>(
    record: &'a Record,
    criteria: &'a FilterCriteria,
    fields: &'a [DateField],
) -> impl Iterator<Item = (Area, NaiveDate)> + 'a {
    fields
        .iter()
        .filter(move |f| criteria.includes_area(f.area()))
        .filter_map(move |f| record.date(*f).map(|d| (f.area(), d)))
        .filter(move |(_, d)| criteria.within_bounds(*d))
}

/// Yearly counts from 2000 through the current year.
pub fn year_series(records: &[&Record], criteria: &FilterCriteria) -> Vec<YearPoint> {
    year_series_within(records, criteria, YearWindow::default())
}

/// Yearly counts restricted to `window`, ascending by year. Years seen in
/// only one series read zero in the other.
pub fn year_series_within(
    records: &[&Record],
    criteria: &FilterCriteria,
    window: YearWindow,
) -> Vec<YearPoint> {
    let mut years: BTreeMap<i32, (usize, usize)> = BTreeMap::new();

    for record in records {
        for (area, date) in dated_contributions(record, criteria, &YEAR_FIELDS) {
            let year = date.year();
            if !window.contains(year) {
                continue;
            }
            let slot = years.entry(year).or_default();
            match area {
                Area::Internship => slot.0 += 1,
                Area::Thesis => slot.1 += 1,
            }
        }
    }

    years
        .into_iter()
        .map(|(year, (internship, thesis))| YearPoint {
            year,
            internship,
            thesis,
        })
        .collect()
}

/// Counts per calendar month with Spanish labels. Always twelve points.
pub fn month_series(records: &[&Record], criteria: &FilterCriteria) -> Vec<MonthPoint> {
    month_series_labeled(records, criteria, MonthLabels::default())
}

/// Counts per calendar month, January first, zero-filled.
pub fn month_series_labeled(
    records: &[&Record],
    criteria: &FilterCriteria,
    labels: MonthLabels,
) -> Vec<MonthPoint> {
    let mut months = [(0usize, 0usize); 12];

    for record in records {
        for (area, date) in dated_contributions(record, criteria, &MONTH_FIELDS) {
            let slot = &mut months[date.month0() as usize];
            match area {
                Area::Internship => slot.0 += 1,
                Area::Thesis => slot.1 += 1,
            }
        }
    }

    labels
        .names()
        .into_iter()
        .zip(months)
        .map(|(month, (internship, thesis))| MonthPoint {
            month,
            internship,
            thesis,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use pretty_assertions::assert_eq;

    fn record(pairs: &[(&str, CellValue)]) -> Record {
        pairs.iter().cloned().collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const WINDOW: YearWindow = YearWindow {
        first: 2000,
        last: 2024,
    };

    #[test]
    fn serial_internship_start_counts_once() {
        let records = vec![record(&[("fecha_inicio_ppp", CellValue::Number(44197.0))])];
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(
            year_series(&refs, &FilterCriteria::cleared()),
            vec![YearPoint {
                year: 2021,
                internship: 1,
                thesis: 0
            }]
        );
    }

    #[test]
    fn years_merge_both_series_and_sort() {
        let records = vec![
            record(&[
                ("fecha_inicio_ppp", "2022-03-01".into()),
                ("fecha_fin_ppp", "2022-09-01".into()),
                ("fecha_inicio_tesis", "2019-05-01".into()),
                ("fecha_sustentacion", "2022-11-20".into()),
            ]),
            record(&[("fecha_inicio_ppp", "2019-01-10".into())]),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(
            year_series_within(&refs, &FilterCriteria::cleared(), WINDOW),
            vec![
                YearPoint {
                    year: 2019,
                    internship: 1,
                    thesis: 1
                },
                YearPoint {
                    year: 2022,
                    internship: 1,
                    thesis: 1
                },
            ]
        );
    }

    #[test]
    fn years_outside_window_are_dropped() {
        let records = vec![record(&[
            ("fecha_inicio_ppp", "1998-03-01".into()),
            ("fecha_inicio_tesis", "2031-01-01".into()),
            ("fecha_sustentacion", "garbage".into()),
        ])];
        let refs: Vec<&Record> = records.iter().collect();
        assert!(year_series_within(&refs, &FilterCriteria::cleared(), WINDOW).is_empty());
    }

    #[test]
    fn area_selection_limits_series() {
        let records = vec![record(&[
            ("fecha_inicio_ppp", "2020-03-01".into()),
            ("fecha_inicio_tesis", "2020-05-01".into()),
        ])];
        let refs: Vec<&Record> = records.iter().collect();
        let criteria = FilterCriteria::cleared().with_area(Area::Thesis);
        assert_eq!(
            year_series_within(&refs, &criteria, WINDOW),
            vec![YearPoint {
                year: 2020,
                internship: 0,
                thesis: 1
            }]
        );
    }

    #[test]
    fn single_bound_narrows_series() {
        let records = vec![record(&[
            ("fecha_inicio_ppp", "2018-03-01".into()),
            ("fecha_inicio_tesis", "2021-05-01".into()),
        ])];
        let refs: Vec<&Record> = records.iter().collect();
        let criteria = FilterCriteria::cleared().with_date_from(ymd(2020, 1, 1));
        assert_eq!(
            year_series_within(&refs, &criteria, WINDOW),
            vec![YearPoint {
                year: 2021,
                internship: 0,
                thesis: 1
            }]
        );
    }

    #[test]
    fn months_are_zero_filled_and_ordered() {
        let records = vec![record(&[
            ("fecha_inicio_ppp", "2020-03-01".into()),
            ("fecha_fin_ppp", "2020-08-31".into()),
            ("fecha_sustentacion", CellValue::Number(44197.0)),
        ])];
        let refs: Vec<&Record> = records.iter().collect();
        let points = month_series(&refs, &FilterCriteria::cleared());
        assert_eq!(points.len(), 12);
        assert_eq!(points[0].month, "Ene");
        assert_eq!((points[0].internship, points[0].thesis), (0, 1));
        assert_eq!((points[2].internship, points[2].thesis), (1, 0));
        assert_eq!((points[7].internship, points[7].thesis), (1, 0));
        assert_eq!(points[11].month, "Dic");
    }

    #[test]
    fn months_ignore_year_window() {
        let records = vec![record(&[("fecha_inicio_tesis", "1985-06-15".into())])];
        let refs: Vec<&Record> = records.iter().collect();
        let points = month_series_labeled(&refs, &FilterCriteria::cleared(), MonthLabels::English);
        assert_eq!(points[5].month, "Jun");
        assert_eq!(points[5].thesis, 1);
    }

    #[test]
    fn empty_input_still_has_twelve_months() {
        let points = month_series(&[], &FilterCriteria::cleared());
        assert_eq!(points.len(), 12);
        assert!(points.iter().all(|p| p.internship == 0 && p.thesis == 0));
    }
}
