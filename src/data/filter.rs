use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{Area, Dimension, Field, Record};

// ---------------------------------------------------------------------------
// FilterCriteria – what the user selected
// ---------------------------------------------------------------------------

/// User selections across every filter dimension.
///
/// An empty set means "no constraint" for that dimension. Dimensions combine
/// with AND, values inside one dimension combine with OR. The date range only
/// applies once both bounds are set.
///
/// Criteria are replaced wholesale on every interaction; the `with_*`
/// builders return a new value instead of editing the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub area: BTreeSet<Area>,
    pub faculty: BTreeSet<String>,
    pub program: BTreeSet<String>,
    pub gender: BTreeSet<String>,
    pub status: BTreeSet<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    /// The "match all" value. Clearing filters always resets to this.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// True when no dimension constrains anything.
    pub fn is_empty(&self) -> bool {
        self.area.is_empty()
            && Dimension::ALL.iter().all(|d| self.selection(*d).is_empty())
            && self.date_range().is_none()
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.area.insert(area);
        self
    }

    pub fn with_value(mut self, dimension: Dimension, value: impl Into<String>) -> Self {
        self.selection_mut(dimension).insert(value.into());
        self
    }

    pub fn with_faculty(self, value: impl Into<String>) -> Self {
        self.with_value(Dimension::Faculty, value)
    }

    pub fn with_program(self, value: impl Into<String>) -> Self {
        self.with_value(Dimension::Program, value)
    }

    pub fn with_gender(self, value: impl Into<String>) -> Self {
        self.with_value(Dimension::Gender, value)
    }

    pub fn with_status(self, value: impl Into<String>) -> Self {
        self.with_value(Dimension::Status, value)
    }

    pub fn with_date_from(mut self, from: NaiveDate) -> Self {
        self.date_from = Some(from);
        self
    }

    pub fn with_date_to(mut self, to: NaiveDate) -> Self {
        self.date_to = Some(to);
        self
    }

    pub fn with_date_range(self, from: NaiveDate, to: NaiveDate) -> Self {
        self.with_date_from(from).with_date_to(to)
    }

    /// Selected values of a free-form dimension.
    pub fn selection(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::Faculty => &self.faculty,
            Dimension::Program => &self.program,
            Dimension::Gender => &self.gender,
            Dimension::Status => &self.status,
        }
    }

    pub fn selection_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::Faculty => &mut self.faculty,
            Dimension::Program => &mut self.program,
            Dimension::Gender => &mut self.gender,
            Dimension::Status => &mut self.status,
        }
    }

    /// Both bounds, when the date filter is active.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.date_from?, self.date_to?))
    }

    /// Whether dates of `area` count toward derived series. An empty area
    /// selection includes both.
    pub fn includes_area(&self, area: Area) -> bool {
        self.area.is_empty() || self.area.contains(&area)
    }

    /// Whether `date` respects each bound that is set, independently.
    pub fn within_bounds(&self, date: NaiveDate) -> bool {
        self.date_from.map_or(true, |from| date >= from)
            && self.date_to.map_or(true, |to| date <= to)
    }

    /// Evaluate every active dimension against one record.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_area(record)
            && Dimension::ALL
                .iter()
                .all(|d| self.matches_dimension(*d, record))
            && self.matches_dates(record)
    }

    /// Area filters on the participation flags, not on a column value.
    fn matches_area(&self, record: &Record) -> bool {
        self.area.is_empty() || self.area.iter().any(|a| record.took_part_in(*a))
    }

    fn matches_dimension(&self, dimension: Dimension, record: &Record) -> bool {
        let selected = self.selection(dimension);
        if selected.is_empty() {
            return true;
        }
        dimension
            .fields()
            .iter()
            .filter_map(|f: &Field| record.field(*f))
            .any(|v| selected.contains(v))
    }

    /// At least one valid date must land in the inclusive range.
    fn matches_dates(&self, record: &Record) -> bool {
        match self.date_range() {
            Some((from, to)) => record.dates().any(|d| from <= d && d <= to),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return the records passing `criteria`, in their original order.
pub fn apply<'a>(records: &'a [Record], criteria: &FilterCriteria) -> Vec<&'a Record> {
    if criteria.is_empty() {
        return records.iter().collect();
    }
    let kept: Vec<&Record> = records.iter().filter(|r| criteria.matches(r)).collect();
    log::debug!("filter kept {} of {} records", kept.len(), records.len());
    kept
}
