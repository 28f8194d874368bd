use std::collections::HashMap;

use serde::Serialize;

use super::model::{Field, Record};

/// One labelled count, as drawn by a bar or pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateBucket {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Most frequent first.
    #[default]
    Descending,
    Ascending,
}

/// Counter that emits buckets in first-occurrence order of their keys.
#[derive(Default)]
struct OrderedCounter<'a> {
    slots: HashMap<&'a str, usize>,
    buckets: Vec<AggregateBucket>,
}

impl<'a> OrderedCounter<'a> {
    fn add(&mut self, key: &'a str) {
        match self.slots.get(key) {
            Some(&slot) => self.buckets[slot].value += 1,
            None => {
                self.slots.insert(key, self.buckets.len());
                self.buckets.push(AggregateBucket {
                    label: key.to_string(),
                    value: 1,
                });
            }
        }
    }

    fn finish(self) -> Vec<AggregateBucket> {
        self.buckets
    }
}

/// Count records per distinct value of `field`. Absent values are skipped.
pub fn count_by(records: &[&Record], field: Field) -> Vec<AggregateBucket> {
    let mut counter = OrderedCounter::default();
    for record in records {
        if let Some(value) = record.field(field) {
            counter.add(value);
        }
    }
    counter.finish()
}

/// Like [`count_by`], but feeding one shared counter from two fields.
/// A record contributes once per field that holds a value.
pub fn count_by_either(records: &[&Record], first: Field, second: Field) -> Vec<AggregateBucket> {
    let mut counter = OrderedCounter::default();
    for record in records {
        for field in [first, second] {
            if let Some(value) = record.field(field) {
                counter.add(value);
            }
        }
    }
    counter.finish()
}

/// The `n` most (or least) frequent values of `field`. Ties keep
/// first-occurrence order.
pub fn top_n(
    records: &[&Record],
    field: Field,
    n: usize,
    direction: SortDirection,
) -> Vec<AggregateBucket> {
    let mut buckets = count_by(records, field);
    match direction {
        SortDirection::Descending => buckets.sort_by(|a, b| b.value.cmp(&a.value)),
        SortDirection::Ascending => buckets.sort_by(|a, b| a.value.cmp(&b.value)),
    }
    buckets.truncate(n);
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use pretty_assertions::assert_eq;

    fn record(pairs: &[(&str, CellValue)]) -> Record {
        pairs.iter().cloned().collect()
    }

    fn bucket(label: &str, value: usize) -> AggregateBucket {
        AggregateBucket {
            label: label.to_string(),
            value,
        }
    }

    fn programs(names: &[&str]) -> Vec<Record> {
        names
            .iter()
            .map(|n| record(&[("escuela", (*n).into())]))
            .collect()
    }

    #[test]
    fn counts_in_first_occurrence_order() {
        let records = programs(&["B", "A", "B", "", "C", "A", "B"]);
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(
            count_by(&refs, Field::Program),
            vec![bucket("B", 3), bucket("A", 2), bucket("C", 1)]
        );
    }

    #[test]
    fn absent_values_produce_no_bucket() {
        let records = vec![record(&[]), record(&[("escuela", CellValue::Empty)])];
        let refs: Vec<&Record> = records.iter().collect();
        assert!(count_by(&refs, Field::Program).is_empty());
    }

    #[test]
    fn either_counts_both_fields() {
        let records = vec![
            record(&[
                ("estado_ppp", "Concluido".into()),
                ("estado_tesis", "En curso".into()),
            ]),
            record(&[("estado_tesis", "Concluido".into())]),
            record(&[
                ("estado_ppp", "Concluido".into()),
                ("estado_tesis", "Concluido".into()),
            ]),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(
            count_by_either(&refs, Field::InternshipStatus, Field::ThesisStatus),
            vec![bucket("Concluido", 4), bucket("En curso", 1)]
        );
    }

    #[test]
    fn top_n_descending_and_ascending() {
        let records = programs(&["A", "B", "B", "C", "C", "C", "D"]);
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(
            top_n(&refs, Field::Program, 2, SortDirection::Descending),
            vec![bucket("C", 3), bucket("B", 2)]
        );
        assert_eq!(
            top_n(&refs, Field::Program, 3, SortDirection::Ascending),
            vec![bucket("A", 1), bucket("D", 1), bucket("B", 2)]
        );
    }

    #[test]
    fn top_n_larger_than_groups() {
        let records = programs(&["A", "B"]);
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(top_n(&refs, Field::Program, 10, SortDirection::Descending).len(), 2);
        assert!(top_n(&refs, Field::Program, 0, SortDirection::Descending).is_empty());
    }
}
