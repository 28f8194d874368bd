use std::collections::HashMap;

use serde::Serialize;

use super::model::{Field, Record};

/// Mean thesis grade of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    pub label: String,
    pub mean: f64,
    /// Number of graded records behind the mean.
    pub samples: usize,
}

/// Average final grade per value of `group`, highest mean first.
///
/// Only records with an affirmative thesis flag, a group value and a numeric
/// grade count. Groups without any such record are not emitted.
pub fn group_average(records: &[&Record], group: Field) -> Vec<GroupAverage> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut sums: Vec<(&str, f64, usize)> = Vec::new();

    for record in records {
        if !record.did_thesis() {
            continue;
        }
        let (Some(label), Some(grade)) = (record.field(group), record.grade()) else {
            continue;
        };
        let slot = *slots.entry(label).or_insert_with(|| {
            sums.push((label, 0.0, 0));
            sums.len() - 1
        });
        sums[slot].1 += grade;
        sums[slot].2 += 1;
    }

    let mut averages: Vec<GroupAverage> = sums
        .into_iter()
        .map(|(label, sum, samples)| GroupAverage {
            label: label.to_string(),
            mean: sum / samples as f64,
            samples,
        })
        .collect();
    averages.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    averages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use pretty_assertions::assert_eq;

    fn graded(faculty: &str, thesis: &str, grade: CellValue) -> Record {
        [
            ("facultad", CellValue::from(faculty)),
            ("hizo_tesis", thesis.into()),
            ("calificacion_final", grade),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn placeholder_group_is_not_emitted() {
        let records = vec![
            graded("Eng", "Sí", "15".into()),
            graded("Eng", "Sí", "17".into()),
            graded("Arts", "Sí", "N/A".into()),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(
            group_average(&refs, Field::Faculty),
            vec![GroupAverage {
                label: "Eng".to_string(),
                mean: 16.0,
                samples: 2
            }]
        );
    }

    #[test]
    fn sorted_by_mean_descending() {
        let records = vec![
            graded("A", "Sí", CellValue::Number(12.0)),
            graded("B", "Sí", CellValue::Number(18.0)),
            graded("C", "Sí", CellValue::Number(15.0)),
            graded("A", "Sí", CellValue::Number(14.0)),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let labels: Vec<(String, f64)> = group_average(&refs, Field::Faculty)
            .into_iter()
            .map(|g| (g.label, g.mean))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("B".to_string(), 18.0),
                ("C".to_string(), 15.0),
                ("A".to_string(), 13.0)
            ]
        );
    }

    #[test]
    fn requires_thesis_flag_and_group() {
        let records = vec![
            graded("A", "No", "20".into()),
            graded("", "Sí", "20".into()),
            graded("B", "Sí", "veinte".into()),
            graded("B", "Sí", CellValue::Empty),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        assert!(group_average(&refs, Field::Faculty).is_empty());
    }
}
