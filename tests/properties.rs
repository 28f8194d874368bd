use chrono::{Datelike, Local, NaiveDate};
use proptest::prelude::*;

use ppp_tesis_dashboard::data::filter::{apply, FilterCriteria};
use ppp_tesis_dashboard::data::grouping::count_by;
use ppp_tesis_dashboard::data::ratio::completion_ratio;
use ppp_tesis_dashboard::data::series::{month_series, year_series};
use ppp_tesis_dashboard::data::stats::group_average;
use ppp_tesis_dashboard::{Area, CellValue, Field, Record};

const FACULTIES: [&str; 4] = ["Ingeniería", "Agronomía", "Zootecnia", ""];
const STATUSES: [&str; 3] = ["Concluido", "En curso", ""];
const FLAGS: [&str; 3] = ["Sí", "No", ""];

fn date_cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        Just(CellValue::Text("N/A".into())),
        (-10.0f64..80_000.0).prop_map(CellValue::Number),
        (1990i32..2035, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| CellValue::Text(format!("{y:04}-{m:02}-{d:02}"))),
    ]
}

fn grade_cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        Just(CellValue::Text("N/A".into())),
        (0.0f64..20.0).prop_map(CellValue::Number),
        (0u32..21).prop_map(|g| CellValue::Text(g.to_string())),
    ]
}

prop_compose! {
    fn record()(
        ppp in 0..FLAGS.len(),
        tesis in 0..FLAGS.len(),
        faculty in 0..FACULTIES.len(),
        estado_ppp in 0..STATUSES.len(),
        estado_tesis in 0..STATUSES.len(),
        dates in proptest::collection::vec(date_cell(), 4),
        grade in grade_cell(),
    ) -> Record {
        let columns = [
            "fecha_inicio_ppp",
            "fecha_fin_ppp",
            "fecha_inicio_tesis",
            "fecha_sustentacion",
        ];
        let mut pairs: Vec<(&str, CellValue)> = vec![
            ("hizo_ppp", FLAGS[ppp].into()),
            ("hizo_tesis", FLAGS[tesis].into()),
            ("facultad", FACULTIES[faculty].into()),
            ("estado_ppp", STATUSES[estado_ppp].into()),
            ("estado_tesis", STATUSES[estado_tesis].into()),
            ("calificacion_final", grade),
        ];
        pairs.extend(columns.into_iter().zip(dates));
        pairs.into_iter().collect()
    }
}

fn criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        proptest::option::of(prop_oneof![Just(Area::Internship), Just(Area::Thesis)]),
        proptest::option::of(0..FACULTIES.len()),
        proptest::option::of(0..STATUSES.len()),
        proptest::option::of((2000i32..2030, 0i64..3000)),
    )
        .prop_map(|(area, faculty, status, range)| {
            let mut c = FilterCriteria::cleared();
            if let Some(area) = area {
                c = c.with_area(area);
            }
            if let Some(i) = faculty {
                c = c.with_faculty(FACULTIES[i]);
            }
            if let Some(i) = status {
                c = c.with_status(STATUSES[i]);
            }
            if let Some((year, span)) = range {
                let from = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
                c = c.with_date_range(from, from + chrono::TimeDelta::days(span));
            }
            c
        })
}

fn is_ordered_subsequence(sub: &[&Record], full: &[Record]) -> bool {
    let mut rest = full.iter();
    sub.iter()
        .all(|s| rest.by_ref().any(|r| std::ptr::eq(*s, r)))
}

proptest! {
    #[test]
    fn empty_criteria_is_identity(records in proptest::collection::vec(record(), 0..40)) {
        let kept = apply(&records, &FilterCriteria::cleared());
        prop_assert_eq!(kept.len(), records.len());
        prop_assert!(kept.iter().zip(&records).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn filtering_preserves_order(
        records in proptest::collection::vec(record(), 0..40),
        c in criteria(),
    ) {
        let kept = apply(&records, &c);
        prop_assert!(is_ordered_subsequence(&kept, &records));
    }

    #[test]
    fn dropping_a_faculty_constraint_never_shrinks(
        records in proptest::collection::vec(record(), 0..40),
        c in criteria(),
        faculty in 0..FACULTIES.len(),
    ) {
        let mut narrow = c.clone();
        narrow.faculty.clear();
        let wide = narrow.clone();
        let narrow = narrow.with_faculty(FACULTIES[faculty]);

        let wide_kept = apply(&records, &wide);
        let narrow_kept = apply(&records, &narrow);
        prop_assert!(narrow_kept
            .iter()
            .all(|n| wide_kept.iter().any(|w| std::ptr::eq(*n, *w))));
    }

    #[test]
    fn month_series_always_has_twelve_points(
        records in proptest::collection::vec(record(), 0..40),
        c in criteria(),
    ) {
        let kept = apply(&records, &c);
        prop_assert_eq!(month_series(&kept, &c).len(), 12);
    }

    #[test]
    fn year_series_stays_within_window(
        records in proptest::collection::vec(record(), 0..40),
        c in criteria(),
    ) {
        let kept = apply(&records, &c);
        let current = Local::now().year();
        let points = year_series(&kept, &c);
        prop_assert!(points.iter().all(|p| (2000..=current).contains(&p.year)));
        prop_assert!(points.windows(2).all(|w| w[0].year < w[1].year));
    }

    #[test]
    fn group_means_stay_within_observed_grades(
        records in proptest::collection::vec(record(), 0..40),
    ) {
        let refs: Vec<&Record> = records.iter().collect();
        for avg in group_average(&refs, Field::Faculty) {
            let grades: Vec<f64> = records
                .iter()
                .filter(|r| r.did_thesis() && r.field(Field::Faculty) == Some(avg.label.as_str()))
                .filter_map(|r| r.grade())
                .collect();
            prop_assert!(!grades.is_empty());
            prop_assert_eq!(grades.len(), avg.samples);
            let min = grades.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = grades.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(min - 1e-9 <= avg.mean && avg.mean <= max + 1e-9);
        }
    }

    #[test]
    fn count_by_accounts_for_every_present_value(
        records in proptest::collection::vec(record(), 0..40),
    ) {
        let refs: Vec<&Record> = records.iter().collect();
        let total: usize = count_by(&refs, Field::Faculty).iter().map(|b| b.value).sum();
        let present = records.iter().filter(|r| r.field(Field::Faculty).is_some()).count();
        prop_assert_eq!(total, present);
    }

    #[test]
    fn ratio_is_a_fraction(filtered in 0usize..1000, extra in 0usize..1000) {
        let r = completion_ratio(filtered, filtered + extra);
        prop_assert!((0.0..=1.0).contains(&r));
    }
}

#[test]
fn ratio_edges() {
    assert_eq!(completion_ratio(0, 0), 0.0);
    assert_eq!(completion_ratio(12, 12), 1.0);
}
