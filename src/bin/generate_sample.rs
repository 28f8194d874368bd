//! Write a synthetic PPP / thesis table as `sample_placements.parquet` and
//! `sample_placements.csv`.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, TimeDelta};
use parquet::arrow::ArrowWriter;

const FACULTIES: [(&str, &[&str]); 4] = [
    ("Ingeniería", &["Sistemas", "Civil", "Industrial"]),
    ("Agronomía", &["Agronomía", "Forestal"]),
    ("Zootecnia", &["Zootecnia"]),
    ("Ciencias Económicas", &["Economía", "Contabilidad", "Administración"]),
];
const GENDERS: [&str; 2] = ["F", "M"];
const PPP_STATUSES: [&str; 3] = ["Concluido", "En curso", "Observado"];
const THESIS_STATUSES: [&str; 4] = ["Sustentada", "En revisión", "Aprobado proyecto", "Observado"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One synthetic row; `None` cells stay empty in both outputs.
struct SampleRow {
    hizo_ppp: &'static str,
    hizo_tesis: &'static str,
    facultad: &'static str,
    escuela: &'static str,
    genero: &'static str,
    estado_ppp: Option<&'static str>,
    estado_tesis: Option<&'static str>,
    fecha_inicio_ppp: Option<String>,
    fecha_fin_ppp: Option<String>,
    fecha_inicio_tesis: Option<String>,
    fecha_sustentacion: Option<String>,
    calificacion_final: Option<String>,
}

fn serial_of(date: NaiveDate) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days()
}

fn random_date(rng: &mut SimpleRng, first_year: i32, span_days: usize) -> NaiveDate {
    let start = NaiveDate::from_ymd_opt(first_year, 1, 1).unwrap_or(NaiveDate::MIN);
    start + TimeDelta::days(rng.below(span_days) as i64)
}

/// Half the dates are written as serial day counts, like a raw sheet export.
fn date_cell(rng: &mut SimpleRng, date: NaiveDate) -> String {
    if rng.chance(0.5) {
        serial_of(date).to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

fn generate_row(rng: &mut SimpleRng) -> SampleRow {
    let (facultad, programs) = FACULTIES[rng.below(FACULTIES.len())];
    let did_ppp = rng.chance(0.7);
    let did_tesis = rng.chance(0.5);

    let mut row = SampleRow {
        hizo_ppp: if did_ppp { "Sí" } else { "No" },
        hizo_tesis: if did_tesis { "Sí" } else { "No" },
        facultad,
        escuela: rng.pick(programs),
        genero: rng.pick(&GENDERS),
        estado_ppp: None,
        estado_tesis: None,
        fecha_inicio_ppp: None,
        fecha_fin_ppp: None,
        fecha_inicio_tesis: None,
        fecha_sustentacion: None,
        calificacion_final: None,
    };

    if did_ppp {
        let start = random_date(rng, 2015, 10 * 365);
        let end = start + TimeDelta::days(90 + rng.below(120) as i64);
        row.estado_ppp = Some(rng.pick(&PPP_STATUSES));
        row.fecha_inicio_ppp = Some(date_cell(rng, start));
        row.fecha_fin_ppp = rng.chance(0.8).then(|| date_cell(rng, end));
    }

    if did_tesis {
        let start = random_date(rng, 2016, 9 * 365);
        let status = rng.pick(&THESIS_STATUSES);
        row.estado_tesis = Some(status);
        row.fecha_inicio_tesis = Some(date_cell(rng, start));
        if status == "Sustentada" {
            let defense = start + TimeDelta::days(180 + rng.below(400) as i64);
            row.fecha_sustentacion = Some(date_cell(rng, defense));
            let grade = 11.0 + rng.next_f64() * 9.0;
            row.calificacion_final = Some(format!("{grade:.1}"));
        } else {
            row.calificacion_final = Some("N/A".to_string());
        }
    }

    row
}

fn text_column(rows: &[SampleRow], get: impl Fn(&SampleRow) -> Option<&str>) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(get).collect::<Vec<_>>()))
}

fn write_parquet(rows: &[SampleRow], path: &str) -> Result<()> {
    let names = [
        "hizo_ppp",
        "hizo_tesis",
        "facultad",
        "escuela",
        "genero",
        "estado_ppp",
        "estado_tesis",
        "fecha_inicio_ppp",
        "fecha_fin_ppp",
        "fecha_inicio_tesis",
        "fecha_sustentacion",
    ];
    let mut fields: Vec<Field> = names
        .iter()
        .map(|n| Field::new(*n, DataType::Utf8, true))
        .collect();
    fields.push(Field::new("calificacion_final", DataType::Float64, true));
    let schema = Arc::new(Schema::new(fields));

    let grades = Float64Array::from(
        rows.iter()
            .map(|r| r.calificacion_final.as_deref().and_then(|g| g.parse().ok()))
            .collect::<Vec<Option<f64>>>(),
    );

    let columns: Vec<ArrayRef> = vec![
        text_column(rows, |r| Some(r.hizo_ppp)),
        text_column(rows, |r| Some(r.hizo_tesis)),
        text_column(rows, |r| Some(r.facultad)),
        text_column(rows, |r| Some(r.escuela)),
        text_column(rows, |r| Some(r.genero)),
        text_column(rows, |r| r.estado_ppp),
        text_column(rows, |r| r.estado_tesis),
        text_column(rows, |r| r.fecha_inicio_ppp.as_deref()),
        text_column(rows, |r| r.fecha_fin_ppp.as_deref()),
        text_column(rows, |r| r.fecha_inicio_tesis.as_deref()),
        text_column(rows, |r| r.fecha_sustentacion.as_deref()),
        Arc::new(grades),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(rows: &[SampleRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    writer.write_record([
        "hizo_ppp",
        "hizo_tesis",
        "facultad",
        "escuela",
        "genero",
        "estado_ppp",
        "estado_tesis",
        "fecha_inicio_ppp",
        "fecha_fin_ppp",
        "fecha_inicio_tesis",
        "fecha_sustentacion",
        "calificacion_final",
    ])?;
    for r in rows {
        writer.write_record([
            r.hizo_ppp,
            r.hizo_tesis,
            r.facultad,
            r.escuela,
            r.genero,
            r.estado_ppp.unwrap_or(""),
            r.estado_tesis.unwrap_or(""),
            r.fecha_inicio_ppp.as_deref().unwrap_or(""),
            r.fecha_fin_ppp.as_deref().unwrap_or(""),
            r.fecha_inicio_tesis.as_deref().unwrap_or(""),
            r.fecha_sustentacion.as_deref().unwrap_or(""),
            r.calificacion_final.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<SampleRow> = (0..600).map(|_| generate_row(&mut rng)).collect();

    write_parquet(&rows, "sample_placements.parquet")?;
    write_csv(&rows, "sample_placements.csv")?;

    println!(
        "Wrote {} records to sample_placements.parquet and sample_placements.csv",
        rows.len()
    );
    Ok(())
}
