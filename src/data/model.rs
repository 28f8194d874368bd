use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use super::dates;

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

/// Column headers of the unified PPP / thesis sheet.
pub mod columns {
    pub const HIZO_PPP: &str = "hizo_ppp";
    pub const HIZO_TESIS: &str = "hizo_tesis";
    pub const FACULTAD: &str = "facultad";
    pub const ESCUELA: &str = "escuela";
    pub const GENERO: &str = "genero";
    pub const ESTADO_PPP: &str = "estado_ppp";
    pub const ESTADO_TESIS: &str = "estado_tesis";
    pub const FECHA_INICIO_PPP: &str = "fecha_inicio_ppp";
    pub const FECHA_FIN_PPP: &str = "fecha_fin_ppp";
    pub const FECHA_INICIO_TESIS: &str = "fecha_inicio_tesis";
    pub const FECHA_SUSTENTACION: &str = "fecha_sustentacion";
    pub const CALIFICACION_FINAL: &str = "calificacion_final";

    /// Columns whose text cells may hold numbers (serial dates, grades).
    /// Every other column is categorical and keeps its text verbatim.
    pub fn is_numeric(name: &str) -> bool {
        let name = name.trim().to_lowercase();
        [
            FECHA_INICIO_PPP,
            FECHA_FIN_PPP,
            FECHA_INICIO_TESIS,
            FECHA_SUSTENTACION,
            CALIFICACION_FINAL,
        ]
        .contains(&name.as_str())
    }
}

/// Placeholder written into the grade column when no grade exists.
pub const GRADE_PLACEHOLDER: &str = "N/A";

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as handed over by ingestion.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    #[default]
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            // Whole numbers print without a fraction so codes like `2019` stay readable.
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    /// Type a raw text cell the way a spreadsheet export would.
    pub fn guess(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(s.to_string()),
        }
    }

    /// Whether the cell carries nothing usable (empty or whitespace-only text).
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => !n.is_finite(),
            CellValue::Bool(_) => false,
        }
    }

    /// Render a cell as a category label. Blank cells, `false` and `0`
    /// count as absent.
    pub fn into_label(self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        match self {
            CellValue::Text(s) => Some(s.trim().to_string()),
            CellValue::Bool(false) => None,
            CellValue::Number(n) if n == 0.0 => None,
            other => Some(other.to_string()),
        }
    }

    /// Interpret the cell as a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Whether a yes/no participation token means "yes".
pub fn is_affirmative(token: &str) -> bool {
    let token = token.trim().to_lowercase();
    matches!(token.as_str(), "sí" | "si" | "yes" | "true" | "1")
}

/// The longest decimal number at the start of `s`, ignoring leading
/// whitespace: `"17.0pts"` reads as 17 and `"15,5"` as 15.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

// ---------------------------------------------------------------------------
// Area – the two activities a record can take part in
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Area {
    /// Supervised professional placement (PPP).
    Internship,
    Thesis,
}

impl Area {
    pub const ALL: [Area; 2] = [Area::Internship, Area::Thesis];

    pub fn label(self) -> &'static str {
        match self {
            Area::Internship => "PPP",
            Area::Thesis => "Tesis",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown area '{0}', expected PPP/Internship or Tesis/Thesis")]
pub struct UnknownArea(pub String);

impl FromStr for Area {
    type Err = UnknownArea;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ppp" | "internship" => Ok(Area::Internship),
            "tesis" | "thesis" => Ok(Area::Thesis),
            _ => Err(UnknownArea(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Field / DateField – typed handles onto record columns
// ---------------------------------------------------------------------------

/// Text-valued columns that can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DidInternship,
    DidThesis,
    Faculty,
    Program,
    Gender,
    InternshipStatus,
    ThesisStatus,
}

impl Field {
    pub fn column(self) -> &'static str {
        match self {
            Field::DidInternship => columns::HIZO_PPP,
            Field::DidThesis => columns::HIZO_TESIS,
            Field::Faculty => columns::FACULTAD,
            Field::Program => columns::ESCUELA,
            Field::Gender => columns::GENERO,
            Field::InternshipStatus => columns::ESTADO_PPP,
            Field::ThesisStatus => columns::ESTADO_TESIS,
        }
    }
}

/// The four date-bearing columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    InternshipStart,
    InternshipEnd,
    ThesisStart,
    Defense,
}

impl DateField {
    pub const ALL: [DateField; 4] = [
        DateField::InternshipStart,
        DateField::InternshipEnd,
        DateField::ThesisStart,
        DateField::Defense,
    ];

    /// Which activity the date belongs to.
    pub fn area(self) -> Area {
        match self {
            DateField::InternshipStart | DateField::InternshipEnd => Area::Internship,
            DateField::ThesisStart | DateField::Defense => Area::Thesis,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            DateField::InternshipStart => columns::FECHA_INICIO_PPP,
            DateField::InternshipEnd => columns::FECHA_FIN_PPP,
            DateField::ThesisStart => columns::FECHA_INICIO_TESIS,
            DateField::Defense => columns::FECHA_SUSTENTACION,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source sheet
// ---------------------------------------------------------------------------

/// One student row. Built once at ingestion and never mutated afterwards;
/// every accessor is total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    did_internship: Option<String>,
    did_thesis: Option<String>,
    faculty: Option<String>,
    program: Option<String>,
    gender: Option<String>,
    internship_status: Option<String>,
    thesis_status: Option<String>,
    internship_start: CellValue,
    internship_end: CellValue,
    thesis_start: CellValue,
    defense_date: CellValue,
    final_grade: CellValue,
}

impl Record {
    /// Build a record from a `column → cell` row. Header names are matched
    /// after trimming and lower-casing; unknown columns are ignored.
    pub fn from_row(row: BTreeMap<String, CellValue>) -> Self {
        let mut row: BTreeMap<String, CellValue> = row
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        let mut take = |col: &str| row.remove(col).unwrap_or_default();

        Record {
            did_internship: take(columns::HIZO_PPP).into_label(),
            did_thesis: take(columns::HIZO_TESIS).into_label(),
            faculty: take(columns::FACULTAD).into_label(),
            program: take(columns::ESCUELA).into_label(),
            gender: take(columns::GENERO).into_label(),
            internship_status: take(columns::ESTADO_PPP).into_label(),
            thesis_status: take(columns::ESTADO_TESIS).into_label(),
            internship_start: take(columns::FECHA_INICIO_PPP),
            internship_end: take(columns::FECHA_FIN_PPP),
            thesis_start: take(columns::FECHA_INICIO_TESIS),
            defense_date: take(columns::FECHA_SUSTENTACION),
            final_grade: take(columns::CALIFICACION_FINAL),
        }
    }

    /// Value of a text column; `None` when absent or blank.
    pub fn field(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::DidInternship => &self.did_internship,
            Field::DidThesis => &self.did_thesis,
            Field::Faculty => &self.faculty,
            Field::Program => &self.program,
            Field::Gender => &self.gender,
            Field::InternshipStatus => &self.internship_status,
            Field::ThesisStatus => &self.thesis_status,
        };
        value.as_deref()
    }

    pub fn did_internship(&self) -> bool {
        self.field(Field::DidInternship).is_some_and(is_affirmative)
    }

    pub fn did_thesis(&self) -> bool {
        self.field(Field::DidThesis).is_some_and(is_affirmative)
    }

    /// Whether the record's participation flag for `area` is affirmative.
    pub fn took_part_in(&self, area: Area) -> bool {
        match area {
            Area::Internship => self.did_internship(),
            Area::Thesis => self.did_thesis(),
        }
    }

    /// Raw cell of a date column, before normalisation.
    pub fn date_cell(&self, field: DateField) -> &CellValue {
        match field {
            DateField::InternshipStart => &self.internship_start,
            DateField::InternshipEnd => &self.internship_end,
            DateField::ThesisStart => &self.thesis_start,
            DateField::Defense => &self.defense_date,
        }
    }

    /// Normalised date of a date column, if it holds a valid one.
    pub fn date(&self, field: DateField) -> Option<NaiveDate> {
        dates::normalize(self.date_cell(field))
    }

    /// All valid dates of the record, in column order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        DateField::ALL.into_iter().filter_map(|f| self.date(f))
    }

    /// Final thesis grade when present, not the placeholder, and numeric.
    /// Text cells are read by their leading number, so `"15,5"` is 15.
    pub fn grade(&self) -> Option<f64> {
        match &self.final_grade {
            CellValue::Text(s) if s.trim().eq_ignore_ascii_case(GRADE_PLACEHOLDER) => None,
            CellValue::Text(s) => leading_number(s),
            cell => cell.as_f64(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Record::from_row(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// User-facing filter dimensions backed by free-form values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Faculty,
    Program,
    Gender,
    /// Spans both the internship and the thesis status columns.
    Status,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Faculty,
        Dimension::Program,
        Dimension::Gender,
        Dimension::Status,
    ];

    pub fn fields(self) -> &'static [Field] {
        match self {
            Dimension::Faculty => &[Field::Faculty],
            Dimension::Program => &[Field::Program],
            Dimension::Gender => &[Field::Gender],
            Dimension::Status => &[Field::InternshipStatus, Field::ThesisStatus],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Faculty => "Facultad",
            Dimension::Program => "Escuela",
            Dimension::Gender => "Género",
            Dimension::Status => "Estado",
        }
    }
}

/// Distinct selectable values per dimension, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub faculty: Vec<String>,
    pub program: Vec<String>,
    pub gender: Vec<String>,
    pub status: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[Record]) -> Self {
        let collect = |dimension: Dimension| {
            let mut seen = HashSet::new();
            let mut values = Vec::new();
            for record in records {
                for &field in dimension.fields() {
                    if let Some(v) = record.field(field) {
                        if seen.insert(v) {
                            values.push(v.to_string());
                        }
                    }
                }
            }
            values
        };

        FilterOptions {
            faculty: collect(Dimension::Faculty),
            program: collect(Dimension::Program),
            gender: collect(Dimension::Gender),
            status: collect(Dimension::Status),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Faculty => &self.faculty,
            Dimension::Program => &self.program,
            Dimension::Gender => &self.gender,
            Dimension::Status => &self.status,
        }
    }
}

/// The full loaded table with pre-computed filter options.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    pub options: FilterOptions,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let options = FilterOptions::from_records(&records);
        Dataset { records, options }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
