use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::error::{DataError, Result};

/// Feet per metre, used when a source only carries metric heights.
pub const FEET_PER_METRE: f64 = 3.280_839_895;

/// Primary uses kept as their own category; anything else becomes [`OTHER_USE`].
pub const USE_ALLOW_LIST: [&str; 6] = [
    "Office",
    "Observation",
    "Power station",
    "Hotel",
    "UHF/VHF-transmission",
    "Residential",
];

pub const OTHER_USE: &str = "Other";

// ---------------------------------------------------------------------------
// CellValue – a single cell of the structure table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, used for projections, grouping and
/// equality predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

// -- Eq/Hash so CellValue can key an IndexMap (heights are always finite) --

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
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

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl CellValue {
    /// Numeric view of the value; `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, CellValue::Text(_))
    }
}

// ---------------------------------------------------------------------------
// Column – the closed set of known columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        self != ColumnKind::Text
    }
}

/// Every column the table knows about. The last two are derived at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Name,
    Metres,
    Feet,
    Year,
    Type,
    MainUse,
    Country,
    City,
    Remarks,
    Lat,
    Lon,
    CanonicalType,
    CanonicalUse,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::Name,
        Column::Metres,
        Column::Feet,
        Column::Year,
        Column::Type,
        Column::MainUse,
        Column::Country,
        Column::City,
        Column::Remarks,
        Column::Lat,
        Column::Lon,
        Column::CanonicalType,
        Column::CanonicalUse,
    ];

    /// Columns read from a source file, in source order.
    pub const SOURCE: [Column; 11] = [
        Column::Name,
        Column::Metres,
        Column::Feet,
        Column::Year,
        Column::Type,
        Column::MainUse,
        Column::Country,
        Column::City,
        Column::Remarks,
        Column::Lat,
        Column::Lon,
    ];

    /// Header name as it appears in source files.
    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Metres => "Metres",
            Column::Feet => "Feet",
            Column::Year => "Year",
            Column::Type => "Type",
            Column::MainUse => "Main use",
            Column::Country => "Country",
            Column::City => "City",
            Column::Remarks => "Remarks",
            Column::Lat => "Lat",
            Column::Lon => "Lon",
            Column::CanonicalType => "Types",
            Column::CanonicalUse => "Primary use",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Metres | Column::Feet | Column::Lat | Column::Lon => ColumnKind::Float,
            Column::Year => ColumnKind::Integer,
            _ => ColumnKind::Text,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.kind().is_numeric()
    }

    /// Like [`FromStr`], but also accepts the pseudo column `Height`, which
    /// resolves to the magnitude column of `unit`.
    pub fn resolve(name: &str, unit: Unit) -> Result<Column> {
        if name.trim().eq_ignore_ascii_case("height") {
            return Ok(unit.column());
        }
        name.parse()
    }
}

impl FromStr for Column {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.header().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DataError::invalid(format!("unknown column '{wanted}'")))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// Unit – which height column is the magnitude
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Metres,
    Feet,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::Metres, Unit::Feet];

    pub fn column(self) -> Column {
        match self {
            Unit::Metres => Column::Metres,
            Unit::Feet => Column::Feet,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Metres => "Metres",
            Unit::Feet => "Feet",
        }
    }
}

// ---------------------------------------------------------------------------
// Structure – one row of the table
// ---------------------------------------------------------------------------

/// A single freestanding structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub name: String,
    pub metres: f64,
    pub feet: f64,
    pub year: i64,
    /// Slash-delimited structural taxonomy, e.g. `Concrete tower/Steel lattice`.
    pub kind: String,
    /// Comma-delimited list of uses, e.g. `Office, hotel`.
    pub main_use: String,
    pub country: String,
    pub city: String,
    pub remarks: String,
    pub lat: f64,
    pub lon: f64,
    /// First segment of `kind`.
    pub canonical_type: String,
    /// First segment of `main_use`, or [`OTHER_USE`] outside the allow-list.
    pub canonical_use: String,
}

impl Structure {
    /// Build a structure with only the required fields. Feet are derived from
    /// metres; use [`Structure::with_feet`] when the source carries both.
    pub fn new(
        name: impl Into<String>,
        metres: f64,
        year: i64,
        country: impl Into<String>,
        city: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Structure {
            name: name.into(),
            metres,
            feet: metres * FEET_PER_METRE,
            year,
            kind: String::new(),
            main_use: String::new(),
            country: country.into(),
            city: city.into(),
            remarks: String::new(),
            lat,
            lon,
            canonical_type: String::new(),
            canonical_use: OTHER_USE.to_string(),
        }
    }

    pub fn with_feet(mut self, feet: f64) -> Self {
        self.feet = feet;
        self
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self.canonical_type = canonical_type(&self.kind);
        self
    }

    pub fn with_use(mut self, main_use: impl Into<String>) -> Self {
        self.main_use = main_use.into();
        self.canonical_use = canonical_use(&self.main_use);
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }

    /// Height in the given unit (the magnitude).
    pub fn height(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Metres => self.metres,
            Unit::Feet => self.feet,
        }
    }

    pub fn value(&self, column: Column) -> CellValue {
        match column {
            Column::Name => CellValue::Text(self.name.clone()),
            Column::Metres => CellValue::Float(self.metres),
            Column::Feet => CellValue::Float(self.feet),
            Column::Year => CellValue::Integer(self.year),
            Column::Type => CellValue::Text(self.kind.clone()),
            Column::MainUse => CellValue::Text(self.main_use.clone()),
            Column::Country => CellValue::Text(self.country.clone()),
            Column::City => CellValue::Text(self.city.clone()),
            Column::Remarks => CellValue::Text(self.remarks.clone()),
            Column::Lat => CellValue::Float(self.lat),
            Column::Lon => CellValue::Float(self.lon),
            Column::CanonicalType => CellValue::Text(self.canonical_type.clone()),
            Column::CanonicalUse => CellValue::Text(self.canonical_use.clone()),
        }
    }

    /// Numeric cell without allocating; `None` for text columns.
    pub fn number(&self, column: Column) -> Option<f64> {
        match column {
            Column::Metres => Some(self.metres),
            Column::Feet => Some(self.feet),
            Column::Year => Some(self.year as f64),
            Column::Lat => Some(self.lat),
            Column::Lon => Some(self.lon),
            _ => None,
        }
    }
}

/// `Concrete tower/Steel lattice` → `Concrete tower`.
pub fn canonical_type(raw: &str) -> String {
    raw.split('/').next().unwrap_or("").trim().to_string()
}

/// `Office, hotel` → `Office`; `Casino` → `Other`.
pub fn canonical_use(raw: &str) -> String {
    let first = raw.split(',').next().unwrap_or("").trim();
    if USE_ALLOW_LIST.contains(&first) {
        first.to_string()
    } else {
        OTHER_USE.to_string()
    }
}

// ---------------------------------------------------------------------------
// StructureTable – the immutable loaded dataset
// ---------------------------------------------------------------------------

/// The full dataset. Rows are private so the table cannot change after it is
/// built; every query derives a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureTable {
    rows: Vec<Structure>,
}

impl StructureTable {
    pub fn from_structures(rows: Vec<Structure>) -> Self {
        StructureTable { rows }
    }

    pub fn rows(&self) -> &[Structure] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Structure> {
        self.rows.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Structure> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A new table with the rows at `indices`, in the given order.
    pub fn subset(&self, indices: &[usize]) -> StructureTable {
        StructureTable {
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    pub fn head(&self, n: usize) -> StructureTable {
        StructureTable {
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Sorted distinct countries.
    pub fn countries(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.rows.iter().map(|s| s.country.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Sorted distinct cities within `country`.
    pub fn cities_in(&self, country: &str) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .rows
            .iter()
            .filter(|s| s.country == country)
            .map(|s| s.city.as_str())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Project every row onto `columns`.
    pub fn project(&self, columns: &[Column]) -> Projection {
        Projection {
            columns: columns.to_vec(),
            rows: self
                .rows
                .iter()
                .map(|s| columns.iter().map(|&c| s.value(c)).collect())
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StructureTable {
    type Item = &'a Structure;
    type IntoIter = std::slice::Iter<'a, Structure>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// ---------------------------------------------------------------------------
// Projection – rows restricted to a set of columns
// ---------------------------------------------------------------------------

/// Column-projected query output, ready for a table widget.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
