use super::error::{DataError, Result};
use super::model::{CellValue, Column, Projection, Structure, StructureTable, Unit};

// ---------------------------------------------------------------------------
// Predicate: the constraint placed on one column
// ---------------------------------------------------------------------------

/// A constraint on a single column.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Predicate {
    /// No constraint; every row passes.
    #[default]
    Unconstrained,
    /// Text compared exactly, numbers compared numerically.
    Equals(CellValue),
    /// Inclusive numeric range `lo <= value <= hi`.
    Range { lo: f64, hi: f64 },
}

impl Predicate {
    pub fn equals(value: impl Into<CellValue>) -> Self {
        Predicate::Equals(value.into())
    }

    pub fn range(lo: f64, hi: f64) -> Self {
        Predicate::Range { lo, hi }
    }

    /// `[lo, hi]`, unless the population collapses to a single value, in which
    /// case the range degenerates to equality with that value.
    pub fn within(bounds: &ColumnBounds, lo: f64, hi: f64) -> Self {
        if bounds.is_degenerate() {
            Predicate::Equals(CellValue::Float(bounds.min))
        } else {
            Predicate::Range { lo, hi }
        }
    }

    pub fn matches(&self, value: &CellValue) -> bool {
        match self {
            Predicate::Unconstrained => true,
            Predicate::Equals(expected) => match (expected, value) {
                (CellValue::Text(a), CellValue::Text(b)) => a == b,
                _ => match (expected.as_f64(), value.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                },
            },
            Predicate::Range { lo, hi } => value
                .as_f64()
                .is_some_and(|v| *lo <= v && v <= *hi),
        }
    }

    fn validate(&self, column: Column) -> Result<()> {
        match self {
            Predicate::Unconstrained => Ok(()),
            Predicate::Equals(value) => {
                if value.is_numeric() != column.is_numeric() {
                    return Err(DataError::invalid(format!(
                        "cannot compare column '{column}' with '{value}'"
                    )));
                }
                if value.as_f64().is_some_and(|v| !v.is_finite()) {
                    return Err(DataError::invalid(format!(
                        "non-finite value for column '{column}'"
                    )));
                }
                Ok(())
            }
            Predicate::Range { lo, hi } => {
                if !column.is_numeric() {
                    return Err(DataError::invalid(format!(
                        "range filter on text column '{column}'"
                    )));
                }
                if !lo.is_finite() || !hi.is_finite() {
                    return Err(DataError::invalid(format!(
                        "non-finite range for column '{column}'"
                    )));
                }
                if lo > hi {
                    return Err(DataError::invalid(format!(
                        "empty range {lo}..={hi} for column '{column}'"
                    )));
                }
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PredicateSet: conjunction of per-column predicates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub column: Column,
    pub predicate: Predicate,
}

/// A conjunction of criteria. The empty set matches every row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredicateSet {
    criteria: Vec<Criterion>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, column: Column, predicate: Predicate) -> Self {
        self.criteria.push(Criterion { column, predicate });
        self
    }

    pub fn country(self, country: &str) -> Self {
        self.and(Column::Country, Predicate::equals(country))
    }

    pub fn city(self, city: &str) -> Self {
        self.and(Column::City, Predicate::equals(city))
    }

    pub fn year_between(self, lo: i64, hi: i64) -> Self {
        self.and(Column::Year, Predicate::range(lo as f64, hi as f64))
    }

    pub fn year_equals(self, year: i64) -> Self {
        self.and(Column::Year, Predicate::equals(year))
    }

    pub fn height_between(self, unit: Unit, lo: f64, hi: f64) -> Self {
        self.and(unit.column(), Predicate::range(lo, hi))
    }

    pub fn height_equals(self, unit: Unit, height: f64) -> Self {
        self.and(unit.column(), Predicate::equals(height))
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Reject mistyped or malformed criteria before touching any rows.
    pub fn validate(&self) -> Result<()> {
        self.criteria
            .iter()
            .try_for_each(|c| c.predicate.validate(c.column))
    }

    pub fn matches(&self, structure: &Structure) -> bool {
        self.criteria
            .iter()
            .all(|c| c.predicate.matches(&structure.value(c.column)))
    }
}

// ---------------------------------------------------------------------------
// Query execution
// ---------------------------------------------------------------------------

/// Return indices of rows that pass every criterion, in table order.
pub fn filtered_indices(table: &StructureTable, predicates: &PredicateSet) -> Result<Vec<usize>> {
    predicates.validate()?;
    let indices: Vec<usize> = table
        .iter()
        .enumerate()
        .filter(|(_, s)| predicates.matches(s))
        .map(|(i, _)| i)
        .collect();
    log::debug!(
        "{} of {} rows pass {} criteria",
        indices.len(),
        table.len(),
        predicates.criteria().len()
    );
    Ok(indices)
}

/// Matching rows as a new table, for feeding into statistics or projections.
pub fn filter_rows(table: &StructureTable, predicates: &PredicateSet) -> Result<StructureTable> {
    let indices = filtered_indices(table, predicates)?;
    Ok(table.subset(&indices))
}

/// Filter rows, then project onto `columns`. An empty match is an empty
/// projection, not an error.
pub fn filter(
    table: &StructureTable,
    predicates: &PredicateSet,
    columns: &[Column],
) -> Result<Projection> {
    Ok(filter_rows(table, predicates)?.project(columns))
}

// ---------------------------------------------------------------------------
// Bounds and slider ranges
// ---------------------------------------------------------------------------

/// Min and max of a numeric column over some population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBounds {
    pub min: f64,
    pub max: f64,
}

impl ColumnBounds {
    /// `None` when the table is empty.
    pub fn of(table: &StructureTable, column: Column) -> Result<Option<Self>> {
        if !column.is_numeric() {
            return Err(DataError::invalid(format!(
                "column '{column}' has no numeric bounds"
            )));
        }
        Ok(table
            .iter()
            .filter_map(|s| s.number(column))
            .fold(None, |acc: Option<ColumnBounds>, v| {
                Some(match acc {
                    None => ColumnBounds { min: v, max: v },
                    Some(b) => ColumnBounds {
                        min: b.min.min(v),
                        max: b.max.max(v),
                    },
                })
            }))
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Integer limits for an interactive range control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderRange {
    pub lo: i64,
    pub hi: i64,
}

impl SliderRange {
    /// `None` for a degenerate population: there is nothing to slide over.
    pub fn for_bounds(bounds: &ColumnBounds) -> Option<Self> {
        if bounds.is_degenerate() {
            None
        } else {
            Some(SliderRange {
                lo: bounds.min.floor() as i64,
                hi: bounds.max.ceil() as i64,
            })
        }
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.lo, self.hi)
    }
}

// ---------------------------------------------------------------------------
// CitySearch: the "Additional Search" query
// ---------------------------------------------------------------------------

/// Range controls available for a city's population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchControls {
    pub year: Option<SliderRange>,
    pub height: Option<SliderRange>,
}

/// Structures in one city, projected onto chosen columns, optionally capped by
/// year and height.
#[derive(Debug, Clone, PartialEq)]
pub struct CitySearch {
    pub country: String,
    pub city: String,
    pub columns: Vec<Column>,
    pub unit: Unit,
    /// Keep structures built no later than this year.
    pub year_upper: Option<i64>,
    /// Keep structures no taller than this, in `unit`.
    pub height_upper: Option<f64>,
}

impl CitySearch {
    pub fn new(country: impl Into<String>, city: impl Into<String>) -> Self {
        CitySearch {
            country: country.into(),
            city: city.into(),
            columns: Vec::new(),
            unit: Unit::default(),
            year_upper: None,
            height_upper: None,
        }
    }

    fn location(&self) -> PredicateSet {
        PredicateSet::new().country(&self.country).city(&self.city)
    }

    /// Every structure in the selected city, before range filters.
    pub fn population(&self, table: &StructureTable) -> Result<StructureTable> {
        filter_rows(table, &self.location())
    }

    pub fn controls(&self, table: &StructureTable) -> Result<SearchControls> {
        let population = self.population(table)?;
        let slider = |column| -> Result<Option<SliderRange>> {
            Ok(ColumnBounds::of(&population, column)?
                .as_ref()
                .and_then(SliderRange::for_bounds))
        };
        Ok(SearchControls {
            year: slider(Column::Year)?,
            height: slider(self.unit.column())?,
        })
    }

    pub fn predicates(&self, table: &StructureTable) -> Result<PredicateSet> {
        let population = self.population(table)?;
        let mut predicates = self.location();
        if let Some(year) = self.year_upper {
            predicates = capped(predicates, &population, Column::Year, year as f64)?;
        }
        if let Some(height) = self.height_upper {
            predicates = capped(predicates, &population, self.unit.column(), height)?;
        }
        Ok(predicates)
    }

    pub fn run(&self, table: &StructureTable) -> Result<Projection> {
        filter(table, &self.predicates(table)?, &self.columns)
    }
}

/// Add `column <= upper` over `population`, collapsing to equality when the
/// population holds a single value.
fn capped(
    predicates: PredicateSet,
    population: &StructureTable,
    column: Column,
    upper: f64,
) -> Result<PredicateSet> {
    let Some(bounds) = ColumnBounds::of(population, column)? else {
        return Ok(predicates);
    };
    let lo = bounds.min.floor().min(upper);
    Ok(predicates.and(column, Predicate::within(&bounds, lo, upper)))
}
