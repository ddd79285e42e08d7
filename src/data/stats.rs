//! Aggregate facts over a structure table or a filtered subset.
//!
//! Every statistic over zero rows is [`DataError::EmptyResult`]; callers that
//! filter first (a city with nothing in the chosen range, say) must be ready
//! for it.

use indexmap::IndexMap;

use super::error::{DataError, Result};
use super::model::{CellValue, Column, Structure, StructureTable, Unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Max,
    Min,
}

/// The extreme value of a column and every row that attains it.
#[derive(Debug, Clone, PartialEq)]
pub struct Extremum {
    pub value: f64,
    /// Indices into the table, in table order. Ties are all kept.
    pub rows: Vec<usize>,
}

impl Extremum {
    pub fn structures<'a>(&self, table: &'a StructureTable) -> Vec<&'a Structure> {
        self.rows.iter().filter_map(|&i| table.get(i)).collect()
    }
}

fn ensure_rows(table: &StructureTable) -> Result<()> {
    if table.is_empty() {
        Err(DataError::EmptyResult)
    } else {
        Ok(())
    }
}

fn ensure_numeric(column: Column) -> Result<()> {
    if column.is_numeric() {
        Ok(())
    } else {
        Err(DataError::invalid(format!("column '{column}' is not numeric")))
    }
}

pub fn extremum(table: &StructureTable, column: Column, which: Extreme) -> Result<Extremum> {
    ensure_numeric(column)?;
    ensure_rows(table)?;
    let values = table.iter().filter_map(|s| s.number(column));
    let value = match which {
        Extreme::Max => values.fold(f64::NEG_INFINITY, f64::max),
        Extreme::Min => values.fold(f64::INFINITY, f64::min),
    };
    let rows = table
        .iter()
        .enumerate()
        .filter(|(_, s)| s.number(column) == Some(value))
        .map(|(i, _)| i)
        .collect();
    Ok(Extremum { value, rows })
}

pub fn mean(table: &StructureTable, column: Column) -> Result<f64> {
    ensure_numeric(column)?;
    ensure_rows(table)?;
    let sum: f64 = table.iter().filter_map(|s| s.number(column)).sum();
    Ok(sum / table.len() as f64)
}

/// Grouped counts, most frequent first; equal counts keep first-seen order.
pub fn value_counts(table: &StructureTable, column: Column) -> Vec<(CellValue, usize)> {
    let mut counts: IndexMap<CellValue, usize> = IndexMap::new();
    for s in table {
        *counts.entry(s.value(column)).or_default() += 1;
    }
    let mut counts: Vec<(CellValue, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The most frequent value and how often it occurs.
pub fn mode_count(table: &StructureTable, column: Column) -> Result<(CellValue, usize)> {
    value_counts(table, column)
        .into_iter()
        .next()
        .ok_or(DataError::EmptyResult)
}

/// Structures built in or after `year`.
pub fn count_since(table: &StructureTable, year: i64) -> usize {
    table.iter().filter(|s| s.year >= year).count()
}

// ---------------------------------------------------------------------------
// Facts for the "Learn More" page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Facts {
    pub unit: Unit,
    pub tallest_height: f64,
    /// `(name, country)` of every structure at the tallest height.
    pub tallest: Vec<(String, String)>,
    pub mean_height: f64,
    pub top_country: String,
    pub top_country_count: usize,
    pub top_type: String,
    pub top_use: String,
    pub total: usize,
    pub built_since_2000: usize,
    pub first_year: i64,
    pub last_year: i64,
}

impl Facts {
    pub fn compute(table: &StructureTable, unit: Unit) -> Result<Facts> {
        let column = unit.column();
        let tallest = extremum(table, column, Extreme::Max)?;
        let (top_country, top_country_count) = mode_count(table, Column::Country)?;
        let (top_type, _) = mode_count(table, Column::CanonicalType)?;
        let (top_use, _) = mode_count(table, Column::CanonicalUse)?;
        let first_year = extremum(table, Column::Year, Extreme::Min)?.value as i64;
        let last_year = extremum(table, Column::Year, Extreme::Max)?.value as i64;

        Ok(Facts {
            unit,
            tallest_height: tallest.value,
            tallest: tallest
                .structures(table)
                .into_iter()
                .map(|s| (s.name.clone(), s.country.clone()))
                .collect(),
            mean_height: mean(table, column)?,
            top_country: top_country.to_string(),
            top_country_count,
            top_type: top_type.to_string(),
            top_use: top_use.to_string(),
            total: table.len(),
            built_since_2000: count_since(table, 2000),
            first_year,
            last_year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heights(rows: &[(&str, f64)]) -> StructureTable {
        StructureTable::from_structures(
            rows.iter()
                .map(|(name, m)| Structure::new(*name, *m, 2000, "X", "Y", 0.0, 0.0))
                .collect(),
        )
    }

    #[test]
    fn max_keeps_every_tied_row() {
        let t = heights(&[("A", 100.0), ("B", 500.0), ("C", 500.0)]);
        let top = extremum(&t, Column::Metres, Extreme::Max).unwrap();
        assert_eq!(top.value, 500.0);
        assert_eq!(top.rows, vec![1, 2]);
        let names: Vec<_> = top.structures(&t).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn min_and_mean() {
        let t = heights(&[("A", 100.0), ("B", 500.0), ("C", 300.0)]);
        let low = extremum(&t, Column::Metres, Extreme::Min).unwrap();
        assert_eq!((low.value, low.rows), (100.0, vec![0]));
        assert!((mean(&t, Column::Metres).unwrap() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn empty_table_is_an_error_for_every_statistic() {
        let t = StructureTable::default();
        assert!(matches!(
            extremum(&t, Column::Metres, Extreme::Max),
            Err(DataError::EmptyResult)
        ));
        assert!(matches!(mean(&t, Column::Year), Err(DataError::EmptyResult)));
        assert!(matches!(mode_count(&t, Column::Country), Err(DataError::EmptyResult)));
        assert!(value_counts(&t, Column::Country).is_empty());
    }

    #[test]
    fn text_columns_have_no_extremum() {
        let t = heights(&[("A", 100.0)]);
        assert!(matches!(
            extremum(&t, Column::Name, Extreme::Max),
            Err(DataError::InvalidParameter(_))
        ));
        assert!(mean(&t, Column::City).is_err());
    }

    #[test]
    fn mode_prefers_first_seen_on_ties() {
        let t = StructureTable::from_structures(vec![
            Structure::new("A", 1.0, 2000, "Japan", "Tokyo", 0.0, 0.0),
            Structure::new("B", 1.0, 2000, "China", "Shanghai", 0.0, 0.0),
            Structure::new("C", 1.0, 2000, "China", "Beijing", 0.0, 0.0),
            Structure::new("D", 1.0, 2000, "Japan", "Osaka", 0.0, 0.0),
        ]);
        assert_eq!(mode_count(&t, Column::Country).unwrap(), (CellValue::from("Japan"), 2));
        let counts = value_counts(&t, Column::City);
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0], (CellValue::from("Tokyo"), 1));
    }

    #[test]
    fn numeric_cells_group_by_value() {
        let t = StructureTable::from_structures(vec![
            Structure::new("A", 300.0, 1998, "X", "Y", 0.0, 0.0),
            Structure::new("B", 300.0, 2004, "X", "Y", 0.0, 0.0),
            Structure::new("C", 250.0, 1998, "X", "Y", 0.0, 0.0),
        ]);
        assert_eq!(
            value_counts(&t, Column::Year),
            vec![(CellValue::Integer(1998), 2), (CellValue::Integer(2004), 1)]
        );
        assert_eq!(
            value_counts(&t, Column::Metres),
            vec![(CellValue::Float(300.0), 2), (CellValue::Float(250.0), 1)]
        );
    }

    #[test]
    fn facts_summarise_the_table() {
        let t = StructureTable::from_structures(vec![
            Structure::new("Old", 381.0, 1931, "United States", "New York City", 40.7, -74.0)
                .with_type("Skyscraper")
                .with_use("Office, observation"),
            Structure::new("Mast", 400.0, 1990, "Poland", "Konstantynow", 52.4, 19.8)
                .with_type("Guyed mast")
                .with_use("Radio"),
            Structure::new("New", 541.0, 2014, "United States", "New York City", 40.7, -74.0)
                .with_type("Skyscraper")
                .with_use("Office"),
        ]);
        let facts = Facts::compute(&t, Unit::Metres).unwrap();
        assert_eq!(facts.tallest, vec![("New".to_string(), "United States".to_string())]);
        assert_eq!(facts.tallest_height, 541.0);
        assert_eq!(facts.top_country, "United States");
        assert_eq!(facts.top_country_count, 2);
        assert_eq!(facts.top_type, "Skyscraper");
        assert_eq!(facts.top_use, "Office");
        assert_eq!(facts.total, 3);
        assert_eq!(facts.built_since_2000, 1);
        assert_eq!((facts.first_year, facts.last_year), (1931, 2014));
    }
}
