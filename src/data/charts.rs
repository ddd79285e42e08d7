//! Series for the "Learn More" charts. All functions are pure; colours are
//! chosen by the UI and never affect the numbers.

use super::model::{Column, StructureTable, Unit};
use super::stats::value_counts;

/// Bin edges of the construction-year histogram.
pub const YEAR_BIN_EDGES: [i64; 7] = [1930, 1945, 1960, 1975, 1990, 2005, 2020];

/// Choices offered for the "Top N tallest" chart.
pub const TOP_N_CHOICES: [usize; 5] = [1, 5, 10, 15, 30];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Type,
    Use,
}

impl Category {
    pub fn column(self) -> Column {
        match self {
            Category::Type => Column::CanonicalType,
            Category::Use => Column::CanonicalUse,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Type => "Types of Structures",
            Category::Use => "Primary Main Uses of Structures",
        }
    }
}

/// Frequency of each canonical type or use, most frequent first.
pub fn category_distribution(table: &StructureTable, category: Category) -> Vec<(String, usize)> {
    value_counts(table, category.column())
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBin {
    pub start: i64,
    pub end: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearHistogram {
    pub bins: Vec<YearBin>,
    /// Years before the first edge or after the last.
    pub outside: usize,
}

impl YearHistogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Bin of `year`: half-open `[start, end)` except the last bin, which also
/// takes its end edge.
pub fn year_bin(year: i64) -> Option<usize> {
    let last = YEAR_BIN_EDGES.len() - 1;
    if year < YEAR_BIN_EDGES[0] || year > YEAR_BIN_EDGES[last] {
        return None;
    }
    if year == YEAR_BIN_EDGES[last] {
        return Some(last - 1);
    }
    YEAR_BIN_EDGES.windows(2).position(|w| w[0] <= year && year < w[1])
}

pub fn year_histogram(table: &StructureTable) -> YearHistogram {
    let mut bins: Vec<YearBin> = YEAR_BIN_EDGES
        .windows(2)
        .map(|w| YearBin {
            start: w[0],
            end: w[1],
            count: 0,
        })
        .collect();
    let mut outside = 0;
    for s in table {
        match year_bin(s.year) {
            Some(i) => bins[i].count += 1,
            None => outside += 1,
        }
    }
    YearHistogram { bins, outside }
}

/// The `n` tallest structures as `(name, height)`, tallest first. Equal heights
/// keep table order.
pub fn top_n(table: &StructureTable, unit: Unit, n: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(&str, f64)> = table
        .iter()
        .map(|s| (s.name.as_str(), s.height(unit)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(n)
        .map(|(name, h)| (name.to_string(), h))
        .collect()
}

/// `[year, height]` per structure, in table order.
pub fn year_vs_height(table: &StructureTable, unit: Unit) -> Vec<[f64; 2]> {
    table
        .iter()
        .map(|s| [s.year as f64, s.height(unit)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Structure;

    fn structure(name: &str, metres: f64, year: i64) -> Structure {
        Structure::new(name, metres, year, "X", "Y", 0.0, 0.0)
    }

    #[test]
    fn use_distribution_coalesces_to_other() {
        let t = StructureTable::from_structures(vec![
            structure("A", 1.0, 2000).with_use("Office"),
            structure("B", 1.0, 2000).with_use("Casino"),
            structure("C", 1.0, 2000).with_use("Hotel"),
        ]);
        let dist = category_distribution(&t, Category::Use);
        assert_eq!(
            dist,
            vec![
                ("Office".to_string(), 1),
                ("Other".to_string(), 1),
                ("Hotel".to_string(), 1)
            ]
        );
    }

    #[test]
    fn type_distribution_counts_first_segment() {
        let t = StructureTable::from_structures(vec![
            structure("A", 1.0, 2000).with_type("Concrete tower/Steel lattice"),
            structure("B", 1.0, 2000).with_type("Skyscraper"),
            structure("C", 1.0, 2000).with_type("Concrete tower"),
        ]);
        let dist = category_distribution(&t, Category::Type);
        assert_eq!(dist[0], ("Concrete tower".to_string(), 2));
        assert_eq!(dist[1], ("Skyscraper".to_string(), 1));
    }

    #[test]
    fn year_bins_follow_edge_policy() {
        assert_eq!(year_bin(1931), Some(0));
        assert_eq!(year_bin(1945), Some(1));
        assert_eq!(year_bin(1946), Some(1));
        assert_eq!(year_bin(1999), Some(4));
        assert_eq!(year_bin(2005), Some(5));
        assert_eq!(year_bin(2020), Some(5));
        assert_eq!(year_bin(1929), None);
        assert_eq!(year_bin(2021), None);
    }

    #[test]
    fn histogram_counts_per_bin() {
        let t = StructureTable::from_structures(
            [1931, 1946, 1999, 2020, 1901]
                .iter()
                .map(|&y| structure("S", 1.0, y))
                .collect(),
        );
        let hist = year_histogram(&t);
        let counts: Vec<usize> = hist.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 1, 1]);
        assert_eq!(hist.outside, 1);
        assert_eq!(hist.total(), 4);
        assert_eq!((hist.bins[5].start, hist.bins[5].end), (2005, 2020));
    }

    #[test]
    fn top_n_is_stable_and_descending() {
        let t = StructureTable::from_structures(vec![
            structure("A", 300.0, 2000),
            structure("B", 500.0, 2000),
            structure("C", 500.0, 2000),
            structure("D", 100.0, 2000),
        ]);
        let top = top_n(&t, Unit::Metres, 2);
        assert_eq!(top, vec![("B".to_string(), 500.0), ("C".to_string(), 500.0)]);
        assert_eq!(top_n(&t, Unit::Metres, 30).len(), 4);
        assert!(top_n(&t, Unit::Metres, 0).is_empty());
    }

    #[test]
    fn paired_series_keeps_table_order() {
        let t = StructureTable::from_structures(vec![
            structure("A", 300.0, 1990),
            structure("B", 500.0, 1970),
        ]);
        assert_eq!(
            year_vs_height(&t, Unit::Metres),
            vec![[1990.0, 300.0], [1970.0, 500.0]]
        );
    }
}
