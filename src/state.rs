use std::path::PathBuf;

use eframe::egui::Color32;

use skyline_atlas::data::charts::{Category, TOP_N_CHOICES};
use skyline_atlas::data::filter::CitySearch;
use skyline_atlas::data::geo::{GeoPoint, LocationFilter, MapMode, DEFAULT_REFERENCE};
use skyline_atlas::data::loader::load_file;
use skyline_atlas::data::{Column, DataError, StructureTable, Unit};

use crate::color::{PaletteKind, SingleColor};

/// Column names offered by the search page. `Height` follows the unit.
pub const SEARCH_COLUMNS: [&str; 10] = [
    "Name", "Height", "Year", "Type", "Main use", "Country", "City", "Remarks", "Lat", "Lon",
];

// ---------------------------------------------------------------------------
// Navigation and chart choices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Locate,
    LearnMore,
    Search,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Locate, Page::LearnMore, Page::Search];

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Locate => "Locating Structures",
            Page::LearnMore => "Learn More",
            Page::Search => "Additional Search",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartChoice {
    #[default]
    Purpose,
    BuiltOverYears,
    TopTallest,
    YearVsHeight,
    All,
}

impl ChartChoice {
    pub const ALL: [ChartChoice; 5] = [
        ChartChoice::Purpose,
        ChartChoice::BuiltOverYears,
        ChartChoice::TopTallest,
        ChartChoice::YearVsHeight,
        ChartChoice::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartChoice::Purpose => "Purpose of Structures",
            ChartChoice::BuiltOverYears => "Number Built Over Years",
            ChartChoice::TopTallest => "Top Tallest Structures",
            ChartChoice::YearVsHeight => "Year vs Height",
            ChartChoice::All => "All",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<StructureTable>,
    /// Where the dataset came from.
    pub source: Option<PathBuf>,

    pub page: Page,
    pub unit: Unit,

    /// Country/city shared by the location map and the search page.
    pub country: String,
    pub city: String,

    // ---- Locating Structures ----
    pub map_mode: MapMode,
    /// Height slider value of the location map, `None` until touched.
    pub map_height_upper: Option<i64>,
    pub lat_input: String,
    pub lon_input: String,
    pub show_map_data: bool,

    // ---- Learn More ----
    pub palette: PaletteKind,
    pub single_color: SingleColor,
    pub custom_color: Color32,
    pub chart: ChartChoice,
    pub category: Category,
    pub top_n: usize,

    // ---- Additional Search ----
    pub search_columns: Vec<&'static str>,
    pub search_year_upper: Option<i64>,
    pub search_height_upper: Option<i64>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source: None,
            page: Page::default(),
            unit: Unit::default(),
            country: String::new(),
            city: String::new(),
            map_mode: MapMode::default(),
            map_height_upper: None,
            lat_input: DEFAULT_REFERENCE.lat.to_string(),
            lon_input: DEFAULT_REFERENCE.lon.to_string(),
            show_map_data: false,
            palette: PaletteKind::default(),
            single_color: SingleColor::default(),
            custom_color: Color32::from_rgb(31, 119, 180),
            chart: ChartChoice::default(),
            category: Category::default(),
            top_n: TOP_N_CHOICES[1],
            search_columns: Vec::new(),
            search_year_upper: None,
            search_height_upper: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and point the selectors at its first city.
    pub fn set_dataset(&mut self, dataset: StructureTable, source: PathBuf) {
        let first_country = dataset.countries().into_iter().next().unwrap_or_default();
        self.dataset = Some(dataset);
        self.source = Some(source);
        self.select_country(first_country);
        self.status_message = None;
    }

    /// Load `path`, replacing the dataset on success. Failures are already
    /// logged by the loader; the message is kept for the top bar.
    pub fn load_path(&mut self, path: PathBuf) {
        match load_file(&path) {
            Ok(dataset) => self.set_dataset(dataset, path),
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    pub fn countries(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(StructureTable::countries)
            .unwrap_or_default()
    }

    pub fn cities(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(|ds| ds.cities_in(&self.country))
            .unwrap_or_default()
    }

    /// Change country and fall back to its first city.
    pub fn select_country(&mut self, country: String) {
        self.country = country;
        let first_city = self.cities().into_iter().next().unwrap_or_default();
        self.select_city(first_city);
    }

    /// Change city and forget slider positions from the previous one.
    pub fn select_city(&mut self, city: String) {
        self.city = city;
        self.reset_sliders();
    }

    pub fn set_unit(&mut self, unit: Unit) {
        if self.unit != unit {
            self.unit = unit;
            self.reset_sliders();
        }
    }

    fn reset_sliders(&mut self) {
        self.map_height_upper = None;
        self.search_year_upper = None;
        self.search_height_upper = None;
    }

    /// Parse the "Structures Near Me" inputs.
    pub fn reference_point(&self) -> Result<GeoPoint, DataError> {
        let parse = |label: &str, text: &str| {
            text.trim()
                .parse::<f64>()
                .map_err(|_| DataError::InvalidParameter(format!("{label} '{text}' is not a number")))
        };
        Ok(GeoPoint::new(
            parse("latitude", &self.lat_input)?,
            parse("longitude", &self.lon_input)?,
        ))
    }

    pub fn location_filter(&self) -> LocationFilter {
        let filter = LocationFilter::new(self.country.clone(), self.city.clone());
        match self.map_height_upper {
            Some(h) => filter.with_height_upper(h as f64),
            None => filter,
        }
    }

    pub fn toggle_search_column(&mut self, name: &'static str) {
        if let Some(pos) = self.search_columns.iter().position(|&c| c == name) {
            self.search_columns.remove(pos);
        } else {
            self.search_columns.push(name);
        }
    }

    fn search_selects(&self, name: &str) -> bool {
        self.search_columns.iter().any(|&c| c == name)
    }

    /// Build the search query from the page's selections. Height and year
    /// caps apply only when their columns are shown.
    pub fn city_search(&self) -> Result<CitySearch, DataError> {
        let mut search = CitySearch::new(self.country.clone(), self.city.clone());
        search.unit = self.unit;
        search.columns = self
            .search_columns
            .iter()
            .map(|name| Column::resolve(name, self.unit))
            .collect::<Result<Vec<_>, _>>()?;
        if self.search_selects("Year") {
            search.year_upper = self.search_year_upper;
        }
        if self.search_selects("Height") {
            search.height_upper = self.search_height_upper.map(|h| h as f64);
        }
        Ok(search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_atlas::data::Structure;

    fn state() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(
            StructureTable::from_structures(vec![
                Structure::new("A", 500.0, 2000, "China", "Shanghai", 31.2, 121.5),
                Structure::new("B", 400.0, 1990, "Canada", "Toronto", 43.6, -79.4),
                Structure::new("C", 450.0, 2010, "China", "Beijing", 39.9, 116.4),
            ]),
            PathBuf::from("test.csv"),
        );
        state
    }

    #[test]
    fn new_dataset_selects_first_country_and_city() {
        let state = state();
        assert_eq!(state.country, "Canada");
        assert_eq!(state.city, "Toronto");
    }

    #[test]
    fn changing_country_resets_city_and_sliders() {
        let mut state = state();
        state.map_height_upper = Some(420);
        state.select_country("China".to_string());
        assert_eq!(state.city, "Beijing");
        assert_eq!(state.map_height_upper, None);
    }

    #[test]
    fn reference_point_rejects_text() {
        let mut state = state();
        assert_eq!(state.reference_point().unwrap(), DEFAULT_REFERENCE);
        state.lat_input = "north".to_string();
        assert!(matches!(
            state.reference_point(),
            Err(DataError::InvalidParameter(_))
        ));
    }

    #[test]
    fn search_resolves_height_through_unit() {
        let mut state = state();
        state.set_unit(Unit::Feet);
        state.toggle_search_column("Name");
        state.toggle_search_column("Height");
        state.search_year_upper = Some(1995);
        state.search_height_upper = Some(10_000);
        let search = state.city_search().unwrap();
        assert_eq!(search.columns, vec![Column::Name, Column::Feet]);
        assert_eq!(search.year_upper, None);
        assert_eq!(search.height_upper, Some(10_000.0));

        state.toggle_search_column("Height");
        assert_eq!(state.search_columns, vec!["Name"]);
    }
}
