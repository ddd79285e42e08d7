use super::error::{DataError, Result};
use super::filter::{filter_rows, ColumnBounds, Predicate, PredicateSet, SliderRange};
use super::model::{Structure, StructureTable, Unit};

pub const GLOBAL_ZOOM: f64 = 2.0;
pub const LOCATION_ZOOM: f64 = 10.0;
pub const LOCATION_PITCH: f64 = 90.0;
pub const PROXIMITY_ZOOM: f64 = 11.0;

/// Column heights are drawn this many times taller than the magnitude.
pub const ELEVATION_SCALE: f64 = 8.0;

/// Half-width of the proximity box, in degrees on both axes.
pub const PROXIMITY_WINDOW_DEGREES: f64 = 2.0;

/// Midtown Manhattan.
pub const DEFAULT_REFERENCE: GeoPoint = GeoPoint {
    lat: 40.75,
    lon: -74.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    fn rounded(self) -> Self {
        GeoPoint {
            lat: round4(self.lat),
            lon: round4(self.lon),
        }
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Camera placement for a map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub center: GeoPoint,
    pub zoom: f64,
    pub pitch: f64,
}

/// One structure placed on a map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub name: String,
    pub country: String,
    pub city: String,
    /// Height in the selected unit.
    pub magnitude: f64,
    /// Visual height of the column; equals `magnitude` outside the location view.
    pub elevation: f64,
    pub lat: f64,
    pub lon: f64,
}

impl MapPoint {
    fn from_structure(s: &Structure, unit: Unit, elevation_scale: f64) -> Self {
        let magnitude = s.height(unit);
        MapPoint {
            name: s.name.clone(),
            country: s.country.clone(),
            city: s.city.clone(),
            magnitude,
            elevation: magnitude * elevation_scale,
            lat: s.lat,
            lon: s.lon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMode {
    #[default]
    Global,
    Location,
    Proximity,
}

impl MapMode {
    pub const ALL: [MapMode; 3] = [MapMode::Global, MapMode::Location, MapMode::Proximity];

    pub fn label(self) -> &'static str {
        match self {
            MapMode::Global => "All Structures",
            MapMode::Location => "Filter By Location",
            MapMode::Proximity => "Structures Near Me",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapProjection {
    pub mode: MapMode,
    pub view: ViewState,
    pub points: Vec<MapPoint>,
}

impl MapProjection {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for a proximity search with nothing nearby.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Arithmetic mean of latitudes and longitudes.
pub fn centroid(table: &StructureTable) -> Result<GeoPoint> {
    if table.is_empty() {
        return Err(DataError::EmptyResult);
    }
    let n = table.len() as f64;
    let (lat, lon) = table
        .iter()
        .fold((0.0, 0.0), |(lat, lon), s| (lat + s.lat, lon + s.lon));
    Ok(GeoPoint::new(lat / n, lon / n))
}

/// Every structure on a world map centred on the dataset centroid.
pub fn global(table: &StructureTable, unit: Unit) -> Result<MapProjection> {
    let center = centroid(table)?.rounded();
    Ok(MapProjection {
        mode: MapMode::Global,
        view: ViewState {
            center,
            zoom: GLOBAL_ZOOM,
            pitch: 0.0,
        },
        points: table
            .iter()
            .map(|s| MapPoint::from_structure(s, unit, 1.0))
            .collect(),
    })
}

/// Parameters of the location view.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFilter {
    pub country: String,
    pub city: String,
    /// Keep structures no taller than this, in the selected unit.
    pub height_upper: Option<f64>,
}

impl LocationFilter {
    pub fn new(country: impl Into<String>, city: impl Into<String>) -> Self {
        LocationFilter {
            country: country.into(),
            city: city.into(),
            height_upper: None,
        }
    }

    pub fn with_height_upper(mut self, height: f64) -> Self {
        self.height_upper = Some(height);
        self
    }

    fn population(&self, table: &StructureTable) -> Result<StructureTable> {
        filter_rows(
            table,
            &PredicateSet::new().country(&self.country).city(&self.city),
        )
    }

    /// Height slider limits for the city, `None` when every structure there
    /// has the same height.
    pub fn height_range(&self, table: &StructureTable, unit: Unit) -> Result<Option<SliderRange>> {
        let population = self.population(table)?;
        Ok(ColumnBounds::of(&population, unit.column())?
            .as_ref()
            .and_then(SliderRange::for_bounds))
    }
}

/// Extruded column view of one city. Centred on the city's centroid even when
/// the height filter removes every column.
pub fn location(
    table: &StructureTable,
    filter: &LocationFilter,
    unit: Unit,
) -> Result<MapProjection> {
    let population = filter.population(table)?;
    let center = centroid(&population)?.rounded();

    let visible = match (filter.height_upper, ColumnBounds::of(&population, unit.column())?) {
        (Some(upper), Some(bounds)) => {
            let lo = bounds.min.floor().min(upper);
            let predicate = Predicate::within(&bounds, lo, upper);
            filter_rows(&population, &PredicateSet::new().and(unit.column(), predicate))?
        }
        _ => population,
    };

    Ok(MapProjection {
        mode: MapMode::Location,
        view: ViewState {
            center,
            zoom: LOCATION_ZOOM,
            pitch: LOCATION_PITCH,
        },
        points: visible
            .iter()
            .map(|s| MapPoint::from_structure(s, unit, ELEVATION_SCALE))
            .collect(),
    })
}

/// Whether `point` falls in the fixed-degree box around `reference`.
pub fn in_window(reference: GeoPoint, lat: f64, lon: f64) -> bool {
    let w = PROXIMITY_WINDOW_DEGREES;
    (reference.lat - w..=reference.lat + w).contains(&lat)
        && (reference.lon - w..=reference.lon + w).contains(&lon)
}

/// Structures within ±2° of latitude and longitude of `reference`. A
/// rectangular approximation, not a great-circle radius.
pub fn proximity(table: &StructureTable, reference: GeoPoint, unit: Unit) -> Result<MapProjection> {
    if !reference.lat.is_finite() || !reference.lon.is_finite() {
        return Err(DataError::invalid("reference coordinates must be finite"));
    }
    let points: Vec<MapPoint> = table
        .iter()
        .filter(|s| in_window(reference, s.lat, s.lon))
        .map(|s| MapPoint::from_structure(s, unit, 1.0))
        .collect();
    if points.is_empty() {
        log::debug!("no structures near {:.4}, {:.4}", reference.lat, reference.lon);
    }
    Ok(MapProjection {
        mode: MapMode::Proximity,
        view: ViewState {
            center: reference,
            zoom: PROXIMITY_ZOOM,
            pitch: 0.0,
        },
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StructureTable {
        StructureTable::from_structures(vec![
            Structure::new("One WTC", 541.0, 2014, "United States", "New York City", 40.7127, -74.0134),
            Structure::new("Empire State", 381.0, 1931, "United States", "New York City", 40.7484, -73.9857),
            Structure::new("Willis", 442.0, 1974, "United States", "Chicago", 41.8789, -87.6359),
            Structure::new("Edge", 100.0, 2000, "Nowhere", "Corner", 42.75, -72.0),
        ])
    }

    #[test]
    fn global_view_centres_on_mean() {
        let t = table();
        let map = global(&t, Unit::Metres).unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map.view.zoom, GLOBAL_ZOOM);
        let expected_lat = (40.7127 + 40.7484 + 41.8789 + 42.75) / 4.0;
        assert!((map.view.center.lat - expected_lat).abs() < 1e-4);
        assert_eq!(map.points[0].elevation, map.points[0].magnitude);
        assert!(matches!(
            global(&StructureTable::default(), Unit::Metres),
            Err(DataError::EmptyResult)
        ));
    }

    #[test]
    fn location_view_scales_elevation() {
        let t = table();
        let map = location(&t, &LocationFilter::new("United States", "New York City"), Unit::Metres).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.points[0].elevation, 541.0 * ELEVATION_SCALE);
        assert_eq!(map.view.pitch, LOCATION_PITCH);
        assert!((map.view.center.lon - round4((-74.0134 + -73.9857) / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn location_height_cap_and_degenerate_city() {
        let t = table();
        let nyc = LocationFilter::new("United States", "New York City");
        assert_eq!(
            nyc.height_range(&t, Unit::Metres).unwrap(),
            Some(SliderRange { lo: 381, hi: 541 })
        );
        let capped = location(&t, &nyc.clone().with_height_upper(400.0), Unit::Metres).unwrap();
        let names: Vec<_> = capped.points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Empire State"]);

        let chicago = LocationFilter::new("United States", "Chicago");
        assert_eq!(chicago.height_range(&t, Unit::Metres).unwrap(), None);
        let map = location(&t, &chicago.with_height_upper(1.0), Unit::Metres).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn unknown_city_is_empty_result() {
        let t = table();
        assert!(matches!(
            location(&t, &LocationFilter::new("France", "Paris"), Unit::Feet),
            Err(DataError::EmptyResult)
        ));
    }

    #[test]
    fn proximity_uses_inclusive_box() {
        let t = table();
        let near = proximity(&t, DEFAULT_REFERENCE, Unit::Metres).unwrap();
        let names: Vec<_> = near.points.iter().map(|p| p.name.as_str()).collect();
        // "Edge" sits exactly on the north-east corner of the box.
        assert_eq!(names, vec!["One WTC", "Empire State", "Edge"]);
        assert_eq!(near.view.center, DEFAULT_REFERENCE);
        for s in t.iter() {
            let expected = (s.lat - 40.75).abs() <= 2.0 && (s.lon + 74.0).abs() <= 2.0;
            assert_eq!(names.contains(&s.name.as_str()), expected);
        }
    }

    #[test]
    fn proximity_with_nothing_nearby_is_ok_and_empty() {
        let t = table();
        let far = proximity(&t, GeoPoint::new(-33.9, 151.2), Unit::Feet).unwrap();
        assert!(far.is_empty());
        assert!(proximity(&t, GeoPoint::new(f64::NAN, 0.0), Unit::Feet).is_err());
    }
}
