use eframe::egui::{self, Color32, RichText, Ui};

use skyline_atlas::data::charts::{self, Category, TOP_N_CHOICES};
use skyline_atlas::data::geo::{self, MapMode, MapProjection, ELEVATION_SCALE};
use skyline_atlas::data::stats::Facts;
use skyline_atlas::data::{Column, DataError, StructureTable};

use crate::state::{AppState, ChartChoice, Page};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the selected page.
pub fn central(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.take() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore structures  (File → Open…)");
        });
        return;
    };

    match state.page {
        Page::Home => home(ui, &dataset),
        Page::Locate => locate(ui, &dataset, state),
        Page::LearnMore => learn_more(ui, &dataset, state),
        Page::Search => search(ui, &dataset, state),
    }

    state.dataset = Some(dataset);
}

fn error_label(ui: &mut Ui, err: &DataError) {
    ui.label(RichText::new(err.to_string()).color(Color32::RED));
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

fn home(ui: &mut Ui, dataset: &StructureTable) {
    ui.heading("Tallest Structures In the World");
    ui.label(
        "Explore the tallest freestanding structures on the planet: where they \
         stand, when they were built and what they are used for. Use the page \
         selector on the left to move between the map, the facts and charts, \
         and the city search.",
    );
    ui.add_space(8.0);
    ui.strong("A preview of the data");
    table::projection_table(ui, "home_preview", &dataset.head(5).project(&Column::SOURCE));
}

// ---------------------------------------------------------------------------
// Locating Structures
// ---------------------------------------------------------------------------

fn build_map(dataset: &StructureTable, state: &AppState) -> Result<MapProjection, DataError> {
    match state.map_mode {
        MapMode::Global => geo::global(dataset, state.unit),
        MapMode::Location => geo::location(dataset, &state.location_filter(), state.unit),
        MapMode::Proximity => geo::proximity(dataset, state.reference_point()?, state.unit),
    }
}

fn locate(ui: &mut Ui, dataset: &StructureTable, state: &mut AppState) {
    ui.heading(state.map_mode.label());

    let map = match build_map(dataset, state) {
        Ok(map) => map,
        Err(e) => {
            error_label(ui, &e);
            return;
        }
    };

    match map.mode {
        MapMode::Proximity if map.is_empty() => {
            ui.label("There are no structures near this location.");
            return;
        }
        MapMode::Location => {
            ui.label(
                RichText::new(format!(
                    "Marker sizes follow heights scaled by {ELEVATION_SCALE} for visibility."
                ))
                .weak(),
            );
        }
        _ => {}
    }

    plot::map_plot(ui, &map, state.unit);

    ui.checkbox(&mut state.show_map_data, "View data");
    if state.show_map_data {
        let headers = vec![
            "Name".to_string(),
            "Country".to_string(),
            "City".to_string(),
            state.unit.label().to_string(),
            "Lat".to_string(),
            "Lon".to_string(),
        ];
        let rows: Vec<Vec<String>> = map
            .points
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.country.clone(),
                    p.city.clone(),
                    p.magnitude.to_string(),
                    p.lat.to_string(),
                    p.lon.to_string(),
                ]
            })
            .collect();
        table::text_table(ui, "map_data", &headers, &rows);
    }
}

// ---------------------------------------------------------------------------
// Learn More
// ---------------------------------------------------------------------------

fn facts_section(ui: &mut Ui, facts: &Facts) {
    let unit = facts.unit.label().to_lowercase();
    let tallest = facts
        .tallest
        .iter()
        .map(|(name, country)| format!("{name} in {country}"))
        .collect::<Vec<_>>()
        .join(" and ");

    ui.strong("Facts");
    ui.label(format!(
        "• The tallest structure is {tallest}, standing at {:.0} {unit}.",
        facts.tallest_height
    ));
    ui.label(format!(
        "• The average height of these structures is {:.2} {unit}.",
        facts.mean_height
    ));
    ui.label(format!(
        "• {} has the most structures on the list, with {}.",
        facts.top_country, facts.top_country_count
    ));
    ui.label(format!("• The most common type of structure is {}.", facts.top_type));
    ui.label(format!("• The most common primary use is {}.", facts.top_use));
}

fn learn_more(ui: &mut Ui, dataset: &StructureTable, state: &mut AppState) {
    ui.heading("Learn More");

    let facts = match Facts::compute(dataset, state.unit) {
        Ok(facts) => facts,
        Err(e) => {
            error_label(ui, &e);
            return;
        }
    };
    facts_section(ui, &facts);
    ui.separator();

    egui::ComboBox::from_label("Chart")
        .selected_text(state.chart.label())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in ChartChoice::ALL {
                ui.selectable_value(&mut state.chart, choice, choice.label());
            }
        });

    let all = state.chart == ChartChoice::All;
    if all || state.chart == ChartChoice::Purpose {
        purpose_chart(ui, dataset, state);
    }
    if all || state.chart == ChartChoice::BuiltOverYears {
        years_chart(ui, dataset, &facts, state);
    }
    if all || state.chart == ChartChoice::TopTallest {
        top_tallest_chart(ui, dataset, state);
    }
    if all || state.chart == ChartChoice::YearVsHeight {
        ui.strong(ChartChoice::YearVsHeight.label());
        plot::scatter_chart(
            ui,
            charts::year_vs_height(dataset, state.unit),
            state.unit,
            single_color(state),
        );
    }
}

fn single_color(state: &AppState) -> Color32 {
    state.single_color.resolve(state.palette, state.custom_color)
}

fn purpose_chart(ui: &mut Ui, dataset: &StructureTable, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut state.category, Category::Type, "Types");
        ui.radio_value(&mut state.category, Category::Use, "Main Uses");
    });
    ui.strong(state.category.title());
    let counts = charts::category_distribution(dataset, state.category);
    plot::category_chart(ui, "category_chart", &counts, state);
}

fn years_chart(ui: &mut Ui, dataset: &StructureTable, facts: &Facts, state: &AppState) {
    ui.strong(ChartChoice::BuiltOverYears.label());
    let histogram = charts::year_histogram(dataset);
    plot::histogram_chart(ui, &histogram, single_color(state));

    ui.label(format!(
        "• {} structures were built between {} and {}.",
        facts.total, facts.first_year, facts.last_year
    ));
    ui.label(format!(
        "• {} of them were built in 2000 or later.",
        facts.built_since_2000
    ));
    if histogram.outside > 0 {
        ui.label(
            RichText::new(format!("{} fall outside the binned years.", histogram.outside)).weak(),
        );
    }
}

fn top_tallest_chart(ui: &mut Ui, dataset: &StructureTable, state: &mut AppState) {
    ui.strong(ChartChoice::TopTallest.label());
    egui::ComboBox::from_label("Number of structures")
        .selected_text(state.top_n.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for n in TOP_N_CHOICES {
                ui.selectable_value(&mut state.top_n, n, n.to_string());
            }
        });
    let rows = charts::top_n(dataset, state.unit, state.top_n);
    plot::top_n_chart(ui, &rows, state.unit, single_color(state));
}

// ---------------------------------------------------------------------------
// Additional Search
// ---------------------------------------------------------------------------

fn search(ui: &mut Ui, dataset: &StructureTable, state: &AppState) {
    ui.heading(format!("Structures in {}, {}", state.city, state.country));

    if state.search_columns.is_empty() {
        ui.label("Select columns on the left to see results.");
        return;
    }

    let result = state.city_search().and_then(|search| search.run(dataset));
    match result {
        Ok(projection) if projection.is_empty() => {
            ui.label("No structures match these filters.");
        }
        Ok(projection) => {
            ui.label(format!("{} structures", projection.len()));
            table::projection_table(ui, "search_results", &projection);
        }
        Err(e) => error_label(ui, &e),
    }
}
