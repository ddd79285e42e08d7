use eframe::egui::{self, Color32, RichText, Ui};

use skyline_atlas::data::filter::SliderRange;
use skyline_atlas::data::geo::{LocationFilter, MapMode};
use skyline_atlas::data::Unit;

use crate::color::{PaletteKind, SingleColor};
use crate::state::{AppState, Page, SEARCH_COLUMNS};

// ---------------------------------------------------------------------------
// Left side panel – navigation and page settings
// ---------------------------------------------------------------------------

/// Render the left panel: page navigation, then the current page's settings.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Page Navigation");
    egui::ComboBox::from_id_salt("page")
        .selected_text(state.page.label())
        .show_ui(ui, |ui: &mut Ui| {
            for page in Page::ALL {
                ui.selectable_value(&mut state.page, page, page.label());
            }
        });
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.page {
            Page::Home => {}
            Page::Locate => {
                ui.strong("Settings");
                unit_selector(ui, state);
                ui.separator();
                map_settings(ui, state);
            }
            Page::LearnMore => {
                ui.strong("Settings");
                unit_selector(ui, state);
                ui.separator();
                color_settings(ui, state);
            }
            Page::Search => {
                ui.strong("Filter By");
                location_selectors(ui, state);
                ui.separator();
                column_selector(ui, state);
                if state.search_columns.contains(&"Height") {
                    ui.separator();
                    unit_selector(ui, state);
                }
                ui.separator();
                search_sliders(ui, state);
            }
        });
}

fn unit_selector(ui: &mut Ui, state: &mut AppState) {
    ui.label("Measurements Options");
    let mut unit = state.unit;
    ui.horizontal(|ui: &mut Ui| {
        for u in Unit::ALL {
            ui.radio_value(&mut unit, u, u.label());
        }
    });
    state.set_unit(unit);
}

/// Country and city combo boxes. The city list follows the country.
fn location_selectors(ui: &mut Ui, state: &mut AppState) {
    let countries = state.countries();
    let mut country = state.country.clone();
    egui::ComboBox::from_label("Country")
        .selected_text(country.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for c in &countries {
                ui.selectable_value(&mut country, c.clone(), c.as_str());
            }
        });
    if country != state.country {
        state.select_country(country);
    }

    let cities = state.cities();
    let mut city = state.city.clone();
    egui::ComboBox::from_label("City")
        .selected_text(city.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for c in &cities {
                ui.selectable_value(&mut city, c.clone(), c.as_str());
            }
        });
    if city != state.city {
        state.select_city(city);
    }
}

/// Slider over `range` editing an optional upper bound; untouched means the
/// top of the range.
fn upper_slider(ui: &mut Ui, value: &mut Option<i64>, range: SliderRange, label: String) {
    let mut v = range.clamp(value.unwrap_or(range.hi));
    ui.add(egui::Slider::new(&mut v, range.lo..=range.hi).text(label));
    *value = Some(v);
}

fn map_settings(ui: &mut Ui, state: &mut AppState) {
    ui.label("Select Map");
    egui::ComboBox::from_id_salt("map_mode")
        .selected_text(state.map_mode.label())
        .show_ui(ui, |ui: &mut Ui| {
            for mode in MapMode::ALL {
                ui.selectable_value(&mut state.map_mode, mode, mode.label());
            }
        });

    match state.map_mode {
        MapMode::Global => {}
        MapMode::Location => {
            location_selectors(ui, state);
            let range = state.dataset.as_ref().map(|ds| {
                LocationFilter::new(state.country.clone(), state.city.clone())
                    .height_range(ds, state.unit)
            });
            match range {
                Some(Ok(Some(range))) => {
                    let label = format!("Select a height range (in {})", state.unit.label().to_lowercase());
                    upper_slider(ui, &mut state.map_height_upper, range, label);
                }
                Some(Ok(None)) | None => state.map_height_upper = None,
                Some(Err(e)) => {
                    ui.label(RichText::new(e.to_string()).color(Color32::RED));
                }
            }
        }
        MapMode::Proximity => {
            ui.label("Enter approximate latitude");
            ui.text_edit_singleline(&mut state.lat_input);
            ui.label("Enter approximate longitude");
            ui.text_edit_singleline(&mut state.lon_input);
        }
    }
}

fn color_settings(ui: &mut Ui, state: &mut AppState) {
    egui::ComboBox::from_label("Color Palette")
        .selected_text(state.palette.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in PaletteKind::ALL {
                ui.selectable_value(&mut state.palette, kind, kind.label());
            }
        });

    egui::ComboBox::from_label("Single Color")
        .selected_text(state.single_color.label())
        .show_ui(ui, |ui: &mut Ui| {
            for color in SingleColor::ALL {
                ui.selectable_value(&mut state.single_color, color, color.label());
            }
        });

    if state.single_color == SingleColor::Custom {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Custom Color");
            ui.color_edit_button_srgba(&mut state.custom_color);
        });
    }
}

fn column_selector(ui: &mut Ui, state: &mut AppState) {
    ui.label("Select columns");
    for name in SEARCH_COLUMNS {
        let mut checked = state.search_columns.contains(&name);
        if ui.checkbox(&mut checked, name).changed() {
            state.toggle_search_column(name);
        }
    }
}

/// Year and height caps for the search page. A city whose structures share a
/// single year (or height) gets no slider for it.
fn search_sliders(ui: &mut Ui, state: &mut AppState) {
    let controls = match (&state.dataset, state.city_search()) {
        (Some(ds), Ok(search)) => search.controls(ds),
        (None, _) => return,
        (_, Err(e)) => Err(e),
    };
    let controls = match controls {
        Ok(c) => c,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            return;
        }
    };

    if state.search_columns.contains(&"Height") {
        if let Some(range) = controls.height {
            upper_slider(ui, &mut state.search_height_upper, range, "Height Range".to_string());
        }
    }
    if state.search_columns.contains(&"Year") {
        if let Some(range) = controls.year {
            upper_slider(ui, &mut state.search_year_upper, range, "Year Range".to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} structures loaded", ds.len()));
        }
        if let Some(source) = &state.source {
            ui.label(RichText::new(source.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open structure data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(path);
    }
}
