use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, MarkerShape, Plot, PlotPoints, Points};

use skyline_atlas::data::charts::{YearHistogram, YEAR_BIN_EDGES};
use skyline_atlas::data::geo::{MapMode, MapProjection, PROXIMITY_WINDOW_DEGREES};
use skyline_atlas::data::Unit;

use crate::color::generate_palette;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Degrees shown around the centre for each map mode.
fn map_half_extent(mode: MapMode) -> f64 {
    match mode {
        MapMode::Global => 90.0,
        MapMode::Location => 0.25,
        MapMode::Proximity => PROXIMITY_WINDOW_DEGREES,
    }
}

/// Marker radius in points. Location markers grow with their elevation,
/// the other views use a flat size.
fn marker_radius(mode: MapMode, elevation: f64, max_elevation: f64) -> f32 {
    match mode {
        MapMode::Location if max_elevation > 0.0 => 4.0 + 12.0 * (elevation / max_elevation) as f32,
        _ => 4.0,
    }
}

/// Longitude/latitude scatter of a map projection, one series per structure
/// so hovering names it.
pub fn map_plot(ui: &mut Ui, map: &MapProjection, unit: Unit) {
    let half = map_half_extent(map.mode);
    let center = map.view.center;
    let max_elevation = map
        .points
        .iter()
        .map(|p| p.elevation)
        .fold(0.0_f64, f64::max);
    let suffix = unit.label().to_lowercase();

    Plot::new(("structure_map", map.mode.label()))
        .height(CHART_HEIGHT * 1.5)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .include_x(center.lon - half)
        .include_x(center.lon + half)
        .include_y(center.lat - half)
        .include_y(center.lat + half)
        .label_formatter(move |name, value| {
            if name.is_empty() {
                format!("{:.4}, {:.4}", value.y, value.x)
            } else {
                name.to_owned()
            }
        })
        .show(ui, |plot_ui| {
            for p in &map.points {
                let label = format!(
                    "{}\n{}, {}\n{:.0} {}",
                    p.name, p.city, p.country, p.magnitude, suffix
                );
                plot_ui.points(
                    Points::new(vec![[p.lon, p.lat]])
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(marker_radius(map.mode, p.elevation, max_elevation))
                        .color(Color32::from_rgb(255, 140, 0))
                        .name(label),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Learn More charts
// ---------------------------------------------------------------------------

/// Share of each category, drawn as one coloured bar per category. The legend
/// carries the percentage.
pub fn category_chart(ui: &mut Ui, id: &str, counts: &[(String, usize)], state: &AppState) {
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let colors = generate_palette(state.palette, counts.len());

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .y_axis_label("Structures")
        .show(ui, |plot_ui| {
            for (i, ((label, count), color)) in counts.iter().zip(colors).enumerate() {
                let share = if total == 0 {
                    0.0
                } else {
                    100.0 * *count as f64 / total as f64
                };
                let name = format!("{label} ({share:.1}%)");
                let bar = Bar::new(i as f64, *count as f64)
                    .width(0.8)
                    .name(&name)
                    .fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(name));
            }
        });
}

/// Number of structures built per fifteen-year bin.
pub fn histogram_chart(ui: &mut Ui, histogram: &YearHistogram, color: Color32) {
    let width = (YEAR_BIN_EDGES[1] - YEAR_BIN_EDGES[0]) as f64;
    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) as f64 / 2.0, b.count as f64)
                .width(width)
                .name(format!("{}–{}", b.start, b.end))
                .fill(color)
        })
        .collect();

    Plot::new("year_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Number of Structures")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

/// Tallest structures, tallest on the left.
pub fn top_n_chart(ui: &mut Ui, rows: &[(String, f64)], unit: Unit, color: Color32) {
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, (name, height))| Bar::new(i as f64, *height).width(0.7).name(name).fill(color))
        .collect();

    Plot::new("top_n_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Structure")
        .y_axis_label(format!("Height ({})", unit.label().to_lowercase()))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

pub fn scatter_chart(ui: &mut Ui, points: Vec<[f64; 2]>, unit: Unit, color: Color32) {
    Plot::new("year_vs_height")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(format!("Height ({})", unit.label().to_lowercase()))
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(4.0)
                    .color(color),
            );
        });
}
