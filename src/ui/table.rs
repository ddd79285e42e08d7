use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use skyline_atlas::data::Projection;

// ---------------------------------------------------------------------------
// Read-only data tables
// ---------------------------------------------------------------------------

/// Render a striped table of pre-formatted cells. No scrolling of its own;
/// the central panel scrolls.
pub fn text_table(ui: &mut Ui, id: &str, headers: &[String], rows: &[Vec<String>]) {
    if headers.is_empty() {
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .columns(TableColumn::auto().at_least(60.0), headers.len())
            .header(20.0, |mut header| {
                for h in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h.as_str());
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(18.0, |mut table_row| {
                        for cell in row {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(cell.as_str());
                            });
                        }
                    });
                }
            });
    });
}

/// Render a query projection with its column headers.
pub fn projection_table(ui: &mut Ui, id: &str, projection: &Projection) {
    let headers: Vec<String> = projection
        .columns
        .iter()
        .map(|c| c.header().to_string())
        .collect();
    let rows: Vec<Vec<String>> = projection
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();
    text_table(ui, id, &headers, &rows);
}
