use super::ui;
use crate::core::metrics::{MetricsRow, MetricsTable, SortMetric, sort_rows_desc};
use comfy_table::{Cell, Table};

const NO_DATA_WARNING: &str = "No se pudieron obtener datos para los tickers seleccionados.";
const NO_RESULTS_WARNING: &str = "No hay resultados para mostrar con los filtros aplicados.";

fn build_table(rows: &[MetricsRow]) -> Table {
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Ticker"),
        ui::header_cell("Nombre"),
        ui::header_cell("Sector"),
        ui::header_cell("País"),
        ui::header_cell("Precio actual"),
        ui::header_cell("Cambio Día (%)"),
        ui::header_cell("Cambio Semana (%)"),
        ui::header_cell("Cambio YTD (%)"),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.ticker),
            Cell::new(&row.name),
            Cell::new(&row.sector),
            Cell::new(&row.country),
            Cell::new(format!("{:.2}", row.last_price)),
            ui::change_cell(row.day_change_pct),
            ui::change_cell(row.week_change_pct),
            ui::change_cell(row.ytd_change_pct),
        ]);
    }

    table
}

fn print_section(title: &str, rows: &[MetricsRow]) {
    println!("\n{}", ui::style_text(title, ui::StyleType::Title));
    println!("{}", build_table(rows));
}

/// Renders the dashboard: one table per change metric, sorted descending,
/// plus a filtered view when a query was given. An empty table or an empty
/// filter result degrades to a warning, never an error.
pub fn run(table: &MetricsTable, filter: Option<&str>) {
    if table.is_empty() {
        ui::print_warning(NO_DATA_WARNING);
        return;
    }

    let sections = [
        (SortMetric::Day, "Variación del Día"),
        (SortMetric::Week, "Variación de la Semana"),
        (SortMetric::Ytd, "Variación del Año (YTD)"),
    ];

    let num_sections = sections.len();
    for (i, (metric, title)) in sections.iter().enumerate() {
        print_section(title, &table.sorted_by(*metric));
        if i < num_sections - 1 {
            ui::print_separator();
        }
    }

    if let Some(query) = filter {
        let mut rows = table.filter_by_ticker(query);
        if rows.is_empty() {
            ui::print_warning(NO_RESULTS_WARNING);
        } else {
            sort_rows_desc(&mut rows, SortMetric::Day);
            ui::print_separator();
            print_section("Resultados filtrados", &rows);
        }
    }
}
