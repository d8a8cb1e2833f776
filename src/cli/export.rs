use crate::core::metrics::MetricsTable;
use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::debug;

const SHEET_NAME: &str = "Datos Bolsa";

const HEADERS: [&str; 8] = [
    "Ticker",
    "Nombre",
    "Sector",
    "País",
    "Precio actual",
    "Cambio Día (%)",
    "Cambio Semana (%)",
    "Cambio YTD (%)",
];

/// Default export file name, stamped with the generation date.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!("datos_bolsa_{}.xlsx", Local::now().date_naive()))
}

/// Serializes the full, unfiltered table to an `.xlsx` workbook with a
/// single "Datos Bolsa" sheet.
pub fn write_workbook(table: &MetricsTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, &row.ticker)?;
        worksheet.write_string(r, 1, &row.name)?;
        worksheet.write_string(r, 2, &row.sector)?;
        worksheet.write_string(r, 3, &row.country)?;
        worksheet.write_number(r, 4, row.last_price)?;
        worksheet.write_number(r, 5, row.day_change_pct)?;
        worksheet.write_number(r, 6, row.week_change_pct)?;
        worksheet.write_number(r, 7, row.ytd_change_pct)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook to {}", path.display()))?;
    debug!("Wrote {} rows to {}", table.rows.len(), path.display());
    Ok(())
}

/// Exports the table and reports the destination to the user.
pub fn run(table: &MetricsTable, output: Option<&Path>) -> Result<()> {
    if table.is_empty() {
        super::ui::print_warning("No se pudieron obtener datos para los tickers seleccionados.");
        return Ok(());
    }

    let path = output.map_or_else(default_output_path, Path::to_path_buf);
    write_workbook(table, &path)?;
    println!(
        "Exportadas {} filas a {}",
        table.rows.len(),
        path.display()
    );
    Ok(())
}
