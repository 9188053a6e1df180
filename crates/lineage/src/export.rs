use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;

use crate::types::{Scholar, ScholarId};

pub const COLUMNS: [&str; 9] = [
    "name",
    "id",
    "university",
    "year",
    "degree_type",
    "nationality",
    "level",
    "descended_from",
    "url",
];

const SHEET_NAME: &str = "Lineage";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Unsupported output format '{0}'. Accepted values: 'xlsx', 'csv', 'json'")]
    UnsupportedFormat(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ExportError::UnsupportedFormat(path.display().to_string()))?;

        extension.parse()
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Xlsx => write!(f, "xlsx"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// One output row; field order matches `COLUMNS`.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    id: ScholarId,
    university: &'a str,
    year: &'a str,
    degree_type: &'a str,
    nationality: &'a str,
    level: u32,
    descended_from: String,
    url: &'a str,
}

impl<'a> From<&'a Scholar> for ExportRow<'a> {
    fn from(scholar: &'a Scholar) -> Self {
        Self {
            name: &scholar.name,
            id: scholar.id,
            university: &scholar.university,
            year: &scholar.year,
            degree_type: &scholar.degree_type,
            nationality: &scholar.nationality,
            level: scholar.level,
            descended_from: scholar.descended_from(),
            url: &scholar.url,
        }
    }
}

pub fn export(scholars: &[Scholar], path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    log::info!(
        "Saving {} record(s) to {} ({})",
        scholars.len(),
        path.display(),
        format
    );

    let rows: Vec<ExportRow> = scholars.iter().map(ExportRow::from).collect();
    match format {
        ExportFormat::Xlsx => write_xlsx(&rows, path)?,
        ExportFormat::Csv => write_csv(&rows, path)?,
        ExportFormat::Json => write_json(&rows, path)?,
    }

    log::info!("Saved {}", path.display());
    Ok(())
}

fn write_xlsx(rows: &[ExportRow], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in (0u16..).zip(COLUMNS) {
        worksheet.write_string_with_format(0, col, title, &header)?;
    }

    for (row, record) in (1u32..).zip(rows) {
        worksheet.write_string(row, 0, record.name)?;
        worksheet.write_number(row, 1, record.id)?;
        worksheet.write_string(row, 2, record.university)?;
        worksheet.write_string(row, 3, record.year)?;
        worksheet.write_string(row, 4, record.degree_type)?;
        worksheet.write_string(row, 5, record.nationality)?;
        worksheet.write_number(row, 6, record.level)?;
        worksheet.write_string(row, 7, &record.descended_from)?;
        worksheet.write_string(row, 8, record.url)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(rows: &[ExportRow], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(rows: &[ExportRow], path: &Path) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.flush()?;
    Ok(())
}
