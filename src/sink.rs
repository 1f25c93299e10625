//! Dataset output adapters.
//!
//! A [`DatasetSink`] receives a finished [`Dataset`] by shared reference and
//! writes it to disk, preserving column order and row order. Workbook output
//! is the default; Parquet and CSV go through a polars [`DataFrame`]. Write
//! failures are returned to the caller, never retried.

use crate::constants::{OUTPUT_INFIX, WORKSHEET_NAME, XLSX_MAX_COLUMNS, XLSX_MAX_ROWS};
use crate::error::{ParserError, Result};
use crate::models::Dataset;
use clap::ValueEnum;
use polars::prelude::{
    Column, CsvWriter, DataFrame, NamedFrom, ParquetCompression, ParquetWriter, SerWriter, Series,
};
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook
    #[default]
    Xlsx,
    /// Apache Parquet with Snappy compression
    Parquet,
    /// Comma-separated text
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }

    /// Sink writing this format
    pub fn sink(&self) -> Box<dyn DatasetSink> {
        match self {
            OutputFormat::Xlsx => Box::new(XlsxSink),
            OutputFormat::Parquet => Box::new(ParquetSink),
            OutputFormat::Csv => Box::new(CsvSink),
        }
    }
}

/// Writes a completed dataset to a file
pub trait DatasetSink {
    /// Extension of the files this sink produces
    fn extension(&self) -> &'static str;

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<()>;
}

/// Output location for an input file: same name, new extension, either next
/// to the input or inside `output_dir`.
///
/// A path that would overwrite the input gets a `.clean` infix instead.
pub fn output_path_for(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let candidate = match (output_dir, input.file_name()) {
        (Some(dir), Some(name)) => dir.join(Path::new(name).with_extension(extension)),
        _ => input.with_extension(extension),
    };

    if candidate == input {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        return candidate.with_file_name(format!("{}{}.{}", stem, OUTPUT_INFIX, extension));
    }
    candidate
}

/// Excel workbook with a bold header row
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxSink;

impl DatasetSink for XlsxSink {
    fn extension(&self) -> &'static str {
        OutputFormat::Xlsx.extension()
    }

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        let rows = dataset.row_count() + 1;
        let columns = dataset.header().len();
        if rows > XLSX_MAX_ROWS || columns > XLSX_MAX_COLUMNS {
            return Err(ParserError::SheetLimitExceeded {
                rows,
                columns,
                max_rows: XLSX_MAX_ROWS,
                max_columns: XLSX_MAX_COLUMNS,
            });
        }

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(WORKSHEET_NAME)?;

            // Bounds checked above, so the casts cannot truncate
            for (col, name) in dataset.header().columns().iter().enumerate() {
                worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
            }

            for (index, row) in dataset.rows().iter().enumerate() {
                let sheet_row = (index + 1) as u32;
                for (col, value) in row.values().iter().enumerate() {
                    worksheet.write_string(sheet_row, col as u16, value)?;
                }
            }
        }

        workbook.save(path)?;
        debug!(
            "Wrote workbook {} ({} rows, {} columns)",
            path.display(),
            dataset.row_count(),
            columns
        );
        Ok(())
    }
}

/// Parquet file of string columns
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetSink;

impl DatasetSink for ParquetSink {
    fn extension(&self) -> &'static str {
        OutputFormat::Parquet.extension()
    }

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        let mut df = to_dataframe(dataset)?;
        let file = File::create(path)?;
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)?;

        debug!("Wrote parquet {} ({} rows)", path.display(), df.height());
        Ok(())
    }
}

/// Clean comma-separated text
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSink;

impl DatasetSink for CsvSink {
    fn extension(&self) -> &'static str {
        OutputFormat::Csv.extension()
    }

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        let mut df = to_dataframe(dataset)?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;

        debug!("Wrote csv {} ({} rows)", path.display(), df.height());
        Ok(())
    }
}

/// Convert a dataset into a DataFrame of string columns in header order
pub fn to_dataframe(dataset: &Dataset) -> Result<DataFrame> {
    let columns: Vec<Column> = dataset
        .header()
        .columns()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            Column::from(Series::new(
                name.as_str().into(),
                dataset.column_values(index),
            ))
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}
