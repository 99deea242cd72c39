//! File parsing functionality for the survey dataset
//!
//! This module handles loading the delimited survey export into a [`Dataset`].
//! Inputs ending in `.zst` are decompressed on the fly.

use crate::common::data_structures::{Column, ColumnData, Dataset, DatasetError};
use bytesize::ByteSize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use zstd::Decoder;

/// Errors that can occur during file parsing
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to decompress zstd file: {0}")]
    Decompression(String),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input has no header row")]
    MissingHeader,

    #[error("Invalid table: {0}")]
    InvalidTable(#[from] DatasetError),
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Parse the survey CSV and load it for analysis
///
/// This function:
/// - Opens the file (decompressing `.zst` inputs)
/// - Reads the header row and every record
/// - Infers per column whether it is numeric
///
/// # Arguments
/// * `file_path` - Path to the `.csv` or `.csv.zst` file
///
/// # Returns
/// * `Ok(Dataset)` - Successfully parsed table
/// * `Err(ParsingError)` - If reading, decompression or CSV parsing failed
pub fn parse_dataset(file_path: &Path) -> Result<Dataset> {
    let file = File::open(file_path)?;
    let file_size = file.metadata()?.len();

    let is_compressed = file_path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("zst"));

    let dataset = if is_compressed {
        let decoder = Decoder::new(file)
            .map_err(|e| ParsingError::Decompression(format!("Failed to create decoder: {}", e)))?;
        read_dataset(decoder)?
    } else {
        read_dataset(BufReader::new(file))?
    };

    tracing::info!(
        "Loaded {} ({}): {} rows x {} columns",
        file_path.display(),
        ByteSize(file_size),
        dataset.row_count(),
        dataset.column_count()
    );

    Ok(dataset)
}

/// Reads a comma separated table with a header row from any reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() || headers.iter().all(|header| header.is_empty()) {
        return Err(ParsingError::MissingHeader);
    }

    // Records with a different field count are rejected by the csv reader.
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column {
            name,
            data: infer_column(raw),
        })
        .collect();

    Ok(Dataset::from_columns(columns)?)
}

/// Numeric when every non-empty cell parses as a float; empty cells become `NaN`.
fn infer_column(raw: Vec<String>) -> ColumnData {
    let parsed: Option<Vec<f64>> = raw
        .iter()
        .map(|cell| {
            if cell.is_empty() {
                Some(f64::NAN)
            } else {
                cell.parse::<f64>().ok()
            }
        })
        .collect();

    match parsed {
        Some(values) => ColumnData::Numeric(values),
        None => ColumnData::Text(raw),
    }
}
