// Primitives for reading CSV exports of the survey sheets.

use log::debug;
use snafu::prelude::*;
use survey_tally::{Cell, Grid};

use crate::survey::*;

const BOM: char = '\u{feff}';

/// Reads the whole file as a grid. The first line is row 0: there is no header.
pub fn read_csv_grid(path: &str) -> SurveyResult<Grid> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(ReadingCsvSnafu { path })?;
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx, record_r) in rdr.into_records().enumerate() {
        let record = record_r.context(ReadingCsvSnafu { path })?;
        let row: Vec<Cell> = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                if idx == 0 && col == 0 {
                    parse_field(field.trim_start_matches(BOM))
                } else {
                    parse_field(field)
                }
            })
            .collect();
        rows.push(row);
    }
    debug!("read_csv_grid: {:?}: {} rows", path, rows.len());
    Ok(Grid::from_rows(rows))
}

fn parse_field(field: &str) -> Cell {
    if field.is_empty() {
        return Cell::Empty;
    }
    match field.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => Cell::Number(x),
        _ => Cell::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn fields() {
        assert_eq!(parse_field(""), Cell::Empty);
        assert_eq!(parse_field("3"), Cell::Number(3.0));
        assert_eq!(parse_field(" 2.5 "), Cell::Number(2.5));
        assert_eq!(parse_field("   "), Cell::Text("   ".to_string()));
        assert_eq!(parse_field("inf"), Cell::Text("inf".to_string()));
        assert_eq!(parse_field("Indécis"), Cell::Text("Indécis".to_string()));
    }

    #[test]
    fn ragged_file_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        fs::write(&path, "\u{feff}Titre\n,\n,Question,,\"a, b\"\n,,1,2\n").unwrap();
        let grid = read_csv_grid(path.to_str().unwrap()).unwrap();
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.get(0, 0), &Cell::Text("Titre".to_string()));
        assert_eq!(grid.get(2, 1), &Cell::Text("Question".to_string()));
        assert_eq!(grid.get(2, 3), &Cell::Text("a, b".to_string()));
        assert_eq!(grid.get(3, 3), &Cell::Number(2.0));
        assert_eq!(grid.get(3, 10), &Cell::Empty);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_csv_grid("/nonexistent/export.csv"),
            Err(SurveyError::ReadingCsv { .. })
        ));
    }
}
