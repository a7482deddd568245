// Reading the spreadsheet formats: xlsx, xlsm, xls and ods.

use calamine::{open_workbook_auto, DataType, Range, Reader};
use log::debug;
use snafu::prelude::*;
use survey_tally::{Cell, Grid};

use crate::survey::*;

pub fn read_excel_grid(path: &str, worksheet: Option<&str>) -> SurveyResult<Grid> {
    let wrange = get_range(path, worksheet)?;
    let grid = range_to_grid(&wrange);
    debug!(
        "read_excel_grid: {:?}: {} rows, {} columns",
        path,
        grid.height(),
        grid.width()
    );
    Ok(grid)
}

fn get_range(path: &str, worksheet: Option<&str>) -> SurveyResult<Range<DataType>> {
    debug!(
        "read_excel_grid: path: {:?} worksheet: {:?}",
        path, worksheet
    );
    let mut workbook = open_workbook_auto(path).context(OpeningWorkbookSnafu { path })?;

    // A worksheet name was provided, use it. Otherwise the first one.
    if let Some(worksheet_name) = worksheet {
        workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                worksheet: worksheet_name,
            })?
            .context(OpeningWorkbookSnafu { path })
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyWorkbookSnafu { path })?
            .context(OpeningWorkbookSnafu { path })
    }
}

/// Places the cells at their absolute position in the sheet: A1 is (0, 0), even when the
/// used range of the sheet starts further down or to the right.
pub fn range_to_grid(wrange: &Range<DataType>) -> Grid {
    let (row_offset, col_offset) = match wrange.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Grid::from_rows(Vec::new()),
    };
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in wrange.rows() {
        let mut cells: Vec<Cell> = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(cell_from_calamine));
        rows.push(cells);
    }
    Grid::from_rows(rows)
}

pub fn cell_from_calamine(elt: &DataType) -> Cell {
    match elt {
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Float(f) => Cell::Number(*f),
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Bool(b) => Cell::Bool(*b),
        // Serial date, as stored in the sheet.
        DataType::DateTime(f) => Cell::Number(*f),
        DataType::Error(e) => Cell::Text(format!("{:?}", e)),
        DataType::Empty => Cell::Empty,
    }
}
