pub use crate::config::*;

/// A builder for assembling grids by hand.
///
/// Readers fill grids row by row. The builder is more convenient when only a few cells
/// matter, such as when describing a survey layout in tests.
///
/// ```
/// use survey_tally::builder::GridBuilder;
/// use survey_tally::{find_anchor, Cell};
///
/// let grid = GridBuilder::new()
///     .text(2, 1, "Le formateur a communiqué de façon dynamique")
///     .counts(3, 2, &[3.0, 2.0, 0.0, 0.0, 1.0])
///     .build();
///
/// let anchor = find_anchor(&grid, "Le formateur a communiqué de façon dynamique")?;
/// assert_eq!((anchor.row, anchor.col), (2, 1));
/// assert_eq!(grid.get(3, 6), &Cell::Number(1.0));
/// # Ok::<(), survey_tally::ExtractionError>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct GridBuilder {
    _rows: Vec<Vec<Cell>>,
}

impl GridBuilder {
    pub fn new() -> GridBuilder {
        GridBuilder { _rows: Vec::new() }
    }

    /// Sets a cell, growing the grid as needed.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if self._rows.len() <= row {
            self._rows.resize(row + 1, Vec::new());
        }
        let r = &mut self._rows[row];
        if r.len() <= col {
            r.resize(col + 1, Cell::Empty);
        }
        r[col] = cell;
    }

    pub fn cell(mut self, row: usize, col: usize, cell: Cell) -> GridBuilder {
        self.set(row, col, cell);
        self
    }

    pub fn text(self, row: usize, col: usize, s: &str) -> GridBuilder {
        self.cell(row, col, Cell::Text(s.to_string()))
    }

    pub fn number(self, row: usize, col: usize, x: f64) -> GridBuilder {
        self.cell(row, col, Cell::Number(x))
    }

    /// Writes consecutive numbers on one row, starting at the given column.
    pub fn counts(mut self, row: usize, first_col: usize, counts: &[f64]) -> GridBuilder {
        for (idx, x) in counts.iter().enumerate() {
            self.set(row, first_col + idx, Cell::Number(*x));
        }
        self
    }

    /// Writes one question block: the question at (row, col) and its counts on the next row,
    /// starting one column to the right.
    pub fn block(self, row: usize, col: usize, question: &str, counts: &[f64]) -> GridBuilder {
        self.text(row, col, question).counts(row + 1, col + 1, counts)
    }

    pub fn build(self) -> Grid {
        Grid::from_rows(self._rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_pads_rows_and_columns() {
        let g = GridBuilder::new().number(2, 3, 4.0).text(0, 0, "x").build();
        assert_eq!(g.height(), 3);
        assert_eq!(g.width(), 4);
        assert_eq!(g.get(1, 0), &Cell::Empty);
        assert_eq!(g.get(2, 3), &Cell::Number(4.0));
        assert_eq!(g.get(0, 0), &Cell::Text("x".to_string()));
    }

    #[test]
    fn block_places_counts_below_and_right() {
        let g = GridBuilder::new().block(5, 1, "Q", &[1.0, 2.0]).build();
        assert_eq!(g.get(5, 1), &Cell::Text("Q".to_string()));
        assert_eq!(g.get(6, 2), &Cell::Number(1.0));
        assert_eq!(g.get(6, 3), &Cell::Number(2.0));
    }
}
