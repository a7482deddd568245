mod config;
use log::{debug, info};

pub use crate::config::*;

pub mod builder;
pub mod manual;

// **** Locating ****

/// Finds the first cell (row by row, then column by column) whose text is exactly `target`.
///
/// Numbers and blank cells never match. No normalization is applied to either side.
pub fn find_anchor(grid: &Grid, target: &str) -> Result<Anchor, ExtractionError> {
    for (row, cells) in grid.rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Cell::Text(s) = cell {
                if s == target {
                    debug!(
                        "find_anchor: found {:?} at {}",
                        target,
                        cell_reference(row, col)
                    );
                    return Ok(Anchor {
                        row,
                        col,
                        text: s.clone(),
                    });
                }
            }
        }
    }
    Err(ExtractionError::AnchorNotFound {
        anchor: target.to_string(),
    })
}

// **** Extracting ****

/// The row holding the text of question `block`.
pub fn question_row(start_row: usize, block: usize, row_stride: usize) -> usize {
    start_row + block * row_stride
}

/// Reads `num_blocks` questions laid out every `row_stride` rows from (start_row, start_col).
///
/// For each block, the question text is read in the start column and the counts are read on the
/// following row, in the `class_labels.len()` columns right of the start column.
pub fn extract_blocks(
    grid: &Grid,
    start_row: usize,
    start_col: usize,
    num_blocks: usize,
    class_labels: &[String],
    row_stride: usize,
) -> Result<VoteTable, ExtractionError> {
    if row_stride < 2 {
        return Err(ExtractionError::InvalidLayout {
            details: format!(
                "a row stride of {} makes the question blocks overlap",
                row_stride
            ),
        });
    }
    let mut table = VoteTable::new(class_labels.to_vec());
    for q in 0..num_blocks {
        let row = question_row(start_row, q, row_stride);
        let question = read_question(grid, row, start_col)?;
        let counts = read_counts(grid, row + 1, start_col + 1, class_labels.len())?;
        debug!("extract_blocks: block {} {:?}: {:?}", q, question, counts);
        table.push_row(&question, counts)?;
    }
    Ok(table)
}

/// Reads the single question whose classes are the integers 0 to `num_classes - 1`.
pub fn extract_scale_block(
    grid: &Grid,
    row: usize,
    start_col: usize,
    num_classes: usize,
) -> Result<VoteTable, ExtractionError> {
    let labels: Vec<String> = (0..num_classes).map(|i| i.to_string()).collect();
    let question = read_question(grid, row, start_col)?;
    let counts = read_counts(grid, row + 1, start_col + 1, num_classes)?;
    debug!("extract_scale_block: {:?}: {:?}", question, counts);
    let mut table = VoteTable::new(labels);
    table.push_row(&question, counts)?;
    Ok(table)
}

/// Collects the free-text comments written one column right of the comments anchor,
/// from the anchor row down to the end of the grid.
///
/// A missing anchor is not an error: the survey simply has no comments.
pub fn extract_comments(grid: &Grid, anchor_text: &str, line_break_marker: &str) -> Vec<String> {
    let anchor = match find_anchor(grid, anchor_text) {
        Ok(a) => a,
        Err(_) => {
            debug!("extract_comments: no comment section found");
            return Vec::new();
        }
    };
    (anchor.row..grid.height())
        .filter_map(|row| grid.get(row, anchor.col + 1).as_text())
        .map(|s| {
            let s = if line_break_marker.is_empty() {
                s
            } else {
                s.replace(line_break_marker, " ")
            };
            s.trim().to_string()
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Runs all the extractions on the grid of one export.
pub fn extract_survey(
    grid: &Grid,
    layout: &SurveyLayout,
) -> Result<SurveyExtraction, ExtractionError> {
    layout.validate()?;
    let anchor = find_anchor(grid, &layout.anchor_text)?;
    let regular = extract_blocks(
        grid,
        anchor.row,
        anchor.col,
        layout.regular_blocks,
        &layout.class_labels,
        layout.row_stride,
    )?;
    let scale = match layout.scale_classes {
        Some(n) => Some(extract_scale_block(
            grid,
            anchor.row + layout.scale_row_offset(),
            anchor.col,
            n,
        )?),
        None => None,
    };
    let comments = extract_comments(grid, &layout.comments_anchor, &layout.line_break_marker);
    Ok(SurveyExtraction {
        regular,
        scale,
        comments,
    })
}

fn read_question(grid: &Grid, row: usize, col: usize) -> Result<String, ExtractionError> {
    match grid.get(row, col).as_text() {
        Some(s) if !s.trim().is_empty() => Ok(s.replace(',', " ")),
        _ => Err(ExtractionError::MissingQuestionText { row, col }),
    }
}

fn read_counts(
    grid: &Grid,
    row: usize,
    first_col: usize,
    num_classes: usize,
) -> Result<Vec<u64>, ExtractionError> {
    (first_col..first_col + num_classes)
        .map(|col| coerce_count(grid.get(row, col), row, col))
        .collect()
}

/// Interprets a cell as a vote count.
///
/// Numbers and numeric text are accepted as long as they are non-negative integers no larger
/// than [MAX_VOTE_COUNT].
pub fn coerce_count(cell: &Cell, row: usize, col: usize) -> Result<u64, ExtractionError> {
    let value: Option<f64> = match cell {
        Cell::Number(x) => Some(*x),
        Cell::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(x)
            if x.is_finite() && x >= 0.0 && x.fract() == 0.0 && x <= MAX_VOTE_COUNT as f64 =>
        {
            Ok(x as u64)
        }
        _ => Err(ExtractionError::MalformedVoteCell {
            row,
            col,
            content: match cell {
                Cell::Empty => "nothing".to_string(),
                c => format!("{:?}", c),
            },
        }),
    }
}

// **** Aggregating ****

/// Adds `new_table` to the accumulator.
///
/// Both tables must have the same labels and the same questions in the same order.
pub fn fold(
    accumulator: Option<&VoteTable>,
    new_table: &VoteTable,
) -> Result<VoteTable, ExtractionError> {
    let acc = match accumulator {
        None => return Ok(new_table.clone()),
        Some(acc) => acc,
    };
    if acc.labels() != new_table.labels() {
        return Err(ExtractionError::ShapeMismatch {
            details: format!(
                "classes {:?} differ from {:?}",
                new_table.labels(),
                acc.labels()
            ),
        });
    }
    if acc.len() != new_table.len() {
        return Err(ExtractionError::ShapeMismatch {
            details: format!(
                "{} questions instead of {}",
                new_table.len(),
                acc.len()
            ),
        });
    }
    let mut res = VoteTable::new(acc.labels().to_vec());
    for (idx, ((q1, c1), (q2, c2))) in acc.rows().iter().zip(new_table.rows()).enumerate() {
        if q1 != q2 {
            return Err(ExtractionError::ShapeMismatch {
                details: format!("question {} is {:?} instead of {:?}", idx + 1, q2, q1),
            });
        }
        let counts: Vec<u64> = c1
            .iter()
            .zip(c2.iter())
            .map(|(a, b)| a.checked_add(*b))
            .collect::<Option<Vec<u64>>>()
            .ok_or_else(|| ExtractionError::CountOverflow {
                question: q1.clone(),
            })?;
        res.push_row(q1, counts)?;
    }
    Ok(res)
}

/// The counts of one row as percentages of the row total.
///
/// A row without any vote gives 0% for every class.
pub fn percentages(counts: &[u64]) -> Vec<f64> {
    // Summed as floats: the total of large counts may not fit in a u64.
    let total: f64 = counts.iter().map(|c| *c as f64).sum();
    if total == 0.0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|c| (*c as f64) / total * 100.0)
        .collect()
}

/// The running totals over all the processed exports.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Aggregate {
    pub regular: Option<VoteTable>,
    pub scale: Option<VoteTable>,
    pub comments: Vec<String>,
    /// The names of the exports that were absorbed, in order.
    pub sources: Vec<String>,
}

impl Aggregate {
    /// Adds the content of one export.
    ///
    /// On error, the aggregate is left untouched.
    pub fn absorb(
        &mut self,
        source: &str,
        extraction: SurveyExtraction,
    ) -> Result<(), ExtractionError> {
        let regular = fold(self.regular.as_ref(), &extraction.regular)?;
        let scale = if self.sources.is_empty() {
            extraction.scale.clone()
        } else {
            match (&self.scale, &extraction.scale) {
                (None, None) => None,
                (Some(acc), Some(t)) => Some(fold(Some(acc), t)?),
                _ => {
                    return Err(ExtractionError::ShapeMismatch {
                        details: "the scale question is not present in every export"
                            .to_string(),
                    });
                }
            }
        };
        info!(
            "absorb: {}: {} questions, {} comments",
            source,
            extraction.regular.len(),
            extraction.comments.len()
        );
        self.regular = Some(regular);
        self.scale = scale;
        self.comments.extend(extraction.comments);
        self.sources.push(source.to_string());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
