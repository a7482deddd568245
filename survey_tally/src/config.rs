// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The content of one spreadsheet cell, as far as the extraction is concerned.
///
/// Readers (Excel, CSV, ...) are expected to map their own cell types onto this one.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// The textual rendering of the cell, or None for an empty cell.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(f) => Some(format_number(*f)),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Empty => None,
        }
    }
}

// Integral values are printed without a trailing ".0".
fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// The content of the first worksheet of a survey export.
///
/// Coordinates are absolute and zero-based: (0, 0) is the A1 cell.
/// Reading outside of the populated area returns an empty cell.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Grid {
        Grid { rows }
    }

    /// The number of rows, including the leading empty ones.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|r| r.as_slice())
    }
}

/// Converts zero-based coordinates to the usual spreadsheet notation (0, 0) -> A1.
pub fn cell_reference(row: usize, col: usize) -> String {
    let mut letters: Vec<char> = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    let col_name: String = letters.iter().rev().collect();
    format!("{}{}", col_name, row + 1)
}

// ******** Output data structures *********

/// A cell that matched a literal search text.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Anchor {
    pub row: usize,
    pub col: usize,
    pub text: String,
}

/// Vote counts, one row per question and one column per response class.
///
/// Invariant: every row holds exactly one count per label.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteTable {
    labels: Vec<String>,
    rows: Vec<(String, Vec<u64>)>,
}

impl VoteTable {
    pub fn new(labels: Vec<String>) -> VoteTable {
        VoteTable {
            labels,
            rows: Vec::new(),
        }
    }

    /// Appends a question. The number of counts must match the number of labels.
    pub fn push_row(&mut self, question: &str, counts: Vec<u64>) -> Result<(), ExtractionError> {
        if counts.len() != self.labels.len() {
            return Err(ExtractionError::ShapeMismatch {
                details: format!(
                    "question {:?} has {} counts but the table has {} classes",
                    question,
                    counts.len(),
                    self.labels.len()
                ),
            });
        }
        self.rows.push((question.to_string(), counts));
        Ok(())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[(String, Vec<u64>)] {
        &self.rows
    }

    pub fn questions(&self) -> Vec<String> {
        self.rows.iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows of the table, with the counts expressed as percentages of the row total.
    pub fn percentage_rows(&self) -> Vec<(String, Vec<f64>)> {
        self.rows
            .iter()
            .map(|(q, counts)| (q.clone(), crate::percentages(counts)))
            .collect()
    }
}

/// Everything that is pulled out of a single survey export.
#[derive(PartialEq, Debug, Clone)]
pub struct SurveyExtraction {
    pub regular: VoteTable,
    pub scale: Option<VoteTable>,
    pub comments: Vec<String>,
}

/// Errors that prevent the extraction or the aggregation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ExtractionError {
    /// No cell holds exactly the searched text.
    AnchorNotFound { anchor: String },
    /// A vote count cell is missing or does not hold a non-negative integer.
    MalformedVoteCell {
        row: usize,
        col: usize,
        content: String,
    },
    /// The cell that should hold the text of a question is blank.
    MissingQuestionText { row: usize, col: usize },
    /// Two tables cannot be summed.
    ShapeMismatch { details: String },
    /// A summed count does not fit in a count.
    CountOverflow { question: String },
    /// The layout parameters are not usable.
    InvalidLayout { details: String },
}

impl Error for ExtractionError {}

impl Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionError::AnchorNotFound { anchor } => {
                write!(f, "could not find a cell containing {:?}", anchor)
            }
            ExtractionError::MalformedVoteCell { row, col, content } => write!(
                f,
                "cell {} should contain a vote count but contains {}",
                cell_reference(*row, *col),
                content
            ),
            ExtractionError::MissingQuestionText { row, col } => write!(
                f,
                "cell {} should contain the text of a question but is blank",
                cell_reference(*row, *col)
            ),
            ExtractionError::ShapeMismatch { details } => {
                write!(f, "vote tables cannot be aggregated: {}", details)
            }
            ExtractionError::CountOverflow { question } => {
                write!(f, "the vote counts of question {:?} are too large to be summed", question)
            }
            ExtractionError::InvalidLayout { details } => {
                write!(f, "invalid survey layout: {}", details)
            }
        }
    }
}

// ********* Configuration **********

/// The largest count a single cell may hold.
pub const MAX_VOTE_COUNT: u64 = u32::MAX as u64;

/// The labels of the five-point agreement scale, as printed in the exports.
pub const AGREEMENT_LABELS: [&str; 5] = [
    "Tout à fait d'accord",
    "D'accord",
    "Indécis",
    "En désaccord",
    "Tout à fait en désaccord",
];

/// Describes where the data sits in an export.
///
/// The regular questions start at the anchor cell. Each question takes `row_stride` rows:
/// the text of the question in the anchor column, then on the next row one count per class
/// in the columns right of it. The scale question, if any, follows the last regular question.
#[derive(PartialEq, Debug, Clone)]
pub struct SurveyLayout {
    /// The exact text of the first question.
    pub anchor_text: String,
    pub regular_blocks: usize,
    pub row_stride: usize,
    pub class_labels: Vec<String>,
    /// Number of classes (0 to n-1) of the trailing scale question. None if the survey has no such question.
    pub scale_classes: Option<usize>,
    pub comments_anchor: String,
    /// Replaced by a space in the comments.
    pub line_break_marker: String,
}

impl Default for SurveyLayout {
    fn default() -> Self {
        SurveyLayout {
            anchor_text: "Le formateur a communiqué de façon dynamique".to_string(),
            regular_blocks: 17,
            row_stride: 3,
            class_labels: AGREEMENT_LABELS.iter().map(|s| s.to_string()).collect(),
            scale_classes: Some(11),
            comments_anchor: "Commentaires :".to_string(),
            line_break_marker: "<br />".to_string(),
        }
    }
}

impl SurveyLayout {
    pub fn validate(&self) -> Result<(), ExtractionError> {
        let problem = if self.anchor_text.is_empty() {
            Some("the anchor text is empty".to_string())
        } else if self.regular_blocks == 0 {
            Some("at least one regular question is required".to_string())
        } else if self.row_stride < 2 {
            Some(format!(
                "the row stride must be at least 2 (got {})",
                self.row_stride
            ))
        } else if self.class_labels.is_empty() {
            Some("at least one response class is required".to_string())
        } else if self.scale_classes == Some(0) {
            Some("the scale question needs at least one class".to_string())
        } else {
            None
        };
        match problem {
            Some(details) => Err(ExtractionError::InvalidLayout { details }),
            None => Ok(()),
        }
    }

    /// The number of rows between the anchor and the scale question.
    pub fn scale_row_offset(&self) -> usize {
        self.regular_blocks * self.row_stride
    }
}
