use log::{debug, info};

use snafu::{prelude::*, Snafu};

use std::path::{Path, PathBuf};

use survey_tally::*;

use crate::args::Args;
use crate::survey::config_reader::*;

pub mod chart;
pub mod config_reader;
mod font;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod report;
pub mod report_csv;
pub mod report_html;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error reading the directory {path}"))]
    ReadingDirectory {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No survey file found in {path}"))]
    NoInputFiles { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningWorkbook {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("The workbook {path} does not contain any worksheet"))]
    EmptyWorkbook { path: String },
    #[snafu(display("The workbook {path} does not contain a worksheet named {worksheet}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("Error reading the CSV file {path}"))]
    ReadingCsv { source: csv::Error, path: String },
    #[snafu(display("Error extracting the survey from {path}: {source}"))]
    Extraction {
        source: ExtractionError,
        path: String,
    },
    #[snafu(display("Error adding the survey from {path}: {source}"))]
    Aggregation {
        source: ExtractionError,
        path: String,
    },
    #[snafu(display("No survey was aggregated"))]
    EmptyAggregate {},
    #[snafu(display("Error opening the configuration file {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the configuration file {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("The configuration field {field} should be a positive integer"))]
    ParsingConfigNumber { field: String },
    #[snafu(display("Invalid configuration: {source}"))]
    InvalidConfig { source: ExtractionError },
    #[snafu(display("Error writing the CSV content of {name}"))]
    WritingCsv { source: csv::Error, name: String },
    #[snafu(display("Error encoding the chart"))]
    EncodingPng { source: png::EncodingError },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// Reads the grid of one export, choosing the reader from the file extension.
pub fn read_survey_grid(path: &Path, worksheet: Option<&str>) -> SurveyResult<Grid> {
    let p = path.display().to_string();
    info!("Attempting to read survey file {:?}", p);
    match io_common::file_extension(path).as_str() {
        "csv" => io_csv::read_csv_grid(&p),
        _ => io_excel::read_excel_grid(&p, worksheet),
    }
}

/// Extracts every file and sums the results, in the order of the list.
pub fn aggregate_files(
    files: &[PathBuf],
    layout: &SurveyLayout,
    worksheet: Option<&str>,
) -> SurveyResult<Aggregate> {
    let mut aggregate = Aggregate::default();
    for path in files {
        let p = path.display().to_string();
        let grid = read_survey_grid(path, worksheet)?;
        debug!(
            "aggregate_files: {:?}: {} rows, {} columns",
            p,
            grid.height(),
            grid.width()
        );
        let extraction = extract_survey(&grid, layout).context(ExtractionSnafu { path: &p })?;
        aggregate
            .absorb(&io_common::simplify_file_name(path), extraction)
            .context(AggregationSnafu { path: &p })?;
    }
    Ok(aggregate)
}

/// Runs the whole batch: reads the input directory, aggregates and writes the reports.
///
/// Returns the paths of the files written. Nothing is written if any step fails.
pub fn run_aggregation(config: &SurveyConfig) -> SurveyResult<Vec<PathBuf>> {
    let layout = config.layout()?;
    let input_dir = config.input_directory();
    let files = io_common::list_survey_files(&input_dir, &config.input_extensions())?;
    ensure!(
        !files.is_empty(),
        NoInputFilesSnafu {
            path: input_dir.display().to_string()
        }
    );
    info!("Found {} survey files in {:?}", files.len(), input_dir);

    let aggregate = aggregate_files(&files, &layout, config.excel_worksheet_name.as_deref())?;
    info!(
        "Aggregated {} surveys, {} comments",
        aggregate.sources.len(),
        aggregate.comments.len()
    );

    let rendered = report::render_report(&aggregate)?;
    rendered.write_to(&config.output_directory())
}

pub fn run_from_args(args: &Args) -> SurveyResult<()> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => SurveyConfig::default(),
    };
    config.apply_args(args);
    debug!("config: {:?}", config);

    let written = run_aggregation(&config)?;
    for path in written {
        println!("Saved {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::report::*;
    use super::*;
    use std::fs;

    const FIXTURES: [&str; 2] = ["session_a.csv", "session_b.csv"];

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn fixture_path(name: &str) -> PathBuf {
        [env!("CARGO_MANIFEST_DIR"), "tests", "data", name]
            .iter()
            .collect()
    }

    // A configuration for the fixtures, reading from a fresh directory.
    fn setup(files: &[&str]) -> (tempfile::TempDir, SurveyConfig) {
        init();
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            fs::copy(fixture_path(name), dir.path().join(name)).unwrap();
        }
        let mut config =
            read_config(fixture_path("survey_config.json").to_str().unwrap()).unwrap();
        config.input_directory = Some(dir.path().display().to_string());
        (dir, config)
    }

    fn read_output(dir: &Path, name: &str) -> String {
        let bytes = fs::read(dir.join(name)).unwrap();
        assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
        String::from_utf8(bytes[3..].to_vec()).unwrap()
    }

    #[test]
    fn fixtures_end_to_end() {
        let (dir, config) = setup(&FIXTURES);
        let written = run_aggregation(&config).unwrap();
        assert_eq!(written.len(), 5);

        let regular = read_output(dir.path(), REGULAR_VOTES_CSV);
        let lines: Vec<&str> = regular.lines().collect();
        assert_eq!(
            lines[0],
            ",Tout à fait d'accord,D'accord,Indécis,En désaccord,Tout à fait en désaccord"
        );
        assert_eq!(lines[1], "Le formateur a communiqué de façon dynamique,4,6,0,0,2");
        assert_eq!(lines[2], "Les objectifs  annoncés  ont été atteints,1,1,6,1,1");
        assert_eq!(lines.len(), 3);

        let integer = read_output(dir.path(), INTEGER_VOTES_CSV);
        let lines: Vec<&str> = integer.lines().collect();
        assert_eq!(lines[0], ",0,1,2,3,4,5,6,7,8,9,10");
        assert_eq!(lines[1], "Note globale de la formation,0,0,0,0,0,1,1,4,4,2,1");

        let comments = read_output(dir.path(), COMMENTS_CSV);
        let lines: Vec<&str> = comments.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Comment",
                "Très bon formateur merci",
                "Salle trop petite",
                "Rien à signaler"
            ]
        );

        let html = fs::read_to_string(dir.path().join(HTML_REPORT)).unwrap();
        // 4 votes out of 13 for the 0-10 question
        assert!(html.contains("<td>30.8</td>"));
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.contains("Rien à signaler"));

        let png = fs::read(dir.path().join(CHART_PNG)).unwrap();
        assert!(png.starts_with(b"\x89PNG"));
        assert!(!dir.path().join(COMBINED_VOTES_CSV).exists());
    }

    #[test]
    fn outputs_are_not_read_back() {
        let (dir, config) = setup(&FIXTURES);
        run_aggregation(&config).unwrap();
        let first = fs::read(dir.path().join(REGULAR_VOTES_CSV)).unwrap();
        run_aggregation(&config).unwrap();
        let second = fs::read(dir.path().join(REGULAR_VOTES_CSV)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn single_table_variant() {
        let (dir, mut config) = setup(&FIXTURES);
        config.scale_question = Some(false);
        run_aggregation(&config).unwrap();
        assert!(dir.path().join(COMBINED_VOTES_CSV).exists());
        assert!(!dir.path().join(REGULAR_VOTES_CSV).exists());
        assert!(!dir.path().join(INTEGER_VOTES_CSV).exists());
        let html = fs::read_to_string(dir.path().join(HTML_REPORT)).unwrap();
        assert!(!html.contains("Integer Votes"));
    }

    #[test]
    fn separate_output_directory() {
        let (dir, mut config) = setup(&FIXTURES);
        let out = dir.path().join("reports");
        config.output_directory = Some(out.display().to_string());
        run_aggregation(&config).unwrap();
        assert!(out.join(HTML_REPORT).exists());
        assert!(!dir.path().join(HTML_REPORT).exists());
    }

    #[test]
    fn failure_writes_nothing() {
        let (dir, config) = setup(&FIXTURES);
        fs::write(
            dir.path().join("session_c.csv"),
            "Evaluation\n,Autre question\n,,1,2,3,4,5\n",
        )
        .unwrap();
        let res = run_aggregation(&config);
        assert!(matches!(res, Err(SurveyError::Extraction { .. })));
        for name in OUTPUT_FILE_NAMES {
            assert!(!dir.path().join(name).exists(), "{} was written", name);
        }
    }

    #[test]
    fn mismatched_questions_are_fatal() {
        let (dir, config) = setup(&FIXTURES);
        let other = fs::read_to_string(fixture_path("session_b.csv"))
            .unwrap()
            .replace("ont été atteints", "sont clairs");
        fs::write(dir.path().join("session_c.csv"), other).unwrap();
        let res = run_aggregation(&config);
        assert!(matches!(res, Err(SurveyError::Aggregation { .. })));
        assert!(!dir.path().join(HTML_REPORT).exists());
    }

    #[test]
    fn empty_directory() {
        let (_dir, config) = setup(&[]);
        assert!(matches!(
            run_aggregation(&config),
            Err(SurveyError::NoInputFiles { .. })
        ));
    }

    #[test]
    fn malformed_count_in_file() {
        let (dir, config) = setup(&FIXTURES[..1]);
        let broken = fs::read_to_string(fixture_path("session_b.csv"))
            .unwrap()
            .replace(",,1,4,0,0,1", ",,1,quatre,0,0,1");
        fs::write(dir.path().join("session_b.csv"), broken).unwrap();
        match run_aggregation(&config) {
            Err(SurveyError::Extraction {
                source: ExtractionError::MalformedVoteCell { row, col, .. },
                ..
            }) => assert_eq!((row, col), (3, 3)),
            x => panic!("unexpected result {:?}", x),
        }
    }
}
