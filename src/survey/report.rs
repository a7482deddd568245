// Assembles all the outputs in memory, then writes them in one go.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use snafu::prelude::*;
use survey_tally::Aggregate;

use crate::survey::chart::render_chart;
use crate::survey::report_csv::{comments_csv, vote_table_csv};
use crate::survey::report_html::render_html;
use crate::survey::*;

pub const REGULAR_VOTES_CSV: &str = "aggregated_regular_votes.csv";
pub const INTEGER_VOTES_CSV: &str = "aggregated_integer_votes.csv";
/// The only vote table when the survey has no scale question.
pub const COMBINED_VOTES_CSV: &str = "aggregated_votes.csv";
pub const COMMENTS_CSV: &str = "aggregated_comments.csv";
pub const HTML_REPORT: &str = "aggregated_results.html";
pub const CHART_PNG: &str = "results.png";

/// Every name an output may take.
pub const OUTPUT_FILE_NAMES: [&str; 6] = [
    REGULAR_VOTES_CSV,
    INTEGER_VOTES_CSV,
    COMBINED_VOTES_CSV,
    COMMENTS_CSV,
    HTML_REPORT,
    CHART_PNG,
];

/// The content of all the output files, by file name.
#[derive(PartialEq, Debug, Clone)]
pub struct RenderedReport {
    pub files: Vec<(String, Vec<u8>)>,
}

impl RenderedReport {
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// Writes every file to the directory, creating it if needed.
    ///
    /// The files are first written next to their destination under a temporary name, and
    /// only renamed once all of them are on disk. Existing outputs are kept aside until every
    /// rename succeeded: if one fails, they are put back and the directory is left as it was.
    pub fn write_to(&self, dir: &Path) -> SurveyResult<Vec<PathBuf>> {
        fs::create_dir_all(dir).context(WritingOutputSnafu {
            path: dir.display().to_string(),
        })?;
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
        for (name, bytes) in self.files.iter() {
            let tmp = dir.join(format!(".{}.tmp", name));
            if let Err(e) = fs::write(&tmp, bytes) {
                remove_files(staged.iter().map(|(tmp, _)| tmp));
                let _ = fs::remove_file(&tmp);
                return Err(e).context(WritingOutputSnafu {
                    path: tmp.display().to_string(),
                });
            }
            debug!("write_to: staged {:?}", tmp);
            staged.push((tmp, dir.join(name)));
        }

        // (destination, previous content moved aside)
        let mut replaced: Vec<(PathBuf, Option<PathBuf>)> = Vec::new();
        for (idx, (tmp, dest)) in staged.iter().enumerate() {
            if let Err((e, path)) = replace_file(tmp, dest, &mut replaced) {
                rollback(&replaced);
                remove_files(staged[idx..].iter().map(|(tmp, _)| tmp));
                return Err(e).context(WritingOutputSnafu {
                    path: path.display().to_string(),
                });
            }
        }

        remove_files(replaced.iter().filter_map(|(_, backup)| backup.as_ref()));
        let written: Vec<PathBuf> = replaced.into_iter().map(|(dest, _)| dest).collect();
        for dest in written.iter() {
            info!("write_to: wrote {:?}", dest);
        }
        Ok(written)
    }
}

fn backup_path(dest: &Path) -> PathBuf {
    let name = io_common::simplify_file_name(dest);
    dest.with_file_name(format!(".{}.bak", name))
}

// Moves the current file aside, then the staged file into place.
fn replace_file(
    tmp: &Path,
    dest: &Path,
    replaced: &mut Vec<(PathBuf, Option<PathBuf>)>,
) -> Result<(), (std::io::Error, PathBuf)> {
    let backup = if dest.is_file() {
        let backup = backup_path(dest);
        fs::rename(dest, &backup).map_err(|e| (e, dest.to_path_buf()))?;
        Some(backup)
    } else {
        None
    };
    if let Err(e) = fs::rename(tmp, dest) {
        if let Some(b) = &backup {
            if let Err(e2) = fs::rename(b, dest) {
                warn!("Could not restore {:?} from {:?}: {}", dest, b, e2);
            }
        }
        return Err((e, dest.to_path_buf()));
    }
    replaced.push((dest.to_path_buf(), backup));
    Ok(())
}

fn rollback(replaced: &[(PathBuf, Option<PathBuf>)]) {
    for (dest, backup) in replaced.iter().rev() {
        let res = match backup {
            Some(b) => fs::rename(b, dest),
            None => fs::remove_file(dest),
        };
        if let Err(e) = res {
            warn!("Could not restore {:?}: {}", dest, e);
        }
    }
}

fn remove_files<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
    for p in paths {
        if let Err(e) = fs::remove_file(p) {
            warn!("Could not remove the temporary file {:?}: {}", p, e);
        }
    }
}

/// Renders every output of the aggregate.
pub fn render_report(aggregate: &Aggregate) -> SurveyResult<RenderedReport> {
    let regular = match (&aggregate.regular, aggregate.is_empty()) {
        (Some(t), false) => t,
        _ => return EmptyAggregateSnafu {}.fail(),
    };
    let png = render_chart(regular)?;
    let html = render_html(aggregate, &png);

    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    match &aggregate.scale {
        Some(scale) => {
            files.push((REGULAR_VOTES_CSV.to_string(), vote_table_csv(regular)?));
            files.push((INTEGER_VOTES_CSV.to_string(), vote_table_csv(scale)?));
        }
        None => {
            files.push((COMBINED_VOTES_CSV.to_string(), vote_table_csv(regular)?));
        }
    }
    files.push((
        COMMENTS_CSV.to_string(),
        comments_csv(&aggregate.comments)?,
    ));
    files.push((HTML_REPORT.to_string(), html.into_bytes()));
    files.push((CHART_PNG.to_string(), png));
    Ok(RenderedReport { files })
}
