use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use snafu::prelude::*;

use crate::survey::report::OUTPUT_FILE_NAMES;
use crate::survey::*;

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// The lowercase extension of the file, or an empty string.
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

// Lock files left by office suites and hidden files are never surveys.
fn is_candidate(name: &str) -> bool {
    !(name.starts_with('.') || name.starts_with("~$") || OUTPUT_FILE_NAMES.contains(&name))
}

/// The survey files of the directory, sorted by name.
///
/// Only the top level of the directory is listed. The reports written by a previous
/// run are never picked up, whatever the extensions.
pub fn list_survey_files(dir: &Path, extensions: &[String]) -> SurveyResult<Vec<PathBuf>> {
    let path = dir.display().to_string();
    let entries = fs::read_dir(dir).context(ReadingDirectorySnafu { path: &path })?;
    let mut res: Vec<PathBuf> = Vec::new();
    for entry_r in entries {
        let entry = entry_r.context(ReadingDirectorySnafu { path: &path })?;
        let p = entry.path();
        if !p.is_file() {
            continue;
        }
        let name = simplify_file_name(&p);
        if !is_candidate(&name) {
            debug!("list_survey_files: skipping {:?}", name);
            continue;
        }
        if extensions.contains(&file_extension(&p)) {
            res.push(p);
        }
    }
    res.sort();
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn names_and_extensions() {
        let p = Path::new("/data/surveys/Session 1.XLSX");
        assert_eq!(simplify_file_name(p), "Session 1.XLSX");
        assert_eq!(file_extension(p), "xlsx");
        assert_eq!(file_extension(Path::new("README")), "");
    }

    #[test]
    fn listing_is_filtered_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "b.xlsx",
            "a.XLSX",
            "c.ods",
            "notes.txt",
            "~$a.xlsx",
            ".hidden.xlsx",
            "aggregated_votes.csv",
            "d.csv",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("sub.xlsx")).unwrap();

        let files = list_survey_files(dir.path(), &exts(&["xlsx", "ods", "csv"])).unwrap();
        let names: Vec<String> = files.iter().map(|p| simplify_file_name(p)).collect();
        assert_eq!(names, vec!["a.XLSX", "b.xlsx", "c.ods", "d.csv"]);

        let files = list_survey_files(dir.path(), &exts(&["xlsx"])).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn missing_directory() {
        let res = list_survey_files(Path::new("/nonexistent/surveys"), &exts(&["xlsx"]));
        assert!(matches!(res, Err(SurveyError::ReadingDirectory { .. })));
    }
}
