use crate::args::Args;
use crate::survey::*;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use survey_tally::SurveyLayout;

pub const DEFAULT_INPUT_DIRECTORY: &str = "surveys";
pub const DEFAULT_INPUT_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// The configuration of a run, as read from a JSON file.
///
/// Every field is optional. Missing fields take the values of the default survey layout.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "inputDirectory")]
    pub input_directory: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "anchorText")]
    pub anchor_text: Option<String>,
    #[serde(rename = "regularBlocks")]
    _regular_blocks: Option<JSValue>,
    #[serde(rename = "rowStride")]
    _row_stride: Option<JSValue>,
    #[serde(rename = "classLabels")]
    pub class_labels: Option<Vec<String>>,
    #[serde(rename = "scaleQuestion")]
    pub scale_question: Option<bool>,
    #[serde(rename = "scaleClasses")]
    _scale_classes: Option<JSValue>,
    #[serde(rename = "commentsAnchor")]
    pub comments_anchor: Option<String>,
    #[serde(rename = "lineBreakMarker")]
    pub line_break_marker: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "inputExtensions")]
    pub input_extensions: Option<Vec<String>>,
}

impl SurveyConfig {
    pub fn regular_blocks(&self) -> SurveyResult<Option<usize>> {
        read_js_int(&self._regular_blocks, "regularBlocks")
    }

    pub fn row_stride(&self) -> SurveyResult<Option<usize>> {
        read_js_int(&self._row_stride, "rowStride")
    }

    pub fn scale_classes(&self) -> SurveyResult<Option<usize>> {
        read_js_int(&self._scale_classes, "scaleClasses")
    }

    /// The layout to extract, checked for consistency.
    pub fn layout(&self) -> SurveyResult<SurveyLayout> {
        let d = SurveyLayout::default();
        let scale_classes = if self.scale_question.unwrap_or(true) {
            self.scale_classes()?.or(d.scale_classes)
        } else {
            None
        };
        let layout = SurveyLayout {
            anchor_text: self.anchor_text.clone().unwrap_or(d.anchor_text),
            regular_blocks: self.regular_blocks()?.unwrap_or(d.regular_blocks),
            row_stride: self.row_stride()?.unwrap_or(d.row_stride),
            class_labels: self.class_labels.clone().unwrap_or(d.class_labels),
            scale_classes,
            comments_anchor: self.comments_anchor.clone().unwrap_or(d.comments_anchor),
            line_break_marker: self
                .line_break_marker
                .clone()
                .unwrap_or(d.line_break_marker),
        };
        layout.validate().context(InvalidConfigSnafu {})?;
        Ok(layout)
    }

    pub fn input_directory(&self) -> PathBuf {
        PathBuf::from(
            self.input_directory
                .clone()
                .unwrap_or_else(|| DEFAULT_INPUT_DIRECTORY.to_string()),
        )
    }

    /// By default, the reports are written next to the surveys.
    pub fn output_directory(&self) -> PathBuf {
        match &self.output_directory {
            Some(p) => PathBuf::from(p),
            None => self.input_directory(),
        }
    }

    /// The lowercase extensions of the files to read.
    pub fn input_extensions(&self) -> Vec<String> {
        match &self.input_extensions {
            Some(l) => l
                .iter()
                .map(|s| s.trim_start_matches('.').to_lowercase())
                .collect(),
            None => DEFAULT_INPUT_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Command line arguments take precedence over the file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(input) = &args.input {
            self.input_directory = Some(input.clone());
        }
        if let Some(out) = &args.out {
            self.output_directory = Some(out.clone());
        }
        if let Some(anchor) = &args.anchor {
            self.anchor_text = Some(anchor.clone());
        }
        if let Some(blocks) = args.blocks {
            self._regular_blocks = Some(JSValue::from(blocks));
        }
        if args.no_scale {
            self.scale_question = Some(false);
        }
        if let Some(worksheet) = &args.excel_worksheet_name {
            self.excel_worksheet_name = Some(worksheet.clone());
        }
    }
}

/// Reads a configuration file. Relative directories are resolved against the
/// directory of the file.
pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let mut config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingConfigSnafu { path })?;
    let root = Path::new(path).parent().unwrap_or_else(|| Path::new(""));
    config.input_directory = config.input_directory.map(|p| resolve(root, &p));
    config.output_directory = config.output_directory.map(|p| resolve(root, &p));
    Ok(config)
}

fn resolve(root: &Path, p: &str) -> String {
    let path = Path::new(p);
    if path.is_absolute() {
        p.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

// Numbers are accepted as JSON numbers or as strings.
fn read_js_int(x: &Option<JSValue>, field: &str) -> SurveyResult<Option<usize>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| Some(x as usize))
            .context(ParsingConfigNumberSnafu { field }),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .map(Some)
            .context(ParsingConfigNumberSnafu { field }),
        _ => None.context(ParsingConfigNumberSnafu { field }),
    }
}
