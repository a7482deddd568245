use clap::Parser;

/// Aggregates the exports of a training evaluation survey into tables, a chart and an HTML report.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file describing the layout of the survey sheets
    /// and the input and output directories. Relative directories are resolved against the
    /// directory of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, default 'surveys') The directory containing the survey exports. Setting this
    /// option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (directory, default: the input directory) Where the aggregated results are written.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// The exact text of the first question, used to locate the vote blocks in each sheet.
    #[clap(long, value_parser)]
    pub anchor: Option<String>,

    /// (default 17) The number of regular questions.
    #[clap(long, value_parser)]
    pub blocks: Option<u32>,

    /// If passed as an argument, the surveys are assumed to have no 0-10 scale question.
    #[clap(long, takes_value = false)]
    pub no_scale: bool,

    /// (default: the first worksheet) When using a workbook, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
