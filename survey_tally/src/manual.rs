/*!

This is the long-form manual for `survey_tally` and `surveyagg`.

## Input formats

The following formats are supported:
* `xlsx`, `xlsm`, `xls`, `ods` spreadsheets. Only the first worksheet is read, unless a worksheet name is configured.
* `csv` exports of the same worksheet. This format must be enabled explicitly, see [Configuration](#configuration).

### Expected layout

Every export is a single evaluation form laid out the same way. The position of the data is
found from the text of the first question (the *anchor*), which must appear exactly once,
character for character:

|   | B                                            | C  | D  | E  | F  | G  |
|---|----------------------------------------------|----|----|----|----|----|
| 3 | Le formateur a communiqué de façon dynamique |    |    |    |    |    |
| 4 |                                              | 3  | 2  | 0  | 0  | 1  |
| 5 |                                              |    |    |    |    |    |
| 6 | Les objectifs ont été atteints               |    |    |    |    |    |
| 7 |                                              | 1  | 4  | 0  | 0  | 1  |
| … |                                              |    |    |    |    |    |

Each question takes 3 rows: its text, then one count per class of the agreement scale
(`Tout à fait d'accord`, `D'accord`, `Indécis`, `En désaccord`, `Tout à fait en désaccord`)
starting one column to the right, then a blank row.

After the 17 regular questions comes one question graded from 0 to 10, in the same format
with 11 counts.

Comments are optional. They are listed in the column right of a cell containing
`Commentaires :`, starting on the same row. The `<br />` markers left by the export tool are
replaced by spaces.

All the exports must contain the same questions in the same order. Any difference stops the
aggregation.

### csv

The cells of the CSV file are placed exactly as they would be in the spreadsheet: the first
line is row 1, the first field is column A. Fields that parse as numbers are treated as numbers.

```text
Evaluation de la formation
,
,Le formateur a communiqué de façon dynamique
,,3,2,0,0,1
```

## Outputs

All the outputs are written in the output directory (by default the input directory):
* `aggregated_regular_votes.csv`: the summed counts of the regular questions
* `aggregated_integer_votes.csv`: the summed counts of the 0-10 question
  (`aggregated_votes.csv` holds the regular questions instead when there is no such question)
* `aggregated_comments.csv`: all the comments
* `results.png`: the distribution of the answers for each regular question
* `aggregated_results.html`: a self-contained report with all of the above

The CSV files are encoded in UTF-8 with a byte order mark, so that spreadsheet programs keep
the accented characters.

Nothing is written if any of the exports cannot be processed.

## Configuration

`surveyagg` comes with defaults matching the layout above. A JSON configuration file can be
passed with `--config`. All the fields are optional:

```json
{
  "inputDirectory": "surveys",
  "outputDirectory": "reports",
  "anchorText": "Le formateur a communiqué de façon dynamique",
  "regularBlocks": 18,
  "rowStride": 3,
  "classLabels": ["Tout à fait d'accord", "D'accord", "Indécis", "En désaccord", "Tout à fait en désaccord"],
  "scaleQuestion": false,
  "scaleClasses": 11,
  "commentsAnchor": "Commentaires :",
  "lineBreakMarker": "<br />",
  "excelWorksheetName": "Feuil1",
  "inputExtensions": ["xlsx", "csv"]
}
```

Directories are relative to the location of the configuration file. The numbers may also be
given as strings.

 */
