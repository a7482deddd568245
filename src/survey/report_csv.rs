// CSV exports of the aggregated tables.

use snafu::prelude::*;
use survey_tally::VoteTable;

use crate::survey::*;

// Spreadsheet tools need it to read the accents correctly.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn to_bytes(name: &str, records: Vec<Vec<String>>) -> SurveyResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new().from_writer(UTF8_BOM.to_vec());
    for record in records {
        wtr.write_record(&record).context(WritingCsvSnafu { name })?;
    }
    match wtr.into_inner() {
        Ok(bytes) => Ok(bytes),
        Err(e) => whatever!("Error flushing the CSV content of {}: {}", name, e.error()),
    }
}

/// The counts of a table: an empty corner cell, then the labels as header, then one line
/// per question.
pub fn vote_table_csv(table: &VoteTable) -> SurveyResult<Vec<u8>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut header = vec![String::new()];
    header.extend(table.labels().iter().cloned());
    records.push(header);
    for (question, counts) in table.rows() {
        let mut record = vec![question.clone()];
        record.extend(counts.iter().map(|c| c.to_string()));
        records.push(record);
    }
    to_bytes("vote table", records)
}

pub fn comments_csv(comments: &[String]) -> SurveyResult<Vec<u8>> {
    let mut records: Vec<Vec<String>> = vec![vec!["Comment".to_string()]];
    records.extend(comments.iter().map(|c| vec![c.clone()]));
    to_bytes("comments", records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: &[u8]) -> String {
        assert!(bytes.starts_with(UTF8_BOM));
        String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap()
    }

    #[test]
    fn vote_table() {
        let mut t = VoteTable::new(vec!["D'accord".to_string(), "Indécis".to_string()]);
        t.push_row("Rythme, contenu", vec![4, 0]).unwrap();
        t.push_row("Supports", vec![1, 2]).unwrap();
        let text = as_text(&vote_table_csv(&t).unwrap());
        assert_eq!(
            text,
            ",D'accord,Indécis\n\"Rythme, contenu\",4,0\nSupports,1,2\n"
        );
    }

    #[test]
    fn comments() {
        let text = as_text(&comments_csv(&["Très bien".to_string(), "Dit \"merci\"".to_string()]).unwrap());
        assert_eq!(text, "Comment\nTrès bien\n\"Dit \"\"merci\"\"\"\n");
    }

    #[test]
    fn no_comments() {
        assert_eq!(as_text(&comments_csv(&[]).unwrap()), "Comment\n");
    }
}
