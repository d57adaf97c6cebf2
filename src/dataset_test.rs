use super::*;
use crate::error::ErrorCode;

const SAMPLE: &str = "\
work_year,experience_level,job_title,salary_in_usd
2020,SE,Engineer,100000
2020,MI,Engineer,120000
2021,EN,Analyst,90000
";

#[test]
fn parse_reads_rows_in_file_order() {
    let ds = parse_csv(SAMPLE).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.records[0].work_year(), Some("2020"));
    assert_eq!(ds.records[1].salary_in_usd(), Some("120000"));
    assert_eq!(ds.records[2].job_title(), Some("Analyst"));
}

#[test]
fn parse_keeps_extra_columns() {
    let ds = parse_csv(SAMPLE).unwrap();
    assert_eq!(ds.headers, vec!["work_year", "experience_level", "job_title", "salary_in_usd"]);
    assert_eq!(ds.records[0].get("experience_level"), Some("SE"));
    assert_eq!(ds.records[0].get("salary_in_usd"), Some("100000"));
}

#[test]
fn parse_skips_blank_lines() {
    let text = "work_year,job_title,salary_in_usd\n2020,Engineer,1\n\n2021,Analyst,2\n\n";
    let ds = parse_csv(text).unwrap();
    assert_eq!(ds.len(), 2);
}

#[test]
fn parse_strips_byte_order_mark() {
    let text = "\u{feff}work_year,job_title,salary_in_usd\n2020,Engineer,1\n";
    let ds = parse_csv(text).unwrap();
    assert_eq!(ds.records[0].work_year(), Some("2020"));
}

#[test]
fn parse_header_only_is_empty_dataset() {
    let ds = parse_csv("work_year,job_title,salary_in_usd\n").unwrap();
    assert!(ds.is_empty());
}

#[test]
fn parse_handles_quoted_fields() {
    let text = "work_year,job_title,salary_in_usd\n2022,\"Engineer, Data\",150000\n";
    let ds = parse_csv(text).unwrap();
    assert_eq!(ds.records[0].job_title(), Some("Engineer, Data"));
}

#[test]
fn parse_missing_column_errors() {
    let err = parse_csv("work_year,job_title\n2020,Engineer\n").unwrap_err();
    assert!(matches!(err, DatasetError::MissingColumn("salary_in_usd")));
    assert_eq!(err.error_code(), "E_MISSING_COLUMN");
}

#[test]
fn parse_ragged_row_errors() {
    let err = parse_csv("work_year,job_title,salary_in_usd\n2020,Engineer\n").unwrap_err();
    assert_eq!(err.error_code(), "E_CSV_PARSE");
}

#[test]
fn record_from_pairs_lookup() {
    let rec = Record::from_pairs([("work_year", "2020"), ("job_title", "Engineer")]);
    assert_eq!(rec.work_year(), Some("2020"));
    assert_eq!(rec.salary_in_usd(), None);
    assert_eq!(rec.get("job_title"), Some("Engineer"));
}
