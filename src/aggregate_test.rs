use super::*;
use crate::error::ErrorCode;

fn row(year: &str, title: &str, salary: &str) -> Record {
    Record::from_pairs([("work_year", year), ("job_title", title), ("salary_in_usd", salary)])
}

fn sample() -> Vec<Record> {
    vec![row("2020", "Engineer", "100000"), row("2020", "Engineer", "120000"), row("2021", "Analyst", "90000")]
}

// =============================================================================
// summarize_years
// =============================================================================

#[test]
fn years_example_dataset() {
    let out = summarize_years(&sample()).unwrap();
    assert_eq!(
        out,
        vec![
            YearSummary { year: "2020".into(), job_count: 2, average_salary: 110_000.0 },
            YearSummary { year: "2021".into(), job_count: 1, average_salary: 90_000.0 },
        ]
    );
}

#[test]
fn years_empty_input_is_empty() {
    assert!(summarize_years(&[]).unwrap().is_empty());
}

#[test]
fn years_keep_first_encountered_order() {
    let rows = vec![row("2022", "A", "1"), row("2020", "B", "1"), row("2022", "C", "1"), row("2021", "D", "1")];
    let years: Vec<_> = summarize_years(&rows).unwrap().into_iter().map(|s| s.year).collect();
    assert_eq!(years, vec!["2022", "2020", "2021"]);
}

#[test]
fn years_job_counts_sum_to_record_count() {
    let rows: Vec<Record> = (0..37)
        .map(|i| row(&format!("{}", 2019 + i % 5), "T", &format!("{}", 1000 * (i + 1))))
        .collect();
    let total: usize = summarize_years(&rows).unwrap().iter().map(|s| s.job_count).sum();
    assert_eq!(total, rows.len());
}

#[test]
fn years_average_rounds_to_cents() {
    let rows = vec![row("2020", "A", "1"), row("2020", "B", "1"), row("2020", "C", "2")];
    let out = summarize_years(&rows).unwrap();
    assert!((out[0].average_salary - 1.33).abs() < 1e-9);
}

#[test]
fn years_match_exactly_not_by_substring() {
    let rows = vec![row("2020", "A", "10"), row("20201", "B", "30")];
    let out = summarize_years(&rows).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].job_count, 1);
    assert!((out[0].average_salary - 10.0).abs() < f64::EPSILON);
}

#[test]
fn years_accept_padded_and_fractional_salaries() {
    let rows = vec![row("2020", "A", " 100.5 "), row("2020", "B", "99.5")];
    let out = summarize_years(&rows).unwrap();
    assert!((out[0].average_salary - 100.0).abs() < f64::EPSILON);
}

#[test]
fn years_reject_non_numeric_salary() {
    let rows = vec![row("2020", "A", "100"), row("2020", "B", "n/a")];
    let err = summarize_years(&rows).unwrap_err();
    assert_eq!(err, AggregateError::InvalidSalary { row: 2, value: "n/a".into() });
    assert_eq!(err.error_code(), "E_INVALID_SALARY");
}

#[test]
fn years_reject_empty_and_non_finite_salary() {
    assert!(matches!(
        summarize_years(&[row("2020", "A", "")]),
        Err(AggregateError::InvalidSalary { row: 1, .. })
    ));
    assert!(matches!(
        summarize_years(&[row("2020", "A", "NaN")]),
        Err(AggregateError::InvalidSalary { .. })
    ));
    assert!(matches!(
        summarize_years(&[row("2020", "A", "inf")]),
        Err(AggregateError::InvalidSalary { .. })
    ));
}

#[test]
fn years_reject_missing_fields() {
    let no_year = Record::from_pairs([("job_title", "A"), ("salary_in_usd", "1")]);
    let err = summarize_years(&[no_year]).unwrap_err();
    assert_eq!(err, AggregateError::MissingField { row: 1, field: "work_year" });
    assert_eq!(err.error_code(), "E_MISSING_FIELD");

    let no_salary = Record::from_pairs([("work_year", "2020"), ("job_title", "A")]);
    let err = summarize_years(&[no_salary]).unwrap_err();
    assert_eq!(err, AggregateError::MissingField { row: 1, field: "salary_in_usd" });
}

#[test]
fn round_cents_half_away_from_zero() {
    assert!((round_cents(1.005_000_1) - 1.01).abs() < 1e-9);
    assert!((round_cents(2.344) - 2.34).abs() < 1e-9);
    assert!((round_cents(-2.345_000_1) + 2.35).abs() < 1e-9);
}

#[test]
fn round_cents_exact_decimal_halves_round_up() {
    assert!((round_cents(1.005) - 1.01).abs() < 1e-9);
    assert!((round_cents(2.675) - 2.68).abs() < 1e-9);
    assert!((round_cents(100.005) - 100.01).abs() < 1e-9);
    assert!((round_cents(-2.345) + 2.35).abs() < 1e-9);
    assert!((round_cents(7.0) - 7.0).abs() < 1e-9);
}

#[test]
fn years_average_of_half_cent_mean_rounds_up() {
    let rows = vec![row("2020", "A", "1.00"), row("2020", "B", "1.01")];
    let out = summarize_years(&rows).unwrap();
    assert!((out[0].average_salary - 1.01).abs() < 1e-9, "{}", out[0].average_salary);
}

// =============================================================================
// summarize_job_titles
// =============================================================================

#[test]
fn titles_example_dataset() {
    let out = summarize_job_titles(&sample(), "2020");
    assert_eq!(out, vec![JobTitleSummary { job_title: "Engineer".into(), job_count: 2 }]);
}

#[test]
fn titles_keep_first_encountered_order() {
    let rows = vec![
        row("2021", "Scientist", "1"),
        row("2021", "Analyst", "1"),
        row("2021", "Scientist", "1"),
        row("2020", "Manager", "1"),
    ];
    let out = summarize_job_titles(&rows, "2021");
    assert_eq!(
        out,
        vec![
            JobTitleSummary { job_title: "Scientist".into(), job_count: 2 },
            JobTitleSummary { job_title: "Analyst".into(), job_count: 1 },
        ]
    );
}

#[test]
fn titles_counts_sum_to_year_count() {
    let rows: Vec<Record> = (0..40)
        .map(|i| row(&format!("{}", 2020 + i % 3), &format!("T{}", i % 7), "1000"))
        .collect();
    let years = summarize_years(&rows).unwrap();
    for year in &years {
        let total: usize = summarize_job_titles(&rows, &year.year)
            .iter()
            .map(|t| t.job_count)
            .sum();
        assert_eq!(total, year.job_count, "year {}", year.year);
    }
}

#[test]
fn titles_unknown_year_is_empty() {
    assert!(summarize_job_titles(&sample(), "1999").is_empty());
}

#[test]
fn summaries_serialize_camel_case() {
    let y = YearSummary { year: "2020".into(), job_count: 2, average_salary: 110_000.0 };
    let v = serde_json::to_value(&y).unwrap();
    assert_eq!(v, serde_json::json!({ "year": "2020", "jobCount": 2, "averageSalary": 110_000.0 }));

    let t = JobTitleSummary { job_title: "Engineer".into(), job_count: 2 };
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v, serde_json::json!({ "jobTitle": "Engineer", "jobCount": 2 }));
}
