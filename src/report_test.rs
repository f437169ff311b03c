use super::*;
use crate::compare::Comparison;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn sample() -> (Vec<String>, Vec<String>, Comparison) {
    let followers = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let following = vec!["b".to_string(), "c".to_string(), "d".to_string()];
    let comparison = Comparison {
        not_following_back: vec!["d".to_string()],
        not_followed_back: vec!["a".to_string()],
    };
    (followers, following, comparison)
}

#[test]
fn test_text_report_layout() {
    let (followers, following, comparison) = sample();
    let report = Report::new(
        "Instagram",
        "2024-05-01".to_string(),
        &followers,
        &following,
        &comparison,
    );

    let expected = "\
Instagram Follow Checker Results - 2024-05-01

Total followers found: 3
Total following found: 3

=== Users who DON'T follow you back (1) ===
@d

=== Users you DON'T follow back (1) ===
@a
";
    assert_eq!(report.render_text(), expected);
    assert_eq!(report.file_name(), "followcheck-results-2024-05-01.txt");
}

#[test]
fn test_table_rendering() {
    let table = render_table(&["alice".to_string(), "bartholomew".to_string()]);
    let expected = "\
+---+-------------+
| # | username    |
+---+-------------+
| 0 | alice       |
| 1 | bartholomew |
+---+-------------+
";
    assert_eq!(table, expected);
}

#[test]
fn test_empty_table_has_header_only() {
    let table = render_table(&[]);
    assert_eq!(table.lines().count(), 3);
    assert!(table.contains("username"));
}

#[test]
fn test_console_output_totals() {
    let (followers, following, comparison) = sample();
    let report = Report::new("Instagram", "2024-05-01".to_string(), &followers, &following, &comparison);
    let console = report.render_console();
    assert!(console.starts_with("=== Instagram Follow Checker Results ==="));
    assert!(console.contains("Total: 1 users don't follow you back"));
    assert!(console.contains("Total: 1 users you don't follow back"));
}

#[test]
fn test_json_shape() {
    let (followers, following, comparison) = sample();
    let report = Report::new("Instagram", "2024-05-01".to_string(), &followers, &following, &comparison);
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["followers_count"], 3);
    assert_eq!(value["not_following_back"][0], "d");
    assert_eq!(value["not_followed_back"][0], "a");
}

#[test]
fn test_write_text_creates_dated_file() {
    let (followers, following, comparison) = sample();
    let report = Report::new("Instagram", "2024-05-01".to_string(), &followers, &following, &comparison);
    let dir = TempDir::new().unwrap();

    let path = report.write_text(&dir.path().join("out")).unwrap();

    assert!(path.ends_with("followcheck-results-2024-05-01.txt"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), report.render_text());
}

#[test]
fn test_reports_with_empty_differences() {
    let followers = vec!["a".to_string()];
    let comparison = Comparison {
        not_following_back: Vec::new(),
        not_followed_back: Vec::new(),
    };
    let report = Report::new("Instagram", "2024-05-01".to_string(), &followers, &followers, &comparison);

    let expected = "\
Instagram Follow Checker Results - 2024-05-01

Total followers found: 1
Total following found: 1

=== Users who DON'T follow you back (0) ===

=== Users you DON'T follow back (0) ===
";
    assert_eq!(report.render_text(), expected);

    let expected_console = "\
=== Instagram Follow Checker Results ===
Total followers found: 1
Total following found: 1

Users who DON'T follow you back:
+---+----------+
| # | username |
+---+----------+
Total: 0 users don't follow you back

Users you DON'T follow back:
+---+----------+
| # | username |
+---+----------+
Total: 0 users you don't follow back
";
    assert_eq!(report.render_console(), expected_console);
}
