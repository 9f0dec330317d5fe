use pattern_lens::app::{show, themes, validate};
use pattern_lens::{build_cli, resolve_config, run, ShowOptions};
use pattern_view::{LensConfig, Perspective};
use pretty_assertions::assert_eq;
use std::ffi::OsString;
use std::io::Write;
use tempfile::NamedTempFile;

fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_show_default_pattern() {
    let report = show(&LensConfig::default(), &ShowOptions::default())
        .await
        .unwrap();
    assert!(report.success);
    assert!(report.body.starts_with("Your Understanding (outside view)"));
    assert!(report.body.contains("pattern-1  Learning happens through natural connections"));
    assert!(report.body.contains("confidence 85%  stage developing"));
}

#[tokio::test]
async fn test_show_theme_and_connection() {
    let options = ShowOptions {
        pattern: Some("pattern-1".into()),
        theme: Some("connections".into()),
        explore: Some("c-1-3".into()),
        ..ShowOptions::default()
    };
    let report = show(&LensConfig::default(), &options).await.unwrap();

    assert!(report.body.contains("themes: learning, [connections], natural"));
    assert!(report.body.contains("Theme connections (strength 75%, 1 related)"));
    assert!(report.body.contains("  - pattern-3  Patterns connect naturally"));
    assert!(report
        .body
        .contains("Exploring c-1-3 thematic 72% -> pattern-3 (Patterns connect naturally)"));
}

#[tokio::test]
async fn test_show_inside_json() {
    let options = ShowOptions {
        pattern: Some("example-2".into()),
        inside: true,
        perspective: Some(Perspective::Shared),
        json: true,
        ..ShowOptions::default()
    };
    let report = show(&LensConfig::default(), &options).await.unwrap();
    assert!(report.success);

    let value: serde_json::Value = serde_json::from_str(&report.body).unwrap();
    assert_eq!(value["kind"], "view");
    assert_eq!(value["body"]["view"], "inside");
    assert_eq!(value["body"]["perspective"], "shared");
    assert_eq!(value["body"]["timeline"], serde_json::json!([]));
}

#[tokio::test]
async fn test_show_unknown_theme_fails() {
    let options = ShowOptions {
        pattern: Some("pattern-2".into()),
        theme: Some("learning".into()),
        ..ShowOptions::default()
    };
    let err = show(&LensConfig::default(), &options).await.unwrap_err();
    assert!(err.to_string().contains("selecting theme 'learning'"));
}

#[tokio::test]
async fn test_show_unknown_pattern_fails() {
    let config = LensConfig::default().with_default_pattern("nope");
    assert!(show(&config, &ShowOptions::default()).await.is_err());
}

#[tokio::test]
async fn test_themes_lists_counts() {
    let report = themes(&LensConfig::default()).await.unwrap();
    let first = report.body.lines().next().unwrap();
    assert_eq!(first.split_whitespace().collect::<Vec<_>>(), ["learning", "2"]);
}

#[test]
fn test_validate_reports_domain_error() {
    let file = temp_file(
        r#"[{"id": "a", "content": "x", "themes": ["t"], "confidence": 1.4,
             "evolution": {"stage": "initial", "history": []}, "connections": []}]"#,
    );
    let report = validate(file.path()).unwrap();
    assert!(!report.success);
    assert!(report.body.contains("[confidence_out_of_range]"));
}

#[test]
fn test_validate_accepts_builtin_fixtures() {
    let file = temp_file(pattern_lens::BUILTIN_FIXTURES);
    let report = validate(file.path()).unwrap();
    assert!(report.success);
    assert!(report.body.contains("6 patterns"));
}

#[tokio::test]
async fn test_config_file_and_fixture_override() {
    let fixtures = temp_file(
        r#"[{"id": "solo", "content": "Only one", "themes": ["alone"], "confidence": 0.3,
             "evolution": {"stage": "initial", "history": []}, "connections": []}]"#,
    );
    let config_file = temp_file("default_perspective = \"system\"\n");

    let args: Vec<OsString> = vec![
        "pattern-lens".into(),
        "--config".into(),
        config_file.path().into(),
        "show".into(),
        "--fixtures".into(),
        fixtures.path().into(),
    ];
    let matches = build_cli().try_get_matches_from(args).unwrap();
    let config = resolve_config(&matches).unwrap();
    assert_eq!(config.default_perspective, Perspective::System);

    let report = run(&matches, &config).await.unwrap();
    assert!(report.body.starts_with("System View"));
    assert!(report.body.contains("solo  Only one"));
}
