use super::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_presets() {
    let classic = Timing::preset(Preset::Classic);
    assert_eq!(classic.scroll_base_ms, 800);
    assert_eq!(classic.scroll_jitter_ms, 400);
    assert_eq!(classic.stable_threshold, 5);
    assert_eq!(classic.max_attempts, 300);

    let brisk = Timing::preset(Preset::Brisk);
    assert_eq!(brisk.scroll_base_ms, 700);
    assert_eq!(brisk.scroll_jitter_ms, 300);
    assert_eq!(brisk.stable_threshold, 4);
    assert_eq!(brisk.max_attempts, 200);
    assert_eq!(brisk.dialog_open_ms, classic.dialog_open_ms);
}

#[test]
fn test_default_selectors_order() {
    let selectors = Selectors::default();
    assert_eq!(
        selectors.link_selectors(ListKind::Followers)[0],
        r#"a[href$="/followers/"]"#
    );
    assert_eq!(
        selectors.link_selectors(ListKind::Following)[2],
        "ul li:nth-child(3) a"
    );
    assert_eq!(selectors.close_button.len(), 4);
    assert!(selectors.denied_paths.contains(&"/p/".to_string()));
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let settings = Settings::from_toml_str(
        r#"
        [timing]
        max_attempts = 50

        [site]
        order = "alphabetical"
        "#,
    )
    .unwrap();

    assert_eq!(settings.timing.max_attempts, 50);
    assert_eq!(settings.timing.scroll_base_ms, 800);
    assert_eq!(settings.site.order, ResultOrder::Alphabetical);
    assert_eq!(settings.site.host, "instagram.com");
    assert_eq!(settings.selectors, Selectors::default());
}

#[test]
fn test_custom_strategy_lists() {
    let settings = Settings::from_toml_str(
        r#"
        [selectors]
        container = ["div.scroller", "section.list"]
        close_button = ["button.dismiss"]
        "#,
    )
    .unwrap();

    assert_eq!(settings.selectors.container, vec!["div.scroller", "section.list"]);
    assert_eq!(settings.selectors.close_button, vec!["button.dismiss"]);
}

#[test]
fn test_validation_rejects_bad_values() {
    assert!(Settings::from_toml_str("[timing]\nstable_threshold = 0").is_err());
    assert!(Settings::from_toml_str("[selectors]\nprofile_links = \"\"").is_err());
    assert!(Settings::from_toml_str("[selectors]\nprofile_links = \"  \"").is_err());
    assert!(Settings::from_toml_str("[timing]\nmax_attempts = 0").is_err());
    assert!(Settings::from_toml_str("[site]\nhost = \"  \"").is_err());
    assert!(Settings::from_toml_str("[selectors]\nfollowers_link = []").is_err());
    assert!(Settings::from_toml_str("not toml at all [").is_err());
}

#[test]
fn test_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut settings = Settings::default();
    settings.timing = Timing::preset(Preset::Brisk);
    std::fs::write(&path, settings.to_toml_string().unwrap()).unwrap();

    let loaded = Settings::load(Some(&path)).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
}

#[test]
fn test_apply_preset_keeps_dialog_waits() {
    let mut timing = Timing {
        dialog_open_ms: 5000,
        ..Timing::default()
    };
    timing.apply_preset(Preset::Brisk);

    assert_eq!(timing.scroll_base_ms, 700);
    assert_eq!(timing.scroll_jitter_ms, 300);
    assert_eq!(timing.stable_threshold, 4);
    assert_eq!(timing.max_attempts, 200);
    assert_eq!(timing.dialog_open_ms, 5000);
}
