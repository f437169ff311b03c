// Full runs against a local fixture page. Needs geckodriver or chromedriver:
//   cargo test --test browser_test -- --ignored
use followcheck::config::{Settings, Timing};
use followcheck::logger::LogMode;
use followcheck::session::{FollowChecker, RunStatus};
use followcheck::webdriver::{Browser, BrowserType};
use followcheck::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;
use serial_test::serial;

mod common;

const PROFILE_PAGE: &str = include_str!("fixtures/profile.html");

fn fixture_settings() -> Settings {
    let mut settings = Settings::default();
    settings.timing = Timing {
        dialog_open_ms: 200,
        dialog_close_ms: 200,
        ..Timing::immediate()
    };
    settings.site.host = "127.0.0.1".to_string();
    settings
}

async fn test_browser() -> Option<Browser> {
    for browser_type in [BrowserType::Chrome, BrowserType::Firefox] {
        match Browser::new(browser_type, None, None, true).await {
            Ok(browser) => return Some(browser),
            Err(e) => eprintln!("Skipping {:?}: {}", browser_type, e),
        }
    }
    None
}

#[tokio::test]
async fn test_fixture_server_serves_profile_page() {
    let base = common::serve_fixture(PROFILE_PAGE).await.unwrap();

    let response = reqwest::get(format!("{}/me/", base)).await.unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"href="/me/followers/""#));

    let missing = reqwest::get(format!("{}/elsewhere/", base)).await.unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
#[serial]
#[ignore = "requires a WebDriver"]
async fn test_run_against_fixture_page() {
    let base = common::serve_fixture(PROFILE_PAGE).await.unwrap();
    let Some(browser) = test_browser().await else {
        eprintln!("No WebDriver available");
        return;
    };

    browser.goto(&format!("{}/me/", base)).await.unwrap();
    let settings = fixture_settings();
    let session = FollowChecker::new(&browser, &settings, LogMode::Verbose)
        .run()
        .await
        .unwrap();

    assert_eq!(session.status, RunStatus::Completed);
    assert_eq!(session.followers, vec!["alice", "bob", "carol"]);
    assert_eq!(session.following, vec!["bob", "carol", "dave"]);
    let comparison = session.comparison.as_ref().unwrap();
    assert_eq!(comparison.not_following_back, vec!["dave"]);
    assert_eq!(comparison.not_followed_back, vec!["alice"]);

    browser.close().await.unwrap();
    GLOBAL_WEBDRIVER_MANAGER.stop_all();
}

#[tokio::test]
#[serial]
#[ignore = "requires a WebDriver"]
async fn test_wrong_host_is_rejected() {
    let base = common::serve_fixture(PROFILE_PAGE).await.unwrap();
    let Some(browser) = test_browser().await else {
        eprintln!("No WebDriver available");
        return;
    };

    browser.goto(&format!("{}/me/", base)).await.unwrap();
    let settings = Settings::default();
    let err = FollowChecker::new(&browser, &settings, LogMode::Quiet)
        .run()
        .await
        .unwrap_err();
    let err: followcheck::FollowCheckError = err.into();
    assert_eq!(err.exit_code(), 2);

    browser.close().await.unwrap();
    GLOBAL_WEBDRIVER_MANAGER.stop_all();
}
