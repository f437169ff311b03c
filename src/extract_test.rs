use super::*;
use crate::config::Selectors;
use crate::logger::{LogLevel, LogMode, SessionLog};
use crate::page::fake_page::{FakeDialog, FakePage};
use pretty_assertions::assert_eq;

#[test]
fn test_username_with_and_without_trailing_slash() {
    assert_eq!(
        username_from_url("https://www.instagram.com/alice/"),
        Some("alice".to_string())
    );
    assert_eq!(
        username_from_url("https://www.instagram.com/alice"),
        Some("alice".to_string())
    );
}

#[test]
fn test_username_ignores_query_and_deeper_segments() {
    assert_eq!(
        username_from_url("https://www.instagram.com/bob.smith/?hl=en"),
        Some("bob.smith".to_string())
    );
    assert_eq!(
        username_from_url("https://www.instagram.com/carol_1/followers/"),
        Some("carol_1".to_string())
    );
    assert_eq!(username_from_url("/dave/"), Some("dave".to_string()));
}

#[test]
fn test_username_fallback_split() {
    assert_eq!(username_from_url("erin/"), Some("erin".to_string()));
    assert_eq!(username_from_url("frank"), Some("frank".to_string()));
    assert_eq!(username_from_url("https://www.instagram.com/"), None);
    assert_eq!(username_from_url(""), None);
}

#[test]
fn test_denied_links() {
    let denied = Selectors::default().denied_paths;
    assert!(is_denied_link("https://www.instagram.com/p/xyz/", &denied));
    assert!(is_denied_link("https://www.instagram.com/reels/abc/", &denied));
    assert!(is_denied_link("https://www.instagram.com/stories/alice/1/", &denied));
    assert!(is_denied_link("https://www.instagram.com/explore/tags/x/", &denied));
    assert!(!is_denied_link("https://www.instagram.com/alice/", &denied));
}

#[test]
fn test_post_link_never_becomes_a_handle() {
    let mut log = SessionLog::new(LogMode::Quiet);
    let handles = handles_from_links(
        [
            "https://www.instagram.com/p/xyz/",
            "https://www.instagram.com/alice/",
        ],
        &Selectors::default(),
        &mut log,
    );
    assert_eq!(handles.into_vec(), vec!["alice"]);
}

#[test]
fn test_sentinel_and_duplicates_dropped() {
    let mut log = SessionLog::new(LogMode::Quiet);
    let handles = handles_from_links(
        [
            "https://www.instagram.com/accounts/",
            "https://www.instagram.com/bob/",
            "https://www.instagram.com/alice/",
            "https://www.instagram.com/bob",
            "no-slash-here",
        ],
        &Selectors::default(),
        &mut log,
    );
    assert_eq!(handles.into_vec(), vec!["bob", "alice"]);
}

#[tokio::test]
async fn test_extract_from_open_dialog() {
    let page = FakePage::new("https://www.instagram.com/me/").with_open_dialog(
        FakeDialog::with_links(&[
            "https://www.instagram.com/alice/",
            "https://www.instagram.com/alice/",
            "https://www.instagram.com/reel/C0ffee/",
            "https://www.instagram.com/bob/",
        ]),
    );
    let mut log = SessionLog::new(LogMode::Quiet);

    let handles = get_usernames_from_dialog(&page, &Selectors::default(), &mut log)
        .await
        .unwrap();

    assert_eq!(handles.into_vec(), vec!["alice", "bob"]);
    assert_eq!(
        log.entries().last().unwrap().message,
        "Total unique usernames found: 2"
    );
}

#[tokio::test]
async fn test_extract_without_dialog_is_empty() {
    let page = FakePage::new("https://www.instagram.com/me/");
    let mut log = SessionLog::new(LogMode::Quiet);

    let handles = get_usernames_from_dialog(&page, &Selectors::default(), &mut log)
        .await
        .unwrap();

    assert!(handles.is_empty());
    assert_eq!(log.entries().last().unwrap().level, LogLevel::Error);
}
