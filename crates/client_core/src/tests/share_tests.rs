use std::sync::Arc;

use super::*;
use crate::test_support::{
    FakeClipboard, RecordingControl, RecordingDisplay, RecordingNotifier, RecordingOpener,
};

struct Fixture {
    actions: ShareActions,
    clipboard: Arc<FakeClipboard>,
    opener: Arc<RecordingOpener>,
    notifier: Arc<RecordingNotifier>,
    control: Arc<RecordingControl>,
}

fn fixture(clipboard: FakeClipboard) -> Fixture {
    let clipboard = Arc::new(clipboard);
    let opener = Arc::new(RecordingOpener::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let control = Arc::new(RecordingControl::default());
    let actions = ShareActions::new(
        RecordingDisplay::showing("Be yourself.", "Oscar Wilde"),
        control.clone(),
        notifier.clone(),
        Some(clipboard.clone()),
        opener.clone(),
        "https://example.com/quotes/",
        Duration::from_millis(500),
    );
    Fixture {
        actions,
        clipboard,
        opener,
        notifier,
        control,
    }
}

#[test]
fn copy_writes_exact_citation() {
    let f = fixture(FakeClipboard::default());

    assert!(f.actions.copy_quote(true));

    assert_eq!(f.clipboard.written(), vec!["\"Be yourself.\" — Oscar Wilde"]);
    assert_eq!(f.control.copied(), 1);
    assert_eq!(
        f.notifier.seen(),
        vec![(COPY_SUCCESS_MESSAGE.to_string(), NotificationKind::Success)]
    );
}

#[test]
fn copy_uses_whatever_is_displayed_even_when_empty() {
    let clipboard = Arc::new(FakeClipboard::default());
    let actions = ShareActions::new(
        Arc::new(RecordingDisplay::default()),
        Arc::new(RecordingControl::default()),
        Arc::new(RecordingNotifier::default()),
        Some(clipboard.clone()),
        Arc::new(RecordingOpener::default()),
        "https://example.com/",
        Duration::ZERO,
    );

    assert!(actions.copy_quote(false));
    assert_eq!(clipboard.written(), vec!["\"\" — "]);
}

#[test]
fn copy_failure_reports_false_and_notifies() {
    let f = fixture(FakeClipboard::failing());

    assert!(!f.actions.copy_quote(true));
    assert_eq!(
        f.notifier.seen(),
        vec![(COPY_ERROR_MESSAGE.to_string(), NotificationKind::Error)]
    );

    assert!(!f.actions.copy_quote(false));
    assert_eq!(f.notifier.seen().len(), 1, "silent copy must not notify");
}

#[test]
fn missing_clipboard_is_a_copy_failure() {
    let actions = ShareActions::new(
        RecordingDisplay::showing("Q", "A"),
        Arc::new(RecordingControl::default()),
        Arc::new(RecordingNotifier::default()),
        None,
        Arc::new(RecordingOpener::default()),
        "https://example.com/",
        Duration::ZERO,
    );
    assert!(!actions.copy_quote(false));
}

#[test]
fn intent_urls_are_percent_encoded() {
    let content = DisplayedQuote {
        text: "Be yourself.".into(),
        author: "Oscar Wilde".into(),
    };

    assert_eq!(
        share_target(SharePlatform::Twitter, &content, "https://example.com/"),
        ShareTarget::Intent(
            "https://twitter.com/intent/tweet?text=%22Be%20yourself.%22%20%E2%80%94%20Oscar%20Wilde"
                .into()
        )
    );
    assert_eq!(
        share_target(SharePlatform::Facebook, &content, "https://example.com/q/"),
        ShareTarget::Intent(
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com%2Fq%2F".into()
        )
    );
    assert_eq!(
        share_target(SharePlatform::Tiktok, &content, "https://example.com/"),
        ShareTarget::CopyThenOpen("https://www.tiktok.com")
    );
}

#[test]
fn intent_text_encodes_reserved_punctuation_too() {
    // Stricter than encodeURIComponent, which leaves !'()* alone; both decode
    // to the same text.
    let content = DisplayedQuote {
        text: "Don't panic! (It's fine)".into(),
        author: "Ann".into(),
    };
    assert_eq!(
        share_target(SharePlatform::Twitter, &content, "https://example.com/"),
        ShareTarget::Intent(
            "https://twitter.com/intent/tweet?text=%22Don%27t%20panic%21%20%28It%27s%20fine%29%22%20%E2%80%94%20Ann"
                .into()
        )
    );
}

#[tokio::test(start_paused = true)]
async fn intent_platform_opens_immediately_without_copying() {
    let f = fixture(FakeClipboard::default());

    assert!(f.actions.share_to(SharePlatform::Twitter).await);

    assert_eq!(f.opener.opened().len(), 1);
    assert!(f.opener.opened()[0].starts_with("https://twitter.com/intent/tweet?text="));
    assert!(f.clipboard.written().is_empty());
}

#[tokio::test(start_paused = true)]
async fn copy_platform_copies_then_opens_after_delay() {
    let f = fixture(FakeClipboard::default());
    let started = tokio::time::Instant::now();

    assert!(f.actions.share_to(SharePlatform::Instagram).await);

    assert!(started.elapsed() >= Duration::from_millis(500));
    assert_eq!(f.clipboard.written(), vec!["\"Be yourself.\" — Oscar Wilde"]);
    assert_eq!(f.opener.opened(), vec!["https://www.instagram.com"]);
    assert_eq!(
        f.notifier.seen(),
        vec![(
            "Quote copied! Opening Instagram...".to_string(),
            NotificationKind::Info
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn copy_platform_stops_when_copy_fails() {
    let f = fixture(FakeClipboard::failing());

    assert!(!f.actions.share_to(SharePlatform::Tiktok).await);

    assert!(f.opener.opened().is_empty());
    assert_eq!(
        f.notifier.seen(),
        vec![(COPY_ERROR_MESSAGE.to_string(), NotificationKind::Error)]
    );
}

#[test]
fn platforms_parse_from_names_and_aliases() {
    assert_eq!("Twitter".parse::<SharePlatform>().ok(), Some(SharePlatform::Twitter));
    assert_eq!("fb".parse::<SharePlatform>().ok(), Some(SharePlatform::Facebook));
    assert_eq!(" ig ".parse::<SharePlatform>().ok(), Some(SharePlatform::Instagram));
    assert_eq!("tiktok".parse::<SharePlatform>().ok(), Some(SharePlatform::Tiktok));
    assert!("myspace".parse::<SharePlatform>().is_err());
    for platform in SharePlatform::ALL {
        assert_eq!(platform.to_string().parse::<SharePlatform>().ok(), Some(platform));
    }
}
