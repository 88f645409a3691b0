use std::fs;
use std::time::Duration;

use hoist_core::UpgradeConfig;
use tempfile::tempdir;

use crate::cleanup::sweep_once;
use crate::render::{escape, page, MessageKind};
use crate::routes::sanitize_filename;

#[test]
fn sanitize_filename_keeps_plain_names() {
    assert_eq!(sanitize_filename("app.tar.gz").as_deref(), Some("app.tar.gz"));
    assert_eq!(sanitize_filename("app").as_deref(), Some("app"));
}

#[test]
fn sanitize_filename_strips_path_components() {
    assert_eq!(
        sanitize_filename("/etc/../uploads/app.zip").as_deref(),
        Some("app.zip")
    );
    assert_eq!(sanitize_filename("dir/sub/app").as_deref(), Some("app"));
}

#[test]
fn sanitize_filename_rejects_traversal_and_empty() {
    assert_eq!(sanitize_filename(""), None);
    assert_eq!(sanitize_filename(".."), None);
    assert_eq!(sanitize_filename("/"), None);
}

#[test]
fn escape_neutralizes_markup() {
    assert_eq!(
        escape(r#"<script>alert("x") & 'y'</script>"#),
        "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
    );
}

#[test]
fn page_includes_title_message_and_escaped_log() {
    let config = UpgradeConfig::default();
    let html = page(
        &config,
        Some(("upgrade failed: <boom>", MessageKind::Error)),
        "1. preparing directories...\n   ✓ <ok>\n",
    );

    assert!(html.contains(&config.title));
    assert!(html.contains("upgrade failed: &lt;boom&gt;"));
    assert!(html.contains("class=\"message error\""));
    assert!(html.contains("&lt;ok&gt;"));
    assert!(!html.contains("<boom>"));
}

#[test]
fn page_without_message_has_no_message_block() {
    let config = UpgradeConfig::default();
    let html = page(&config, None, "");
    assert!(!html.contains("class=\"message"));
    assert!(!html.contains("<pre"));
    assert!(html.contains("action=\"/upload\""));
}

#[test]
fn sweep_removes_expired_files_and_keeps_fresh_ones() {
    let dir = tempdir().expect("must create temp dir");
    let stale = dir.path().join("stale.tar.gz");
    let nested = dir.path().join("nested/old.zip");
    fs::create_dir_all(nested.parent().expect("has parent")).expect("must create subdir");
    fs::write(&stale, b"old").expect("must write");
    fs::write(&nested, b"old").expect("must write");

    std::thread::sleep(Duration::from_millis(20));
    let removed = sweep_once(dir.path(), Duration::ZERO);
    assert_eq!(removed, 2);
    assert!(!stale.exists());
    assert!(!nested.exists());

    let fresh = dir.path().join("fresh.tar.gz");
    fs::write(&fresh, b"new").expect("must write");
    let removed = sweep_once(dir.path(), Duration::from_secs(3600));
    assert_eq!(removed, 0);
    assert!(fresh.exists());
}

#[test]
fn sweep_on_missing_directory_is_a_noop() {
    let dir = tempdir().expect("must create temp dir");
    let missing = dir.path().join("never-created");
    assert_eq!(sweep_once(&missing, Duration::ZERO), 0);
}
