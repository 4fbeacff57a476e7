//! Watch session tests, with injected events and with a live watcher.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;
use xhtmldoc_core::{
    watch_source, Builder, Config, FileClass, WatchEvent, WatchEventKind, WatchSession,
};

fn write(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn modified(path: &Path) -> SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

#[tokio::test]
async fn test_new_file_compiles_only_itself() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/index.md", b"# Index\n");
    write(dir.path(), "src/guide/intro.md", b"# Intro\n");
    write(dir.path(), "src/img/logo.png", b"png");
    let config = Config::default().with_base_dir(dir.path());

    Builder::new(config.clone()).build().await.unwrap();
    let dist = dir.path().join("dist");
    let untouched = ["index.xhtml", "guide/intro.xhtml", "img/logo.png"];
    let before: Vec<_> = untouched
        .iter()
        .map(|rel| (fs::read(dist.join(rel)).unwrap(), modified(&dist.join(rel))))
        .collect();

    // Coarse mtime filesystems need a gap to show a rewrite
    tokio::time::sleep(Duration::from_millis(50)).await;
    write(dir.path(), "src/notes/new.md", b"# New note\n");

    let session = WatchSession::new(config);
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(WatchEvent::new(
        WatchEventKind::Created,
        "notes/new.md",
        FileClass::Markup,
    ))
    .unwrap();
    drop(tx);
    let summary = session.run(rx).await;

    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.failed, 0);
    let new_doc = fs::read_to_string(dist.join("notes/new.xhtml")).unwrap();
    assert!(new_doc.contains("<title>New note</title>"));

    for (rel, (bytes, mtime)) in untouched.iter().zip(before) {
        assert_eq!(fs::read(dist.join(rel)).unwrap(), bytes, "{rel} content changed");
        assert_eq!(modified(&dist.join(rel)), mtime, "{rel} was rewritten");
    }
}

#[tokio::test]
async fn test_asset_event_mirrors_single_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/img/a.png", b"first");
    write(dir.path(), "src/img/b.png", b"sibling");
    let session = WatchSession::new(Config::default().with_base_dir(dir.path()));

    let dest = session
        .dispatch(&WatchEvent::new(
            WatchEventKind::Modified,
            "img/a.png",
            FileClass::Asset,
        ))
        .await
        .unwrap();

    assert_eq!(dest, Path::new("img/a.png"));
    assert_eq!(fs::read(dir.path().join("dist/img/a.png")).unwrap(), b"first");
    assert!(!dir.path().join("dist/img/b.png").exists());
}

#[tokio::test]
async fn test_live_watcher_picks_up_new_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src/notes")).unwrap();
    let config = Config::default().with_base_dir(dir.path());

    let (watcher, rx) = watch_source(&config).unwrap();
    let session = WatchSession::new(config);
    let handle = tokio::spawn(async move { session.run(rx).await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    write(dir.path(), "src/notes/new.md", b"# Live\n");

    let target = dir.path().join("dist/notes/new.xhtml");
    let mut found = false;
    for _ in 0..100 {
        if fs::read_to_string(&target)
            .map(|s| s.contains("<title>Live</title>"))
            .unwrap_or(false)
        {
            found = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    drop(watcher);
    handle.abort();
    assert!(found, "watcher never compiled {target:?}");
}

#[test]
fn test_watch_requires_source_root() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_base_dir(dir.path());
    assert!(watch_source(&config).is_err());
}
