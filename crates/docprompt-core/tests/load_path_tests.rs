//! Loading selections from disk.

use std::fs;

use docprompt_core::ingest::{load_path, MAX_FILE_SIZE};
use docprompt_core::{Error, Phase, Session};
use tempfile::tempdir;

#[tokio::test]
async fn single_file_has_no_relative_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "hello").unwrap();

    let files = load_path(&path).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "notes.txt");
    assert_eq!(files[0].mime_type, "text/plain");
    assert!(files[0].relative_path.is_none());
}

#[tokio::test]
async fn directory_is_walked_recursively_and_sorted() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("reports");
    fs::create_dir_all(root.join("q1")).unwrap();
    fs::write(root.join("b.txt"), "b").unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("q1").join("c.txt"), "c").unwrap();
    fs::write(root.join(".hidden"), "secret").unwrap();

    let files = load_path(&root).await.unwrap();
    let paths: Vec<_> = files
        .iter()
        .map(|f| f.relative_path.clone().unwrap())
        .collect();
    assert_eq!(paths, vec!["reports/a.txt", "reports/b.txt", "reports/q1/c.txt"]);
}

#[tokio::test]
async fn selecting_a_directory_packs_it() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("bundle");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("one.txt"), "1").unwrap();
    fs::write(root.join("two.md"), "2").unwrap();
    fs::write(root.join("three.json"), "{}").unwrap();

    let mut session = Session::new();
    session.select_path(&root).await.unwrap();
    assert_eq!(session.file().unwrap().name, "bundle.zip");
}

#[tokio::test]
async fn empty_directory_is_rejected() {
    let dir = tempdir().unwrap();
    let err = load_path(dir.path()).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn oversized_file_is_rejected_before_reading() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("big.pdf");
    let file = fs::File::create(&path).unwrap();
    file.set_len(MAX_FILE_SIZE + 1).unwrap();

    let err = load_path(&path).await.unwrap_err();
    assert!(err.to_string().contains("too large"));
}

#[tokio::test]
async fn missing_path_leaves_session_without_file() {
    let dir = tempdir().unwrap();
    let mut session = Session::new();

    let err = session
        .select_path(&dir.path().join("nope.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Encoding(_)));
    assert!(session.file().is_none());
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.error().is_some());
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_files_are_followed_but_linked_dirs_are_not() {
    let dir = tempdir().unwrap();
    let outside = dir.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    fs::write(outside.join("shared.txt"), "shared").unwrap();

    let root = dir.path().join("project");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("main.txt"), "main").unwrap();
    std::os::unix::fs::symlink(outside.join("shared.txt"), root.join("shared.txt")).unwrap();
    std::os::unix::fs::symlink(&outside, root.join("linked")).unwrap();
    std::os::unix::fs::symlink(root.join("missing.txt"), root.join("broken.txt")).unwrap();

    let files = load_path(&root).await.unwrap();
    let paths: Vec<_> = files
        .iter()
        .map(|f| f.relative_path.clone().unwrap())
        .collect();
    assert_eq!(paths, vec!["project/main.txt", "project/shared.txt"]);
    assert_eq!(files[1].bytes, b"shared");
}
