//! End-to-end session flows against the demo provider.

use std::time::Duration;

use docprompt_core::archive::ZIP_MIME_TYPE;
use docprompt_core::{
    Error, InputFile, Phase, Provider, ResultPanel, Session, SimulatedClient, ViewModel,
    MAX_FILE_SIZE,
};

fn demo_provider() -> Provider {
    Provider::Simulated(SimulatedClient::with_delay(Duration::ZERO))
}

#[tokio::test]
async fn report_pdf_in_demo_mode_echoes_name_and_prompt() {
    let mut session = Session::new();
    session
        .select(vec![InputFile::new("report.pdf", vec![7; 2 * 1024 * 1024])])
        .unwrap();
    session.set_prompt("Summarize");

    assert!(session.submit(&demo_provider()).await);

    assert_eq!(session.phase(), Phase::Success);
    assert!(session.error().is_none());
    assert!(session.result().contains("report.pdf"));
    assert!(session.result().contains("Summarize"));
}

#[test]
fn movie_is_rejected_with_type_error() {
    let mut session = Session::new();
    let err = session
        .select(vec![InputFile::new("movie.mp4", vec![0; 1024])])
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().contains("Invalid file type"));
    assert!(session.file().is_none());
}

#[test]
fn oversized_file_is_rejected_and_clears_previous_file() {
    let mut session = Session::new();
    session
        .select(vec![InputFile::new("small.txt", b"ok".to_vec())])
        .unwrap();

    let err = session
        .select(vec![InputFile::new("huge.pdf", vec![0; MAX_FILE_SIZE as usize + 1])])
        .unwrap_err();

    assert!(err.to_string().contains("too large"));
    assert!(session.file().is_none());
    assert_eq!(session.phase(), Phase::Idle);
}

#[tokio::test]
async fn folder_of_three_files_becomes_one_zip() {
    let files = vec![
        InputFile::new("a.txt", b"first".to_vec()).with_relative_path("project/a.txt"),
        InputFile::new("b.csv", b"1,2,3".to_vec()).with_relative_path("project/data/b.csv"),
        InputFile::new("c.png", vec![0x89, 0x50, 0x4e, 0x47]).with_relative_path("project/c.png"),
    ];

    let mut session = Session::new();
    session.select(files).unwrap();

    let file = session.file().unwrap();
    assert_eq!(file.name, "project.zip");
    assert_eq!(file.mime_type, ZIP_MIME_TYPE);

    session.set_prompt("What is in this project?");
    assert!(session.submit(&demo_provider()).await);
    assert_eq!(session.phase(), Phase::Success);
    assert!(session.result().contains("project.zip"));
}

#[tokio::test]
async fn submit_without_prompt_or_file_is_a_no_op() {
    let mut session = Session::new();
    session.set_prompt("Summarize");
    assert!(!session.submit(&demo_provider()).await);
    assert_eq!(session.phase(), Phase::Idle);

    session
        .select(vec![InputFile::new("notes.txt", b"hi".to_vec())])
        .unwrap();
    session.set_prompt("");
    assert!(!session.submit(&demo_provider()).await);
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn failure_keeps_no_partial_result() {
    let mut session = Session::new();
    session
        .select(vec![InputFile::new("notes.txt", b"hi".to_vec())])
        .unwrap();
    session.set_prompt("Summarize");

    session.begin_submit().unwrap();
    session.finish_submit(Err(Error::Transport("connection reset".to_string())));

    assert_eq!(session.phase(), Phase::Error);
    assert_eq!(session.error(), Some("connection reset"));
    assert_eq!(session.result(), "");
}

#[tokio::test]
async fn remove_file_resets_everything() {
    let mut session = Session::new();
    session
        .select(vec![InputFile::new("notes.txt", b"hi".to_vec())])
        .unwrap();
    session.set_prompt("Summarize");
    session.submit(&demo_provider()).await;
    assert_eq!(session.phase(), Phase::Success);

    session.remove_file();

    assert!(session.file().is_none());
    assert_eq!(session.prompt(), "");
    assert_eq!(session.result(), "");
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(ViewModel::from_session(&session).result, ResultPanel::Empty);
}
