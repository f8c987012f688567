//! End-to-end tests over the shipped data directory and ad-hoc fixtures.

use krasnyy::context::Context;
use krasnyy::export::materialize;
use krasnyy::render::{Outcome, Pacing, RenderSequencer, Transcript};
use krasnyy::source::FsSource;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

async fn sequencer_for(dir: PathBuf, lang: &str) -> RenderSequencer<Transcript> {
    let ctx = Context::init(Arc::new(FsSource::new(dir)), lang).await;
    RenderSequencer::new(ctx, Arc::new(Mutex::new(Transcript::new())), Pacing::instant())
}

fn transcript(seq: &RenderSequencer<Transcript>) -> Transcript {
    seq.sink().lock().unwrap().clone()
}

#[tokio::test]
async fn test_shipped_data_renders_every_template() {
    let seq = sequencer_for(data_dir(), "en").await;

    let outcome = seq.run("john doe").await.unwrap();
    let t = transcript(&seq);

    assert_eq!(outcome, Outcome::Completed { total: 17 });
    let labels: Vec<&str> = t.blocks().iter().map(|u| u.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Social Media", "Usernames", "Documents", "Code & Paste Leaks", "News", "Archives"]
    );
    assert_eq!(t.status(), Some("17 results found"));

    let urls: Vec<&str> = t
        .blocks()
        .iter()
        .flat_map(|u| u.urls.iter().map(String::as_str))
        .collect();
    assert!(urls.contains(&"https://github.com/johndoe"));
    assert!(urls.contains(&"https://duckduckgo.com/?q=john+doe&ia=news"));
    assert!(urls.contains(&"https://www.google.com/search?q=site:twitter.com+%22john%20doe%22"));
    assert!(urls.iter().all(|u| !u.contains("{query")));
}

#[tokio::test]
async fn test_export_matches_rendered_blocks() {
    let seq = sequencer_for(data_dir(), "tr").await;
    seq.run("alice").await.unwrap();
    let rendered: Vec<_> = transcript(&seq).blocks().into_iter().cloned().collect();

    let ctx = Context::init(Arc::new(FsSource::new(data_dir())), "tr").await;
    let doc = materialize(ctx.dictionary(), &ctx.locale(), "alice");

    assert_eq!(doc.units, rendered);
    assert_eq!(doc.language, "tr");
    assert_eq!(doc.units[0].label, "Sosyal Medya");
}

#[tokio::test]
async fn test_single_category_fixture() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("dorks.json"),
        r#"{"social": ["https://s.example/{query}"], "priority_order": ["social"]}"#,
    )
    .unwrap();

    let seq = sequencer_for(dir.path().to_path_buf(), "en").await;
    let outcome = seq.run("alice/bob").await.unwrap();
    let t = transcript(&seq);

    assert_eq!(outcome, Outcome::Completed { total: 1 });
    assert_eq!(t.blocks().len(), 1);
    assert_eq!(t.blocks()[0].category, "social");
    assert_eq!(t.blocks()[0].urls, vec!["https://s.example/alice%2Fbob"]);
    assert_eq!(t.status(), Some("1 results found"));
}

#[tokio::test]
async fn test_missing_data_directory_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let seq = sequencer_for(dir.path().join("nothing-here"), "en").await;

    let outcome = seq.run("alice").await.unwrap();
    let t = transcript(&seq);

    assert_eq!(outcome, Outcome::Completed { total: 0 });
    assert!(t.typed_lines().contains(&"Dork list missing."));
    assert_eq!(t.status(), Some("Henüz sonuç yok"));
}

#[tokio::test]
async fn test_language_switch_between_searches() {
    let ctx = Context::init(Arc::new(FsSource::new(data_dir())), "en").await;
    let seq = RenderSequencer::new(
        Arc::clone(&ctx),
        Arc::new(Mutex::new(Transcript::new())),
        Pacing::instant(),
    );

    seq.run("x").await.unwrap();
    assert_eq!(transcript(&seq).blocks()[0].label, "Social Media");

    ctx.set_language("tr").await;
    seq.run("x").await.unwrap();
    assert_eq!(transcript(&seq).blocks()[0].label, "Sosyal Medya");

    ctx.set_language("xx").await;
    seq.run("x").await.unwrap();
    let t = transcript(&seq);
    assert_eq!(t.blocks()[0].label, "SOCIAL");
    assert_eq!(t.typed_lines()[0], ">> Starting dork analysis: x");
    assert_eq!(ctx.locales().cached_languages(), vec!["en", "tr"]);
}
