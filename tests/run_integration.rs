//! End-to-end run tests.
//!
//! One wiremock server plays both the search API and the document host.
//! Output and manifest directories live in a temp dir.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use pdf_finder::manifest::{CSV_COLUMNS, CSV_MANIFEST, JSON_MANIFEST};
use pdf_finder::{EntryStatus, FinderConfig, ManifestEntry, RunEvent, run};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/customsearch/v1";
const PDF_BODY: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

fn config_for(server: &MockServer, root: &Path, queries: &str) -> FinderConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("API_KEY", "test-key".to_owned()),
        ("CX", "test-cx".to_owned()),
        ("API_ENDPOINT", format!("{}{SEARCH_PATH}", server.uri())),
        ("OUT_DIR", root.join("downloads").display().to_string()),
        ("MANIFEST_DIR", root.join("manifests").display().to_string()),
        ("QUERIES", queries.to_owned()),
        ("TIMEOUT", "5".to_owned()),
        ("USER_AGENT", "pdf-finder-test/1.0".to_owned()),
    ]);
    FinderConfig::from_lookup(|key| vars.get(key).cloned()).expect("config")
}

fn item(server: &MockServer, title: &str, doc_path: &str) -> serde_json::Value {
    json!({
        "title": title,
        "link": format!("{}{doc_path}", server.uri()),
        "snippet": format!("snippet for {title}"),
        "mime": "application/pdf"
    })
}

async fn mount_search(server: &MockServer, query: &str, items: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", format!("{query} filetype:pdf")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_doc(server: &MockServer, doc_path: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(doc_path))
        .respond_with(template)
        .mount(server)
        .await;
}

fn pdf() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(PDF_BODY.to_vec(), "application/pdf")
}

fn assert_outcome_invariant(entry: &ManifestEntry) {
    match entry.status {
        EntryStatus::Downloaded => {
            assert!(!entry.saved_as.is_empty(), "{entry:?}");
            assert!(entry.error.is_empty(), "{entry:?}");
        }
        EntryStatus::Skipped => {
            assert!(entry.saved_as.is_empty(), "{entry:?}");
            assert!(!entry.error.is_empty(), "{entry:?}");
        }
        EntryStatus::Pending => panic!("entry left unprocessed: {entry:?}"),
    }
}

#[tokio::test]
async fn full_run_dedupes_downloads_and_writes_manifest() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    mount_search(
        &server,
        "alpha",
        vec![
            item(&server, "Report", "/docs/a.pdf"),
            item(&server, "Missing", "/docs/missing"),
        ],
    )
    .await;
    mount_search(
        &server,
        "beta",
        vec![
            item(&server, "Other title", "/docs/a.pdf"),
            item(&server, "Landing Page", "/docs/page"),
            item(&server, "Report", "/docs/b.pdf"),
        ],
    )
    .await;

    mount_doc(&server, "/docs/a.pdf", pdf()).await;
    mount_doc(&server, "/docs/b.pdf", pdf()).await;
    mount_doc(&server, "/docs/missing", ResponseTemplate::new(404)).await;
    mount_doc(
        &server,
        "/docs/page",
        ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"),
    )
    .await;

    let config = config_for(&server, root.path(), "alpha, beta");
    let events = RefCell::new(Vec::new());
    let recorder = |event: &RunEvent| events.borrow_mut().push(event.clone());

    let summary = run::run(&config, &recorder).await.expect("run");

    assert_eq!(summary.queries, 2);
    assert_eq!(summary.failed_queries, 0);
    assert_eq!(summary.found, 5);
    assert_eq!(summary.entries.len(), 4);
    assert_eq!(summary.downloaded, 2);
    assert_eq!(summary.skipped, 2);

    let out = root.path().join("downloads");
    let by_link = |doc_path: &str| {
        let link = format!("{}{doc_path}", server.uri());
        summary
            .entries
            .iter()
            .find(|e| e.link == link)
            .cloned()
            .expect("entry for link")
    };

    let a = by_link("/docs/a.pdf");
    assert_eq!(a.query, "alpha");
    assert_eq!(a.title, "Report");
    assert_eq!(a.status, EntryStatus::Downloaded);
    assert_eq!(a.saved_as, out.join("Report.pdf").display().to_string());

    let b = by_link("/docs/b.pdf");
    assert_eq!(b.query, "beta");
    assert_eq!(b.saved_as, out.join("Report (2).pdf").display().to_string());

    let missing = by_link("/docs/missing");
    assert_eq!(missing.status, EntryStatus::Skipped);
    assert_eq!(missing.error, "HTTP 404");
    assert_eq!(missing.saved_as, "");

    let page = by_link("/docs/page");
    assert_eq!(page.status, EntryStatus::Skipped);
    assert!(page.error.contains("text/html"), "{}", page.error);

    for entry in &summary.entries {
        assert_outcome_invariant(entry);
    }

    assert_eq!(std::fs::read(out.join("Report.pdf")).expect("read a"), PDF_BODY);
    assert_eq!(std::fs::read(out.join("Report (2).pdf")).expect("read b"), PDF_BODY);

    let manifest_dir = root.path().join("manifests");
    let json_text = std::fs::read_to_string(manifest_dir.join(JSON_MANIFEST)).expect("json");
    let decoded: Vec<ManifestEntry> = serde_json::from_str(&json_text).expect("decode");
    assert_eq!(decoded, summary.entries);

    let mut reader = csv::Reader::from_path(manifest_dir.join(CSV_MANIFEST)).expect("csv");
    let headers: Vec<String> = reader
        .headers()
        .expect("headers")
        .iter()
        .map(str::to_owned)
        .collect();
    assert_eq!(headers, CSV_COLUMNS);
    assert_eq!(reader.records().count(), 4);

    let events = events.into_inner();
    assert!(matches!(events.first(), Some(RunEvent::RunStarted { .. })));
    assert!(matches!(
        events.iter().find(|e| matches!(e, RunEvent::Deduplicated { .. })),
        Some(RunEvent::Deduplicated { before: 5, unique: 4 })
    ));
    assert!(matches!(
        events.last(),
        Some(RunEvent::RunFinished {
            downloaded: 2,
            skipped: 2,
            ..
        })
    ));
}

#[tokio::test]
async fn failed_query_contributes_nothing_and_run_continues() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", "broken filetype:pdf"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_search(&server, "working", vec![item(&server, "Guide", "/docs/guide.pdf")]).await;
    mount_doc(&server, "/docs/guide.pdf", pdf()).await;

    let config = config_for(&server, root.path(), r#"["broken", "working"]"#);
    let events = RefCell::new(Vec::new());
    let recorder = |event: &RunEvent| events.borrow_mut().push(event.clone());

    let summary = run::run(&config, &recorder).await.expect("run");

    assert_eq!(summary.failed_queries, 1);
    assert_eq!(summary.entries.len(), 1);
    assert_eq!(summary.entries[0].query, "working");
    assert_eq!(summary.downloaded, 1);

    let events = events.into_inner();
    let failure = events
        .iter()
        .find_map(|e| match e {
            RunEvent::QueryFailed { query, message } => Some((query.clone(), message.clone())),
            _ => None,
        })
        .expect("failure event");
    assert_eq!(failure.0, "broken");
    assert!(failure.1.contains("500"), "{}", failure.1);
    assert!(events.contains(&RunEvent::QueryFinished {
        query: "broken".into(),
        count: 0
    }));
}

#[tokio::test]
async fn empty_run_still_writes_manifest() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    mount_search(&server, "nothing", vec![]).await;

    let config = config_for(&server, root.path(), "nothing");
    let summary = run::run(&config, &|_: &RunEvent| {}).await.expect("run");

    assert!(summary.entries.is_empty());
    assert!(summary.manifest.json.exists());
    assert!(summary.manifest.csv.exists());
    assert!(!root.path().join("downloads").exists());
}
