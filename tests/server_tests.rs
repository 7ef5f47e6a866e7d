//! Static server behavior, exercised without a browser

use platesmoke::StaticServer;
use std::path::PathBuf;

fn write_page(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("index.html");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_serves_fixed_page_on_any_path() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(
        &dir,
        r#"<!DOCTYPE html>
<html>
<head><title>Plate Viewer</title></head>
<body><canvas id="plate-canvas" width="64" height="64"></canvas></body>
</html>"#,
    );

    let server = StaticServer::start(18765, page).unwrap();
    let client = reqwest::blocking::Client::new();

    for path in ["/", "/anything", "/deep/route?q=1"] {
        let res = client
            .get(format!("{}{}", server.url(), path))
            .send()
            .unwrap();
        assert_eq!(res.status().as_u16(), 200, "path {}", path);
        let content_type = res
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        assert!(
            content_type.starts_with("text/html"),
            "unexpected content type {}",
            content_type
        );
        assert!(res.text().unwrap().contains("plate-canvas"));
    }

    server.stop();
}

#[test]
fn test_non_get_requests_served_identically() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(&dir, "<html><body>fixed</body></html>");

    let server = StaticServer::start(18766, page).unwrap();
    let client = reqwest::blocking::Client::new();

    let res = client
        .post(format!("{}/submit", server.url()))
        .body("ignored")
        .send()
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    assert!(res.text().unwrap().contains("fixed"));

    server.stop();
}

#[test]
fn test_missing_page_yields_500() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("does-not-exist.html");

    let server = StaticServer::start(18767, page).unwrap();
    let res = reqwest::blocking::get(format!("{}/", server.url())).unwrap();
    assert_eq!(res.status().as_u16(), 500);
    assert!(res.text().unwrap().contains("Error loading"));

    server.stop();
}

#[test]
fn test_page_read_per_request() {
    // The file is read on every request, so content changes (or the file
    // disappearing) show up without a restart.
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(&dir, "<html><body>v1</body></html>");

    let server = StaticServer::start(18768, page.clone()).unwrap();
    let body = reqwest::blocking::get(format!("{}/", server.url()))
        .unwrap()
        .text()
        .unwrap();
    assert!(body.contains("v1"));

    std::fs::write(&page, "<html><body>v2</body></html>").unwrap();
    let body = reqwest::blocking::get(format!("{}/", server.url()))
        .unwrap()
        .text()
        .unwrap();
    assert!(body.contains("v2"));

    std::fs::remove_file(&page).unwrap();
    let res = reqwest::blocking::get(format!("{}/", server.url())).unwrap();
    assert_eq!(res.status().as_u16(), 500);

    server.stop();
}

#[test]
fn test_stop_releases_port() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(&dir, "<html></html>");

    let server = StaticServer::start(18769, page.clone()).unwrap();
    server.stop();

    // The port must be immediately reusable.
    let server = StaticServer::start(18769, page).unwrap();
    server.stop();
}

#[test]
fn test_bind_conflict_reported() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(&dir, "<html></html>");

    let server = StaticServer::start(18770, page.clone()).unwrap();
    let conflict = StaticServer::start(18770, page);
    assert!(conflict.is_err());
    let msg = conflict.err().unwrap().to_string();
    assert!(msg.contains("Static server failed"), "got: {}", msg);

    server.stop();
}
