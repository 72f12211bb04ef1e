use ai_toolkit::portfolio::{
    html_escape, render_page, render_to_file, router, serve_on, PortfolioContent, SiteState,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tokio::net::TcpListener;

fn sample_content() -> PortfolioContent {
    let raw = fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("site/content.json"))
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_every_title_appears_exactly_once() {
    let content = sample_content();
    assert!(!content.services.is_empty());
    assert!(!content.projects.is_empty());

    let page = render_page(&content);
    let titles = content
        .services
        .iter()
        .map(|s| &s.title)
        .chain(content.projects.iter().map(|p| &p.title));
    for title in titles {
        let needle = html_escape(title);
        assert_eq!(page.matches(&needle).count(), 1, "title {:?}", title);
    }
}

#[test]
fn test_markup_in_content_is_escaped() {
    let content: PortfolioContent = serde_json::from_str(
        r#"{
            "name": "<script>alert(1)</script>",
            "services": [{"title": "R&D", "description": "a < b"}]
        }"#,
    )
    .unwrap();
    let page = render_page(&content);
    assert!(!page.contains("<script>"));
    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(page.contains("<h3>R&amp;D</h3>"));
    assert!(page.contains("a &lt; b"));
}

#[test]
fn test_links_and_placeholders() {
    let page = render_page(&sample_content());
    assert!(page.contains("href=\"https://example.com/doc-search\""));
    assert!(!page.contains("href=\"#!\""));
    assert!(page.contains("href=\"mailto:hello@example.com\""));
    assert!(page.contains(">GitHub</a>"));
    assert!(!page.contains(">Twitter</a>"));
}

#[test]
fn test_render_to_file_creates_parents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("public").join("index.html");
    render_to_file(&sample_content(), &path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_page(&sample_content()));
}

#[tokio::test]
async fn test_server_routes() {
    let assets = TempDir::new().unwrap();
    fs::write(assets.path().join("style.css"), "body { color: red; }").unwrap();

    let content = sample_content();
    let app = router(SiteState::new(&content).unwrap(), assets.path());
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_on(listener, app));

    let base = format!("http://{}", addr);
    let client = reqwest::Client::new();

    let index = client.get(format!("{}/", base)).send().await.unwrap();
    assert!(index.status().is_success());
    assert!(index.text().await.unwrap().contains("<h1>Jordan Reyes</h1>"));

    let json: PortfolioContent = client
        .get(format!("{}/content.json", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json, content);

    let health = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(health.text().await.unwrap(), "ok");

    let css = client
        .get(format!("{}/assets/style.css", base))
        .send()
        .await
        .unwrap();
    assert!(css.status().is_success());
    assert_eq!(css.text().await.unwrap(), "body { color: red; }");

    let missing = client
        .get(format!("{}/assets/nope.css", base))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}
